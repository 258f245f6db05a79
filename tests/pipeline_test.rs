//! キャッシュ済みトランスクリプトでの写真処理テスト
//!
//! キャッシュを事前に埋めてOCRを呼ばずに済ませ、
//! OCR以降の処理は実際に動かす。

use interlock_common::{Extractor, LogRow};
use interlock_ocr::cache::{cache_key, CacheFile};
use interlock_ocr::config::Config;
use interlock_ocr::ocr::OcrProvider;
use interlock_ocr::pipeline::{process_all, process_image, ProcessContext, ProcessOutcome, TimestampSource};
use interlock_ocr::scanner::{scan_folder, ImageInfo};
use interlock_ocr::sink::{self, SinkFormat};
use std::path::Path;
use tempfile::tempdir;

const TRANSCRIPT: &str = "Name\n\nAlpha-1\nDescription\nNot Assigned\n151-HIGH TEMP deg\nAction";

fn write_photo(dir: &Path, file_name: &str, bytes: &[u8]) -> ImageInfo {
    let path = dir.join(file_name);
    std::fs::write(&path, bytes).unwrap();
    ImageInfo {
        path,
        file_name: file_name.to_string(),
        date: Some("2025-06-01 07:30:00".to_string()),
    }
}

fn context<'a>(config: &'a Config, cache: CacheFile, log: &Path, format: SinkFormat) -> ProcessContext<'a> {
    ProcessContext {
        config,
        provider: OcrProvider::Vision,
        extractor: Extractor::default(),
        sink: Some(sink::open_sink(format, log, &config.sheet_name)),
        cache: Some(cache),
        timestamp: TimestampSource::Exif,
    }
}

#[tokio::test]
async fn test_cached_transcript_is_recorded() {
    let dir = tempdir().unwrap();
    let image = write_photo(dir.path(), "panel.jpg", b"photo-bytes-1");

    let mut cache = CacheFile::default();
    cache.insert(cache_key("vision", b"photo-bytes-1"), "panel.jpg".into(), 13, Some(TRANSCRIPT.into()));

    let config = Config::default();
    let log = dir.path().join("log.jsonl");
    let mut ctx = context(&config, cache, &log, SinkFormat::JsonLines);

    let outcome = process_image(&image, &mut ctx).await.unwrap();
    let expected = LogRow {
        timestamp: "2025-06-01 07:30:00".into(),
        name: "Alpha-1".into(),
        description: "151-HIGH TEMP".into(),
    };
    assert_eq!(outcome, ProcessOutcome::Recorded(expected.clone()));

    let rows = sink::read_log(SinkFormat::JsonLines, &log, &config.sheet_name).unwrap();
    assert_eq!(rows, vec![expected]);
}

#[tokio::test]
async fn test_no_text_writes_nothing() {
    let dir = tempdir().unwrap();
    let image = write_photo(dir.path(), "blank.jpg", b"blank");

    let mut cache = CacheFile::default();
    cache.insert(cache_key("vision", b"blank"), "blank.jpg".into(), 5, None);

    let config = Config::default();
    let log = dir.path().join("log.jsonl");
    let mut ctx = context(&config, cache, &log, SinkFormat::JsonLines);

    let outcome = process_image(&image, &mut ctx).await.unwrap();
    assert_eq!(outcome, ProcessOutcome::NoText);
    assert!(!log.exists());
}

#[tokio::test]
async fn test_unrecognized_transcript_still_recorded() {
    let dir = tempdir().unwrap();
    let image = write_photo(dir.path(), "other.jpg", b"other");

    let mut cache = CacheFile::default();
    cache.insert(cache_key("vision", b"other"), "other.jpg".into(), 5, Some("MAIN MENU\nSettings".into()));

    let config = Config::default();
    let log = dir.path().join("log.jsonl");
    let mut ctx = context(&config, cache, &log, SinkFormat::JsonLines);

    match process_image(&image, &mut ctx).await.unwrap() {
        ProcessOutcome::Recorded(row) => {
            assert_eq!(row.name, "unrecognized");
            assert_eq!(row.description, "unrecognized");
        }
        other => panic!("expected a recorded row, got {:?}", other),
    }
}

#[tokio::test]
async fn test_process_all_into_spreadsheet() {
    let dir = tempdir().unwrap();
    let photos = dir.path().join("photos");
    std::fs::create_dir_all(&photos).unwrap();

    let mut cache = CacheFile::default();
    for i in 0..3u8 {
        let bytes = vec![i; 16];
        let transcript = format!("Name\nIL-{}\nDescription\n20{}-LOW FLOW 2\nAction", i, i);
        cache.insert(cache_key("vision", &bytes), format!("p{}.jpg", i), 16, Some(transcript));
        std::fs::write(photos.join(format!("p{}.jpg", i)), &bytes).unwrap();
    }
    std::fs::write(photos.join("broken.jpg"), b"not cached, not an image").unwrap();

    let images = scan_folder(&photos, false).unwrap();
    assert_eq!(images.len(), 4);

    let config = Config::default();
    let log = dir.path().join("interlocks.xlsx");
    let mut ctx = context(&config, cache, &log, SinkFormat::Xlsx);

    let summary = process_all(&images, &mut ctx).await;
    assert_eq!(summary.recorded, 3);
    assert_eq!(summary.cache_hits, 3);
    // キャッシュにないファイルは通信前に画像デコードで失敗する
    assert_eq!(summary.failed, 1);

    let rows = sink::read_log(SinkFormat::Xlsx, &log, &config.sheet_name).unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["IL-0", "IL-1", "IL-2"]);
    assert_eq!(rows[1].description, "201-LOW FLOW");
}

#[tokio::test]
async fn test_dry_run_has_no_sink() {
    let dir = tempdir().unwrap();
    let image = write_photo(dir.path(), "panel.jpg", b"dry");

    let mut cache = CacheFile::default();
    cache.insert(cache_key("vision", b"dry"), "panel.jpg".into(), 3, Some(TRANSCRIPT.into()));

    let config = Config::default();
    let mut ctx = ProcessContext {
        config: &config,
        provider: OcrProvider::Vision,
        extractor: Extractor::default(),
        sink: None,
        cache: Some(cache),
        timestamp: TimestampSource::Now,
    };

    let outcome = process_image(&image, &mut ctx).await.unwrap();
    assert!(matches!(outcome, ProcessOutcome::Recorded(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_cache_is_per_engine() {
    let dir = tempdir().unwrap();
    let photos = dir.path().join("photos");
    std::fs::create_dir_all(&photos).unwrap();
    std::fs::write(photos.join("panel.jpg"), b"seen by vision only").unwrap();

    let mut cache = CacheFile::default();
    cache.insert(
        cache_key("vision", b"seen by vision only"),
        "panel.jpg".into(),
        19,
        Some(TRANSCRIPT.into()),
    );

    let config = Config::default();
    let mut ctx = ProcessContext {
        config: &config,
        provider: OcrProvider::Tesseract,
        extractor: Extractor::default(),
        sink: None,
        cache: Some(cache),
        timestamp: TimestampSource::Now,
    };

    // visionの結果は使わず、OCRを実行してダミーバイトで失敗する
    let images = scan_folder(&photos, false).unwrap();
    let summary = process_all(&images, &mut ctx).await;
    assert_eq!(summary.cache_hits, 0);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.recorded, 0);
}
