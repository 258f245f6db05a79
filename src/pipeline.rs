//! 写真 → OCR → 抽出 → ログ行
//!
//! ## 写真1枚の流れ
//! 1. 画像を読み込む
//! 2. キャッシュまたはOCRからトランスクリプト取得
//! 3. `{name, description}` を抽出
//! 4. `(timestamp, name, description)` をシンクに追記
//!
//! 文字のない写真は [`ProcessOutcome::NoText`] として報告し、何も書かない。

use crate::cache::{self, CacheFile};
use crate::config::Config;
use crate::error::Result;
use crate::notify;
use crate::ocr::{self, OcrProvider};
use crate::scanner::ImageInfo;
use crate::sink::RecordSink;
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use interlock_common::{ExtractionResult, Extractor, LogRow};
use rayon::prelude::*;
use serde::Serialize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TimestampSource {
    /// 処理時刻
    #[default]
    Now,
    /// EXIFの撮影日時（なければ処理時刻）
    Exif,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Recorded(LogRow),
    NoText,
}

pub struct ProcessContext<'a> {
    pub config: &'a Config,
    pub provider: OcrProvider,
    pub extractor: Extractor,
    /// ドライランでは `None`
    pub sink: Option<Box<dyn RecordSink>>,
    /// `--use-cache` 指定時のみ `Some`
    pub cache: Option<CacheFile>,
    pub timestamp: TimestampSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub recorded: usize,
    pub no_text: usize,
    pub failed: usize,
    pub cache_hits: usize,
}

pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn timestamp_for(image: &ImageInfo, source: TimestampSource) -> String {
    match (source, &image.date) {
        (TimestampSource::Exif, Some(date)) => date.clone(),
        _ => now_timestamp(),
    }
}

/// `extract` コマンドの1件分（入力元つき）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedTranscript {
    pub source: String,
    #[serde(flatten)]
    pub result: ExtractionResult,
}

/// `(入力元, トランスクリプト)` を並列に抽出（入力順を保持）
pub fn extract_transcripts(extractor: &Extractor, transcripts: &[(String, String)]) -> Vec<ExtractedTranscript> {
    transcripts
        .par_iter()
        .map(|(source, text)| ExtractedTranscript {
            source: source.clone(),
            result: extractor.extract(text),
        })
        .collect()
}

/// JSON出力（件数に関係なく常に配列）
pub fn extraction_json(items: &[ExtractedTranscript]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

/// トランスクリプト1件からログ行を作る
pub fn record_transcript(extractor: &Extractor, transcript: &str, timestamp: String) -> LogRow {
    tracing::debug!("raw transcript: {:?}", transcript);
    LogRow::new(timestamp, extractor.extract(transcript))
}

async fn transcribe(
    image: &ImageInfo,
    bytes: &[u8],
    ctx: &mut ProcessContext<'_>,
    summary: &mut ProcessSummary,
) -> Result<Option<String>> {
    let key = ctx
        .cache
        .as_ref()
        .map(|_| cache::cache_key(ctx.provider.command_name(), bytes));

    if let (Some(cache), Some(key)) = (ctx.cache.as_ref(), key.as_deref()) {
        if let Some(entry) = cache.get(key) {
            tracing::debug!(file = %image.file_name, "transcript cache hit");
            summary.cache_hits += 1;
            return Ok(entry.transcript.clone());
        }
    }

    let transcript = ocr::recognize(ctx.provider, ctx.config, bytes).await?;

    if let (Some(cache), Some(key)) = (ctx.cache.as_mut(), key) {
        cache.insert(key, image.file_name.clone(), bytes.len() as u64, transcript.clone());
    }

    Ok(transcript)
}

async fn process_one(
    image: &ImageInfo,
    ctx: &mut ProcessContext<'_>,
    summary: &mut ProcessSummary,
) -> Result<ProcessOutcome> {
    let bytes = std::fs::read(&image.path)?;

    let Some(transcript) = transcribe(image, &bytes, ctx, summary).await? else {
        return Ok(ProcessOutcome::NoText);
    };

    let row = record_transcript(&ctx.extractor, &transcript, timestamp_for(image, ctx.timestamp));

    if let Some(sink) = ctx.sink.as_mut() {
        sink.append(&row)?;
        tracing::info!(file = %image.file_name, name = %row.name, "row appended");
    }

    Ok(ProcessOutcome::Recorded(row))
}

/// 写真1枚を処理
pub async fn process_image(image: &ImageInfo, ctx: &mut ProcessContext<'_>) -> Result<ProcessOutcome> {
    let mut summary = ProcessSummary::default();
    process_one(image, ctx, &mut summary).await
}

/// 写真を順に処理（失敗した写真は報告してスキップ）
pub async fn process_all(images: &[ImageInfo], ctx: &mut ProcessContext<'_>) -> ProcessSummary {
    let mut summary = ProcessSummary::default();

    let progress = ProgressBar::new(images.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    for image in images {
        progress.set_message(image.file_name.clone());

        let reply = match process_one(image, ctx, &mut summary).await {
            Ok(ProcessOutcome::Recorded(row)) => {
                summary.recorded += 1;
                let result = ExtractionResult {
                    name: row.name,
                    description: row.description,
                };
                tracing::info!("{}", notify::summarize(&result));
                notify::format_reply(&result)
            }
            Ok(ProcessOutcome::NoText) => {
                summary.no_text += 1;
                notify::format_no_text()
            }
            Err(e) => {
                summary.failed += 1;
                tracing::warn!(file = %image.file_name, "processing failed: {}", e);
                notify::format_failure(&e)
            }
        };

        progress.println(format!("📸 {}\n{}\n", image.file_name, reply));
        progress.inc(1);
    }

    progress.finish_and_clear();
    summary
}
