//! OCRトランスクリプトキャッシュ
//!
//! フォルダごとに保存し、キーは「OCRエンジン名:画像バイトのSHA-256」。
//! 同じ写真を同じエンジンで再処理するときOCR呼び出しを省く。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = ".ocr-cache.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_name: String,
    pub file_size: u64,
    /// OCRで文字が見つからなかった場合は `None`
    pub transcript: Option<String>,
}

impl CacheFile {
    const CURRENT_VERSION: u32 = 2;

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// `folder` のキャッシュを読み込む（ない・読めない場合は空）
    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("cannot open {}: {}", cache_path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_reader::<_, CacheFile>(BufReader::new(file)) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => cache,
            Ok(cache) => {
                tracing::warn!(
                    found = cache.version,
                    expected = Self::CURRENT_VERSION,
                    "cache version mismatch, starting fresh"
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!("corrupt cache {}: {}", cache_path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// キャッシュファイルを削除（なければ `Ok(false)`）
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(cache_path)?;
        Ok(true)
    }

    pub fn get(&self, hash: &str) -> Option<&CacheEntry> {
        self.entries.get(hash)
    }

    pub fn insert(&mut self, hash: String, file_name: String, file_size: u64, transcript: Option<String>) {
        self.entries.insert(
            hash,
            CacheEntry {
                file_name,
                file_size,
                transcript,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// 画像バイトのSHA-256（16進）
pub fn hash_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// キャッシュキー（エンジンが違えば別エントリ）
pub fn cache_key(engine: &str, bytes: &[u8]) -> String {
    format!("{}:{}", engine, hash_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_bytes() {
        assert_eq!(
            hash_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_ne!(hash_bytes(b"a"), hash_bytes(b"b"));
    }

    #[test]
    fn test_cache_key_depends_on_engine() {
        let vision = cache_key("vision", b"photo");
        let tesseract = cache_key("tesseract", b"photo");

        assert_ne!(vision, tesseract);
        assert!(vision.starts_with("vision:"));
        assert!(vision.ends_with(&hash_bytes(b"photo")));
    }

    #[test]
    fn test_default_is_empty() {
        let cache = CacheFile::default();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
    }
}
