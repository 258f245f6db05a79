//! インターロックログのシンク
//!
//! 写真1枚につき `(timestamp, name, description)` を1行追記する。
//! 既存の行は書き換えない。

pub mod excel;
pub mod jsonl;

use crate::error::Result;
use interlock_common::LogRow;
use std::path::Path;

pub use excel::XlsxSink;
pub use jsonl::JsonLinesSink;

pub const HEADER: [&str; 3] = ["Timestamp", "Name", "Description"];

pub trait RecordSink {
    fn append(&mut self, row: &LogRow) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkFormat {
    Xlsx,
    JsonLines,
}

impl SinkFormat {
    /// `.xlsx` → Excel、それ以外 → JSON Lines
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => SinkFormat::Xlsx,
            _ => SinkFormat::JsonLines,
        }
    }
}

impl std::str::FromStr for SinkFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(SinkFormat::Xlsx),
            "jsonl" | "json" => Ok(SinkFormat::JsonLines),
            _ => Err(format!("Unknown format: {}. Use xlsx or jsonl", s)),
        }
    }
}

impl std::fmt::Display for SinkFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkFormat::Xlsx => write!(f, "xlsx"),
            SinkFormat::JsonLines => write!(f, "jsonl"),
        }
    }
}

pub fn open_sink(format: SinkFormat, path: &Path, sheet_name: &str) -> Box<dyn RecordSink> {
    match format {
        SinkFormat::Xlsx => Box::new(XlsxSink::new(path, sheet_name)),
        SinkFormat::JsonLines => Box::new(JsonLinesSink::new(path)),
    }
}

/// ログの全行（ファイルがなければ空）
pub fn read_log(format: SinkFormat, path: &Path, sheet_name: &str) -> Result<Vec<LogRow>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    match format {
        SinkFormat::Xlsx => excel::read_rows(path, sheet_name),
        SinkFormat::JsonLines => jsonl::read_rows(path),
    }
}
