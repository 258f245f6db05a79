//! JSON Linesログ（1行1オブジェクト）

use super::RecordSink;
use crate::error::{InterlockError, Result};
use interlock_common::LogRow;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl RecordSink for JsonLinesSink {
    fn append(&mut self, row: &LogRow) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_string(row)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| InterlockError::Sink(format!("{}: {}", self.path.display(), e)))?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

pub fn read_rows(path: &Path) -> Result<Vec<LogRow>> {
    let file = std::fs::File::open(path)?;
    let mut rows = Vec::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row: LogRow = serde_json::from_str(&line).map_err(|e| {
            InterlockError::Sink(format!("{} line {}: {}", path.display(), index + 1, e))
        })?;
        rows.push(row);
    }

    Ok(rows)
}
