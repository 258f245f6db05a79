//! 名前の抽出
//!
//! 名前は `Name` ラベルの下の最初の空でない行。OCRエンジンによっては
//! 次の `Description` ラベルが同じ行にくっつくため、
//! その場合は説明ラベルの位置で切る。

use crate::error::{build_regex, Result};
use regex::Regex;

/// `label` の後の最初の空でない行を取るパターン
///
/// ラベル行の末尾空白と、内容行までの空行はいくつあってもよい。
pub fn name_pattern(label: &str) -> Result<Regex> {
    build_regex(&format!(r"(?i){}\s*\n\s*(\S[^\n]*)", regex::escape(label)))
}

/// くっついた名前行を切るためのパターン（大文字小文字無視）
pub fn marker_pattern(marker: &str) -> Result<Regex> {
    build_regex(&format!("(?i){}", regex::escape(marker)))
}

/// 最初に一致したラベルの次の行（trim済み）
pub fn capture_name_line<'a>(pattern: &Regex, transcript: &'a str) -> Option<&'a str> {
    pattern
        .captures(transcript)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
}

/// `line` のうち `marker` より前だけを残す（trim済み）
///
/// 残した部分の大文字小文字はそのまま。マーカーがなければ行全体をtrimして返す。
pub fn truncate_at_marker<'a>(line: &'a str, marker: &Regex) -> &'a str {
    match marker.find(line) {
        Some(m) => line[..m.start()].trim(),
        None => line.trim(),
    }
}
