//! 説明の抽出
//!
//! ## 処理段階
//! 1. `Description` と `Action` ラベルの間を取り出す
//! 2. 最初のエラーコード（`151-...`）より前を捨てる
//! 3. 改行をスペースに
//! 4. ノイズ語句を除去
//! 5. 末尾の数字・短いトークンを除去
//! 6. 空白を詰める
//!
//! 各段階は単独で呼べる関数。
//! 2〜6は対象がなければ入力をそのまま返す。

use crate::error::{build_regex, Result};
use regex::Regex;

lazy_static::lazy_static! {
    // 末尾の " 12" / " MU" / " a.b" の連続と空白
    static ref TRAILING_RE: Regex =
        Regex::new(r"(?:\s+\d+|\s+[A-Za-z.]{1,3})+\s*$").unwrap();
}

/// 領域パターン: `start` の後から最も近い `end` まで
pub fn region_pattern(start: &str, end: &str) -> Result<Regex> {
    build_regex(&format!(
        r"(?is){}\s*\n*(.*?)\s*{}",
        regex::escape(start),
        regex::escape(end)
    ))
}

/// エラーコードアンカーをコンパイル
pub fn anchor_pattern(pattern: &str) -> Result<Regex> {
    build_regex(pattern)
}

/// ノイズ語句をリテラル・大文字小文字無視のパターンに
pub fn noise_patterns<S: AsRef<str>>(phrases: &[S]) -> Result<Vec<Regex>> {
    phrases
        .iter()
        .map(|p| build_regex(&format!("(?i){}", regex::escape(p.as_ref()))))
        .collect()
}

/// 段階1: ラベル間のテキスト（前後の空白なし）
///
/// 開始ラベルがない、または後ろに終了ラベルがなければ `None`。
pub fn capture_region<'a>(pattern: &Regex, transcript: &'a str) -> Option<&'a str> {
    pattern
        .captures(transcript)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

/// 段階2: 最初のエラーコードより前の画面要素を捨てる
pub fn trim_to_anchor<'a>(anchor: &Regex, region: &'a str) -> &'a str {
    match anchor.find(region) {
        Some(m) => &region[m.start()..],
        None => region,
    }
}

/// 段階3: 1行にまとめる
pub fn flatten_lines(text: &str) -> String {
    text.replace('\n', " ")
}

/// 段階4: 各語句の出現をすべて順番に除去
///
/// 部分文字列として除去するため、`OK` は単語の中からも消える。
pub fn remove_noise(text: &str, phrases: &[Regex]) -> String {
    phrases.iter().fold(text.to_string(), |acc, re| {
        re.replace_all(&acc, "").into_owned()
    })
}

/// 段階5: 末尾に残った数字と1〜3文字のトークンを除去
pub fn strip_trailing_tokens(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = TRAILING_RE.replace(&current, "").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// 段階6: 空白は1つずつ、前後の空白なし
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
