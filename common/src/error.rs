//! エラー型定義

use regex::Regex;
use thiserror::Error;

/// 共通エラー型
///
/// 抽出器の構築時にのみ発生する。抽出そのものは失敗せず、
/// 見つからない項目はセンチネル値になる。
#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

/// 正規表現をコンパイル（失敗時はパターン文字列付きのエラー）
pub(crate) fn build_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}
