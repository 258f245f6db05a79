//! 抽出設定
//!
//! ラベル・ノイズ語句・エラーコードアンカーは設定ファイルから
//! 変更できる（再ビルド不要）。

use serde::{Deserialize, Serialize};

/// 項目が見つからなかったときの値
pub const DEFAULT_SENTINEL: &str = "unrecognized";

/// エラーコードアンカー: 3桁の数字＋ハイフン（例: `151-`）
pub const DEFAULT_CODE_ANCHOR: &str = r"\d{3}-";

/// 説明から除去するスキャナ/画面由来のノイズ（除去順）
pub const DEFAULT_NOISE_PHRASES: &[&str] = &[
    "Not Assigned",
    "DYN. OUT",
    "Terminates",
    "Override",
    "OK",
    "deg",
    "rst. en",
    "rly off",
    "YN.",
    "UT",
    "YN ",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionConfig {
    /// 名前行の直前のラベル
    pub name_label: String,
    /// 説明領域の開始ラベル
    pub description_label: String,
    /// 説明領域の終了ラベル
    pub action_label: String,
    /// 説明の本体が始まる位置を示す正規表現
    pub code_anchor: String,
    /// 大文字小文字を無視して順に除去するリテラル語句
    pub noise_phrases: Vec<String>,
    /// 見つからなかった項目に入れる値
    pub sentinel: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            name_label: "Name".into(),
            description_label: "Description".into(),
            action_label: "Action".into(),
            code_anchor: DEFAULT_CODE_ANCHOR.into(),
            noise_phrases: DEFAULT_NOISE_PHRASES.iter().map(|p| p.to_string()).collect(),
            sentinel: DEFAULT_SENTINEL.into(),
        }
    }
}
