//! OCRエンジン
//!
//! 画像バイトを受け取り全文のトランスクリプトを返す。文字が全くなければ `None`。
//! 「文字なし」はエラーではなく、抽出結果とは別に報告する。

mod preprocess;
mod tesseract;
mod vision;

pub use preprocess::prepare_image;
pub use vision::parse_annotate_response;

use crate::config::Config;
use crate::error::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrProvider {
    /// Google Cloud Vision TEXT_DETECTION
    Vision,
    /// ローカルのtesseractコマンド
    Tesseract,
}

impl OcrProvider {
    pub fn command_name(&self) -> &'static str {
        match self {
            OcrProvider::Vision => "vision",
            OcrProvider::Tesseract => "tesseract",
        }
    }
}

/// 画像1枚をOCR
pub async fn recognize(
    provider: OcrProvider,
    config: &Config,
    image_bytes: &[u8],
) -> Result<Option<String>> {
    let prepared = prepare_image(image_bytes, config.max_image_size)?;
    tracing::debug!(
        provider = provider.command_name(),
        original = image_bytes.len(),
        prepared = prepared.len(),
        "sending image to OCR"
    );

    let transcript = match provider {
        OcrProvider::Vision => vision::detect_text(config, &prepared).await?,
        OcrProvider::Tesseract => tesseract::detect_text(config, &prepared).await?,
    };

    Ok(transcript.filter(|t| !t.trim().is_empty()))
}
