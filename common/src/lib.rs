//! インターロックOCRの抽出コア
//!
//! 制御盤インターロック画面のOCRトランスクリプトを `{name, description}`
//! レコードに変換する。I/Oは行わない。トランスクリプトの入力と
//! シンクへの書き出しはアプリケーション側のクレートが担当。

pub mod config;
pub mod description;
pub mod error;
pub mod extractor;
pub mod name;
pub mod types;

pub use config::{ExtractionConfig, DEFAULT_NOISE_PHRASES, DEFAULT_SENTINEL};
pub use error::{Error, Result};
pub use extractor::{extract, Extractor};
pub use types::{ExtractionResult, LogRow};
