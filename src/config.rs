use crate::error::{InterlockError, Result};
use crate::ocr::OcrProvider;
use interlock_common::ExtractionConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const API_KEY_ENV: &str = "GOOGLE_VISION_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub api_key: Option<String>,
    pub ocr_provider: OcrProvider,
    pub vision_endpoint: String,
    pub tesseract_command: String,
    pub language_hints: Vec<String>,
    /// OCRに送る画像の長辺の上限（px）
    pub max_image_size: u32,
    pub timeout_seconds: u64,
    /// `--output` 未指定時のログファイル
    pub sink_path: Option<PathBuf>,
    pub sheet_name: String,
    pub extraction: ExtractionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            ocr_provider: OcrProvider::Vision,
            vision_endpoint: "https://vision.googleapis.com/v1/images:annotate".into(),
            tesseract_command: "tesseract".into(),
            language_hints: vec!["en".into()],
            max_image_size: 2048,
            timeout_seconds: 60,
            sink_path: None,
            sheet_name: "Sheet1".into(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| InterlockError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("interlock-ocr").join("config.json"))
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.api_key.clone().ok_or(InterlockError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    /// ログファイル: 引数 → 設定 → `interlocks.xlsx` の順
    pub fn resolve_sink_path(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| self.sink_path.clone())
            .unwrap_or_else(|| PathBuf::from("interlocks.xlsx"))
    }

    /// `config --show` の表示行（キーは伏せる）
    pub fn summary_lines(&self) -> Vec<String> {
        let key_state = match (&self.api_key, std::env::var(API_KEY_ENV).is_ok()) {
            (_, true) => "set (environment)",
            (Some(_), false) => "set",
            (None, false) => "not set",
        };

        vec![
            format!("OCR provider: {}", self.ocr_provider.command_name()),
            format!("Vision endpoint: {}", self.vision_endpoint),
            format!("Tesseract command: {}", self.tesseract_command),
            format!("Language hints: {}", self.language_hints.join(", ")),
            format!("Max image size: {}px", self.max_image_size),
            format!("Timeout: {}s", self.timeout_seconds),
            format!("Log file: {}", self.resolve_sink_path(None).display()),
            format!("Sheet: {}", self.sheet_name),
            format!("API key: {}", key_state),
            format!(
                "Labels: {} / {} / {}",
                self.extraction.name_label,
                self.extraction.description_label,
                self.extraction.action_label
            ),
            format!("Noise phrases: {}", self.extraction.noise_phrases.len()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_file() {
        let json = r#"{"ocrProvider": "tesseract", "extraction": {"sentinel": "-"}}"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.ocr_provider, OcrProvider::Tesseract);
        assert_eq!(config.extraction.sentinel, "-");
        assert_eq!(config.extraction.name_label, "Name");
        assert_eq!(config.max_image_size, 2048);
        assert_eq!(config.sheet_name, "Sheet1");
    }

    #[test]
    fn test_resolve_sink_path() {
        let mut config = Config::default();
        assert_eq!(config.resolve_sink_path(None), PathBuf::from("interlocks.xlsx"));

        config.sink_path = Some(PathBuf::from("log.jsonl"));
        assert_eq!(config.resolve_sink_path(None), PathBuf::from("log.jsonl"));
        assert_eq!(
            config.resolve_sink_path(Some(PathBuf::from("other.xlsx"))),
            PathBuf::from("other.xlsx")
        );
    }

    #[test]
    fn test_summary_redacts_key() {
        let config = Config {
            api_key: Some("secret-key-123".into()),
            ..Default::default()
        };
        let lines = config.summary_lines().join("\n");
        assert!(!lines.contains("secret-key-123"));
        assert!(lines.contains("API key: set"));
    }
}
