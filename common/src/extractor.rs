//! トランスクリプト → `{name, description}`
//!
//! [`Extractor`] は [`ExtractionConfig`] から一度だけコンパイルし、
//! 以降は任意の数のトランスクリプトに使い回す。可変状態を持たないため
//! スレッド間で共有できる。

use crate::config::ExtractionConfig;
use crate::description;
use crate::error::{Error, Result};
use crate::name;
use crate::types::ExtractionResult;
use regex::Regex;

lazy_static::lazy_static! {
    static ref DEFAULT_EXTRACTOR: Extractor =
        Extractor::new(&ExtractionConfig::default()).unwrap();
}

#[derive(Debug, Clone)]
pub struct Extractor {
    name_re: Regex,
    marker_re: Regex,
    region_re: Regex,
    anchor_re: Regex,
    noise: Vec<Regex>,
    sentinel: String,
}

impl Extractor {
    /// 設定からパターンをコンパイル
    ///
    /// # Errors
    /// * `Error::Config` - ラベル・センチネル・ノイズ語句が空
    /// * `Error::Pattern` - コードアンカーが正規表現として不正
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        validate(config)?;

        Ok(Self {
            name_re: name::name_pattern(&config.name_label)?,
            marker_re: name::marker_pattern(&config.description_label)?,
            region_re: description::region_pattern(
                &config.description_label,
                &config.action_label,
            )?,
            anchor_re: description::anchor_pattern(&config.code_anchor)?,
            noise: description::noise_patterns(config.noise_phrases.as_slice())?,
            sentinel: config.sentinel.clone(),
        })
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// 名前と説明をまとめて抽出
    pub fn extract(&self, transcript: &str) -> ExtractionResult {
        if transcript.trim().is_empty() {
            return ExtractionResult::unrecognized(self.sentinel());
        }

        let result = ExtractionResult {
            name: self.extract_name(transcript),
            description: self.extract_description(transcript),
        };
        tracing::debug!(name = %result.name, description = %result.description, "extracted");
        result
    }

    /// 名前ラベル直後の最初の空でない行（なければセンチネル）
    pub fn extract_name(&self, transcript: &str) -> String {
        let name = name::capture_name_line(&self.name_re, transcript)
            .map(|line| name::truncate_at_marker(line, &self.marker_re))
            .unwrap_or_default();
        self.or_sentinel(name)
    }

    /// 説明ラベルとアクションラベルの間を整形したもの（なければセンチネル）
    pub fn extract_description(&self, transcript: &str) -> String {
        let Some(region) = description::capture_region(&self.region_re, transcript) else {
            return self.sentinel().to_string();
        };

        let text = description::trim_to_anchor(&self.anchor_re, region);
        let text = description::flatten_lines(text);
        let text = description::remove_noise(&text, &self.noise);
        let text = description::strip_trailing_tokens(&text);
        let text = description::normalize_whitespace(&text);
        self.or_sentinel(&text)
    }

    fn or_sentinel(&self, value: &str) -> String {
        if value.is_empty() {
            self.sentinel().to_string()
        } else {
            value.to_string()
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        DEFAULT_EXTRACTOR.clone()
    }
}

fn validate(config: &ExtractionConfig) -> Result<()> {
    let labels = [
        ("nameLabel", &config.name_label),
        ("descriptionLabel", &config.description_label),
        ("actionLabel", &config.action_label),
        ("sentinel", &config.sentinel),
    ];
    for (field, value) in labels {
        if value.trim().is_empty() {
            return Err(Error::Config(format!("{} must not be empty", field)));
        }
    }

    if let Some(index) = config.noise_phrases.iter().position(|p| p.is_empty()) {
        return Err(Error::Config(format!("noisePhrases[{}] is empty", index)));
    }

    Ok(())
}

/// 既定のラベルとノイズ語句で抽出
pub fn extract(transcript: &str) -> ExtractionResult {
    DEFAULT_EXTRACTOR.extract(transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
INTERLOCKS
Name

Alpha-1
Description
Not Assigned
DYN. OUT
151-HIGH TEMP
deg rst. en
OK 2
Action
Reset";

    #[test]
    fn test_extract_sample_screen() {
        let result = extract(SAMPLE);
        assert_eq!(result.name, "Alpha-1");
        assert_eq!(result.description, "151-HIGH TEMP");
    }

    #[test]
    fn test_missing_name_label() {
        let result = extract("Description\n151-LOW FLOW\nAction");
        assert_eq!(result.name, "unrecognized");
        assert_eq!(result.description, "151-LOW FLOW");
    }

    #[test]
    fn test_missing_action_label() {
        let result = extract("Name\nAlpha-1\nDescription\n151-LOW FLOW");
        assert_eq!(result.name, "Alpha-1");
        assert_eq!(result.description, "unrecognized");
    }

    #[test]
    fn test_empty_transcript() {
        assert_eq!(extract(""), ExtractionResult::unrecognized("unrecognized"));
    }

    #[test]
    fn test_blank_transcript_uses_configured_sentinel() {
        let config = ExtractionConfig {
            sentinel: "n/a".into(),
            ..Default::default()
        };
        let extractor = Extractor::new(&config).unwrap();

        assert_eq!(extractor.sentinel(), "n/a");
        assert_eq!(extractor.extract(" \n\t\n"), ExtractionResult::unrecognized("n/a"));
        assert_eq!(extractor.extract_description("Name\nAlpha-1"), "n/a");
    }

    #[test]
    fn test_name_glued_to_description() {
        let text = "Name\nAlpha-1 description something\nAction";
        assert_eq!(extract(text).name, "Alpha-1");
    }

    #[test]
    fn test_name_preserves_case_when_truncated() {
        let text = "Name\nPump-B DESCRIPTION\n";
        assert_eq!(extract(text).name, "Pump-B");
    }

    #[test]
    fn test_empty_name_after_truncation_is_sentinel() {
        let text = "Name\nDescription\n204-LOW FLOW\nAction";
        let result = extract(text);
        assert_eq!(result.name, "unrecognized");
        assert_eq!(result.description, "204-LOW FLOW");
    }

    #[test]
    fn test_description_without_code_keeps_region() {
        let text = "Description\nCoolant   level\nfalling\nAction";
        assert_eq!(extract(text).description, "Coolant level falling");
    }

    #[test]
    fn test_description_only_noise_is_sentinel() {
        let text = "Description\nOK\nNot Assigned 12\nAction";
        assert_eq!(extract(text).description, "unrecognized");
    }

    #[test]
    fn test_custom_config() {
        let config = ExtractionConfig {
            name_label: "Tag".into(),
            description_label: "Cause".into(),
            action_label: "Remedy".into(),
            code_anchor: r"E\d{2}:".into(),
            noise_phrases: vec!["ACK".into()],
            sentinel: "?".into(),
        };
        let extractor = Extractor::new(&config).unwrap();
        let text = "Tag\nV-7\nCause\nscreen E12: VALVE STUCK ACK\nRemedy";

        let result = extractor.extract(text);
        assert_eq!(result.name, "V-7");
        assert_eq!(result.description, "E12: VALVE STUCK");
        assert_eq!(extractor.extract("nothing").name, "?");
    }

    #[test]
    fn test_invalid_anchor_pattern() {
        let config = ExtractionConfig {
            code_anchor: r"(\d{3}".into(),
            ..Default::default()
        };
        assert!(matches!(Extractor::new(&config), Err(Error::Pattern { .. })));
    }

    #[test]
    fn test_empty_label_rejected() {
        let config = ExtractionConfig {
            action_label: "  ".into(),
            ..Default::default()
        };
        let err = Extractor::new(&config).unwrap_err();
        assert!(format!("{}", err).contains("actionLabel"));
    }

    #[test]
    fn test_empty_noise_phrase_rejected() {
        let mut config = ExtractionConfig::default();
        config.noise_phrases.push(String::new());
        assert!(matches!(Extractor::new(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_extractor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Extractor>();
    }
}
