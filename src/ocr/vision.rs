//! Google Cloud Vision `images:annotate` クライアント

use crate::config::Config;
use crate::error::{InterlockError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<ImageRequest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_context: Option<ImageContext>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageContext {
    language_hints: Vec<String>,
}

#[derive(Deserialize, Default)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<Status>,
}

#[derive(Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

fn build_request(config: &Config, image_bytes: &[u8]) -> AnnotateRequest {
    let image_context = if config.language_hints.is_empty() {
        None
    } else {
        Some(ImageContext {
            language_hints: config.language_hints.clone(),
        })
    };

    AnnotateRequest {
        requests: vec![ImageRequest {
            image: ImageContent {
                content: STANDARD.encode(image_bytes),
            },
            features: vec![Feature {
                kind: "TEXT_DETECTION",
            }],
            image_context,
        }],
    }
}

/// annotateレスポンスから全文を取り出す
///
/// 最初のtextAnnotationが全文、残りは単語単位。
/// annotationがなければ文字なし。
pub fn parse_annotate_response(body: &str) -> Result<Option<String>> {
    let response: AnnotateResponse = serde_json::from_str(body)
        .map_err(|e| InterlockError::OcrResponse(format!("invalid JSON: {}", e)))?;

    let Some(first) = response.responses.into_iter().next() else {
        return Ok(None);
    };

    if let Some(status) = first.error {
        return Err(InterlockError::OcrResponse(format!(
            "Vision error {}: {}",
            status.code, status.message
        )));
    }

    Ok(first
        .text_annotations
        .into_iter()
        .next()
        .map(|annotation| annotation.description))
}

pub async fn detect_text(config: &Config, image_bytes: &[u8]) -> Result<Option<String>> {
    let api_key = config.get_api_key()?;
    let request = build_request(config, image_bytes);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()?;

    let response = client
        .post(&config.vision_endpoint)
        .query(&[("key", api_key.as_str())])
        .json(&request)
        .send()
        .await
        .map_err(|e| InterlockError::OcrRequest(e.to_string()))?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(InterlockError::OcrRequest(format!(
            "Vision API returned {}: {}",
            status,
            body.trim()
        )));
    }

    parse_annotate_response(&body)
}
