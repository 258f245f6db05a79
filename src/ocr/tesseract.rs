//! ローカルのtesseractコマンド
//!
//! 画像を標準入力に渡し、標準出力からトランスクリプトを受け取る
//! （`tesseract stdin stdout`）。

use crate::config::Config;
use crate::error::{InterlockError, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub async fn detect_text(config: &Config, image_bytes: &[u8]) -> Result<Option<String>> {
    let mut child = Command::new(&config.tesseract_command)
        .args(["stdin", "stdout"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            InterlockError::OcrCommand(format!("failed to start {}: {}", config.tesseract_command, e))
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(image_bytes).await?;
    }

    let output = tokio::time::timeout(
        Duration::from_secs(config.timeout_seconds),
        child.wait_with_output(),
    )
    .await
    .map_err(|_| {
        InterlockError::OcrCommand(format!("timed out after {}s", config.timeout_seconds))
    })??;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(InterlockError::OcrCommand(format!(
            "{} exited with {}: {}",
            config.tesseract_command,
            output.status,
            stderr.trim()
        )));
    }

    Ok(transcript_from_stdout(&output.stdout))
}

/// 出力末尾の改ページを除く。空なら文字なし
fn transcript_from_stdout(stdout: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim_end_matches(['\u{c}', '\n', ' ']);
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_strips_form_feed() {
        let stdout = b"Name\nAlpha-1\n\n\x0c";
        assert_eq!(transcript_from_stdout(stdout).as_deref(), Some("Name\nAlpha-1"));
    }

    #[test]
    fn test_blank_output_is_none() {
        assert_eq!(transcript_from_stdout(b" \n\x0c"), None);
        assert_eq!(transcript_from_stdout(b""), None);
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let config = Config {
            tesseract_command: "interlock-no-such-binary".into(),
            ..Default::default()
        };
        let result = detect_text(&config, b"bytes").await;
        assert!(matches!(result, Err(InterlockError::OcrCommand(_))));
    }
}
