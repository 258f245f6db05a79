//! 処理結果の返信メッセージ

use interlock_common::ExtractionResult;

const SUMMARY_WIDTH: usize = 50;

/// 記録したインターロックのMarkdown返信
pub fn format_reply(result: &ExtractionResult) -> String {
    format!(
        "✅ **Saved!**\n\n🔹 **Name:** `{}`\n🔸 **Desc:** {}",
        result.name, result.description
    )
}

pub fn format_no_text() -> String {
    "❌ No text found.".to_string()
}

pub fn format_failure(err: &dyn std::fmt::Display) -> String {
    format!("⚠️ Error: {}", err)
}

/// コンソール用1行: 名前と説明の先頭
pub fn summarize(result: &ExtractionResult) -> String {
    let mut chars = result.description.chars();
    let head: String = chars.by_ref().take(SUMMARY_WIDTH).collect();
    let ellipsis = if chars.next().is_some() { "..." } else { "" };
    format!("Name: {} | Desc: {}{}", result.name, head, ellipsis)
}
