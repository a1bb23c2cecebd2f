//! Turning handler output into MCP tool results.

use crate::error::ToolError;
use rmcp::model::{CallToolResult, Content};
use serde_json::Value;

/// Pretty-printed JSON for text content. Strings are emitted as JSON strings, like any value.
#[must_use]
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[must_use]
pub fn json_result(value: &Value) -> CallToolResult {
    CallToolResult::success(vec![Content::text(pretty_json(value))])
}

/// Result carrying both `structured_content` and the same payload as text.
///
/// Some MCP clients only render `content` and ignore `structured_content`.
#[must_use]
pub fn structured_result(value: Value) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(pretty_json(&value))],
        structured_content: Some(value),
        is_error: Some(false),
        meta: None,
    }
}

#[must_use]
pub fn error_result(err: &ToolError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {err}"))])
}
