//! Console rendering of tool call results.

use rust_mcp_sdk::schema::{CallToolResult, ContentBlock};

/// One line per content block: text verbatim, anything else as pretty JSON.
pub fn render_tool_result(result: &CallToolResult) -> Vec<String> {
    result
        .content
        .iter()
        .map(|block| match block {
            ContentBlock::TextContent(t) => t.text.clone(),
            other => serde_json::to_string_pretty(other)
                .unwrap_or_else(|e| format!("<unrenderable content: {e}>")),
        })
        .collect()
}

/// Text of the first content block, if it is a text block.
pub fn first_text(result: &CallToolResult) -> Option<&str> {
    match result.content.first()? {
        ContentBlock::TextContent(t) => Some(t.text.as_str()),
        _ => None,
    }
}
