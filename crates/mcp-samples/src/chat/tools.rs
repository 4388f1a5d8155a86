//! Local tools offered to the model and their dispatch.

use std::io::Write;

use serde_json::json;

use super::types::{ChatToolDefinition, ChatToolFunction, StreamResponse, ToolCall};

pub const TOOL_GET_CURRENT_TIME: &str = "get_current_time";
pub const TOOL_NOT_FOUND: &str = "Tool not found";

pub fn default_tools() -> Vec<ChatToolDefinition> {
    vec![ChatToolDefinition {
        kind: "function".to_string(),
        function: ChatToolFunction {
            name: TOOL_GET_CURRENT_TIME.to_string(),
            description: "Get the current time".to_string(),
            parameters: json!({ "type": "object" }),
        },
    }]
}

/// Run the named local tool. Arguments are ignored; no tool here takes any.
pub fn handle_tool_call(call: &ToolCall) -> String {
    match call.name() {
        TOOL_GET_CURRENT_TIME => current_time(),
        other => {
            tracing::debug!("unknown tool requested: {:?}", other);
            TOOL_NOT_FOUND.to_string()
        }
    }
}

/// Console text for one stream chunk: results of any function tool calls in
/// the first choice, then its content fragment.
pub fn render_chunk(resp: &StreamResponse) -> String {
    let Some(choice) = resp.choices.first() else {
        return String::new();
    };
    let mut out = String::new();
    for call in choice.delta.tool_calls.iter().flatten() {
        if !call.is_function() {
            continue;
        }
        let result = handle_tool_call(call);
        tracing::info!(tool = %call.name(), id = ?call.id, "dispatched tool call");
        out.push_str(&format!("\n[tool call] result: {result}\n"));
    }
    if let Some(content) = choice.delta.content.as_deref() {
        out.push_str(content);
    }
    out
}

/// Write the rendered chunk to `out` and flush, so fragments appear as they arrive.
pub fn write_chunk(out: &mut impl Write, resp: &StreamResponse) -> std::io::Result<()> {
    let text = render_chunk(resp);
    if text.is_empty() {
        return Ok(());
    }
    out.write_all(text.as_bytes())?;
    out.flush()
}

fn current_time() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::types::ToolCallFunction;

    fn call(name: &str) -> ToolCall {
        ToolCall {
            id: Some("call_0".to_string()),
            kind: Some("function".to_string()),
            function: ToolCallFunction {
                name: Some(name.to_string()),
                arguments: Some("{}".to_string()),
            },
        }
    }

    #[test]
    fn current_time_has_fixed_layout() {
        let out = handle_tool_call(&call(TOOL_GET_CURRENT_TIME));
        assert!(
            chrono::NaiveDateTime::parse_from_str(&out, "%Y-%m-%d %H:%M:%S").is_ok(),
            "unexpected time format: {out}"
        );
        assert_eq!(out.len(), 19);
    }

    #[test]
    fn unknown_tool_is_reported() {
        assert_eq!(handle_tool_call(&call("launch_rocket")), TOOL_NOT_FOUND);
        assert_eq!(handle_tool_call(&ToolCall::default()), TOOL_NOT_FOUND);
    }

    fn chunk(raw: &str) -> StreamResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn render_prints_content_fragment() {
        let out = render_chunk(&chunk(r#"{"choices":[{"delta":{"content":"Hello"}}]}"#));
        assert_eq!(out, "Hello");
    }

    #[test]
    fn render_ignores_empty_choices() {
        assert_eq!(render_chunk(&chunk(r#"{"choices":[]}"#)), "");
        assert_eq!(render_chunk(&chunk("{}")), "");
    }

    #[test]
    fn render_dispatches_function_calls_only() {
        let raw = r#"{"choices":[{"delta":{"content":"","tool_calls":[
            {"id":"a","type":"function","function":{"name":"nope","arguments":""}},
            {"function":{"arguments":"{}"}}
        ]}}]}"#;
        let out = render_chunk(&chunk(raw));
        assert_eq!(out, "\n[tool call] result: Tool not found\n");
    }

    #[test]
    fn render_uses_first_choice() {
        let raw = r#"{"choices":[{"delta":{"content":"a"}},{"delta":{"content":"b"}}]}"#;
        assert_eq!(render_chunk(&chunk(raw)), "a");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_chunk_appends_fragments() {
        let mut out = Vec::new();
        write_chunk(&mut out, &chunk(r#"{"choices":[{"delta":{"content":"It is "}}]}"#)).unwrap();
        write_chunk(&mut out, &chunk(r#"{"choices":[]}"#)).unwrap();
        write_chunk(&mut out, &chunk(r#"{"choices":[{"delta":{"content":"noon"}}]}"#)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "It is noon");
    }

    #[test]
    fn write_chunk_reports_io_errors() {
        let err = write_chunk(
            &mut BrokenPipe,
            &chunk(r#"{"choices":[{"delta":{"content":"x"}}]}"#),
        )
        .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
        // Nothing to print means nothing to fail on.
        assert!(write_chunk(&mut BrokenPipe, &chunk("{}")).is_ok());
    }

    #[test]
    fn default_tool_schema_is_object() {
        let tools = default_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].function.name, TOOL_GET_CURRENT_TIME);
        assert_eq!(tools[0].function.parameters, json!({"type": "object"}));
    }
}
