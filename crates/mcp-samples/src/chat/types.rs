//! Wire types for the OpenAI-compatible chat completions API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: ChatToolFunction,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatToolFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<&'a [ChatToolDefinition]>,
}

impl<'a> ChatRequest<'a> {
    /// Streaming request; `tools` is omitted from the body when empty.
    pub fn streaming(
        model: &'a str,
        messages: &'a [ChatMessage],
        tools: &'a [ChatToolDefinition],
    ) -> Self {
        Self {
            model,
            messages,
            stream: true,
            tools: (!tools.is_empty()).then_some(tools),
        }
    }
}

/// One decoded `data:` chunk of the stream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamResponse {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: StreamDelta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamDelta {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// Tool-call fragment. Providers send `id`/`type`/`name` on the first
/// fragment only; later fragments carry argument text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub function: ToolCallFunction,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolCallFunction {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

impl ToolCall {
    pub fn is_function(&self) -> bool {
        self.kind.as_deref() == Some("function")
    }

    pub fn name(&self) -> &str {
        self.function.name.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_omits_empty_tools() {
        let messages = vec![ChatMessage::user("hi")];
        let req = ChatRequest::streaming("deepseek-chat", &messages, &[]);
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            json!({
                "model": "deepseek-chat",
                "messages": [{"role": "user", "content": "hi"}],
                "stream": true
            })
        );
    }

    #[test]
    fn request_includes_tools() {
        let messages = vec![ChatMessage::user("hi")];
        let tools = vec![ChatToolDefinition {
            kind: "function".to_string(),
            function: ChatToolFunction {
                name: "f".to_string(),
                description: "d".to_string(),
                parameters: json!({"type": "object"}),
            },
        }];
        let req = ChatRequest::streaming("m", &messages, &tools);
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["tools"][0]["type"], "function");
        assert_eq!(v["tools"][0]["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn partial_tool_call_fragment_decodes() {
        let raw = r#"{"choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"function":{"arguments":"{}"}}]}}]}"#;
        let resp: StreamResponse = serde_json::from_str(raw).unwrap();
        let call = &resp.choices[0].delta.tool_calls.as_ref().unwrap()[0];
        assert!(!call.is_function());
        assert_eq!(call.name(), "");
        assert_eq!(call.function.arguments.as_deref(), Some("{}"));
    }
}
