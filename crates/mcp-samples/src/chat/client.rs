//! HTTP side of the streaming chat client.

use std::time::Duration;

use crate::error::ChatError;

use super::stream;
use super::types::{ChatMessage, ChatRequest, ChatToolDefinition, StreamResponse};

pub const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Chat-completions client bound to one endpoint, key and model.
pub struct ChatClient {
    api_key: String,
    api_url: String,
    model: String,
    http: reqwest::Client,
}

impl ChatClient {
    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            api_key: api_key.into(),
            api_url: api_url.into(),
            model: model.into(),
            http,
        })
    }

    /// POST a streaming request and feed each decoded chunk to `on_chunk`
    /// until the body ends.
    pub async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        tools: &[ChatToolDefinition],
        on_chunk: impl FnMut(StreamResponse),
    ) -> Result<(), ChatError> {
        let request = ChatRequest::streaming(&self.model, messages, tools);
        tracing::debug!(
            url = %self.api_url,
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "sending chat request"
        );
        let response = self
            .http
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            tracing::error!("chat request rejected (status={})", status);
            return Err(ChatError::Status { status, body });
        }

        stream::consume(response.bytes_stream(), on_chunk).await?;
        tracing::debug!("chat stream finished");
        Ok(())
    }
}
