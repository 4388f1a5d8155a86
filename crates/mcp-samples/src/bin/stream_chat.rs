//! Ask a chat model for the time and answer its tool call locally.

use env_flags::env_flags;
use mcp_samples::chat::client::{DEFAULT_API_URL, DEFAULT_MODEL};
use mcp_samples::chat::tools::{default_tools, write_chunk};
use mcp_samples::chat::{ChatClient, ChatMessage};
use mcp_samples::logging::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing("stream-chat");

    env_flags! {
        /// API key sent as a bearer token.
        DEEPSEEK_API_KEY: &str = "";
        /// Chat completions endpoint.
        DEEPSEEK_API_URL: &str = DEFAULT_API_URL;
        /// Model name.
        DEEPSEEK_MODEL: &str = DEFAULT_MODEL;
    }

    if (*DEEPSEEK_API_KEY).is_empty() {
        println!("Please set the DEEPSEEK_API_KEY environment variable");
        return;
    }

    let client = match ChatClient::new(*DEEPSEEK_API_KEY, *DEEPSEEK_API_URL, *DEEPSEEK_MODEL) {
        Ok(c) => c,
        Err(e) => {
            println!("Request failed: {e}");
            return;
        }
    };

    let messages = vec![ChatMessage::user(
        "What time is it now? Please look up the current time.",
    )];
    let tools = default_tools();

    let mut stdout = std::io::stdout();
    let result = client
        .chat_stream(&messages, &tools, |chunk| {
            if let Err(e) = write_chunk(&mut stdout, &chunk) {
                tracing::debug!("failed to write chunk to stdout: {}", e);
            }
        })
        .await;

    if let Err(e) = result {
        println!("Request failed: {e}");
    }
}
