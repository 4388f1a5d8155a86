//! MCP client sessions and the echo server handler.
//!
//! Framing, handshake and transports are `rust-mcp-sdk`'s; this module only
//! supplies tool names, argument payloads and console rendering.

pub mod client_handler;
pub mod echo;
pub mod report;
pub mod session;

use rust_mcp_sdk::error::McpSdkError;

/// Flatten an SDK error into `anyhow`, preferring the JSON-RPC message when
/// the failure came from the peer.
pub(crate) fn sdk_error(context: &str, e: McpSdkError) -> anyhow::Error {
    let msg = match e.rpc_error_message() {
        Some(m) => m.to_string(),
        None => e.to_string(),
    };
    anyhow::anyhow!("{context}: {msg}")
}
