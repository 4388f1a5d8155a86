//! Call the `echo` tool on an SSE MCP server and print the reply.

use std::process::ExitCode;
use std::time::Duration;

use env_flags::env_flags;
use mcp_samples::logging::init_tracing;
use mcp_samples::mcp::session::{DEFAULT_SSE_URL, run_echo_session};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing("echo-sse-client");

    env_flags! {
        /// SSE endpoint of the MCP server.
        MCP_SSE_URL: &str = DEFAULT_SSE_URL;
        /// Seconds to keep the connection open after the reply is printed.
        SSE_CLIENT_LINGER_SECS: u64 = 100;
    }

    match run_echo_session(
        *MCP_SSE_URL,
        "Hello SSE!",
        Duration::from_secs(*SSE_CLIENT_LINGER_SECS),
    )
    .await
    {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
