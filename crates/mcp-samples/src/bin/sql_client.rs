//! Launch a SQL MCP server over stdio and walk through table create/write/read.

use std::process::ExitCode;
use std::time::Duration;

use env_flags::env_flags;
use mcp_samples::config::{DEFAULT_SERVER_NAME, McpConfig, expand_home};
use mcp_samples::logging::init_tracing;
use mcp_samples::mcp::session::run_sql_session;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing("sql-client");

    env_flags! {
        /// Path to an MCP config JSON file (`mcpServers` table). Empty uses the built-in config.
        MCP_CONFIG: &str = "";
        /// Name of the server entry to launch.
        MCP_SERVER: &str = DEFAULT_SERVER_NAME;
        /// Blanket timeout for the whole session, in seconds.
        MCP_TIMEOUT_SECS: u64 = 1130;
    }

    let config_path = (!(*MCP_CONFIG).is_empty()).then(|| expand_home(*MCP_CONFIG));
    let config = match McpConfig::load(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            println!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(
        "config source={}",
        config_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<built-in>".to_string())
    );

    let server = match config.enabled_server(*MCP_SERVER) {
        Ok(s) => s,
        Err(e) => {
            println!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run_sql_session(server, Duration::from_secs(*MCP_TIMEOUT_SECS)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
