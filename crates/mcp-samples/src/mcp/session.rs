//! Client flows: the stdio SQL walkthrough and the SSE echo call.
//!
//! Both follow the same shape: build a transport, create a client runtime,
//! `start()` it (which performs the initialize handshake), run a fixed list
//! of calls, print results and shut down.

use std::time::Duration;

use rust_mcp_sdk::McpClient;
use rust_mcp_sdk::mcp_client::client_runtime_core;
use rust_mcp_sdk::schema::{
    CallToolRequestParams, ClientCapabilities, Implementation, InitializeRequestParams,
    LATEST_PROTOCOL_VERSION,
};
use rust_mcp_sdk::{
    ClientSseTransport, ClientSseTransportOptions, StdioTransport, TransportOptions,
};
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::client_handler::QuietClientHandler;
use super::report::{first_text, render_tool_result};
use super::sdk_error;
use crate::config::McpServerConfig;

pub const ECHO_TOOL: &str = "echo";
pub const DEFAULT_SSE_URL: &str = "http://localhost:8080/sse";
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(1130);

/// A fixed tool invocation in the SQL walkthrough.
#[derive(Debug, Clone, Copy)]
pub struct ToolStep {
    pub heading: &'static str,
    pub tool: &'static str,
    pub argument: Option<(&'static str, &'static str)>,
}

impl ToolStep {
    pub fn params(&self) -> CallToolRequestParams {
        CallToolRequestParams {
            name: self.tool.to_string(),
            arguments: self.argument.map(|(k, v)| {
                let mut m = JsonMap::new();
                m.insert(k.to_string(), JsonValue::String(v.to_string()));
                m
            }),
        }
    }
}

pub const SQL_STEPS: [ToolStep; 4] = [
    ToolStep {
        heading: "Listing tables...",
        tool: "list_tables",
        argument: None,
    },
    ToolStep {
        heading: "Creating table...",
        tool: "create_table",
        argument: Some((
            "schema",
            "CREATE TABLE users (id SERIAL PRIMARY KEY, name VARCHAR(100), email VARCHAR(100) UNIQUE, created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP)",
        )),
    },
    ToolStep {
        heading: "Writing table...",
        tool: "write_query",
        argument: Some((
            "query",
            "INSERT INTO users (name, email) VALUES ('John Doe', 'john@example.com')",
        )),
    },
    ToolStep {
        heading: "Reading table...",
        tool: "read_query",
        argument: Some(("query", "SELECT * FROM users LIMIT 10")),
    },
];

fn client_details(name: &str, version: &str) -> InitializeRequestParams {
    InitializeRequestParams {
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: name.to_string(),
            version: version.to_string(),
            title: None,
        },
        protocol_version: LATEST_PROTOCOL_VERSION.into(),
    }
}

pub fn echo_params(message: &str) -> CallToolRequestParams {
    let mut args = JsonMap::new();
    args.insert("message".to_string(), JsonValue::String(message.to_string()));
    CallToolRequestParams {
        name: ECHO_TOOL.to_string(),
        arguments: Some(args),
    }
}

/// Launch `server` over stdio and run [`SQL_STEPS`] within `timeout`.
///
/// The child is shut down whether or not the walkthrough succeeds.
pub async fn run_sql_session(server: &McpServerConfig, timeout: Duration) -> anyhow::Result<()> {
    tracing::info!(
        command = %server.command,
        args = ?server.args,
        env_keys = ?server.env.keys().collect::<Vec<_>>(),
        "launching stdio MCP server"
    );
    let transport = StdioTransport::create_with_server_launch(
        &server.command,
        server.args.clone(),
        Some(server.env.clone()),
        TransportOptions::default(),
    )
    .map_err(|e| anyhow::anyhow!("failed to start MCP server: {}", e))?;

    let client = client_runtime_core::create_client(
        client_details("mcp-client", "0.0.0"),
        transport,
        QuietClientHandler,
    );

    let walkthrough = async {
        println!("Initializing client...");
        client
            .clone()
            .start()
            .await
            .map_err(|e| sdk_error("failed to initialize", e))?;
        let server_info = client
            .server_version()
            .ok_or_else(|| anyhow::anyhow!("server did not report its implementation"))?;
        println!(
            "Initialized with server: {} {}\n",
            server_info.name, server_info.version
        );

        println!("Listing available tools...");
        let tools = client
            .list_tools(None)
            .await
            .map_err(|e| sdk_error("failed to list tools", e))?;
        for tool in &tools.tools {
            println!(
                "- {}: {}",
                tool.name,
                tool.description.as_deref().unwrap_or_default()
            );
        }
        println!();

        for step in SQL_STEPS.iter() {
            println!("{}", step.heading);
            let result = client
                .call_tool(step.params())
                .await
                .map_err(|e| sdk_error(&format!("{} failed", step.tool), e))?;
            if result.is_error == Some(true) {
                tracing::warn!("{} reported a tool error", step.tool);
            }
            for line in render_tool_result(&result) {
                println!("{line}");
            }
            println!();
        }
        Ok::<(), anyhow::Error>(())
    };

    let outcome = match tokio::time::timeout(timeout, walkthrough).await {
        Ok(r) => r,
        Err(_) => Err(anyhow::anyhow!(
            "session timed out after {}s",
            timeout.as_secs()
        )),
    };

    if let Err(e) = client.shut_down().await {
        tracing::warn!("shutdown error: {}", e);
    }
    outcome
}

/// Connect to an SSE MCP server, call `echo` once and print the reply.
///
/// Returns the echoed text, or `None` when the call itself failed (logged,
/// not fatal). The connection is held for `linger` after a successful call.
pub async fn run_echo_session(
    url: &str,
    message: &str,
    linger: Duration,
) -> anyhow::Result<Option<String>> {
    tracing::info!("connecting to SSE MCP server at {}", url);
    let transport = ClientSseTransport::new(url, ClientSseTransportOptions::default())
        .map_err(|e| anyhow::anyhow!("failed to create SSE MCP client: {}", e))?;

    let client = client_runtime_core::create_client(
        client_details("test-client", "1.0.0"),
        transport,
        QuietClientHandler,
    );
    client
        .clone()
        .start()
        .await
        .map_err(|e| sdk_error("failed to initialize SSE MCP client", e))?;

    let reply = match client.call_tool(echo_params(message)).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("{}", sdk_error("echo call failed", e));
            if let Err(e) = client.shut_down().await {
                tracing::warn!("shutdown error: {}", e);
            }
            return Ok(None);
        }
    };

    let text = first_text(&reply).map(str::to_string);
    match &text {
        Some(t) => println!("{t}"),
        None => tracing::warn!("echo reply carried no text content"),
    }

    if !linger.is_zero() {
        tracing::debug!("holding connection for {}s", linger.as_secs());
        tokio::time::sleep(linger).await;
    }
    if let Err(e) = client.shut_down().await {
        tracing::warn!("shutdown error: {}", e);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_steps_follow_fixed_order() {
        let tools: Vec<_> = SQL_STEPS.iter().map(|s| s.tool).collect();
        assert_eq!(
            tools,
            vec!["list_tables", "create_table", "write_query", "read_query"]
        );
    }

    #[test]
    fn list_tables_sends_no_arguments() {
        let params = SQL_STEPS[0].params();
        assert_eq!(params.name, "list_tables");
        assert!(params.arguments.is_none());
    }

    #[test]
    fn query_steps_carry_single_string_argument() {
        let params = SQL_STEPS[3].params();
        let args = params.arguments.expect("arguments");
        assert_eq!(args.len(), 1);
        assert_eq!(
            args.get("query").and_then(|v| v.as_str()),
            Some("SELECT * FROM users LIMIT 10")
        );
        let create = SQL_STEPS[1].params().arguments.expect("arguments");
        assert!(
            create["schema"]
                .as_str()
                .is_some_and(|s| s.starts_with("CREATE TABLE users"))
        );
    }

    #[test]
    fn echo_params_wrap_message() {
        let params = echo_params("Hello SSE!");
        assert_eq!(params.name, ECHO_TOOL);
        let v = serde_json::to_value(&params).unwrap();
        assert_eq!(v["arguments"]["message"], "Hello SSE!");
    }

    #[test]
    fn client_details_use_latest_protocol() {
        let d = client_details("mcp-client", "0.0.0");
        assert_eq!(d.protocol_version, LATEST_PROTOCOL_VERSION);
        assert_eq!(d.client_info.name, "mcp-client");
    }
}
