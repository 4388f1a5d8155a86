//! Serve the `echo` tool over SSE (default) or stdio.

use std::time::Duration;

use env_flags::env_flags;
use mcp_samples::logging::init_tracing;
use mcp_samples::mcp::echo::{EchoServerHandler, server_details};
use rust_mcp_sdk::error::SdkResult;
use rust_mcp_sdk::mcp_server::{
    HyperServerOptions, ServerRuntime, hyper_server_core, server_runtime_core,
};
use rust_mcp_sdk::{McpServer, StdioTransport, TransportOptions};

#[tokio::main]
async fn main() -> SdkResult<()> {
    init_tracing("echo-sse-server");

    env_flags! {
        /// Transport: "sse" (default) or "stdio"
        TRANSPORT: &str = "sse";
        /// Host for the SSE listener
        HOST: &str = "127.0.0.1";
        /// Port for the SSE listener
        PORT: u16 = 8080;
        /// Ping interval for SSE connections
        PING_SECS: u64 = 5;
    }

    let handler = EchoServerHandler::new();

    if *TRANSPORT == "stdio" {
        let transport = StdioTransport::new(TransportOptions::default())?;
        let server: ServerRuntime =
            server_runtime_core::create_server(server_details(), transport, handler);
        tracing::info!("starting stdio server");
        if let Err(e) = server.start().await {
            let msg = match e.rpc_error_message() {
                Some(m) => m.to_string(),
                None => e.to_string(),
            };
            tracing::error!("server runtime error: {}", msg);
        }
    } else {
        let host = (*HOST).to_string();
        let port = *PORT;
        let server = hyper_server_core::create_server(
            server_details(),
            handler,
            HyperServerOptions {
                host: host.clone(),
                port,
                ping_interval: Duration::from_secs(*PING_SECS),
                ..Default::default()
            },
        );
        tracing::info!(
            "SSE server listening on {}:{} (endpoints /sse and /messages)",
            host,
            port
        );
        if let Err(e) = server.start().await {
            let msg = match e.rpc_error_message() {
                Some(m) => m.to_string(),
                None => e.to_string(),
            };
            tracing::error!("server error: {}", msg);
            return Err(e);
        }
    }
    tracing::info!("server stopped");
    Ok(())
}
