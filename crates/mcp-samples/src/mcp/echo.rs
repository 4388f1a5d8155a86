//! MCP server handler exposing a single `echo` tool.
//!
//! The server advertises tool, resource and prompt capabilities; only `echo`
//! does anything, the resource and prompt listings are empty.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_mcp_sdk::schema::{
    CallToolResult, ClientRequest, Implementation, InitializeResult, LATEST_PROTOCOL_VERSION,
    ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult, ListToolsResult,
    Result as EmptyResult, RpcError, ServerCapabilities,
    ServerCapabilitiesPrompts, ServerCapabilitiesResources, ServerCapabilitiesTools, TextContent,
    Tool, ToolInputSchema,
    schema_utils::{NotificationFromClient, RequestFromClient, ResultFromServer},
};
use rust_mcp_sdk::{
    McpServer,
    mcp_server::{ServerHandlerCore, enforce_compatible_protocol_version},
};
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::session::ECHO_TOOL;

pub const SERVER_NAME: &str = "example-server";
pub const SERVER_VERSION: &str = "1.0.0";

/// Initialize result advertised to clients.
pub fn server_details() -> InitializeResult {
    InitializeResult {
        server_info: Implementation {
            name: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
            title: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools {
                list_changed: Some(true),
            }),
            resources: Some(ServerCapabilitiesResources {
                list_changed: Some(true),
                subscribe: Some(true),
            }),
            prompts: Some(ServerCapabilitiesPrompts {
                list_changed: Some(true),
            }),
            ..Default::default()
        },
        meta: None,
        instructions: None,
        protocol_version: LATEST_PROTOCOL_VERSION.to_string(),
    }
}

/// `Echo: <message>`; `message` must be present and a string.
pub fn echo_reply(arguments: Option<&JsonMap<String, JsonValue>>) -> Result<String, RpcError> {
    let msg = arguments
        .and_then(|m| m.get("message"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            RpcError::invalid_params().with_message("invalid message parameter".to_string())
        })?;
    Ok(format!("Echo: {msg}"))
}

#[derive(Default)]
pub struct EchoServerHandler;

impl EchoServerHandler {
    pub fn new() -> Self {
        Self
    }

    fn tool_definitions(&self) -> Vec<Tool> {
        let mut message_schema = JsonMap::new();
        message_schema.insert("type".to_string(), JsonValue::String("string".to_string()));
        message_schema.insert(
            "description".to_string(),
            JsonValue::String("Message to echo back".to_string()),
        );
        let mut props = HashMap::<String, JsonMap<String, JsonValue>>::new();
        props.insert("message".to_string(), message_schema);
        vec![Tool {
            annotations: None,
            description: Some("Echo back the input".to_string()),
            input_schema: ToolInputSchema::new(vec!["message".to_string()], Some(props)),
            meta: None,
            name: ECHO_TOOL.to_string(),
            output_schema: None,
            title: None,
        }]
    }
}

#[async_trait]
impl ServerHandlerCore for EchoServerHandler {
    async fn handle_request(
        &self,
        request: RequestFromClient,
        runtime: &dyn McpServer,
    ) -> std::result::Result<ResultFromServer, RpcError> {
        let method_name = request.method().to_owned();
        tracing::info!("handle_request: method={}", method_name);
        match request {
            RequestFromClient::ClientRequest(client_request) => match client_request {
                ClientRequest::InitializeRequest(initialize_request) => {
                    let mut server_info = runtime.server_info().to_owned();
                    if let Some(updated_protocol_version) = enforce_compatible_protocol_version(
                        &initialize_request.params.protocol_version,
                        &server_info.protocol_version,
                    )
                    .map_err(|err| {
                        tracing::error!(
                            "incompatible protocol version (client={}, server={})",
                            initialize_request.params.protocol_version,
                            server_info.protocol_version
                        );
                        RpcError::internal_error().with_message(err.to_string())
                    })? {
                        server_info.protocol_version = updated_protocol_version;
                    }
                    tracing::info!(
                        "initialized client {} {} (protocol={})",
                        initialize_request.params.client_info.name,
                        initialize_request.params.client_info.version,
                        server_info.protocol_version
                    );
                    Ok(server_info.into())
                }

                ClientRequest::ListToolsRequest(_) => Ok(ListToolsResult {
                    meta: None,
                    next_cursor: None,
                    tools: self.tool_definitions(),
                }
                .into()),

                ClientRequest::ListResourcesRequest(_) => Ok(ListResourcesResult {
                    meta: None,
                    next_cursor: None,
                    resources: Vec::new(),
                }
                .into()),

                ClientRequest::ListResourceTemplatesRequest(_) => Ok(ListResourceTemplatesResult {
                    meta: None,
                    next_cursor: None,
                    resource_templates: Vec::new(),
                }
                .into()),

                ClientRequest::PingRequest(_) => Ok(EmptyResult {
                    meta: None,
                    extra: None,
                }
                .into()),

                ClientRequest::ListPromptsRequest(_) => Ok(ListPromptsResult {
                    meta: None,
                    next_cursor: None,
                    prompts: Vec::new(),
                }
                .into()),

                ClientRequest::CallToolRequest(request) => {
                    let tool = request.tool_name().to_string();
                    if tool != ECHO_TOOL {
                        tracing::warn!("unknown tool: {}", tool);
                        return Err(RpcError::method_not_found()
                            .with_message(format!("Unknown tool '{}'", tool)));
                    }
                    let reply = echo_reply(request.params.arguments.as_ref()).inspect_err(|_| {
                        tracing::warn!("echo called without a string 'message'");
                    })?;
                    tracing::debug!("echo reply length={}", reply.len());
                    Ok(CallToolResult::text_content(vec![TextContent::from(reply)]).into())
                }

                _ => {
                    tracing::warn!("method not implemented: {}", method_name);
                    Err(RpcError::method_not_found()
                        .with_message(format!("No handler is implemented for '{method_name}'.")))
                }
            },
            RequestFromClient::CustomRequest(_) => {
                tracing::warn!("custom request not implemented");
                Err(RpcError::method_not_found()
                    .with_message("No handler is implemented for custom requests.".to_string()))
            }
        }
    }

    async fn handle_notification(
        &self,
        notification: NotificationFromClient,
        _: &dyn McpServer,
    ) -> std::result::Result<(), RpcError> {
        match &notification {
            NotificationFromClient::ClientNotification(_) => {
                tracing::debug!("handle_notification: client notification")
            }
            NotificationFromClient::CustomNotification(_) => {
                tracing::debug!("handle_notification: custom notification")
            }
        }
        Ok(())
    }

    async fn handle_error(
        &self,
        error: &RpcError,
        _: &dyn McpServer,
    ) -> std::result::Result<(), RpcError> {
        tracing::error!(
            "handle_error from client (code={:?}, message={:?})",
            error.code,
            error.message
        );
        Ok(())
    }
}
