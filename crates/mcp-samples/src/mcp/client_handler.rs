//! Client-side handler for server-initiated traffic.
//!
//! The samples never advertise sampling, roots or elicitation, so every
//! server request is refused and notifications are only logged.

use rust_mcp_sdk::McpClient;
use rust_mcp_sdk::mcp_client::ClientHandlerCore;
use rust_mcp_sdk::schema::RpcError;
use rust_mcp_sdk::schema::schema_utils::{
    NotificationFromServer, RequestFromServer, ResultFromClient,
};

#[derive(Clone, Default)]
pub struct QuietClientHandler;

#[async_trait::async_trait]
impl ClientHandlerCore for QuietClientHandler {
    async fn handle_request(
        &self,
        request: RequestFromServer,
        _runtime: &dyn McpClient,
    ) -> std::result::Result<ResultFromClient, RpcError> {
        let method = request.method().to_owned();
        tracing::debug!("refusing server request: method={}", method);
        Err(RpcError::method_not_found()
            .with_message(format!("No handler is implemented for '{method}'.")))
    }

    async fn handle_notification(
        &self,
        _notification: NotificationFromServer,
        _runtime: &dyn McpClient,
    ) -> std::result::Result<(), RpcError> {
        tracing::debug!("server notification received");
        Ok(())
    }

    async fn handle_error(
        &self,
        error: &RpcError,
        _runtime: &dyn McpClient,
    ) -> std::result::Result<(), RpcError> {
        tracing::error!(
            "handle_error from server (code={:?}, message={:?})",
            error.code,
            error.message
        );
        Ok(())
    }
}
