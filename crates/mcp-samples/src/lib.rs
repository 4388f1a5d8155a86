//! Small MCP and streaming-chat samples built on `rust-mcp-sdk` and `reqwest`.
//!
//! Each binary under `src/bin` is a straight-line program; the shared pieces
//! (configuration, tracing, MCP sessions, the echo server handler and the
//! chat stream decoder) live here so they can be tested without a network.

pub mod chat;
pub mod config;
pub mod error;
pub mod logging;
pub mod mcp;
