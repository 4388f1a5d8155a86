//! Streaming chat-completions client with local tool dispatch.

pub mod client;
pub mod stream;
pub mod tools;
pub mod types;

pub use client::ChatClient;
pub use types::*;
