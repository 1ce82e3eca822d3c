//! Conversational assistant proxy (OpenAI-compatible chat completions).

pub mod client;
pub mod types;

pub use client::ChatClient;
pub use types::{ChatReply, ChatRequest};
