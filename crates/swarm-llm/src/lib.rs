//! Chat completion client for swarm-rs
//!
//! This crate wraps an OpenAI-compatible chat-completions endpoint with two
//! request modes:
//!
//! - `complete`: one request, one response body, first choice returned
//! - `stream_complete`: Server-Sent-Events stream, each delta delivered to a
//!   caller-supplied sink as it arrives
//!
//! Both modes observe a [`tokio_util::sync::CancellationToken`]; cancelling
//! aborts the transport and resolves the call without an error. The client
//! holds no state between calls.

pub mod client;
pub mod config;
pub mod error;
pub mod messages;

pub use client::{ChatClient, CompletionBackend, CompletionOptions};
pub use config::ChatConfig;
pub use error::{LlmError, Result};
pub use messages::{ChatMessage, Role};
