//! Error types for chat completion calls
//!
//! Cancellation and metadata-parse leniency are deliberately NOT represented
//! here: a cancelled call resolves with whatever text had accumulated, and
//! metadata extraction lives upstream in swarm-core.

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur while talking to the completion endpoint
#[derive(Error, Debug)]
pub enum LlmError {
    /// Non-success HTTP status from the endpoint
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Network failure reaching the endpoint
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Missing or invalid configuration
    #[error("configuration error: {0}")]
    Configuration(String),
}
