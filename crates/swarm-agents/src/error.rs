//! Error types for swarm orchestration

use thiserror::Error;

/// Result type alias for swarm operations
pub type Result<T> = std::result::Result<T, SwarmError>;

/// Errors surfaced by the orchestrator
///
/// Per-agent transport failures are not represented here; they are isolated
/// into the failing agent's `Error` status and never abort the run.
#[derive(Error, Debug)]
pub enum SwarmError {
    /// A swarm run is already in flight; cancel it before starting another
    #[error("a swarm run is already in progress")]
    AlreadyRunning,
}
