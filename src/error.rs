//! Error types for the clustering pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClusterError>;

#[derive(Debug, Error)]
pub enum ClusterError {
    /// The viewport could not convert a screen point, usually because it has
    /// not been laid out yet.
    #[error("Epsilon unavailable: viewport could not resolve screen coordinates")]
    EpsilonUnavailable,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cluster engine failed: {0}")]
    Engine(#[from] EngineError),

    /// The offloaded clustering task panicked or was cancelled by the runtime.
    #[error("Clustering worker failed: {0}")]
    Worker(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failures reported by a [`ClusterEngine`](crate::compute::engine::ClusterEngine).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Invalid engine input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}
