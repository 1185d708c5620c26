//! Errors raised at the C boundary

use helm_bridge_client::HelmError;
use thiserror::Error;

/// Failure of a boundary call, before or after reaching the client
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// A required string argument was null
    #[error("argument '{name}' is null")]
    NullArgument { name: &'static str },

    /// A string argument was not valid UTF-8
    #[error("argument '{name}' is not valid UTF-8")]
    InvalidUtf8 { name: &'static str },

    /// The per-call runtime could not be started
    #[error("failed to start async runtime: {0}")]
    Runtime(String),

    /// Logging setup failed
    #[error("failed to initialize logging: {0}")]
    Logging(String),

    /// The operation panicked
    #[error("internal error: {0}")]
    Panic(String),

    #[error(transparent)]
    Client(#[from] HelmError),
}
