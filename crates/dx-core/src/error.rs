//! Engine error taxonomy.
//!
//! Nothing in the engine retries. Every failure surfaces to the owner of the
//! engine, which decides how to present it.

use thiserror::Error;

/// Failure reported by a renderer's draw hook.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrawError {
    /// The host never supplied a draw hook.
    #[error("draw frame not implemented")]
    NotImplemented,

    /// The draw hook ran and failed.
    #[error("draw failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// No drawing surface is registered under the given handle.
    #[error("drawing surface `{0}` not found")]
    SurfaceNotFound(String),

    /// The surface exists but refused to hand out a 2d context.
    #[error("drawing surface has no 2d context")]
    ContextUnavailable,

    #[error(transparent)]
    Draw(#[from] DrawError),

    /// Throttle rates must be finite and positive.
    #[error("invalid throttle rate {0}, expected a positive number of calls per second")]
    InvalidRate(f64),

    /// A throttle id from another registry.
    #[error("unknown throttle id")]
    UnknownThrottle,

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::InvalidOptions(err.to_string())
    }
}
