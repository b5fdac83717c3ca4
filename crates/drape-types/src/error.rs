//! Error types for the Drape simulator.
//!
//! All crates return `DrapeResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for the Drape simulator.
#[derive(Debug, Error)]
pub enum DrapeError {
    /// Mesh data is malformed, empty, or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A simulation entry point was called before initialization completed.
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Blend shape index is out of range.
    #[error("Blend shape index {index} out of range (shape count: {count})")]
    BlendShapeIndex {
        index: usize,
        count: usize,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, DrapeError>`.
pub type DrapeResult<T> = Result<T, DrapeError>;
