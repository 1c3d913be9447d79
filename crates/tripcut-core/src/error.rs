//! Error types for Tripcut core types.

use thiserror::Error;

/// Main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TripcutError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, TripcutError>;
