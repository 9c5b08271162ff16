//! Error types for colony construction and map loading.

use thiserror::Error;

/// Errors raised when a colony is given inputs it cannot search over.
///
/// Only precondition failures are values. Broken internal bookkeeping
/// (a city missing from a tour, a roulette spin with no candidate) panics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcoError {
    /// A tuning parameter is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The distance matrix is malformed.
    #[error("invalid distance matrix: {0}")]
    InvalidMatrix(String),

    /// A serialized distance matrix could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type alias for colony operations.
pub type Result<T> = std::result::Result<T, AcoError>;
