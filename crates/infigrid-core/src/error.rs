//! Error types for the grid.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A numeric precondition was violated (negative square root, zero divisor)
    #[error("Domain error: {0}")]
    Domain(String),

    /// A block index string is not a canonical `x,y,z` encoding
    #[error("Malformed block index: {0}")]
    Format(String),

    /// A local value outside `[0, 1)`
    #[error("Invalid local value: {0} is not in [0, 1)")]
    InvalidLocalValue(f64),

    /// Object corners are not ordered `start <= end`
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    /// Object payload rejected by its validator
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// An object spans more blocks than the grid accepts
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
