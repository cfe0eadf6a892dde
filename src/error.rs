//! Error types for the crate
//!
//! Provides unified error handling using thiserror.
//!
//! Only construction-time validation can fail. A cache miss or a rate-limit
//! denial is an ordinary return value, never an error.

use thiserror::Error;

// == Error Enum ==
/// Unified error type for cache and limiter configuration and services.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Cache capacity must be at least one entry
    #[error("cache capacity must be greater than zero")]
    InvalidCapacity,

    /// Rate limit window must be a positive duration
    #[error("rate limit window must be greater than zero")]
    InvalidWindow,

    /// Rate limit must admit at least one event per window
    #[error("rate limit must allow at least one event per window")]
    InvalidLimit,

    /// Range query with start past end
    #[error("invalid range: start {start} is greater than end {end}")]
    InvalidRange { start: usize, end: usize },

    /// Index outside the backing array
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::InvalidCapacity.to_string(),
            "cache capacity must be greater than zero"
        );
        assert_eq!(
            Error::InvalidRange { start: 5, end: 2 }.to_string(),
            "invalid range: start 5 is greater than end 2"
        );
        assert_eq!(
            Error::IndexOutOfBounds { index: 10, len: 4 }.to_string(),
            "index 10 out of bounds for array of length 4"
        );
    }
}
