//! # Backing Store Errors
//!
//! Error types returned by every backing-store round-trip.

use thiserror::Error;

/// Result type for backing-store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Backing-store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Addressed entity (or one of its parents) does not exist
    #[error("does not exist: {0}")]
    NoExist(String),

    /// Entity being created already exists
    #[error("already exists: {0}")]
    Exist(String),

    /// Query could not be parsed or executed
    #[error("query error: {0}")]
    Query(String),

    /// Any other failure inside the store
    #[error("internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn no_exist(what: impl Into<String>) -> Self {
        Self::NoExist(what.into())
    }

    pub fn exist(what: impl Into<String>) -> Self {
        Self::Exist(what.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Lock poisoning and similar failures
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::no_exist("table d1/t1");
        assert_eq!(err.to_string(), "does not exist: table d1/t1");

        let err = StoreError::query("unknown column x");
        assert!(err.to_string().contains("unknown column x"));
    }
}
