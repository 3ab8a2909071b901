// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for database operations
//!
//! This module defines the error types used throughout the database layer.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Errors that can occur during database operations
#[derive(Debug, Error, Clone, Serialize)]
pub enum DatabaseError {
    /// Failed to connect to the database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("query execution failed: {0}")]
    QueryFailed(String),

    /// Failed to scan a row of a query result
    #[error("failed to scan row: {0}")]
    ScanFailed(String),

    /// No driver is registered under the requested name
    #[error("unsupported driver: {0}")]
    UnsupportedDriver(String),

    /// Invalid connection configuration
    #[error("invalid database configuration: {0}")]
    ConfigurationError(String),

    /// The requested operation is not available in this build
    #[error("feature not supported: {0}")]
    NotSupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DatabaseError::UnsupportedDriver("sqlite".to_string());
        assert_eq!(err.to_string(), "unsupported driver: sqlite");

        let err = DatabaseError::ScanFailed("bad cell".to_string());
        assert!(err.to_string().contains("bad cell"));
    }
}
