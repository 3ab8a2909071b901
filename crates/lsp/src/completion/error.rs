// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion error types
//!
//! This module defines error types for the completion system.

use sqlassist_database::DatabaseError;
use tower_lsp::lsp_types::Position;

/// Errors that can occur during completion
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The cursor position does not exist in the document text
    #[error("invalid position: {0:?}")]
    InvalidPosition(Position),

    /// Schema introspection failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_error_display() {
        let err = CompletionError::InvalidPosition(Position::new(3, 7));
        assert!(err.to_string().contains("invalid position"));

        let err = CompletionError::Database(DatabaseError::QueryFailed("boom".to_string()));
        assert!(err.to_string().contains("boom"));
    }
}
