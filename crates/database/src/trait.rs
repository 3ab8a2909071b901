// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Database trait
//!
//! This module defines the async trait through which the session layer
//! talks to a configured database connection: statement execution for the
//! query command, schema introspection for the completion engine, and
//! teardown.

use crate::error::DatabaseResult;
use crate::metadata::{ColumnInfo, TableInfo};
use crate::result::QueryOutcome;

/// A handle to an open database connection.
///
/// Implementations connect to live databases or serve predefined data.
/// Handles are shared as `Arc<dyn Database>`; a handle may be closed while
/// another task still holds a clone, in which case in-flight operations on
/// it are allowed to fail.
///
/// # Examples
///
/// ```rust,ignore
/// use sqlassist_database::{Database, QueryOutcome};
///
/// async fn run(db: &dyn Database) -> sqlassist_database::DatabaseResult<()> {
///     match db.execute_query("SELECT 1").await? {
///         QueryOutcome::Empty => println!("no rows"),
///         QueryOutcome::Rows(mut rows) => {
///             while let Some(row) = rows.next_row() {
///                 println!("{:?}", row?);
///             }
///         }
///     }
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait Database: Send + Sync {
    /// Execute a statement and return its polymorphic result.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::QueryFailed` if the statement is rejected or
    /// the connection is gone.
    async fn execute_query(&self, text: &str) -> DatabaseResult<QueryOutcome>;

    /// List all tables visible to the current connection.
    async fn list_tables(&self) -> DatabaseResult<Vec<TableInfo>>;

    /// Get column metadata for a specific table.
    async fn get_columns(&self, table: &str) -> DatabaseResult<Vec<ColumnInfo>>;

    /// Close the underlying connection.
    ///
    /// Closing an already closed handle is a no-op.
    async fn close(&self);
}
