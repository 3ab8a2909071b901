// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema metadata types
//!
//! Lightweight descriptions of tables and columns, as reported by the
//! introspection side of the [`Database`](crate::Database) trait. The
//! completion engine consumes these to propose schema-aware candidates.

use serde::{Deserialize, Serialize};

/// Metadata for a single table (or view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Schema the table lives in
    pub schema: String,

    /// Table name
    pub name: String,
}

impl TableInfo {
    /// Create new table metadata
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }
}

/// Metadata for a single column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,

    /// Raw database type name (e.g. "varchar(255)", "integer")
    pub data_type: String,

    /// Whether the column accepts NULL
    pub nullable: bool,
}

impl ColumnInfo {
    /// Create new column metadata (non-nullable by default)
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: false,
        }
    }

    /// Set the nullable flag
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_info_new() {
        let table = TableInfo::new("public", "users");
        assert_eq!(table.schema, "public");
        assert_eq!(table.name, "users");
    }

    #[test]
    fn test_column_info_builder() {
        let column = ColumnInfo::new("created_at", "timestamp").with_nullable(true);
        assert_eq!(column.name, "created_at");
        assert_eq!(column.data_type, "timestamp");
        assert!(column.nullable);
    }
}
