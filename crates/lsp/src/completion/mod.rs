// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion module
//!
//! This module provides the completion engine the session delegates
//! completion requests to.
//!
//! ## Architecture
//!
//! - `keywords`: static SQL keyword candidates
//! - `render`: converts schema items and keywords to LSP completion items
//! - `error`: error types for completion operations
//!
//! ## Flow
//!
//! ```text
//! 1. Session (re)configures a database handle
//!    ↓
//! 2. CompletionEngine::init() caches the schema (tables + columns)
//!    ↓
//! 3. completion request arrives with document text + cursor position
//!    ↓
//! 4. CompletionEngine::complete() filters candidates by the word prefix
//!    at the cursor and renders CompletionItems
//! ```
//!
//! The engine is created together with the database handle and initialized
//! against it before the session exposes either; completion quality follows
//! the schema of the live connection.

pub mod error;
pub mod keywords;
pub mod render;

use std::collections::HashMap;
use std::sync::Arc;

use tower_lsp::lsp_types::{CompletionItem, Position};

use sqlassist_database::{ColumnInfo, Database, TableInfo};

use crate::completion::error::CompletionError;
use crate::completion::keywords::SQL_KEYWORDS;

/// Completion engine
///
/// Holds the database handle it was initialized against and a cached copy
/// of its schema.
pub struct CompletionEngine {
    database: Arc<dyn Database>,
    tables: Vec<TableInfo>,
    columns: HashMap<String, Vec<ColumnInfo>>,
}

impl CompletionEngine {
    /// Create a new, uninitialized completion engine
    ///
    /// # Arguments
    ///
    /// * `database` - The handle to introspect schema information from
    pub fn new(database: Arc<dyn Database>) -> Self {
        Self {
            database,
            tables: Vec::new(),
            columns: HashMap::new(),
        }
    }

    /// Load the schema cache from the database handle.
    ///
    /// Must succeed before the engine serves completions; the session calls
    /// this whenever the database handle is (re)configured.
    ///
    /// # Errors
    ///
    /// Propagates introspection failures from the database layer.
    pub async fn init(&mut self) -> Result<(), CompletionError> {
        let tables = self.database.list_tables().await?;

        let mut columns = HashMap::new();
        for table in &tables {
            columns.insert(
                table.name.clone(),
                self.database.get_columns(&table.name).await?,
            );
        }

        tracing::debug!("completion schema cached: {} tables", tables.len());
        self.tables = tables;
        self.columns = columns;
        Ok(())
    }

    /// Propose completions for the given document text and cursor position.
    ///
    /// Candidates are the cached schema's columns and tables plus SQL
    /// keywords, filtered by the identifier prefix immediately before the
    /// cursor (case-insensitive). An empty prefix proposes everything.
    pub fn complete(
        &self,
        text: &str,
        position: Position,
    ) -> Result<Vec<CompletionItem>, CompletionError> {
        let offset =
            position_to_offset(text, position).ok_or(CompletionError::InvalidPosition(position))?;
        let prefix = word_prefix(&text[..offset]);

        let mut items = Vec::new();

        for table in &self.tables {
            if let Some(columns) = self.columns.get(&table.name) {
                for column in columns {
                    if matches_prefix(&column.name, prefix) {
                        items.push(render::column_item(table, column));
                    }
                }
            }
        }

        for table in &self.tables {
            if matches_prefix(&table.name, prefix) {
                items.push(render::table_item(table));
            }
        }

        for keyword in SQL_KEYWORDS {
            if matches_prefix(keyword, prefix) {
                items.push(render::keyword_item(keyword));
            }
        }

        Ok(items)
    }
}

fn matches_prefix(candidate: &str, prefix: &str) -> bool {
    prefix.is_empty() || candidate.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Convert a line/character position to a byte offset into `text`.
///
/// Returns `None` if the line does not exist or the character index lies
/// past the end of the line.
fn position_to_offset(text: &str, position: Position) -> Option<usize> {
    let mut line_start = 0usize;

    for (index, line) in text.split('\n').enumerate() {
        if index as u32 == position.line {
            let mut bytes = 0usize;
            let mut chars = 0u32;
            for c in line.chars() {
                if chars == position.character {
                    break;
                }
                bytes += c.len_utf8();
                chars += 1;
            }
            if chars < position.character {
                return None;
            }
            return Some(line_start + bytes);
        }
        line_start += line.len() + 1;
    }

    None
}

/// The identifier characters immediately before the cursor.
fn word_prefix(text: &str) -> &str {
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
        .last()
        .map(|(index, _)| index)
        .unwrap_or(text.len());
    &text[start..]
}
