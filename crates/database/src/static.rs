// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Static database
//!
//! An in-memory [`Database`] implementation with a predefined schema.
//! This is used for the playground and testing without requiring a real
//! database server: query outcomes can be scripted ahead of time, and the
//! handle records every executed statement and every close call.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::DatabaseResult;
use crate::metadata::{ColumnInfo, TableInfo};
use crate::r#trait::Database;
use crate::result::QueryOutcome;

/// Database handle with predefined schema data.
pub struct StaticDatabase {
    tables: Vec<TableInfo>,
    columns: HashMap<String, Vec<ColumnInfo>>,
    queued: Mutex<VecDeque<DatabaseResult<QueryOutcome>>>,
    executed: Mutex<Vec<String>>,
    close_count: AtomicUsize,
}

impl StaticDatabase {
    /// Create a static database with the default playground schema
    /// (a `users` table and an `orders` table).
    pub fn new() -> Self {
        let mut database = Self::empty();

        database.add_table(
            TableInfo::new("playground", "users"),
            vec![
                ColumnInfo::new("id", "integer"),
                ColumnInfo::new("name", "varchar(100)"),
                ColumnInfo::new("email", "varchar(255)"),
                ColumnInfo::new("created_at", "timestamp").with_nullable(true),
            ],
        );

        database.add_table(
            TableInfo::new("playground", "orders"),
            vec![
                ColumnInfo::new("id", "integer"),
                ColumnInfo::new("user_id", "integer"),
                ColumnInfo::new("total", "decimal"),
                ColumnInfo::new("status", "varchar(20)").with_nullable(true),
                ColumnInfo::new("created_at", "timestamp").with_nullable(true),
            ],
        );

        database
    }

    /// Create a static database with no tables.
    pub fn empty() -> Self {
        Self {
            tables: Vec::new(),
            columns: HashMap::new(),
            queued: Mutex::new(VecDeque::new()),
            executed: Mutex::new(Vec::new()),
            close_count: AtomicUsize::new(0),
        }
    }

    /// Add a table and its columns to the schema.
    pub fn add_table(&mut self, table: TableInfo, columns: Vec<ColumnInfo>) {
        self.columns.insert(table.name.clone(), columns);
        self.tables.push(table);
    }

    /// Script the outcome of the next `execute_query` call.
    ///
    /// Outcomes are consumed in queue order; once the queue is empty,
    /// statements yield `QueryOutcome::Empty`.
    pub fn queue_result(&self, result: DatabaseResult<QueryOutcome>) {
        self.queued
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(result);
    }

    /// Statements executed so far, in order.
    pub fn executed_queries(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// How many times `close` has been called on this handle.
    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

impl Default for StaticDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Database for StaticDatabase {
    async fn execute_query(&self, text: &str) -> DatabaseResult<QueryOutcome> {
        self.executed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(text.to_string());

        let queued = self
            .queued
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front();

        queued.unwrap_or(Ok(QueryOutcome::Empty))
    }

    async fn list_tables(&self) -> DatabaseResult<Vec<TableInfo>> {
        Ok(self.tables.clone())
    }

    async fn get_columns(&self, table: &str) -> DatabaseResult<Vec<ColumnInfo>> {
        Ok(self.columns.get(table).cloned().unwrap_or_default())
    }

    async fn close(&self) {
        self.close_count.fetch_add(1, Ordering::SeqCst);
    }
}
