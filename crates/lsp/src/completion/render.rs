// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion rendering
//!
//! This module converts schema items and keywords to LSP CompletionItem
//! representations.

use sqlassist_database::{ColumnInfo, TableInfo};
use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind};

/// Render a single column completion item
///
/// The detail shows the column type and the table it belongs to.
pub(crate) fn column_item(table: &TableInfo, column: &ColumnInfo) -> CompletionItem {
    let nullable = if column.nullable { ", nullable" } else { "" };

    CompletionItem {
        label: column.name.clone(),
        kind: Some(CompletionItemKind::FIELD),
        detail: Some(format!("{} ({}{})", column.data_type, table.name, nullable)),
        sort_text: Some(format!("00_{}", column.name)),
        filter_text: Some(column.name.clone()),
        insert_text: Some(column.name.clone()),
        ..Default::default()
    }
}

/// Render a single table completion item
pub(crate) fn table_item(table: &TableInfo) -> CompletionItem {
    CompletionItem {
        label: table.name.clone(),
        kind: Some(CompletionItemKind::CLASS),
        detail: Some(format!("{}.{} [TABLE]", table.schema, table.name)),
        sort_text: Some(format!("01_{}", table.name)),
        filter_text: Some(table.name.clone()),
        insert_text: Some(table.name.clone()),
        ..Default::default()
    }
}

/// Render a single keyword completion item
pub(crate) fn keyword_item(keyword: &str) -> CompletionItem {
    CompletionItem {
        label: keyword.to_string(),
        kind: Some(CompletionItemKind::KEYWORD),
        detail: Some("keyword".to_string()),
        sort_text: Some(format!("02_{}", keyword)),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_item() {
        let table = TableInfo::new("playground", "users");
        let column = ColumnInfo::new("email", "varchar(255)");

        let item = column_item(&table, &column);
        assert_eq!(item.label, "email");
        assert_eq!(item.kind, Some(CompletionItemKind::FIELD));
        assert_eq!(item.detail.as_deref(), Some("varchar(255) (users)"));
        assert_eq!(item.sort_text.as_deref(), Some("00_email"));
    }

    #[test]
    fn test_column_item_nullable_detail() {
        let table = TableInfo::new("playground", "users");
        let column = ColumnInfo::new("created_at", "timestamp").with_nullable(true);

        let item = column_item(&table, &column);
        assert_eq!(item.detail.as_deref(), Some("timestamp (users, nullable)"));
    }

    #[test]
    fn test_table_item() {
        let table = TableInfo::new("playground", "orders");

        let item = table_item(&table);
        assert_eq!(item.label, "orders");
        assert_eq!(item.kind, Some(CompletionItemKind::CLASS));
        assert_eq!(item.detail.as_deref(), Some("playground.orders [TABLE]"));
    }

    #[test]
    fn test_keyword_item() {
        let item = keyword_item("SELECT");
        assert_eq!(item.label, "SELECT");
        assert_eq!(item.kind, Some(CompletionItemKind::KEYWORD));
        assert_eq!(item.sort_text.as_deref(), Some("02_SELECT"));
    }
}
