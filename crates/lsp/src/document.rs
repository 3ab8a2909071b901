// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Document Management
//!
//! This module provides document management for the LSP server.
//!
//! ## Overview
//!
//! The document store handles:
//! - Document synchronization (open, change, save, close)
//! - Full-text content management (the server advertises full document
//!   sync, so change notifications always carry the complete new text)
//! - Document metadata (language ID)
//!
//! ## Invariants
//!
//! A document exists in the store exactly between its open notification and
//! its close notification. Opening an already open URI re-creates the entry;
//! closing an unknown URI is a no-op; changing an unknown URI is a protocol
//! violation by the client and fails with [`DocumentError::DocumentNotFound`].

use ropey::Rope;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tower_lsp::lsp_types::Url;

/// A document managed by the LSP server
///
/// Contains the document's language identifier and its full current text.
#[derive(Debug, Clone)]
pub struct Document {
    /// Language identifier (e.g. "sql"), set once at open
    language_id: String,

    /// Document content
    content: Rope,
}

impl Document {
    /// Create a new, empty document
    pub fn new(language_id: impl Into<String>) -> Self {
        Self {
            language_id: language_id.into(),
            content: Rope::new(),
        }
    }

    /// Get the document language ID
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// Get the full document content as a string
    pub fn text(&self) -> String {
        self.content.to_string()
    }

    /// Get the line count
    pub fn line_count(&self) -> usize {
        self.content.len_lines()
    }

    /// Replace the document content wholesale
    pub fn replace_text(&mut self, text: &str) {
        self.content = Rope::from_str(text);
    }
}

/// Document-related errors
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The URI has not been opened (or was already closed)
    #[error("document not found: {0}")]
    DocumentNotFound(Url),
}

/// Document store for managing open documents
///
/// Thread-safe store keyed by document URI.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: RwLock<HashMap<Url, Document>>,
}

impl DocumentStore {
    /// Create a new document store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document with empty text, overwriting any prior entry for the
    /// same URI. Open is idempotent re-creation, not an error on duplicate.
    pub async fn open(&self, uri: Url, language_id: impl Into<String>) {
        let mut docs = self.documents.write().await;
        docs.insert(uri, Document::new(language_id));
    }

    /// Replace a document's text wholesale.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::DocumentNotFound` if the URI is not open.
    pub async fn update(&self, uri: &Url, text: &str) -> Result<(), DocumentError> {
        let mut docs = self.documents.write().await;

        let document = docs
            .get_mut(uri)
            .ok_or_else(|| DocumentError::DocumentNotFound(uri.clone()))?;
        document.replace_text(text);

        Ok(())
    }

    /// Handle a save notification.
    ///
    /// When the client includes the saved text this behaves exactly like
    /// [`update`](Self::update); otherwise it is a no-op (the server keeps
    /// no external copy of the document).
    pub async fn save(&self, uri: &Url, text: Option<&str>) -> Result<(), DocumentError> {
        match text {
            Some(text) => self.update(uri, text).await,
            None => Ok(()),
        }
    }

    /// Close a document. No-op if the URI was never opened or is already
    /// closed.
    ///
    /// Returns true if an entry was removed.
    pub async fn close(&self, uri: &Url) -> bool {
        let mut docs = self.documents.write().await;
        docs.remove(uri).is_some()
    }

    /// Get a snapshot of a document by URI
    pub async fn get(&self, uri: &Url) -> Option<Document> {
        let docs = self.documents.read().await;
        docs.get(uri).cloned()
    }

    /// Check if a document exists
    pub async fn contains(&self, uri: &Url) -> bool {
        let docs = self.documents.read().await;
        docs.contains_key(uri)
    }

    /// Get the number of open documents
    pub async fn len(&self) -> usize {
        let docs = self.documents.read().await;
        docs.len()
    }

    /// Check whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
