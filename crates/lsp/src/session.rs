// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Session state
//!
//! This module owns the server-side state for one client connection: the
//! open documents, the optional database handle, and the completion engine
//! bound to it. Every protocol handler is a typed operation on [`Session`];
//! the transport layers (tower-lsp backend, raw dispatcher) stay thin.
//!
//! ## Locking discipline
//!
//! The document map and the database slot are each behind a `RwLock`. Locks
//! are held only while state is read or written, never across a call into
//! the database or the completion engine: handlers snapshot the document
//! text and clone the `Arc` handles out of the guard first. Calls into
//! external resources can block for unbounded time and must not stall
//! concurrent document notifications.
//!
//! ## Handle replacement
//!
//! Reconfiguration closes the previous handle before opening its
//! replacement ("close wins"): a query still running against the old handle
//! may fail, and that is the accepted semantic. If opening the new handle
//! (or initializing the completion engine against it) fails, the session is
//! left unconfigured; the database slot never holds a handle without a
//! working engine.

use std::sync::Arc;

use tower_lsp::lsp_types::{
    CodeActionOrCommand, Command, CompletionItem, InitializeResult, Position, ServerInfo, Url,
};
use tracing::{info, warn};

use sqlassist_database::{Database, DatabaseError};

use crate::command::EXECUTE_QUERY_COMMAND;
use crate::completion::CompletionEngine;
use crate::completion::error::CompletionError;
use crate::config::{ConfigError, ConnectionSettings};
use crate::document::{DocumentError, DocumentStore};

/// The active database handle and the completion engine initialized
/// against it. The two are created together and replaced together.
pub(crate) struct DatabaseSession {
    pub(crate) database: Arc<dyn Database>,
    pub(crate) completer: Arc<CompletionEngine>,
}

/// Server-side state for one client connection.
pub struct Session {
    pub(crate) documents: DocumentStore,
    pub(crate) database: tokio::sync::RwLock<Option<DatabaseSession>>,
}

/// Errors surfaced by session operations.
///
/// All of these are request-scoped: the session stays usable after any of
/// them.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The request referenced a document that is not open
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A database-dependent operation arrived before configuration
    #[error("connection is closed")]
    ConnectionClosed,

    /// A workspace command carried the wrong argument shape
    #[error("invalid arguments for {0}")]
    InvalidCommandArguments(String),

    /// A workspace command with an unrecognized name
    #[error("unsupported command: {0}")]
    UnsupportedCommand(String),

    /// Malformed connection settings payload
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database failure, propagated verbatim
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Completion engine failure, propagated verbatim
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// The connection opened but the completion engine could not be
    /// initialized against it
    #[error("completion initialization failed after connect: {0}")]
    CompleterInit(#[source] CompletionError),
}

impl Session {
    /// Create a new session with no open documents and no database handle.
    pub fn new() -> Self {
        Self {
            documents: DocumentStore::new(),
            database: tokio::sync::RwLock::new(None),
        }
    }

    /// Get the document store
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// The initialize response: the fixed capability set plus server info.
    pub fn initialize_result(&self) -> InitializeResult {
        InitializeResult {
            capabilities: capabilities::server_capabilities(),
            server_info: Some(ServerInfo {
                name: crate::SERVER_NAME.to_string(),
                version: Some(crate::VERSION.to_string()),
            }),
        }
    }

    /// Handle `textDocument/didOpen`: (re)create the document and seed it
    /// with the text from the notification.
    pub async fn open_document(&self, uri: Url, language_id: String, text: String) {
        info!("document opened: uri={}, language={}", uri, language_id);
        self.documents.open(uri.clone(), language_id).await;
        // The entry was just created, so seeding cannot miss.
        if let Err(e) = self.documents.update(&uri, &text).await {
            warn!("failed to seed document {}: {}", uri, e);
        }
    }

    /// Handle `textDocument/didChange`: replace the document text with the
    /// given full text.
    pub async fn change_document(&self, uri: &Url, text: &str) -> Result<(), SessionError> {
        self.documents.update(uri, text).await?;
        Ok(())
    }

    /// Handle `textDocument/didSave`.
    pub async fn save_document(&self, uri: &Url, text: Option<&str>) -> Result<(), SessionError> {
        self.documents.save(uri, text).await?;
        Ok(())
    }

    /// Handle `textDocument/didClose`.
    pub async fn close_document(&self, uri: &Url) {
        info!("document closed: uri={}", uri);
        self.documents.close(uri).await;
    }

    /// Handle `textDocument/completion`.
    ///
    /// The document must be open; its current text and the cursor position
    /// are handed to the completion engine unmodified, and the engine's
    /// items (or its error) come back the same way.
    pub async fn completion(
        &self,
        uri: &Url,
        position: Position,
    ) -> Result<Vec<CompletionItem>, SessionError> {
        let text = self
            .documents
            .get(uri)
            .await
            .ok_or_else(|| DocumentError::DocumentNotFound(uri.clone()))?
            .text();

        let completer = {
            let guard = self.database.read().await;
            guard
                .as_ref()
                .map(|active| Arc::clone(&active.completer))
                .ok_or(SessionError::ConnectionClosed)?
        };

        let items = completer.complete(&text, position)?;
        Ok(items)
    }

    /// Handle `textDocument/codeAction`.
    ///
    /// Pure advertisement: one "Execute Query" command bound to the
    /// requesting document's URI, regardless of content.
    pub fn code_actions(&self, uri: &Url) -> Vec<CodeActionOrCommand> {
        vec![CodeActionOrCommand::Command(Command {
            title: "Execute Query".to_string(),
            command: EXECUTE_QUERY_COMMAND.to_string(),
            arguments: Some(vec![serde_json::Value::String(uri.to_string())]),
        })]
    }

    /// Handle `workspace/didChangeConfiguration`: replace the database
    /// handle and completion engine with ones built from `settings`.
    ///
    /// The previous handle is closed before the new one is opened. On any
    /// failure past that point the session is left unconfigured.
    pub async fn configure(&self, settings: &ConnectionSettings) -> Result<(), SessionError> {
        settings.validate()?;

        self.close_active().await;

        let database =
            sqlassist_database::open(&settings.driver, &settings.data_source_name).await?;
        self.activate(database).await
    }

    /// Replace the active database session with one built around an already
    /// open handle. The previous handle is closed first.
    pub async fn install_database(
        &self,
        database: Arc<dyn Database>,
    ) -> Result<(), SessionError> {
        self.close_active().await;
        self.activate(database).await
    }

    /// Whether a database handle is currently configured.
    pub async fn is_configured(&self) -> bool {
        self.database.read().await.is_some()
    }

    /// Handle `shutdown`: close the database handle if present. Idempotent.
    pub async fn shutdown(&self) {
        info!("shutting down session");
        self.close_active().await;
    }

    /// Take the active handle out of the slot and close it.
    async fn close_active(&self) {
        let previous = self.database.write().await.take();
        if let Some(previous) = previous {
            previous.database.close().await;
        }
    }

    async fn activate(&self, database: Arc<dyn Database>) -> Result<(), SessionError> {
        let mut completer = CompletionEngine::new(Arc::clone(&database));
        if let Err(e) = completer.init().await {
            database.close().await;
            return Err(SessionError::CompleterInit(e));
        }

        *self.database.write().await = Some(DatabaseSession {
            database,
            completer: Arc::new(completer),
        });
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) mod capabilities {
    //! The negotiated capability set.
    //!
    //! Every flag advertised as supported has a handler behind it; hover,
    //! definition and formatting are explicitly unsupported.

    use tower_lsp::lsp_types::{
        CodeActionProviderCapability, CompletionOptions, ExecuteCommandOptions,
        HoverProviderCapability, OneOf, ServerCapabilities, TextDocumentSyncCapability,
        TextDocumentSyncKind,
    };

    use crate::command::EXECUTE_QUERY_COMMAND;

    pub(crate) fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            // Documents are synchronized by full text, never diffed
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),

            completion_provider: Some(CompletionOptions {
                resolve_provider: Some(false),
                trigger_characters: Some(vec![".".to_string()]),
                ..Default::default()
            }),

            code_action_provider: Some(CodeActionProviderCapability::Simple(true)),

            execute_command_provider: Some(ExecuteCommandOptions {
                commands: vec![EXECUTE_QUERY_COMMAND.to_string()],
                ..Default::default()
            }),

            hover_provider: Some(HoverProviderCapability::Simple(false)),
            definition_provider: Some(OneOf::Left(false)),
            document_formatting_provider: Some(OneOf::Left(false)),
            document_range_formatting_provider: Some(OneOf::Left(false)),

            ..Default::default()
        }
    }
}
