// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # LSP Backend Implementation
//!
//! This module provides the main LSP server backend using tower-lsp.
//!
//! ## Overview
//!
//! The backend handles:
//! - LSP protocol communication via tower-lsp
//! - Document lifecycle (open, change, save, close)
//! - Completion, code actions and query execution
//! - Database connection management through configuration changes
//!
//! ## Architecture
//!
//! ```text
//! Client → LSP Backend (tower-lsp) → Session
//!                                       ├── Document Store
//!                                       ├── Database Handle
//!                                       └── Completion Engine
//! ```
//!
//! Each trait method is a thin wrapper over the corresponding typed
//! [`Session`] operation; requests convert session errors into JSON-RPC
//! errors, notifications log them.

use std::sync::Arc;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{error, info, warn};

use crate::command::SessionCommand;
use crate::config::ConnectionSettings;
use crate::session::{Session, SessionError};

/// LSP backend
///
/// Main entry point for all LSP protocol operations over the stdio
/// transport.
pub struct Backend {
    /// LSP client for sending notifications and requests
    client: Client,

    /// Session state shared by all handlers
    session: Arc<Session>,
}

impl Backend {
    /// Create a new backend
    ///
    /// # Arguments
    ///
    /// - `client`: LSP client handle
    pub fn new(client: Client) -> Self {
        Self {
            client,
            session: Arc::new(Session::new()),
        }
    }

    /// Get the session state
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Log a message to the client
    async fn log_message(&self, message: &str, message_type: MessageType) {
        self.client.log_message(message_type, message).await;
    }
}

fn rpc_error(error: SessionError) -> tower_lsp::jsonrpc::Error {
    let mut rpc = tower_lsp::jsonrpc::Error::internal_error();
    rpc.message = error.to_string().into();
    rpc
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    /// Initialize the LSP server
    ///
    /// Returns the fixed capability set; nothing about it depends on the
    /// client's parameters.
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("initializing session");
        info!("client info: {:?}", params.client_info);

        Ok(self.session.initialize_result())
    }

    /// Initialized notification
    async fn initialized(&self, _params: InitializedParams) {
        info!("session initialized");
        self.log_message(
            "sqlassist ready. Configure a database connection to enable completion and query execution.",
            MessageType::INFO,
        )
        .await;
    }

    /// Shutdown the LSP server
    ///
    /// Closes the database handle if one is configured.
    async fn shutdown(&self) -> Result<()> {
        self.session.shutdown().await;
        Ok(())
    }

    /// Document opened notification
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        self.session
            .open_document(doc.uri, doc.language_id, doc.text)
            .await;
    }

    /// Document changed notification
    ///
    /// The server advertises full sync, so the first content change carries
    /// the complete new text.
    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;

        let Some(change) = params.content_changes.into_iter().next() else {
            return;
        };

        if let Err(e) = self.session.change_document(&uri, &change.text).await {
            warn!("change for unopened document {}: {}", uri, e);
        }
    }

    /// Document saved notification
    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;

        if let Err(e) = self
            .session
            .save_document(&uri, params.text.as_deref())
            .await
        {
            warn!("save for unopened document {}: {}", uri, e);
        }
    }

    /// Document closed notification
    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.session.close_document(&params.text_document.uri).await;
    }

    /// Completion request
    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let items = self
            .session
            .completion(&uri, position)
            .await
            .map_err(rpc_error)?;

        Ok(Some(CompletionResponse::Array(items)))
    }

    /// Code action request
    ///
    /// Advertises the "Execute Query" command for the requesting document.
    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        Ok(Some(self.session.code_actions(&params.text_document.uri)))
    }

    /// Execute command request
    ///
    /// Only `executeQuery` is recognized; its result is the rendered text
    /// table (or null for statements without a row-set).
    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        info!("execute_command: {:?}", params.command);

        let command = SessionCommand::parse(&params).map_err(rpc_error)?;
        let rendered = self
            .session
            .execute_command(command)
            .await
            .map_err(rpc_error)?;

        Ok(rendered.map(serde_json::Value::String))
    }

    /// Configuration change notification
    ///
    /// Replaces the database handle (and the completion engine bound to it)
    /// with one opened from the new settings.
    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let settings = match ConnectionSettings::from_settings(&params.settings) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("ignoring configuration change: {}", e);
                return;
            }
        };

        info!("configuring database connection: driver={}", settings.driver);

        match self.session.configure(&settings).await {
            Ok(()) => {
                self.log_message(
                    &format!("connected to {} data source", settings.driver),
                    MessageType::INFO,
                )
                .await;
            }
            Err(e) => {
                error!("failed to configure database connection: {}", e);
                self.log_message(
                    &format!("failed to configure database connection: {}", e),
                    MessageType::ERROR,
                )
                .await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_backend_starts_unconfigured() {
        let (service, _socket) = tower_lsp::LspService::new(Backend::new);
        let backend = service.inner();

        assert!(!backend.session().is_configured().await);
        assert!(backend.session().documents.is_empty().await);
    }

    #[test]
    fn test_rpc_error_keeps_message() {
        let err = rpc_error(SessionError::ConnectionClosed);
        assert_eq!(err.message, "connection is closed");
    }
}
