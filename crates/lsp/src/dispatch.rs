// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Protocol dispatcher
//!
//! This module maps raw `(method, params)` pairs onto typed session
//! operations. Supported methods form a tagged variant
//! ([`IncomingMessage`]), so an unregistered method or a mismatched
//! parameter shape is rejected while parsing, before any handler runs.
//!
//! ## Error contract
//!
//! - A method that requires parameters but received none fails with
//!   `invalid params` (JSON-RPC code -32602).
//! - Parameters that do not deserialize into the method's expected shape
//!   fail with the deserialization message (code -32602).
//! - An unregistered method name fails with code -32601 and carries the
//!   offending name in the message.
//!
//! The dispatcher is stateless; all mutable state lives in the
//! [`Session`](crate::session::Session) it is given. The stdio transport
//! (tower-lsp) routes the standard methods through its own typed trait;
//! this module is the raw-payload boundary used by embedded transports and
//! the protocol tests.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_lsp::lsp_types::{
    CodeActionParams, CompletionParams, DidChangeConfigurationParams, DidChangeTextDocumentParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, DidSaveTextDocumentParams,
    ExecuteCommandParams, InitializeParams,
};
use tracing::debug;

use crate::command::SessionCommand;
use crate::config::ConnectionSettings;
use crate::session::{Session, SessionError};

/// JSON-RPC error code for an unregistered method.
pub const CODE_METHOD_NOT_FOUND: i32 = -32601;

/// JSON-RPC error code for missing or malformed parameters.
pub const CODE_INVALID_PARAMS: i32 = -32602;

/// JSON-RPC error code for request-scoped handler failures.
pub const CODE_INTERNAL_ERROR: i32 = -32603;

/// A protocol-level error: JSON-RPC code plus message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RpcError {
    /// JSON-RPC error code
    pub code: i32,

    /// Human-readable message returned to the client
    pub message: String,
}

impl RpcError {
    /// An unregistered method; the message names it.
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: CODE_METHOD_NOT_FOUND,
            message: format!("method not supported: {}", method),
        }
    }

    /// A method requiring parameters received none.
    pub fn invalid_params(method: &str) -> Self {
        Self {
            code: CODE_INVALID_PARAMS,
            message: format!("invalid params for {}", method),
        }
    }

    /// Parameters that failed to deserialize into the expected shape.
    pub fn malformed_params(method: &str, error: &serde_json::Error) -> Self {
        Self {
            code: CODE_INVALID_PARAMS,
            message: format!("malformed params for {}: {}", method, error),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            code: CODE_INTERNAL_ERROR,
            message: message.into(),
        }
    }
}

impl From<SessionError> for RpcError {
    fn from(error: SessionError) -> Self {
        Self::internal(error.to_string())
    }
}

/// Typed view of one inbound protocol message.
#[derive(Debug)]
pub enum IncomingMessage {
    Initialize(Box<InitializeParams>),
    Initialized,
    Shutdown,
    DidOpen(DidOpenTextDocumentParams),
    DidChange(DidChangeTextDocumentParams),
    DidSave(DidSaveTextDocumentParams),
    DidClose(DidCloseTextDocumentParams),
    Completion(Box<CompletionParams>),
    CodeAction(Box<CodeActionParams>),
    ExecuteCommand(ExecuteCommandParams),
    DidChangeConfiguration(DidChangeConfigurationParams),
}

impl IncomingMessage {
    /// Parse a raw method/params pair into the matching variant.
    pub fn parse(method: &str, params: Option<Value>) -> Result<Self, RpcError> {
        match method {
            "initialize" => Ok(Self::Initialize(Box::new(required(method, params)?))),
            "initialized" => Ok(Self::Initialized),
            "shutdown" => Ok(Self::Shutdown),
            "textDocument/didOpen" => Ok(Self::DidOpen(required(method, params)?)),
            "textDocument/didChange" => Ok(Self::DidChange(required(method, params)?)),
            "textDocument/didSave" => Ok(Self::DidSave(required(method, params)?)),
            "textDocument/didClose" => Ok(Self::DidClose(required(method, params)?)),
            "textDocument/completion" => Ok(Self::Completion(Box::new(required(method, params)?))),
            "textDocument/codeAction" => Ok(Self::CodeAction(Box::new(required(method, params)?))),
            "workspace/executeCommand" => Ok(Self::ExecuteCommand(required(method, params)?)),
            "workspace/didChangeConfiguration" => {
                Ok(Self::DidChangeConfiguration(required(method, params)?))
            }
            other => Err(RpcError::method_not_found(other)),
        }
    }
}

fn required<T: DeserializeOwned>(method: &str, params: Option<Value>) -> Result<T, RpcError> {
    let params = params.ok_or_else(|| RpcError::invalid_params(method))?;
    serde_json::from_value(params).map_err(|e| RpcError::malformed_params(method, &e))
}

/// Parse and execute one message against the session.
pub async fn handle_message(
    session: &Session,
    method: &str,
    params: Option<Value>,
) -> Result<Option<Value>, RpcError> {
    debug!("dispatching {}", method);
    let message = IncomingMessage::parse(method, params)?;
    dispatch(session, message).await
}

/// Execute a parsed message against the session.
///
/// Requests produce `Some(result)`; notifications produce `None`. Errors
/// are request-scoped; the session stays usable.
pub async fn dispatch(
    session: &Session,
    message: IncomingMessage,
) -> Result<Option<Value>, RpcError> {
    match message {
        IncomingMessage::Initialize(_params) => {
            let result = session.initialize_result();
            Ok(Some(to_value(&result)?))
        }
        IncomingMessage::Initialized => Ok(None),
        IncomingMessage::Shutdown => {
            session.shutdown().await;
            Ok(None)
        }
        IncomingMessage::DidOpen(params) => {
            let doc = params.text_document;
            session
                .open_document(doc.uri, doc.language_id, doc.text)
                .await;
            Ok(None)
        }
        IncomingMessage::DidChange(params) => {
            let uri = params.text_document.uri;
            // Full sync: the first change carries the complete new text.
            let Some(change) = params.content_changes.into_iter().next() else {
                return Ok(None);
            };
            session.change_document(&uri, &change.text).await?;
            Ok(None)
        }
        IncomingMessage::DidSave(params) => {
            session
                .save_document(&params.text_document.uri, params.text.as_deref())
                .await?;
            Ok(None)
        }
        IncomingMessage::DidClose(params) => {
            session.close_document(&params.text_document.uri).await;
            Ok(None)
        }
        IncomingMessage::Completion(params) => {
            let position_params = params.text_document_position;
            let items = session
                .completion(&position_params.text_document.uri, position_params.position)
                .await?;
            Ok(Some(to_value(&items)?))
        }
        IncomingMessage::CodeAction(params) => {
            let actions = session.code_actions(&params.text_document.uri);
            Ok(Some(to_value(&actions)?))
        }
        IncomingMessage::ExecuteCommand(params) => {
            let command = SessionCommand::parse(&params)?;
            let rendered = session.execute_command(command).await?;
            Ok(Some(rendered.map(Value::String).unwrap_or(Value::Null)))
        }
        IncomingMessage::DidChangeConfiguration(params) => {
            let settings = ConnectionSettings::from_settings(&params.settings)
                .map_err(SessionError::from)?;
            session.configure(&settings).await?;
            Ok(None)
        }
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_unknown_method_names_offender() {
        let err = IncomingMessage::parse("foo/bar", None).unwrap_err();
        assert_eq!(err.code, CODE_METHOD_NOT_FOUND);
        assert!(err.message.contains("foo/bar"));
    }

    #[test]
    fn test_parse_missing_params() {
        let err = IncomingMessage::parse("textDocument/didOpen", None).unwrap_err();
        assert_eq!(err.code, CODE_INVALID_PARAMS);
    }

    #[test]
    fn test_parse_malformed_params() {
        let err =
            IncomingMessage::parse("textDocument/didOpen", Some(json!({"nope": 1}))).unwrap_err();
        assert_eq!(err.code, CODE_INVALID_PARAMS);
        assert!(err.message.contains("textDocument/didOpen"));
    }

    #[test]
    fn test_parse_shutdown_without_params() {
        assert!(matches!(
            IncomingMessage::parse("shutdown", None),
            Ok(IncomingMessage::Shutdown)
        ));
    }

    #[test]
    fn test_parse_did_open() {
        let params = json!({
            "textDocument": {
                "uri": "file:///test.sql",
                "languageId": "sql",
                "version": 1,
                "text": "SELECT 1"
            }
        });

        let message = IncomingMessage::parse("textDocument/didOpen", Some(params)).unwrap();
        match message {
            IncomingMessage::DidOpen(params) => {
                assert_eq!(params.text_document.language_id, "sql");
                assert_eq!(params.text_document.text, "SELECT 1");
            }
            other => panic!("expected DidOpen, got {:?}", other),
        }
    }
}
