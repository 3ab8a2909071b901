// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Workspace command execution
//!
//! This module handles `workspace/executeCommand`. The untyped
//! command-name-plus-argument-list payload is validated once, at the
//! boundary, into the [`SessionCommand`] variant; handlers never re-check
//! argument shapes.
//!
//! The only recognized command is `executeQuery`: run the full text of an
//! open document against the configured database and return the result
//! rendered as a text table.

use std::sync::Arc;

use tower_lsp::lsp_types::{ExecuteCommandParams, Url};
use tracing::info;

use sqlassist_database::QueryOutcome;

use crate::document::DocumentError;
use crate::session::{Session, SessionError};
use crate::table::TextTable;

/// Command name advertised through codeAction and executeCommand.
pub const EXECUTE_QUERY_COMMAND: &str = "executeQuery";

/// Rendering of SQL NULL cells.
const NULL_LITERAL: &str = "NULL";

/// A validated workspace command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Execute the text of the document at `uri` against the configured
    /// database connection.
    ExecuteQuery {
        /// URI of the document whose text is executed
        uri: Url,
    },
}

impl SessionCommand {
    /// Validate an executeCommand payload.
    ///
    /// # Errors
    ///
    /// - `SessionError::UnsupportedCommand` for an unrecognized command
    ///   name.
    /// - `SessionError::InvalidCommandArguments` unless exactly one
    ///   argument is supplied and it is a string holding a document URI.
    pub fn parse(params: &ExecuteCommandParams) -> Result<Self, SessionError> {
        match params.command.as_str() {
            EXECUTE_QUERY_COMMAND => {
                let [argument] = params.arguments.as_slice() else {
                    return Err(SessionError::InvalidCommandArguments(
                        params.command.clone(),
                    ));
                };

                let uri = argument
                    .as_str()
                    .and_then(|raw| Url::parse(raw).ok())
                    .ok_or_else(|| {
                        SessionError::InvalidCommandArguments(params.command.clone())
                    })?;

                Ok(Self::ExecuteQuery { uri })
            }
            other => Err(SessionError::UnsupportedCommand(other.to_string())),
        }
    }
}

impl Session {
    /// Execute a validated workspace command.
    ///
    /// Returns the rendered result text, or `None` for commands (and
    /// statements) that produce no output.
    pub async fn execute_command(
        &self,
        command: SessionCommand,
    ) -> Result<Option<String>, SessionError> {
        match command {
            SessionCommand::ExecuteQuery { uri } => self.execute_query(&uri).await,
        }
    }

    /// Run the document at `uri` against the configured connection.
    ///
    /// Preconditions are checked in order: a handle must be configured
    /// (argument shape was already validated at parse time), and the URI
    /// must resolve to an open document. The handle `Arc` is cloned out of
    /// the state guard before execution so the query never runs under the
    /// lock.
    async fn execute_query(&self, uri: &Url) -> Result<Option<String>, SessionError> {
        let database = {
            let guard = self.database.read().await;
            guard
                .as_ref()
                .map(|active| Arc::clone(&active.database))
                .ok_or(SessionError::ConnectionClosed)?
        };

        let text = self
            .documents
            .get(uri)
            .await
            .ok_or_else(|| DocumentError::DocumentNotFound(uri.clone()))?
            .text();

        info!("executing query from {}", uri);

        let mut rows = match database.execute_query(&text).await? {
            QueryOutcome::Empty => return Ok(None),
            QueryOutcome::Rows(rows) => rows,
        };

        // Columns come first; a failure here aborts before any rendering.
        let mut table = TextTable::new(rows.columns()?);

        while let Some(row) = rows.next_row() {
            // A scan failure discards the partial table with it.
            let cells = row?;
            table.push_row(
                cells
                    .into_iter()
                    .map(|cell| cell.unwrap_or_else(|| NULL_LITERAL.to_string()))
                    .collect(),
            );
        }

        info!("query returned {} rows", table.row_count());
        Ok(Some(table.render()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn params(command: &str, arguments: Vec<Value>) -> ExecuteCommandParams {
        ExecuteCommandParams {
            command: command.to_string(),
            arguments,
            work_done_progress_params: Default::default(),
        }
    }

    #[test]
    fn test_parse_execute_query() {
        let parsed = SessionCommand::parse(&params(
            EXECUTE_QUERY_COMMAND,
            vec![json!("file:///query.sql")],
        ))
        .unwrap();

        assert_eq!(
            parsed,
            SessionCommand::ExecuteQuery {
                uri: Url::parse("file:///query.sql").unwrap()
            }
        );
    }

    #[test]
    fn test_parse_rejects_zero_arguments() {
        let err = SessionCommand::parse(&params(EXECUTE_QUERY_COMMAND, vec![])).unwrap_err();
        assert_eq!(err.to_string(), "invalid arguments for executeQuery");
    }

    #[test]
    fn test_parse_rejects_extra_arguments() {
        let err = SessionCommand::parse(&params(
            EXECUTE_QUERY_COMMAND,
            vec![json!("file:///a.sql"), json!("file:///b.sql")],
        ))
        .unwrap_err();
        assert!(matches!(err, SessionError::InvalidCommandArguments(_)));
    }

    #[test]
    fn test_parse_rejects_non_string_argument() {
        let err =
            SessionCommand::parse(&params(EXECUTE_QUERY_COMMAND, vec![json!(42)])).unwrap_err();
        assert!(matches!(err, SessionError::InvalidCommandArguments(_)));
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        let err = SessionCommand::parse(&params("dropEverything", vec![])).unwrap_err();
        assert_eq!(err.to_string(), "unsupported command: dropEverything");
    }
}
