// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlassist - Language Server
//!
//! This crate provides the session layer of the sqlassist language server:
//! SQL editing assistance (completion, ad hoc query execution) for an
//! editor client over LSP.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Client (VS Code, etc.)          │
//! └──────────────┬──────────────────────────┘
//!                │ LSP Protocol
//!                ↓
//! ┌─────────────────────────────────────────┐
//! │    Backend (tower-lsp) / Dispatcher     │
//! ├─────────────────────────────────────────┤
//! │  • didOpen / didChange / didSave /      │
//! │    didClose                             │
//! │  • completion / codeAction /            │
//! │    executeCommand                       │
//! └──────────────┬──────────────────────────┘
//!                │
//!         ┌──────┴──────┬────────────────┐
//!         ↓             ↓                ↓
//! ┌────────────┐ ┌──────────┐  ┌──────────────┐
//! │  Document  │ │ Database │  │  Completion  │
//! │   Store    │ │  Handle  │  │   Engine     │
//! └────────────┘ └──────────┘  └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`backend`]: tower-lsp server implementation (stdio transport)
//! - [`session`]: session state and typed protocol operations
//! - [`dispatch`]: raw method-name dispatcher with protocol error codes
//! - [`document`]: document management and storage
//! - [`completion`]: schema-aware completion engine
//! - [`command`]: workspace command validation and query execution
//! - [`table`]: text table rendering for query results
//! - [`config`]: connection settings parsing
//!
//! ## Error Handling
//!
//! Every failure is request-scoped: protocol errors (unknown method,
//! missing params) carry JSON-RPC codes, state errors (document not found,
//! no connection) carry descriptive messages, and upstream database or
//! completion failures propagate verbatim. The session stays usable after
//! any single request fails.

pub mod backend;
pub mod command;
pub mod completion;
pub mod config;
pub mod dispatch;
pub mod document;
pub mod session;
pub mod table;

// Re-exports for convenience
pub use backend::Backend;
pub use command::{EXECUTE_QUERY_COMMAND, SessionCommand};
pub use completion::CompletionEngine;
pub use completion::error::CompletionError;
pub use config::{ConfigError, ConnectionSettings};
pub use dispatch::{IncomingMessage, RpcError, dispatch, handle_message};
pub use document::{Document, DocumentError, DocumentStore};
pub use session::{Session, SessionError};
pub use table::TextTable;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name
pub const SERVER_NAME: &str = "sqlassist";
