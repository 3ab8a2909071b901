// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Document lifecycle integration tests
//!
//! Drives the session's synchronization handlers the way a client would:
//! open, change, save, close, and the document-dependent request paths.

use tower_lsp::lsp_types::{Position, Url};

use sqlassist_lsp::document::DocumentError;
use sqlassist_lsp::session::{Session, SessionError};

fn test_uri() -> Url {
    Url::parse("file:///queries/report.sql").unwrap()
}

#[tokio::test]
async fn test_change_replaces_text_wholesale() {
    let session = Session::new();
    let uri = test_uri();

    session
        .open_document(uri.clone(), "sql".to_string(), String::new())
        .await;
    session.change_document(&uri, "SELECT 1").await.unwrap();
    session.change_document(&uri, "SELECT 2").await.unwrap();

    let doc = session.documents().get(&uri).await.unwrap();
    assert_eq!(doc.text(), "SELECT 2");
}

#[tokio::test]
async fn test_open_seeds_notification_text() {
    let session = Session::new();
    let uri = test_uri();

    session
        .open_document(uri.clone(), "sql".to_string(), "SELECT now()".to_string())
        .await;

    let doc = session.documents().get(&uri).await.unwrap();
    assert_eq!(doc.text(), "SELECT now()");
    assert_eq!(doc.language_id(), "sql");
}

#[tokio::test]
async fn test_reopen_recreates_document() {
    let session = Session::new();
    let uri = test_uri();

    session
        .open_document(uri.clone(), "sql".to_string(), "old text".to_string())
        .await;
    session
        .open_document(uri.clone(), "mysql".to_string(), "new text".to_string())
        .await;

    let doc = session.documents().get(&uri).await.unwrap();
    assert_eq!(doc.text(), "new text");
    assert_eq!(doc.language_id(), "mysql");
    assert_eq!(session.documents().len().await, 1);
}

#[tokio::test]
async fn test_change_unopened_document_fails() {
    let session = Session::new();
    let uri = test_uri();

    let result = session.change_document(&uri, "SELECT 1").await;
    assert!(matches!(
        result,
        Err(SessionError::Document(DocumentError::DocumentNotFound(u))) if u == uri
    ));
}

#[tokio::test]
async fn test_save_with_text_behaves_as_update() {
    let session = Session::new();
    let uri = test_uri();

    session
        .open_document(uri.clone(), "sql".to_string(), "draft".to_string())
        .await;
    session
        .save_document(&uri, Some("saved text"))
        .await
        .unwrap();

    assert_eq!(
        session.documents().get(&uri).await.unwrap().text(),
        "saved text"
    );
}

#[tokio::test]
async fn test_save_without_text_is_noop() {
    let session = Session::new();
    let uri = test_uri();

    session
        .open_document(uri.clone(), "sql".to_string(), "draft".to_string())
        .await;
    session.save_document(&uri, None).await.unwrap();

    assert_eq!(session.documents().get(&uri).await.unwrap().text(), "draft");
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let session = Session::new();
    let uri = test_uri();

    session
        .open_document(uri.clone(), "sql".to_string(), String::new())
        .await;

    session.close_document(&uri).await;
    session.close_document(&uri).await;
    assert!(!session.documents().contains(&uri).await);

    // Closing a URI that was never opened is also fine.
    let other = Url::parse("file:///never-opened.sql").unwrap();
    session.close_document(&other).await;
}

#[tokio::test]
async fn test_completion_checks_document_before_engine() {
    // No database is configured, so if the engine were consulted first the
    // error would be "connection is closed". The document check wins.
    let session = Session::new();
    let uri = test_uri();

    let result = session.completion(&uri, Position::new(0, 0)).await;
    assert!(matches!(
        result,
        Err(SessionError::Document(DocumentError::DocumentNotFound(_)))
    ));
}

#[tokio::test]
async fn test_completion_without_connection_fails_closed() {
    let session = Session::new();
    let uri = test_uri();

    session
        .open_document(uri.clone(), "sql".to_string(), "SELECT ".to_string())
        .await;

    let result = session.completion(&uri, Position::new(0, 7)).await;
    assert!(matches!(result, Err(SessionError::ConnectionClosed)));
}
