// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Query result model
//!
//! A query produces either no row-set at all (DDL, DML) or a row-set whose
//! column shape is only known per query. The two cases are modeled
//! explicitly so callers cannot mistake an unexpected result shape for
//! "no rows".
//!
//! Rows are consumed through [`RowStream`]: column names are fetched once,
//! up front, and each row is scanned on demand. A row's scan may fail
//! independently of the others; consumers are expected to abort on the
//! first failure.

use crate::error::DatabaseResult;

/// The outcome of executing a statement.
pub enum QueryOutcome {
    /// The statement produced no row-set.
    Empty,

    /// The statement produced a row-set.
    Rows(Box<dyn RowStream>),
}

impl QueryOutcome {
    /// Wrap a row stream into a `Rows` outcome.
    pub fn rows(stream: impl RowStream + 'static) -> Self {
        Self::Rows(Box::new(stream))
    }
}

impl std::fmt::Debug for QueryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("QueryOutcome::Empty"),
            Self::Rows(_) => f.write_str("QueryOutcome::Rows(..)"),
        }
    }
}

/// A lazily consumed sequence of rows.
///
/// `None` cells are SQL NULL; non-null cells carry the value's raw textual
/// form.
pub trait RowStream: Send {
    /// Column names of the row-set.
    fn columns(&self) -> DatabaseResult<Vec<String>>;

    /// Scan the next row. Returns `None` once the row-set is exhausted.
    fn next_row(&mut self) -> Option<DatabaseResult<Vec<Option<String>>>>;
}

/// A row stream backed by an in-memory buffer.
///
/// Used by the static database and by drivers that fetch the full result
/// before handing it over; scanning still happens row by row so per-row
/// failures surface at consumption time.
pub struct BufferedRows {
    columns: Vec<String>,
    rows: std::vec::IntoIter<DatabaseResult<Vec<Option<String>>>>,
}

impl BufferedRows {
    /// Create a buffer from already scanned rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self {
            columns,
            rows: rows.into_iter().map(Ok).collect::<Vec<_>>().into_iter(),
        }
    }

    /// Create a buffer in which individual rows may carry a scan failure.
    pub fn with_results(
        columns: Vec<String>,
        rows: Vec<DatabaseResult<Vec<Option<String>>>>,
    ) -> Self {
        Self {
            columns,
            rows: rows.into_iter(),
        }
    }
}

impl RowStream for BufferedRows {
    fn columns(&self) -> DatabaseResult<Vec<String>> {
        Ok(self.columns.clone())
    }

    fn next_row(&mut self) -> Option<DatabaseResult<Vec<Option<String>>>> {
        self.rows.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatabaseError;

    #[test]
    fn test_buffered_rows_yields_in_order() {
        let mut rows = BufferedRows::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec![Some("1".to_string()), Some("a".to_string())],
                vec![Some("2".to_string()), None],
            ],
        );

        assert_eq!(rows.columns().unwrap(), vec!["id", "name"]);

        let first = rows.next_row().unwrap().unwrap();
        assert_eq!(first, vec![Some("1".to_string()), Some("a".to_string())]);

        let second = rows.next_row().unwrap().unwrap();
        assert_eq!(second[1], None);

        assert!(rows.next_row().is_none());
    }

    #[test]
    fn test_buffered_rows_carries_scan_failure() {
        let mut rows = BufferedRows::with_results(
            vec!["id".to_string()],
            vec![
                Ok(vec![Some("1".to_string())]),
                Err(DatabaseError::ScanFailed("corrupt".to_string())),
            ],
        );

        assert!(rows.next_row().unwrap().is_ok());
        assert!(matches!(
            rows.next_row().unwrap(),
            Err(DatabaseError::ScanFailed(_))
        ));
    }

    #[test]
    fn test_outcome_debug() {
        let outcome = QueryOutcome::rows(BufferedRows::new(vec![], vec![]));
        assert_eq!(format!("{:?}", outcome), "QueryOutcome::Rows(..)");
        assert_eq!(format!("{:?}", QueryOutcome::Empty), "QueryOutcome::Empty");
    }
}
