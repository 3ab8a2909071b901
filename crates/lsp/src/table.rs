// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Text table rendering
//!
//! This module renders query results as aligned, human-readable text
//! tables. The executeQuery command returns the rendered text to the
//! client verbatim.

/// An aligned text table: one header row plus zero or more data rows.
#[derive(Debug, Clone)]
pub struct TextTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    /// Create a table with the given header row.
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Append a data row.
    ///
    /// Rows shorter than the header are padded with empty cells; extra
    /// cells are kept and widen the layout.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Number of data rows accumulated so far.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render the table.
    ///
    /// Columns are padded to their widest cell and joined with ` | `; a
    /// dashed separator sits under the header. Trailing whitespace is
    /// trimmed from every line.
    pub fn render(&self) -> String {
        let column_count = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0);

        let mut widths = vec![0usize; column_count];
        for (index, cell) in self.header.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate() {
                widths[index] = widths[index].max(cell.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(render_line(&self.header, &widths));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        for row in &self.rows {
            lines.push(render_line(row, &widths));
        }

        let mut rendered = lines.join("\n");
        rendered.push('\n');
        rendered
    }
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(index, width)| {
            let cell = cells.get(index).map(String::as_str).unwrap_or("");
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();

    padded.join(" | ").trim_end().to_string()
}
