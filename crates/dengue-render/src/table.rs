//! Markdown table builder for the report body.

use std::fmt::Write;

/// Column alignment, rendered through the delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A pipe table under construction. Cells are taken as-is; callers
/// format numbers before inserting them.
#[derive(Debug, Clone)]
pub struct MarkdownTable {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    pub fn new(columns: &[(&str, Align)]) -> Self {
        Self {
            headers: columns.iter().map(|(name, _)| (*name).to_string()).collect(),
            aligns: columns.iter().map(|(_, align)| *align).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render with padded cells so the source is readable too.
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (cell, width) in row.iter().zip(widths.iter_mut()) {
                *width = (*width).max(cell.chars().count());
            }
        }
        // delimiter cells need room for the alignment colon
        for width in &mut widths {
            *width = (*width).max(3);
        }

        let mut out = String::new();
        self.render_row(&mut out, &self.headers, &widths);
        out.push('|');
        for (align, width) in self.aligns.iter().zip(&widths) {
            match align {
                Align::Left => {
                    let _ = write!(out, " {} |", "-".repeat(*width));
                }
                Align::Right => {
                    let _ = write!(out, " {}: |", "-".repeat(*width - 1));
                }
            }
        }
        out.push('\n');
        for row in &self.rows {
            self.render_row(&mut out, row, &widths);
        }
        out
    }

    fn render_row(&self, out: &mut String, cells: &[String], widths: &[usize]) {
        out.push('|');
        for ((cell, align), width) in cells.iter().zip(&self.aligns).zip(widths) {
            let pad = width.saturating_sub(cell.chars().count());
            match align {
                Align::Left => {
                    let _ = write!(out, " {}{} |", cell, " ".repeat(pad));
                }
                Align::Right => {
                    let _ = write!(out, " {}{} |", " ".repeat(pad), cell);
                }
            }
        }
        out.push('\n');
    }
}
