//! Table layout for text output, built on `comfy_table`.

use comfy_table::{ContentArrangement, TableComponent};

/// `+`, `|` and `-` borders, a rule under the header and no rules between
/// rows.
const BOXED: &str = "||--+-++|    ++++++";

/// A dashed rule under the header and nothing else.
const COMPACT: &str = "     -             ";

/// Border characters of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// `+`, `|` and `-` borders around every cell.
    Boxed,
    /// Header rule only.
    Compact,
}

impl TableStyle {
    fn preset(self) -> &'static str {
        match self {
            Self::Boxed => BOXED,
            Self::Compact => COMPACT,
        }
    }
}

/// A table of string cells.
///
/// Cells containing newlines span several physical lines.
#[derive(Debug, Clone)]
pub struct Table {
    style: TableStyle,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table.
    #[must_use]
    pub fn new(style: TableStyle) -> Self {
        Self {
            style,
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Set header cells.
    #[must_use]
    pub fn headers(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|&h| h.to_owned()).collect();
        self
    }

    /// Set body rows.
    #[must_use]
    pub fn rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows = rows;
        self
    }

    /// Append one body row.
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Render the table. Every line, including the last, ends with `\n`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut table = comfy_table::Table::new();
        table
            .load_preset(self.style.preset())
            .set_content_arrangement(ContentArrangement::Disabled);

        if !self.headers.is_empty() {
            table.set_header(self.headers.clone());
        }
        if self.rows.is_empty() {
            // A header alone is closed by the bottom border.
            table.remove_style(TableComponent::HeaderLines);
        }
        for row in &self.rows {
            table.add_row(row.clone());
        }

        let mut rendered = table.to_string();
        rendered.push('\n');
        rendered
    }
}
