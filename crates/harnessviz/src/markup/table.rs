//! Nested table markup
//!
//! A node body is a column of rows, each row an independent inner table, so
//! that cell widths in one row do not constrain the next while the whole
//! still reads as one block. Cells carry their attributes alongside their
//! content and are rendered in one pass.

use std::fmt::Write;

/// One table cell: attributes for its `<td>` tag and inner markup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub attrs: Vec<(String, String)>,
    pub content: String,
}

impl Cell {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            attrs: Vec::new(),
            content: content.into(),
        }
    }

    /// Cell with no content, only attributes
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_attrs<I>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.attrs.extend(attrs);
        self
    }

    /// No content and no attributes
    pub fn is_blank(&self) -> bool {
        self.content.is_empty() && self.attrs.is_empty()
    }

    /// Attributes rendered as ` name="value"` pairs
    pub fn attr_string(&self) -> String {
        render_attrs(self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::new(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::new(value)
    }
}

/// One row of the outer table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// A single cell spanning the row
    Single(Cell),
    /// An inner single-row table; `None` cells are skipped
    Cells(Vec<Option<Cell>>),
}

impl Row {
    pub fn cells<I, C>(cells: I) -> Self
    where
        I: IntoIterator<Item = Option<C>>,
        C: Into<Cell>,
    {
        Row::Cells(cells.into_iter().map(|c| c.map(Into::into)).collect())
    }

    /// A row with nothing to show is left out entirely
    fn is_omitted(&self) -> bool {
        match self {
            Row::Single(_) => false,
            Row::Cells(cells) => cells.iter().all(|c| c.as_ref().map_or(true, Cell::is_blank)),
        }
    }
}

impl From<Cell> for Row {
    fn from(value: Cell) -> Self {
        Row::Single(value)
    }
}

pub(crate) fn render_attrs<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut out = String::new();
    for (name, value) in attrs {
        let _ = write!(out, " {}=\"{}\"", name, value);
    }
    out
}

/// Render rows into a table of tables
///
/// `None` rows and rows of only blank cells are skipped. If nothing is left,
/// a single empty cell is emitted so the table is never empty.
pub fn nested_table(rows: &[Option<Row>], table_attrs: &[(&str, &str)]) -> String {
    let mut lines = vec![format!(
        "<table border=\"0\" cellspacing=\"0\" cellpadding=\"0\"{}>",
        render_attrs(table_attrs.iter().copied())
    )];

    let mut rendered = 0;
    for row in rows.iter().flatten() {
        if row.is_omitted() {
            continue;
        }
        match row {
            Row::Single(cell) => {
                lines.push(format!(" <tr><td{}>", cell.attr_string()));
                lines.push(format!("  {}", cell.content));
                lines.push(" </td></tr>".to_string());
            }
            Row::Cells(cells) => {
                lines.push(" <tr><td>".to_string());
                lines.push(
                    "  <table border=\"0\" cellspacing=\"0\" cellpadding=\"3\" cellborder=\"1\"><tr>"
                        .to_string(),
                );
                for cell in cells.iter().flatten() {
                    lines.push(format!(
                        "   <td balign=\"left\"{}>{}</td>",
                        cell.attr_string(),
                        cell.content
                    ));
                }
                lines.push("  </tr></table>".to_string());
                lines.push(" </td></tr>".to_string());
            }
        }
        rendered += 1;
    }

    if rendered == 0 {
        lines.push("<tr><td></td></tr>".to_string());
    }
    lines.push("</table>".to_string());
    lines.join("\n")
}
