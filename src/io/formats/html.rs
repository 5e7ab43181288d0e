//! HTML table renderer for legacy Excel `.xls` output.
//!
//! Excel opens an HTML `<table>` served as `application/vnd.ms-excel`. The
//! result is not CSV and cannot be read back as CSV.

use crate::io::traits::DocumentRenderer;
use crate::models::{CellFormatter, HeaderMap, Row};
use crate::Result;

const TABLE_STYLE: &str = concat!(
    "<style>",
    "table, th, td {",
    "    border: 1px solid black;",
    "    border-collapse: collapse;",
    "}",
    "</style>",
);

/// Renders rows as a bordered HTML table.
pub struct HtmlTableRenderer {
    keys: Vec<String>,
    formatter: CellFormatter,
    out: String,
}

impl HtmlTableRenderer {
    /// Creates the renderer and writes the table opening and header row.
    #[must_use]
    pub fn new(headers: &HeaderMap, formatter: CellFormatter) -> Self {
        let mut out = String::from("<table>");
        out.push_str(TABLE_STYLE);
        out.push_str("<tr>");
        for label in headers.labels() {
            push_cell(&mut out, "th", label);
        }
        out.push_str("</tr>");
        Self {
            keys: headers.keys().map(String::from).collect(),
            formatter,
            out,
        }
    }
}

fn push_cell(out: &mut String, tag: &str, text: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    push_escaped(out, text);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

impl DocumentRenderer for HtmlTableRenderer {
    fn write_row(&mut self, row: &Row) -> Result<()> {
        self.out.push_str("<tr>");
        for key in &self.keys {
            let text = self.formatter.format(row.cell(key));
            push_cell(&mut self.out, "td", &text);
        }
        self.out.push_str("</tr>");
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<String> {
        let mut out = self.out;
        out.push_str("</table>");
        Ok(out)
    }
}
