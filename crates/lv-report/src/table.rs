//! Tabular data rendered as HTML.
//!
//! The writer only needs [`ToHtml`]. [`Table`] is a small row-oriented
//! implementation producing `dataframe`-class markup so the document's
//! stylesheet applies.

use lv_common::{html_escape, Error, Result};
use std::fmt::Display;

/// Anything that can render itself as HTML markup.
pub trait ToHtml {
    fn to_html(&self) -> String;
}

impl ToHtml for str {
    fn to_html(&self) -> String {
        self.to_string()
    }
}

impl ToHtml for String {
    fn to_html(&self) -> String {
        self.clone()
    }
}

/// Column-labelled rows of display values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    index: Vec<String>,
    rows: Vec<Vec<String>>,
    show_index: bool,
}

impl Table {
    /// Create an empty table with the given column labels.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            index: Vec::new(),
            rows: Vec::new(),
            show_index: true,
        }
    }

    /// Show or hide the leading index column.
    pub fn with_index(mut self, show: bool) -> Self {
        self.show_index = show;
        self
    }

    /// Append a row labelled with its position.
    pub fn push_row<I, T>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let label = self.rows.len().to_string();
        self.push_labeled_row(label, row)
    }

    /// Append a row with an explicit index label.
    pub fn push_labeled_row<I, T>(&mut self, label: impl Into<String>, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let cells: Vec<String> = row.into_iter().map(|cell| cell.to_string()).collect();
        if cells.len() != self.columns.len() {
            return Err(Error::TableShape {
                expected: self.columns.len(),
                actual: cells.len(),
            });
        }
        self.index.push(label.into());
        self.rows.push(cells);
        Ok(())
    }

    /// Build a table from named numeric columns of equal length.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self> {
        let (names, values): (Vec<String>, Vec<Vec<f64>>) =
            columns.into_iter().map(|(n, v)| (n.into(), v)).unzip();
        let len = values.first().map_or(0, Vec::len);
        if let Some(bad) = values.iter().find(|v| v.len() != len) {
            return Err(Error::TableShape {
                expected: len,
                actual: bad.len(),
            });
        }

        let mut table = Table::new(names);
        for i in 0..len {
            table.push_row(values.iter().map(|col| col[i]))?;
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ToHtml for Table {
    fn to_html(&self) -> String {
        let mut html = String::from("<table border=\"1\" class=\"dataframe\">\n");

        html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n");
        if self.show_index {
            html.push_str("      <th></th>\n");
        }
        for column in &self.columns {
            html.push_str(&format!("      <th>{}</th>\n", html_escape(column)));
        }
        html.push_str("    </tr>\n  </thead>\n");

        html.push_str("  <tbody>\n");
        for (label, row) in self.index.iter().zip(&self.rows) {
            html.push_str("    <tr>\n");
            if self.show_index {
                html.push_str(&format!("      <th>{}</th>\n", html_escape(label)));
            }
            for cell in row {
                html.push_str(&format!("      <td>{}</td>\n", html_escape(cell)));
            }
            html.push_str("    </tr>\n");
        }
        html.push_str("  </tbody>\n</table>");
        html
    }
}
