//! Append-only HTML document writer.

use crate::boilerplate::{HTML_BEGIN_BOILERPLATE, HTML_END_BOILERPLATE};
use crate::figure::{Figure, FigureOptions};
use crate::table::ToHtml;
use lv_common::{Error, Result};

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Valid HTML header levels.
pub const HEADER_LEVELS: RangeInclusive<u8> = 1..=5;

/// Display width of embedded figures, in pixels.
pub const FIGURE_DISPLAY_WIDTH: u32 = 500;

/// Writes HTML fragments to a single file.
///
/// The writer holds only the path. Every append opens the file, writes one
/// newline-terminated fragment, flushes and closes it before returning, so a
/// browser reading the file mid-run always sees whole fragments.
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    path: PathBuf,
}

impl DocumentWriter {
    /// Create (or truncate) `path` and write the preamble.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut file = File::create(&path)?;
        file.write_all(HTML_BEGIN_BOILERPLATE.as_bytes())?;
        file.flush()?;
        debug!(path = %path.display(), "document created");
        Ok(Self { path })
    }

    /// Output file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `text` unmodified.
    pub fn write_raw(&self, text: &str) -> Result<()> {
        let mut fragment = String::with_capacity(text.len() + 1);
        fragment.push_str(text);
        fragment.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(fragment.as_bytes())?;
        file.flush()?;
        trace!(bytes = fragment.len(), "fragment appended");
        Ok(())
    }

    /// Append a header of `level` (1 to 5). The text is not escaped.
    pub fn header(&self, text: &str, level: u8) -> Result<()> {
        if !HEADER_LEVELS.contains(&level) {
            return Err(Error::InvalidHeaderLevel { level });
        }
        self.write_raw(&format!("<h{level}>{text}</h{level}>"))
    }

    pub fn h1(&self, text: &str) -> Result<()> {
        self.header(text, 1)
    }

    pub fn h2(&self, text: &str) -> Result<()> {
        self.header(text, 2)
    }

    pub fn h3(&self, text: &str) -> Result<()> {
        self.header(text, 3)
    }

    pub fn h4(&self, text: &str) -> Result<()> {
        self.header(text, 4)
    }

    pub fn h5(&self, text: &str) -> Result<()> {
        self.header(text, 5)
    }

    /// Append a paragraph.
    pub fn paragraph(&self, text: &str) -> Result<()> {
        self.write_raw(&format!("<p>{text}</p>"))
    }

    /// Append a line break.
    pub fn line_break(&self) -> Result<()> {
        self.write_raw("<br/>")
    }

    /// Append a horizontal rule padded by line breaks.
    pub fn rule(&self) -> Result<()> {
        self.write_raw("<br/><hr/><br/>")
    }

    /// Append the table's own HTML rendering.
    pub fn write_table<T: ToHtml + ?Sized>(&self, table: &T) -> Result<()> {
        self.write_raw(&table.to_html())
    }

    /// Append `figure` as an inline PNG image followed by a line break.
    pub fn write_figure(&self, figure: &Figure) -> Result<()> {
        let uri = figure.to_data_uri()?;
        self.write_raw(&format!(
            r#"<img src="{uri}" width="{FIGURE_DISPLAY_WIDTH}"><br/>"#
        ))
    }

    /// Draw a figure and embed it.
    ///
    /// A fresh [`Figure`] is built from `options` and handed to `draw`. When
    /// `draw` returns `Ok`, the figure is rendered to PNG and appended as one
    /// `<img>` fragment. When it returns `Err`, nothing is written and the
    /// error is passed through; the surface is dropped either way.
    pub fn capture_figure<R, E, F>(&self, options: &FigureOptions, draw: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut Figure) -> std::result::Result<R, E>,
        E: From<Error>,
    {
        let mut figure = Figure::new(options)?;
        let value = draw(&mut figure)?;
        self.write_figure(&figure)?;
        Ok(value)
    }

    /// Append the closing tags.
    ///
    /// Not idempotent: each call appends the closing fragment again.
    pub fn close(&self) -> Result<()> {
        self.write_raw(HTML_END_BOILERPLATE)
    }
}
