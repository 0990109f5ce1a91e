//! Append-only HTML document writer.
//!
//! Builds a single HTML file that a browser can display while it is still
//! being written. Each operation appends one complete fragment, so the file
//! is always the preamble followed by whole fragments in call order.
//!
//! # Fragments
//!
//! - Headers (`<h1>` to `<h5>`), paragraphs, line breaks, rules
//! - Raw markup and anything implementing [`ToHtml`]
//! - Figures drawn on a [`Figure`] and embedded as base64 PNG data URIs
//!
//! # Example
//!
//! ```no_run
//! use lv_report::{Color, DocumentWriter, FigureOptions, Table};
//!
//! let doc = DocumentWriter::create("lviz_test.html").unwrap();
//! doc.h3("Sine test").unwrap();
//! doc.capture_figure(&FigureOptions::default(), |fig| {
//!     let xs: Vec<f64> = (0..1000).map(|i| -10.0 + i as f64 * 0.02).collect();
//!     let ys: Vec<f64> = xs.iter().map(|x| x.sin()).collect();
//!     fig.plot_series(&xs, &ys, Color::BLACK, 2.0)
//! })
//! .unwrap();
//!
//! let table = Table::from_columns(vec![("A", vec![1.0, 2.0])]).unwrap();
//! doc.write_table(&table).unwrap();
//! doc.close().unwrap();
//! ```

pub mod boilerplate;
pub mod figure;
pub mod table;
pub mod writer;

pub use boilerplate::{HTML_BEGIN_BOILERPLATE, HTML_END_BOILERPLATE};
pub use figure::{Color, Figure, FigureOptions};
pub use lv_common::html_escape;
pub use table::{Table, ToHtml};
pub use writer::{DocumentWriter, FIGURE_DISPLAY_WIDTH, HEADER_LEVELS};
