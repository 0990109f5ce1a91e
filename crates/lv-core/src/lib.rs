//! Local visualizer.
//!
//! Streams headers, text, tables and plots into a single HTML page while a
//! background server makes the working directory browsable, so results
//! produced on a remote machine can be watched from a browser as they are
//! written.
//!
//! ```no_run
//! use lv_core::{Color, FigureOptions, Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::new().with_port(9112))?;
//! session.h3("Sine test")?;
//! session.capture_figure(&FigureOptions::default(), |fig| {
//!     let xs: Vec<f64> = (0..1000).map(|i| -10.0 + i as f64 * 0.02).collect();
//!     let ys: Vec<f64> = xs.iter().map(|x| x.sin()).collect();
//!     fig.plot_series(&xs, &ys, Color::BLACK, 2.0)
//! })?;
//! session.close()?;
//! session.inform_cleanup()?;
//! # Ok::<(), lv_core::Error>(())
//! ```

pub mod logging;
pub mod session;

pub use lv_common::{Error, ErrorCategory, Result, SessionConfig, DEFAULT_HOST, DEFAULT_PORT};
pub use lv_report::{Color, Figure, FigureOptions, Table, ToHtml};
pub use session::{Session, SessionUrls};
