//! Visualizer session.
//!
//! A [`Session`] ties together the background static server and the
//! document writer. Content operations are only valid once the session has
//! been started; calling one earlier fails with [`Error::NotStarted`] and
//! touches nothing on disk.

use crate::logging::LogContext;
use lv_common::{hostname, Error, Result, SessionConfig};
use lv_report::{DocumentWriter, Figure, FigureOptions, ToHtml};
use lv_serve::{ServerHandle, StaticServer};
use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The two URL forms under which the output file can be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUrls {
    /// `http://<machine hostname>:<port>/<file>`, for remote viewing.
    pub hostname_url: String,
    /// `http://localhost:<port>/<file>`.
    pub localhost_url: String,
}

/// A live HTML page that plots, tables and text are appended to.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    output_path: Option<PathBuf>,
    writer: Option<DocumentWriter>,
    server: Option<ServerHandle>,
    log: LogContext,
    closed: bool,
    warned_after_close: bool,
}

impl Session {
    /// Create a session, starting it immediately unless `config.lazy`.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let mut session = Self {
            config,
            output_path: None,
            writer: None,
            server: None,
            log: LogContext::new(),
            closed: false,
            warned_after_close: false,
        };
        if !session.config.lazy {
            session.start()?;
        }
        Ok(session)
    }

    /// Create and start a session with the default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(SessionConfig::default())
    }

    /// Start the server (if configured) and create the output file.
    ///
    /// Calling this on a started session does nothing.
    pub fn start(&mut self) -> Result<()> {
        if self.writer.is_some() {
            debug!(session_id = %self.log.session_id, "session already started");
            return Ok(());
        }

        if self.config.run_server && self.server.is_none() {
            let handle = StaticServer::start(&self.config.host, self.config.port)?;
            self.server = Some(handle);
        }

        let path = match &self.config.output_path {
            Some(path) => path.clone(),
            None => generate_output_path()?,
        };
        let writer = DocumentWriter::create(&path)?;

        self.output_path = Some(path);
        self.writer = Some(writer);
        self.closed = false;
        self.warned_after_close = false;

        if let Some(urls) = self.urls() {
            info!(
                session_id = %self.log.session_id,
                "Click: {} or {}",
                urls.hostname_url,
                urls.localhost_url
            );
        }
        Ok(())
    }

    /// Writer for a content operation, or `NotStarted`.
    fn writer(&mut self, operation: &'static str) -> Result<&DocumentWriter> {
        if self.writer.is_none() {
            return Err(Error::NotStarted { operation });
        }
        if self.closed && !self.warned_after_close {
            self.warned_after_close = true;
            warn!(
                session_id = %self.log.session_id,
                operation,
                "appending after close; content will follow the closing tags"
            );
        }
        self.writer.as_ref().ok_or(Error::NotStarted { operation })
    }

    pub fn header(&mut self, text: &str, level: u8) -> Result<()> {
        self.writer("header")?.header(text, level)
    }

    pub fn h1(&mut self, text: &str) -> Result<()> {
        self.writer("h1")?.h1(text)
    }

    pub fn h2(&mut self, text: &str) -> Result<()> {
        self.writer("h2")?.h2(text)
    }

    pub fn h3(&mut self, text: &str) -> Result<()> {
        self.writer("h3")?.h3(text)
    }

    pub fn h4(&mut self, text: &str) -> Result<()> {
        self.writer("h4")?.h4(text)
    }

    pub fn h5(&mut self, text: &str) -> Result<()> {
        self.writer("h5")?.h5(text)
    }

    /// Append `<p>{text}</p>`.
    pub fn paragraph(&mut self, text: &str) -> Result<()> {
        self.writer("paragraph")?.paragraph(text)
    }

    pub fn line_break(&mut self) -> Result<()> {
        self.writer("line_break")?.line_break()
    }

    /// Append a visual separator.
    pub fn rule(&mut self) -> Result<()> {
        self.writer("rule")?.rule()
    }

    /// Append markup unmodified.
    pub fn write_raw(&mut self, text: &str) -> Result<()> {
        self.writer("write_raw")?.write_raw(text)
    }

    /// Append a table's own HTML rendering.
    pub fn write_table<T: ToHtml + ?Sized>(&mut self, table: &T) -> Result<()> {
        self.writer("write_table")?.write_table(table)
    }

    /// Draw a figure and embed it as a PNG image.
    ///
    /// Nothing is embedded if `draw` fails; its error is returned as is.
    pub fn capture_figure<R, E, F>(&mut self, options: &FigureOptions, draw: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut Figure) -> std::result::Result<R, E>,
        E: From<Error>,
    {
        self.writer("capture_figure")?.capture_figure(options, draw)
    }

    /// Write the closing tags. A second call only logs a warning.
    pub fn close(&mut self) -> Result<()> {
        let writer = self
            .writer
            .as_ref()
            .ok_or(Error::NotStarted { operation: "close" })?;
        if self.closed {
            warn!(session_id = %self.log.session_id, "session already closed");
            return Ok(());
        }
        writer.close()?;
        self.closed = true;
        debug!(session_id = %self.log.session_id, path = %writer.path().display(), "document closed");
        Ok(())
    }

    /// Log a reminder to delete the output file.
    pub fn inform_cleanup(&self) -> Result<()> {
        let path = self
            .output_path
            .as_deref()
            .filter(|_| self.writer.is_some())
            .ok_or(Error::NotStarted {
                operation: "inform_cleanup",
            })?;
        info!(
            session_id = %self.log.session_id,
            "After viewing the plots, please delete the file: `{}`",
            path.display()
        );
        Ok(())
    }

    /// Delete the output file, ignoring failures.
    ///
    /// The session is left unstarted; `start` creates a fresh file.
    pub fn delete_output(&mut self) -> Result<()> {
        if self.writer.is_none() {
            return Err(Error::NotStarted {
                operation: "delete_output",
            });
        }
        if let Some(path) = self.output_path.take() {
            match fs::remove_file(&path) {
                Ok(()) => debug!(session_id = %self.log.session_id, path = %path.display(), "output deleted"),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    debug!(session_id = %self.log.session_id, path = %path.display(), "output already gone");
                }
                Err(err) => {
                    debug!(
                        session_id = %self.log.session_id,
                        path = %path.display(),
                        error = %err,
                        "failed to delete output"
                    );
                }
            }
        }
        self.writer = None;
        self.closed = false;
        self.warned_after_close = false;
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.writer.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Session id attached to every log event.
    pub fn session_id(&self) -> &str {
        &self.log.session_id
    }

    /// Address the background server is bound to, if running.
    pub fn server_addr(&self) -> Option<SocketAddr> {
        self.server.as_ref().map(ServerHandle::addr)
    }

    /// Click URLs for the output file, once started.
    pub fn urls(&self) -> Option<SessionUrls> {
        if self.writer.is_none() {
            return None;
        }
        let name = self.output_path.as_deref()?.file_name()?.to_string_lossy();
        let port = self
            .server_addr()
            .map_or(self.config.port, |addr| addr.port());
        Some(SessionUrls {
            hostname_url: format!("http://{}:{}/{}", hostname(), port, name),
            localhost_url: format!("http://localhost:{}/{}", port, name),
        })
    }
}

/// Create a uniquely named `.html` file in the working directory and keep it.
fn generate_output_path() -> Result<PathBuf> {
    let dir = std::env::current_dir()?;
    let file = tempfile::Builder::new()
        .prefix("lviz_")
        .suffix(".html")
        .tempfile_in(dir)?;
    let (_, path) = file.keep().map_err(|err| err.error)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lv_report::HTML_BEGIN_BOILERPLATE;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with a subscriber writing plain-text events into a buffer.
    fn capture_logs<T>(f: impl FnOnce() -> T) -> (String, T) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_writer(move || writer.clone())
                .with_ansi(false),
        );
        let value = tracing::subscriber::with_default(subscriber, f);
        let text = String::from_utf8_lossy(&logs.0.lock().unwrap()).into_owned();
        (text, value)
    }

    fn offline(dir: &TempDir) -> SessionConfig {
        SessionConfig::new()
            .with_run_server(false)
            .with_output_path(dir.path().join("out.html"))
    }

    #[test]
    fn test_eager_start() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(offline(&dir)).unwrap();
        assert!(session.is_started());
        assert!(!session.is_closed());
        assert_eq!(session.server_addr(), None);
        assert_eq!(
            fs::read_to_string(dir.path().join("out.html")).unwrap(),
            HTML_BEGIN_BOILERPLATE
        );
    }

    #[test]
    fn test_lazy_session_rejects_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(offline(&dir).with_lazy(true)).unwrap();
        assert!(!session.is_started());
        assert!(session.urls().is_none());

        let err = session.paragraph("hello").unwrap_err();
        assert!(matches!(err, Error::NotStarted { operation: "paragraph" }));
        assert!(session.close().unwrap_err().is_not_started());
        assert!(session.inform_cleanup().unwrap_err().is_not_started());
        assert!(session.delete_output().unwrap_err().is_not_started());
        assert!(!dir.path().join("out.html").exists());
    }

    #[test]
    fn test_start_twice_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(offline(&dir)).unwrap();
        session.paragraph("kept").unwrap();
        session.start().unwrap();
        let contents = fs::read_to_string(session.output_path().unwrap()).unwrap();
        assert!(contents.ends_with("<p>kept</p>\n"));
    }

    #[test]
    fn test_close_is_guarded() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(offline(&dir)).unwrap();
        session.close().unwrap();
        session.close().unwrap();
        assert!(session.is_closed());

        let contents = fs::read_to_string(session.output_path().unwrap()).unwrap();
        assert_eq!(contents.matches("</html>").count(), 1);
    }

    #[test]
    fn test_content_after_close_appends() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(offline(&dir)).unwrap();
        session.close().unwrap();
        session.paragraph("late").unwrap();
        session.paragraph("later").unwrap();
        let contents = fs::read_to_string(session.output_path().unwrap()).unwrap();
        assert!(contents.ends_with("</html>\n<p>late</p>\n<p>later</p>\n"));
    }

    #[test]
    fn test_delete_output_detaches() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(offline(&dir)).unwrap();
        let path = session.output_path().unwrap().to_path_buf();

        session.delete_output().unwrap();
        assert!(!path.exists());
        assert!(!session.is_started());
        assert!(session.output_path().is_none());
        assert!(session.h1("gone").unwrap_err().is_not_started());
    }

    #[test]
    fn test_delete_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(offline(&dir)).unwrap();
        fs::remove_file(session.output_path().unwrap()).unwrap();
        session.delete_output().unwrap();
        assert!(!session.is_started());
    }

    #[test]
    fn test_urls_use_basename_and_port() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(offline(&dir).with_port(9300)).unwrap();
        let urls = session.urls().unwrap();
        assert_eq!(urls.localhost_url, "http://localhost:9300/out.html");
        assert!(urls.hostname_url.starts_with("http://"));
        assert!(urls.hostname_url.ends_with(":9300/out.html"));
    }

    #[test]
    fn test_invalid_header_level_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(offline(&dir)).unwrap();
        let err = session.header("x", 6).unwrap_err();
        assert!(matches!(err, Error::InvalidHeaderLevel { level: 6 }));
        assert_eq!(
            fs::read_to_string(session.output_path().unwrap()).unwrap(),
            HTML_BEGIN_BOILERPLATE
        );
    }

    #[test]
    fn test_click_and_cleanup_notices_logged() {
        let dir = tempfile::tempdir().unwrap();
        let (logs, session) = capture_logs(|| {
            let session = Session::new(offline(&dir).with_port(9300)).unwrap();
            session.inform_cleanup().unwrap();
            session
        });

        let click = logs
            .lines()
            .find(|line| line.contains("Click:"))
            .unwrap_or_else(|| panic!("no click notice in:\n{logs}"));
        assert!(click.contains(&format!("http://{}:9300/out.html", hostname())), "{click}");
        assert!(click.contains("http://localhost:9300/out.html"), "{click}");
        assert!(click.contains(session.session_id()), "{click}");

        let cleanup = logs
            .lines()
            .find(|line| line.contains("please delete the file"))
            .unwrap_or_else(|| panic!("no cleanup notice in:\n{logs}"));
        let path = session.output_path().unwrap().display().to_string();
        assert!(cleanup.contains(&path), "{cleanup}");
    }
}
