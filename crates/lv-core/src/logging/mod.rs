//! Logging setup for programs using the visualizer.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! caller's choice. [`init_logging`] installs a stderr subscriber in either
//! human-readable or JSON-lines form.
//!
//! Each [`Session`](crate::Session) owns a [`LogContext`] carrying its
//! session id, created with the session and never torn down.

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global stderr subscriber.
///
/// Returns `false` if a subscriber was already installed, so calling this
/// more than once (for example from several tests) is harmless.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = env_filter(config, std::env::var("RUST_LOG").ok().as_deref());
    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Human => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(std::io::stderr().is_terminal()),
            )
            .try_init()
            .is_ok(),
        LogFormat::Jsonl => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .is_ok(),
    }
}

/// An explicit level wins; otherwise `rust_log` directives, then `info`.
fn env_filter(config: &LogConfig, rust_log: Option<&str>) -> EnvFilter {
    if let Some(level) = config.level {
        return EnvFilter::new(level.as_directive());
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(LogLevel::Info.as_directive()))
}

/// Per-session logging context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    /// Correlates all events emitted by one session.
    pub session_id: String,
}

impl LogContext {
    /// Create a context with a fresh session id.
    pub fn new() -> Self {
        Self {
            session_id: generate_session_id(),
        }
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a short unique session id, e.g. `lviz-1f2e3d4c5b6a`.
pub fn generate_session_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("lviz-{}", &uuid[..12])
}
