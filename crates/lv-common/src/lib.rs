//! Local visualizer shared types.
//!
//! This crate provides the pieces shared by the server, the document writer
//! and the session facade:
//! - The unified error type and `Result` alias
//! - Session configuration with serde defaults and environment overrides
//! - Machine hostname lookup for "click here" URLs
//! - HTML escaping shared by the table renderer and directory listings

pub mod config;
pub mod error;
pub mod host;
pub mod html;

pub use config::{SessionConfig, DEFAULT_HOST, DEFAULT_PORT};
pub use error::{Error, ErrorCategory, Result};
pub use host::hostname;
pub use html::html_escape;
