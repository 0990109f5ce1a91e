//! Background static file server for local visualizer documents.
//!
//! Serves files under a root directory (the process working directory by
//! default) over plain HTTP so the HTML document can be opened in a browser
//! while the writing program keeps running.
//!
//! The server runs on a detached background thread. There is no shutdown
//! API: the listener lives until the process exits.
//!
//! # Example
//!
//! ```no_run
//! use lv_serve::StaticServer;
//!
//! let handle = StaticServer::start("localhost", 9111).unwrap();
//! println!("serving {} at {}", handle.root().display(), handle.addr());
//! ```

pub mod handler;

pub use handler::{respond, Reply};

use lv_common::{Error, Result};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, info, warn};

/// Handle to a running background server.
///
/// Dropping the handle does not stop the server.
#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    host: String,
    root: PathBuf,
    thread: thread::JoinHandle<()>,
}

impl ServerHandle {
    /// Bound socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Directory being served.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the serve thread is still alive.
    pub fn is_running(&self) -> bool {
        !self.thread.is_finished()
    }

    /// Base URL of the server, e.g. `http://localhost:9111/`.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.addr.port())
    }
}

/// Static file server entry points.
pub struct StaticServer;

impl StaticServer {
    /// Serve the current working directory at `(host, port)`.
    pub fn start(host: &str, port: u16) -> Result<ServerHandle> {
        let root = std::env::current_dir()?;
        Self::start_in(root, host, port)
    }

    /// Serve `root` at `(host, port)`.
    ///
    /// Fails with [`Error::Bind`] if the address cannot be resolved or the
    /// port is already taken. No retry, no fallback port.
    pub fn start_in(root: impl Into<PathBuf>, host: &str, port: u16) -> Result<ServerHandle> {
        let root = root.into();
        let bind_err = |reason: String| Error::Bind {
            addr: format!("{}:{}", host, port),
            reason,
        };

        let addr = resolve(host, port).map_err(|e| bind_err(e.to_string()))?;
        let server = tiny_http::Server::http(addr).map_err(|e| bind_err(e.to_string()))?;
        let addr = server.server_addr().to_ip().unwrap_or(addr);

        info!(
            host = %host,
            port = addr.port(),
            "Starting background server at: http://{}:{}/",
            host,
            addr.port()
        );

        let serve_root = root.clone();
        let thread = thread::Builder::new()
            .name("lv-serve".to_string())
            .spawn(move || serve_loop(&server, &serve_root))?;

        Ok(ServerHandle {
            addr,
            host: host.to_string(),
            root,
            thread,
        })
    }
}

/// Resolve `(host, port)`, preferring IPv4 so `localhost` binds 127.0.0.1.
fn resolve(host: &str, port: u16) -> std::io::Result<SocketAddr> {
    let addrs: Vec<SocketAddr> = (host, port).to_socket_addrs()?.collect();
    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                format!("no address found for {host}"),
            )
        })
}

fn serve_loop(server: &tiny_http::Server, root: &Path) {
    for request in server.incoming_requests() {
        let reply = respond(root, request.method(), request.url());
        debug!(
            method = %request.method(),
            url = %request.url(),
            status = reply.status,
            "request"
        );
        if let Err(e) = request.respond(reply.into_response()) {
            warn!(error = %e, "failed to send response");
        }
    }
}
