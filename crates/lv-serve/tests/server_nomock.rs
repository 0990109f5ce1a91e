//! End-to-end tests for the background static server over real sockets.
//!
//! Validates:
//! - Files under the root are served with 200 and their bytes
//! - Unknown paths return 404
//! - A taken port fails with a bind error (no fallback)
//! - Files appended after startup are visible on the next request

use lv_common::Error;
use lv_serve::StaticServer;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

fn test_port(offset: u16) -> u16 {
    19400 + offset + (std::process::id() % 500) as u16
}

fn get(addr: SocketAddr, path: &str) -> Option<String> {
    let mut stream = TcpStream::connect(addr).ok()?;
    stream.set_read_timeout(Some(Duration::from_secs(5))).ok()?;
    let request = format!("GET {path} HTTP/1.0\r\nHost: localhost\r\n\r\n");
    stream.write_all(request.as_bytes()).ok()?;
    let mut buf = String::new();
    stream.read_to_string(&mut buf).ok()?;
    Some(buf)
}

#[test]
fn test_serves_files_and_404s() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lviz.html"), "<h3>X</h3>\n").unwrap();

    let handle = match StaticServer::start_in(dir.path(), "127.0.0.1", test_port(0)) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("skipping server test: {}", e);
            return;
        }
    };
    assert!(handle.is_running());
    assert_eq!(handle.root(), dir.path());
    assert!(handle.base_url().starts_with("http://127.0.0.1:"));

    std::thread::sleep(Duration::from_millis(100));

    if let Some(buf) = get(handle.addr(), "/lviz.html") {
        assert!(buf.contains("200 OK"), "expected 200, got: {}", buf);
        assert!(buf.contains("text/html"));
        assert!(buf.ends_with("<h3>X</h3>\n"));
    }

    if let Some(buf) = get(handle.addr(), "/missing.html") {
        assert!(buf.contains("404"), "unknown path should return 404");
    }

    // The writer appends while the server runs; the next read sees it.
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(dir.path().join("lviz.html"))
        .unwrap();
    file.write_all(b"<p>hello</p>\n").unwrap();
    drop(file);

    if let Some(buf) = get(handle.addr(), "/lviz.html") {
        assert!(buf.ends_with("<h3>X</h3>\n<p>hello</p>\n"));
    }

    if let Some(buf) = get(handle.addr(), "/") {
        assert!(buf.contains("Directory listing for /"));
        assert!(buf.contains("lviz.html"));
    }
}

#[test]
fn test_port_in_use_is_bind_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let dir = tempfile::tempdir().unwrap();

    let err = StaticServer::start_in(dir.path(), "127.0.0.1", port).unwrap_err();
    match err {
        Error::Bind { addr, .. } => assert_eq!(addr, format!("127.0.0.1:{port}")),
        other => panic!("expected bind error, got {other:?}"),
    }
}

#[test]
fn test_unresolvable_host_is_bind_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = StaticServer::start_in(dir.path(), "no such host!", test_port(1)).unwrap_err();
    assert!(matches!(err, Error::Bind { .. }));
}
