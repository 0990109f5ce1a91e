//! Request handling for the static file server.
//!
//! [`respond`] maps a method and URL to a [`Reply`] without touching the
//! network, so directory-serving semantics can be tested directly.

use lv_common::html_escape;
use std::fs;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use tiny_http::{Header, Method, Response};
use tracing::trace;

/// A fully rendered HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header value.
    pub content_type: &'static str,
    /// `Location` header for redirects.
    pub location: Option<String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl Reply {
    fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            location: None,
            body,
        }
    }

    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            location: None,
            body: body.as_bytes().to_vec(),
        }
    }

    fn not_found() -> Self {
        Self::text(404, "404 Not Found")
    }

    fn redirect(location: String) -> Self {
        Self {
            status: 301,
            content_type: "text/plain; charset=utf-8",
            body: format!("Moved to {location}").into_bytes(),
            location: Some(location),
        }
    }

    /// Convert into a `tiny_http` response.
    pub fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let mut response = Response::from_data(self.body).with_status_code(self.status);
        if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], self.content_type.as_bytes()) {
            response = response.with_header(header);
        }
        if let Some(location) = self.location {
            if let Ok(header) = Header::from_bytes(&b"Location"[..], location.as_bytes()) {
                response = response.with_header(header);
            }
        }
        response
    }
}

/// Serve `url` relative to `root`.
///
/// - `GET` and `HEAD` only; anything else gets `501`
/// - files return `200` with their bytes
/// - directories redirect to the trailing-slash form, then serve
///   `index.html`/`index.htm` or a generated listing
/// - everything else, including paths escaping `root`, returns `404`
pub fn respond(root: &Path, method: &Method, url: &str) -> Reply {
    if !matches!(method, Method::Get | Method::Head) {
        return Reply::text(501, "501 Not Implemented");
    }

    let url_path = strip_query(url);
    let Some(relative) = resolve_relative(url_path) else {
        trace!(url = %url, "rejected path");
        return Reply::not_found();
    };
    let path = root.join(&relative);

    if path.is_dir() {
        if !url_path.ends_with('/') {
            return Reply::redirect(format!("{url_path}/"));
        }
        for index in ["index.html", "index.htm"] {
            let index_path = path.join(index);
            if index_path.is_file() {
                return serve_file(&index_path);
            }
        }
        return match list_directory(&path, url_path) {
            Ok(body) => Reply::ok("text/html; charset=utf-8", body.into_bytes()),
            Err(_) => Reply::not_found(),
        };
    }

    serve_file(&path)
}

fn serve_file(path: &Path) -> Reply {
    match fs::read(path) {
        Ok(contents) => Reply::ok(mime_type(path), contents),
        Err(_) => Reply::not_found(),
    }
}

fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Percent-decode the URL path and turn it into a relative path with only
/// normal components. Returns `None` for anything that could escape the root.
fn resolve_relative(url_path: &str) -> Option<PathBuf> {
    let decoded = String::from_utf8(percent_decode(url_path)).ok()?;
    let mut relative = PathBuf::new();
    for segment in decoded.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => relative.push(part),
            _ => return None,
        }
    }
    Some(relative)
}

fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn list_directory(dir: &Path, url_path: &str) -> std::io::Result<String> {
    let mut entries: Vec<(String, bool)> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            (entry.file_name().to_string_lossy().into_owned(), is_dir)
        })
        .collect();
    entries.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));

    let title = html_escape(&String::from_utf8_lossy(&percent_decode(url_path)));
    let mut html = format!(
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Directory listing for {title}</title>\n</head>\n<body>\n\
         <h1>Directory listing for {title}</h1>\n<hr>\n<ul>\n"
    );
    for (name, is_dir) in entries {
        let display = if is_dir { format!("{name}/") } else { name };
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            percent_encode(&display),
            html_escape(&display)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("txt") | Some("log") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
