//! Machine hostname lookup.

/// Machine hostname as reported by the OS, or `localhost` if it cannot be
/// read.
pub fn hostname() -> String {
    ::hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().into_owned())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
