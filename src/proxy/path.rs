//! Request path sanitation.
//!
//! Turns the raw (still percent-encoded) tail of an `/images/...` request into
//! a canonical object key. Anything that could address a key outside the
//! configured namespace is rejected instead of being rewritten.

use crate::error::{ProxyError, Result};

// == Sanitize ==
/// Decodes and normalizes a raw request path into a relative key.
///
/// - percent-decodes exactly once
/// - drops empty and `.` segments
/// - rejects `..` segments, backslashes, NUL bytes, and escapes that survive
///   decoding (double encoding)
/// - rejects paths that are empty after normalization
pub fn sanitize_path(raw: &str) -> Result<String> {
    let decoded = urlencoding::decode(raw)
        .map_err(|_| ProxyError::InvalidPath("path is not valid UTF-8".to_string()))?;

    if decoded.contains('\\') || decoded.contains('\0') {
        return Err(ProxyError::InvalidPath(
            "path contains forbidden characters".to_string(),
        ));
    }
    if has_percent_escape(&decoded) {
        return Err(ProxyError::InvalidPath(
            "path is encoded more than once".to_string(),
        ));
    }

    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(ProxyError::InvalidPath(
                    "path traversal is not allowed".to_string(),
                ))
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(ProxyError::InvalidPath("path is empty".to_string()));
    }

    Ok(segments.join("/"))
}

// == Namespace ==
/// Sanitizes `raw` and places it under `namespace`.
///
/// The namespace is trimmed of surrounding slashes; an empty namespace maps
/// keys to the store root.
pub fn resolve_key(namespace: &str, raw: &str) -> Result<String> {
    let relative = sanitize_path(raw)?;
    let namespace = namespace.trim_matches('/');

    if namespace.is_empty() {
        Ok(relative)
    } else {
        Ok(format!("{}/{}", namespace, relative))
    }
}

// == Helpers ==
fn has_percent_escape(s: &str) -> bool {
    s.as_bytes()
        .windows(3)
        .any(|w| w[0] == b'%' && w[1].is_ascii_hexdigit() && w[2].is_ascii_hexdigit())
}
