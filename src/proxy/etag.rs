//! ETag generation and `If-None-Match` matching.

use sha2::{Digest, Sha256};

// == ETag Generation ==
/// Builds a strong ETag for one version of an object.
///
/// The tag is a digest of the key, the payload length, and the time the bytes
/// were fetched. Cached entries are stamped with that same fetch time, so a
/// hit reproduces the tag sent with the original miss.
pub fn compute_etag(key: &str, size: usize, fetched_at_ms: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hasher.update(b"\0");
    hasher.update(size.to_be_bytes());
    hasher.update(fetched_at_ms.to_be_bytes());
    let digest = hasher.finalize();

    format!("\"{}\"", hex::encode(&digest[..16]))
}

// == Conditional Matching ==
/// Evaluates an `If-None-Match` header value against `etag`.
///
/// Accepts `*`, comma-separated lists, and weak (`W/`) validators, which are
/// compared on their opaque tag as GET requires.
pub fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    let wanted = strip_weak(etag);
    if_none_match
        .split(',')
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .any(|candidate| candidate == "*" || strip_weak(candidate) == wanted)
}

fn strip_weak(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}
