//! Content-Type resolution from object keys.

// == Public Constants ==
/// Served when the extension is missing or unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

// == Extension Lookup ==
/// Maps a key's file extension to its MIME type (case-insensitive).
pub fn content_type_for_key(key: &str) -> &'static str {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    let extension = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => return DEFAULT_CONTENT_TYPE,
    };

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
