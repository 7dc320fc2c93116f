//! Maps incoming request paths to canonical storage object keys.
//!
//! The mapping applies default-document rules only: a path naming a
//! "directory" (empty, or ending in `/`) resolves to the `index.html`
//! beneath it. Dot-segment collapsing and percent-decoding are left to
//! the transport layer and deliberately not repeated here.

const DEFAULT_DOCUMENT: &str = "index.html";

/// Resolve a raw request path to a storage object key.
///
/// - strips a single leading `/` if present
/// - an empty path becomes `index.html`
/// - a path ending in `/` gets `index.html` appended
///
/// The returned key is never empty and never starts with `/`
/// (a second strip covers `//`-prefixed paths). This function
/// cannot fail.
pub fn resolve(raw_path: &str) -> String {
    let path = raw_path.strip_prefix('/').unwrap_or(raw_path);

    let key = if path.is_empty() {
        DEFAULT_DOCUMENT.to_string()
    } else if path.ends_with('/') {
        format!("{path}{DEFAULT_DOCUMENT}")
    } else {
        path.to_string()
    };

    key.strip_prefix('/').map(str::to_string).unwrap_or(key)
}
