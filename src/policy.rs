//! Content policy table: file extension → (Content-Type, Cache-Control).
//!
//! A single static table rather than scattered branches so the mapping can
//! be audited and tested in one place. Every entry is publicly cacheable;
//! the store only ever holds read-only published content, so there is no
//! `no-store` row here on purpose.

use anyhow::{Result, bail};

/// Response headers derived from an object key's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentPolicy {
    pub content_type: &'static str,
    pub cache_control: &'static str,
}

const CACHE_HTML: &str = "public, max-age=300";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";
const CACHE_IMAGE: &str = "public, max-age=2592000";
const CACHE_DOCUMENT: &str = "public, max-age=86400";

/// Extension lookup table. Extensions are stored lowercase without the dot;
/// lookup is case-insensitive on the key's extension.
static POLICY_TABLE: &[(&str, ContentPolicy)] = &[
    (
        "html",
        ContentPolicy {
            content_type: "text/html; charset=utf-8",
            cache_control: CACHE_HTML,
        },
    ),
    (
        "js",
        ContentPolicy {
            content_type: "application/javascript; charset=utf-8",
            cache_control: CACHE_IMMUTABLE,
        },
    ),
    (
        "css",
        ContentPolicy {
            content_type: "text/css; charset=utf-8",
            cache_control: CACHE_IMMUTABLE,
        },
    ),
    (
        "json",
        ContentPolicy {
            content_type: "application/json; charset=utf-8",
            cache_control: CACHE_IMMUTABLE,
        },
    ),
    (
        "xml",
        ContentPolicy {
            content_type: "application/xml; charset=utf-8",
            cache_control: CACHE_IMMUTABLE,
        },
    ),
    (
        "jpg",
        ContentPolicy {
            content_type: "image/jpeg",
            cache_control: CACHE_IMAGE,
        },
    ),
    (
        "jpeg",
        ContentPolicy {
            content_type: "image/jpeg",
            cache_control: CACHE_IMAGE,
        },
    ),
    (
        "png",
        ContentPolicy {
            content_type: "image/png",
            cache_control: CACHE_IMAGE,
        },
    ),
    (
        "gif",
        ContentPolicy {
            content_type: "image/gif",
            cache_control: CACHE_IMAGE,
        },
    ),
    (
        "webp",
        ContentPolicy {
            content_type: "image/webp",
            cache_control: CACHE_IMAGE,
        },
    ),
    (
        "svg",
        ContentPolicy {
            content_type: "image/svg+xml",
            cache_control: CACHE_IMAGE,
        },
    ),
    (
        "ico",
        ContentPolicy {
            content_type: "image/x-icon",
            cache_control: CACHE_IMAGE,
        },
    ),
    (
        "pdf",
        ContentPolicy {
            content_type: "application/pdf",
            cache_control: CACHE_DOCUMENT,
        },
    ),
    (
        "txt",
        ContentPolicy {
            content_type: "text/plain; charset=utf-8",
            cache_control: CACHE_DOCUMENT,
        },
    ),
];

/// Policy for keys with no extension or an extension not in the table.
static FALLBACK_POLICY: ContentPolicy = ContentPolicy {
    content_type: "application/octet-stream",
    cache_control: CACHE_IMMUTABLE,
};

/// Look up the content policy for an object key, case-insensitive on
/// the extension of the final path segment.
pub fn policy_for(key: &str) -> &'static ContentPolicy {
    let Some(ext) = extension(key) else {
        return &FALLBACK_POLICY;
    };

    POLICY_TABLE
        .iter()
        .find(|(entry, _)| ext.eq_ignore_ascii_case(entry))
        .map(|(_, policy)| policy)
        .unwrap_or(&FALLBACK_POLICY)
}

/// Extension of the final path segment, without the dot.
/// `archive.tar.gz` yields `gz`; `v1.2/readme` yields none.
fn extension(key: &str) -> Option<&str> {
    let name = key.rsplit('/').next().unwrap_or(key);
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Validate table invariants at startup: lowercase entries, no duplicates.
pub fn verify_table() -> Result<()> {
    for (i, (ext, _)) in POLICY_TABLE.iter().enumerate() {
        if ext.chars().any(|c| c.is_ascii_uppercase()) || ext.starts_with('.') {
            bail!("policy table entry `{ext}` must be lowercase without dot");
        }
        if POLICY_TABLE[i + 1..].iter().any(|(other, _)| other == ext) {
            bail!("policy table entry `{ext}` is duplicated");
        }
    }
    Ok(())
}
