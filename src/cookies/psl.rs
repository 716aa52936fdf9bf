//! Public Suffix List (PSL) checks for Set-Cookie domains.
//!
//! A cookie scoped to `.co.uk` would be sent to every site under it, so
//! the jar refuses Domain attributes that are public suffixes.

use psl::{List, Psl};

/// True if `domain` is itself a public suffix ("com", "co.uk", "github.io").
pub fn is_public_suffix(domain: &str) -> bool {
    let domain = domain.trim_start_matches('.').to_lowercase();
    let bytes = domain.as_bytes();
    match List.suffix(bytes) {
        Some(suffix) => suffix.as_bytes() == bytes,
        None => false,
    }
}
