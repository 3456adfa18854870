//! Version normalization and comparison for release tags.
//!
//! GitHub release tags are inconsistent across repositories: some carry a
//! leading `v` (`v2.2.2`), some do not (`2.2.2`), and some omit the patch
//! component (`2.2`). This module normalizes tags into comparable versions
//! and decides update availability with full semantic-versioning precedence
//! (so `2.2.2-beta` orders before `2.2.2`).
//!
//! # Examples
//!
//! ```rust
//! use ghup::version;
//!
//! assert_eq!(version::normalize("v2.2.2"), "2.2.2");
//! assert_eq!(version::normalize("2.2.2"), "2.2.2");
//! assert!(version::is_newer("2.2.10", "2.2.9"));
//! assert!(!version::is_newer("2.2.2-beta", "2.2.2"));
//! ```

use semver::Version;
use tracing::debug;

/// Strips a single leading `v` or `V` from a release tag.
///
/// Idempotent: normalizing an already-normalized string returns it
/// unchanged, and only one prefix character is ever removed.
pub fn normalize(tag: &str) -> &str {
    tag.strip_prefix(['v', 'V']).unwrap_or(tag)
}

/// Parses a version string leniently into a semantic version.
///
/// Accepts an optional leading `v`/`V` and pads dotted-numeric strings that
/// omit minor or patch components (`"1.2"` parses as `1.2.0`). Returns
/// `None` for strings that are not versions at all (branch names, hashes).
pub fn parse_lenient(input: &str) -> Option<Version> {
    let cleaned = normalize(input.trim());
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(version) = Version::parse(cleaned) {
        return Some(version);
    }

    // Pad "1" or "1.2" out to three components, preserving any
    // prerelease/build suffix ("1.2-beta" -> "1.2.0-beta").
    let (numeric, suffix) = match cleaned.find(['-', '+']) {
        Some(idx) => cleaned.split_at(idx),
        None => (cleaned, ""),
    };
    let dots = numeric.matches('.').count();
    if dots >= 2 {
        return None;
    }
    let padded = format!("{}{}{}", numeric, ".0".repeat(2 - dots), suffix);
    Version::parse(&padded).ok()
}

/// Returns `true` when `candidate` is a strictly newer version than
/// `installed`.
///
/// Both inputs are normalized and parsed leniently; when both parse,
/// semantic-versioning precedence decides. When either fails to parse the
/// comparison falls back to plain string ordering of the normalized
/// inputs - a documented limitation for non-version tags.
pub fn is_newer(candidate: &str, installed: &str) -> bool {
    match (parse_lenient(candidate), parse_lenient(installed)) {
        (Some(remote), Some(local)) => remote > local,
        _ => {
            debug!(
                "Non-semver comparison, falling back to string ordering: '{}' vs '{}'",
                candidate, installed
            );
            normalize(candidate) > normalize(installed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_single_prefix() {
        assert_eq!(normalize("v2.2.2"), "2.2.2");
        assert_eq!(normalize("V2.2.2"), "2.2.2");
        assert_eq!(normalize("2.2.2"), "2.2.2");
        // Only one prefix character is removed.
        assert_eq!(normalize("vv2.2.2"), "v2.2.2");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["v1.0.0", "1.0.0", "V3.1", ""] {
            let once = normalize(input);
            assert_eq!(normalize(once), once);
        }
    }

    #[test]
    fn test_parse_lenient_pads_components() {
        assert_eq!(parse_lenient("1.2").unwrap(), Version::new(1, 2, 0));
        assert_eq!(parse_lenient("3").unwrap(), Version::new(3, 0, 0));
        assert_eq!(parse_lenient("v1.2.3").unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn test_parse_lenient_preserves_prerelease() {
        let version = parse_lenient("2.2-beta.1").unwrap();
        assert_eq!(version.to_string(), "2.2.0-beta.1");
    }

    #[test]
    fn test_parse_lenient_rejects_non_versions() {
        assert!(parse_lenient("main").is_none());
        assert!(parse_lenient("").is_none());
        assert!(parse_lenient("abc1234").is_none());
    }

    #[test]
    fn test_is_newer_numeric_ordering() {
        // Dotted-numeric ordering, not lexical: 1.2.10 > 1.2.9.
        assert!(is_newer("1.2.10", "1.2.9"));
        assert!(is_newer("v2.2.2", "2.2.1"));
        assert!(!is_newer("2.2.2", "v2.2.2"));
        assert!(!is_newer("2.2.1", "2.2.2"));
    }

    #[test]
    fn test_is_newer_prerelease_precedence() {
        assert!(!is_newer("2.2.2-beta", "2.2.2"));
        assert!(is_newer("2.2.2", "2.2.2-beta"));
        assert!(is_newer("2.2.2-rc.2", "2.2.2-rc.1"));
    }

    #[test]
    fn test_is_newer_string_fallback() {
        // Neither side parses; plain string ordering applies.
        assert!(is_newer("beta", "alpha"));
        assert!(!is_newer("alpha", "beta"));
    }
}
