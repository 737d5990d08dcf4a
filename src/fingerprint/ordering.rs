//! Ordering for CMS version strings

use std::cmp::Ordering;

use semver::Version;

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Handles partial versions like "7" or "7.26" by padding with zeros.
///
/// Examples:
/// - "7" -> Version(7, 0, 0)
/// - "7.26" -> Version(7, 26, 0)
/// - "8.0.0-beta1" -> Version(8, 0, 0, pre: beta1)
pub fn parse_version(version: &str) -> Option<Version> {
    let (core, pre) = match version.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (version, None),
    };

    let parts: Vec<&str> = core.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => core.to_string(),
    };

    let normalized = match pre {
        Some(pre) => format!("{}-{}", normalized, pre),
        None => normalized,
    };
    Version::parse(&normalized).ok()
}

/// Compare two version strings
///
/// Parsable versions compare semantically and sort before unparsable ones,
/// which fall back to plain string order.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(a_parsed), Some(b_parsed)) => a_parsed.cmp(&b_parsed).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Sort version strings in ascending version order
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(a, b));
}
