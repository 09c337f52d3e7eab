// src/version.rs
//! Version handling for documentation URLs.
//!
//! Documentation sites publish one tree per product version, e.g.
//! `https://docs.example.com/product/2.21` or `.../product/latest`. A base URL
//! may already end in such a segment; it is split off and used unless the
//! caller asks for specific versions.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static VERSION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(latest|v?\d+\.\d+(?:\.\d+)?)$").unwrap());

static VERSION_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(latest|v?\d+(?:\.\d+){0,2})$").unwrap());

pub const LATEST: &str = "latest";

/// A documentation version token: `latest` or a dotted number, optionally `v`-prefixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(String);

impl Version {
    pub fn parse(token: &str) -> Result<Self> {
        let token = token.trim();
        if VERSION_TOKEN.is_match(token) {
            Ok(Version(token.to_string()))
        } else {
            Err(Error::InvalidVersion(token.to_string()))
        }
    }

    pub fn latest() -> Self {
        Version(LATEST.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a comma separated list such as `2.21, 2.22,latest`. Blank entries are ignored.
pub fn parse_list(list: &str) -> Result<Vec<Version>> {
    list.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(Version::parse)
        .collect()
}

/// Split a trailing version segment off `url`.
///
/// Trailing slashes are ignored. Returns the URL without the segment and the
/// detected version, or the trimmed URL and `None` when the last segment is
/// not a version.
pub fn detect(url: &str) -> (String, Option<Version>) {
    let url = url.trim_end_matches('/');

    match VERSION_SUFFIX.captures(url) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.start()).unwrap_or(url.len());
            let version = caps.get(1).map(|m| Version(m.as_str().to_string()));
            (url[..whole].to_string(), version)
        }
        None => (url.to_string(), None),
    }
}

/// Where the versions of a [`VersionPlan`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSource {
    /// Supplied by the caller. Holds the version found in the URL, if any, which was discarded.
    Explicit { overridden: Option<Version> },
    /// Taken from the URL's last path segment.
    Detected,
    /// Nothing given, nothing found.
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPlan {
    pub base_url: String,
    pub versions: Vec<Version>,
    pub source: VersionSource,
}

impl VersionPlan {
    /// `base/version` for every planned version, in order.
    pub fn version_urls(&self) -> Vec<(Version, String)> {
        self.versions
            .iter()
            .map(|v| (v.clone(), format!("{}/{}", self.base_url, v)))
            .collect()
    }
}

/// Decide which versions to crawl for `url`.
///
/// Explicit versions always win over one found in the URL. Without either,
/// the plan falls back to `latest`.
pub fn resolve(url: &str, explicit: &[Version]) -> VersionPlan {
    let (base_url, detected) = detect(url);

    let (versions, source) = match (explicit.is_empty(), detected) {
        (false, overridden) => (explicit.to_vec(), VersionSource::Explicit { overridden }),
        (true, Some(version)) => (vec![version], VersionSource::Detected),
        (true, None) => (vec![Version::latest()], VersionSource::Default),
    };

    VersionPlan {
        base_url,
        versions,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(token: &str) -> Version {
        Version::parse(token).unwrap()
    }

    #[test]
    fn detects_dotted_version() {
        assert_eq!(
            detect("https://x/y/2.21.1"),
            ("https://x/y".to_string(), Some(v("2.21.1")))
        );
    }

    #[test]
    fn detects_latest_with_trailing_slash() {
        assert_eq!(
            detect("https://x/y/latest/"),
            ("https://x/y".to_string(), Some(v("latest")))
        );
    }

    #[test]
    fn detects_prefixed_version() {
        assert_eq!(
            detect("https://x/y/v3.2"),
            ("https://x/y".to_string(), Some(v("v3.2")))
        );
    }

    #[test]
    fn leaves_unversioned_url_alone() {
        assert_eq!(detect("https://x/y"), ("https://x/y".to_string(), None));
        assert_eq!(detect("https://x/y/"), ("https://x/y".to_string(), None));
    }

    #[test]
    fn does_not_take_single_number_segment() {
        // A bare number is a valid token but not something we split off a URL.
        assert_eq!(detect("https://x/y/3"), ("https://x/y/3".to_string(), None));
    }

    #[test]
    fn only_the_last_segment_counts() {
        assert_eq!(
            detect("https://x/2.1/guide"),
            ("https://x/2.1/guide".to_string(), None)
        );
    }

    #[test]
    fn explicit_versions_override_detected() {
        let plan = resolve("https://x/y/2.1", &[v("3.0")]);
        assert_eq!(plan.base_url, "https://x/y");
        assert_eq!(plan.versions, vec![v("3.0")]);
        assert_eq!(
            plan.source,
            VersionSource::Explicit {
                overridden: Some(v("2.1"))
            }
        );
    }

    #[test]
    fn detected_version_used_alone() {
        let plan = resolve("https://x/y/2.1/", &[]);
        assert_eq!(plan.versions, vec![v("2.1")]);
        assert_eq!(plan.source, VersionSource::Detected);
    }

    #[test]
    fn defaults_to_latest() {
        let plan = resolve("https://x/y", &[]);
        assert_eq!(plan.versions, vec![Version::latest()]);
        assert_eq!(plan.source, VersionSource::Default);
        assert_eq!(
            plan.version_urls(),
            vec![(Version::latest(), "https://x/y/latest".to_string())]
        );
    }

    #[test]
    fn explicit_order_is_kept() {
        let plan = resolve("https://x/y", &[v("2.22"), v("2.21")]);
        let urls: Vec<_> = plan.version_urls().into_iter().map(|(_, u)| u).collect();
        assert_eq!(urls, vec!["https://x/y/2.22", "https://x/y/2.21"]);
    }

    #[test]
    fn parses_version_lists() {
        assert_eq!(
            parse_list("2.21, 2.22,,latest ").unwrap(),
            vec![v("2.21"), v("2.22"), v("latest")]
        );
        assert!(matches!(
            parse_list("2.21,beta"),
            Err(Error::InvalidVersion(t)) if t == "beta"
        ));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(Version::parse("1.2.3.4").is_err());
        assert!(Version::parse("latest-ish").is_err());
        assert!(Version::parse("v2").is_ok());
    }
}
