//! Transport trait for issuing single HTTP requests against a target

#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::fingerprint::error::ProbeError;

/// HTTP verb used when probing a file
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HttpVerb {
    Get,
    Head,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Head => "HEAD",
        }
    }
}

impl From<HttpVerb> for reqwest::Method {
    fn from(verb: HttpVerb) -> Self {
        match verb {
            HttpVerb::Get => reqwest::Method::GET,
            HttpVerb::Head => reqwest::Method::HEAD,
        }
    }
}

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Trait for sending one request to a URL
///
/// Implementations must report connection-level failures (DNS, refused
/// connection, timeout) as `Err`, and every received HTTP response, whatever
/// its status, as `Ok`.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, verb: HttpVerb, url: &str) -> Result<TransportResponse, ProbeError>;
}

/// Join a base URL and a relative file path with exactly one `/` between them
pub fn join_url(base_url: &str, file_path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        file_path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://example.com", "misc/drupal.js")]
    #[case("http://example.com/", "misc/drupal.js")]
    #[case("http://example.com", "/misc/drupal.js")]
    #[case("http://example.com/", "/misc/drupal.js")]
    fn join_url_puts_single_slash_between_parts(#[case] base: &str, #[case] path: &str) {
        assert_eq!(join_url(base, path), "http://example.com/misc/drupal.js");
    }

    #[test]
    fn join_url_keeps_base_path_prefix() {
        assert_eq!(
            join_url("https://example.com/drupal/", "CHANGELOG.txt"),
            "https://example.com/drupal/CHANGELOG.txt"
        );
    }

    #[rstest]
    #[case(HttpVerb::Get, reqwest::Method::GET)]
    #[case(HttpVerb::Head, reqwest::Method::HEAD)]
    fn verb_converts_to_reqwest_method(#[case] verb: HttpVerb, #[case] expected: reqwest::Method) {
        assert_eq!(reqwest::Method::from(verb), expected);
    }
}
