//! reqwest-backed transport

use std::time::Duration;

use tracing::debug;

use crate::config::HttpConfig;
use crate::fingerprint::error::ProbeError;
use crate::fingerprint::transport::{HttpVerb, Transport, TransportResponse};

/// Transport implementation on top of a shared `reqwest::Client`
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the timeout and user agent from `config`
    pub fn new(config: &HttpConfig) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client })
    }
}

/// Refused connections and timeouts mean the target is unreachable; anything
/// else (malformed URL, TLS, decoding) stays a generic network error
fn classify_error(url: &str, error: reqwest::Error) -> ProbeError {
    if error.is_connect() || error.is_timeout() {
        ProbeError::Connection {
            url: url.to_string(),
            reason: error.to_string(),
        }
    } else {
        ProbeError::Network(error)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, verb: HttpVerb, url: &str) -> Result<TransportResponse, ProbeError> {
        debug!("{} {}", verb.as_str(), url);

        let response = self
            .client
            .request(verb.into(), url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| classify_error(url, e))?;

        debug!("{} {} -> {} ({} bytes)", verb.as_str(), url, status, body.len());

        Ok(TransportResponse::new(status, body.to_vec()))
    }
}
