//! Changelog exposure check
//!
//! A readable changelog discloses the exact release installed, independent of
//! hash-based resolution.

use std::sync::Arc;

#[cfg(test)]
use mockall::automock;
use tracing::{debug, warn};

use crate::fingerprint::error::ProbeError;
use crate::fingerprint::transport::{HttpVerb, Transport, join_url};

/// Sink for user-facing warnings
#[cfg_attr(test, automock)]
pub trait Warner: Send + Sync {
    fn warn(&self, message: &str);
}

/// Warner that emits a `tracing` warning event
pub struct TracingWarner;

impl Warner for TracingWarner {
    fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}

pub struct ChangelogProbe {
    transport: Arc<dyn Transport>,
    warner: Arc<dyn Warner>,
}

impl ChangelogProbe {
    pub fn new(transport: Arc<dyn Transport>, warner: Arc<dyn Warner>) -> Self {
        Self { transport, warner }
    }

    /// GET `changelog_path` and warn if the server hands it out
    ///
    /// # Returns
    /// * `Ok(true)` - The changelog answered 200; one warning was emitted
    /// * `Ok(false)` - Any other status
    /// * `Err(ProbeError)` - The target could not be reached
    pub async fn check_changelog_exposed(
        &self,
        base_url: &str,
        changelog_path: &str,
    ) -> Result<bool, ProbeError> {
        let url = join_url(base_url, changelog_path);
        let response = self.transport.request(HttpVerb::Get, &url).await?;

        if response.status != 200 {
            debug!("Changelog {} returned status {}", url, response.status);
            return Ok(false);
        }

        self.warner.warn(&format!(
            "{} is publicly readable and may disclose the installed version",
            url
        ));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::transport::{MockTransport, TransportResponse};
    use mockall::predicate::eq;
    use rstest::rstest;

    const BASE_URL: &str = "http://target.test";

    fn transport_returning(status: u16) -> MockTransport {
        let mut transport = MockTransport::new();
        transport
            .expect_request()
            .with(eq(HttpVerb::Get), eq("http://target.test/CHANGELOG.txt"))
            .times(1)
            .returning(move |_, _| Ok(TransportResponse::new(status, "Drupal 7.26, 2014-01-15")));
        transport
    }

    #[tokio::test]
    async fn check_changelog_exposed_warns_once_when_served() {
        let mut warner = MockWarner::new();
        warner
            .expect_warn()
            .withf(|message| message.contains("http://target.test/CHANGELOG.txt"))
            .times(1)
            .return_const(());

        let probe = ChangelogProbe::new(Arc::new(transport_returning(200)), Arc::new(warner));
        let exposed = probe
            .check_changelog_exposed(BASE_URL, "CHANGELOG.txt")
            .await
            .unwrap();

        assert!(exposed);
    }

    #[rstest]
    #[case(403)]
    #[case(404)]
    #[case(301)]
    #[tokio::test]
    async fn check_changelog_exposed_stays_silent_otherwise(#[case] status: u16) {
        let mut warner = MockWarner::new();
        warner.expect_warn().times(0);

        let probe = ChangelogProbe::new(Arc::new(transport_returning(status)), Arc::new(warner));
        let exposed = probe
            .check_changelog_exposed(BASE_URL, "/CHANGELOG.txt")
            .await
            .unwrap();

        assert!(!exposed);
    }

    #[tokio::test]
    async fn check_changelog_exposed_propagates_connection_failure() {
        let mut transport = MockTransport::new();
        transport.expect_request().times(1).returning(|_, url| {
            Err(ProbeError::Connection {
                url: url.to_string(),
                reason: "dns lookup failed".to_string(),
            })
        });
        let mut warner = MockWarner::new();
        warner.expect_warn().times(0);

        let probe = ChangelogProbe::new(Arc::new(transport), Arc::new(warner));
        let result = probe.check_changelog_exposed(BASE_URL, "CHANGELOG.txt").await;

        assert!(matches!(result, Err(ProbeError::Connection { .. })));
    }
}
