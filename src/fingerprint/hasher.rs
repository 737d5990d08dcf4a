//! Remote file hashing

use std::sync::Arc;

use md5::{Digest, Md5};
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::fingerprint::error::ProbeError;
use crate::fingerprint::transport::{HttpVerb, Transport, join_url};

/// Result of hashing a single remote file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteHash {
    /// The server answered 200; `digest` is the lower-case hex MD5 of the body
    Found { digest: String },
    /// The server answered 200 to a HEAD request without handing over any
    /// content. The file exists but there is nothing to compare.
    Present,
    /// Any other status. The file is absent or inaccessible, which is evidence too.
    NotFound { status: u16 },
}

/// Trait for obtaining the hash of a file on the target
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait HashProvider: Send + Sync {
    /// Hashes `file_path` relative to `base_url`
    ///
    /// # Returns
    /// * `Ok(RemoteHash)` - The digest, `Present` for a bodiless HEAD answer,
    ///   or the status when the file was not served
    /// * `Err(ProbeError)` - The target could not be reached at all
    async fn compute_remote_hash(
        &self,
        base_url: &str,
        file_path: &str,
        verb: HttpVerb,
    ) -> Result<RemoteHash, ProbeError>;
}

/// Hash provider that fetches through a `Transport` and digests with MD5
pub struct Md5HashProvider {
    transport: Arc<dyn Transport>,
}

impl Md5HashProvider {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

/// Lower-case hex MD5 of `bytes`
pub fn md5_hex(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}

#[async_trait::async_trait]
impl HashProvider for Md5HashProvider {
    async fn compute_remote_hash(
        &self,
        base_url: &str,
        file_path: &str,
        verb: HttpVerb,
    ) -> Result<RemoteHash, ProbeError> {
        let url = join_url(base_url, file_path);
        let response = self.transport.request(verb, &url).await?;

        if response.status != 200 {
            debug!("{} returned status {}", url, response.status);
            return Ok(RemoteHash::NotFound {
                status: response.status,
            });
        }

        if verb == HttpVerb::Head && response.body.is_empty() {
            debug!("{} exists but HEAD returned no content to hash", url);
            return Ok(RemoteHash::Present);
        }

        let digest = md5_hex(&response.body);
        debug!("{} hashed to {}", url, digest);

        Ok(RemoteHash::Found { digest })
    }
}
