//! Candidate verification by probing through the proxy

use crate::error::Result;
use crate::proxy::models::{ProxyRecord, ProxyType};
use async_trait::async_trait;
use reqwest::{Client, Proxy as ReqwestProxy};
use tracing::debug;

/// Default IP-echo endpoint used to confirm a candidate forwards traffic
pub const DEFAULT_PROBE_URL: &str = "https://api.myip.com";

/// Verifies that a candidate proxy actually forwards traffic
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe one candidate. Returns whether the probe succeeded within
    /// the candidate's timeout; failures are reported here, not as errors.
    async fn probe(&self, record: &ProxyRecord) -> bool;
}

/// Prober issuing a test GET against an IP-echo endpoint through the candidate
pub struct HttpProber {
    probe_url: String,
}

impl HttpProber {
    pub fn new(probe_url: impl Into<String>) -> Self {
        Self {
            probe_url: probe_url.into(),
        }
    }

    /// Create a one-off client routing through the candidate.
    ///
    /// Pooling is disabled, each probe talks to a different relay.
    fn create_client(&self, record: &ProxyRecord) -> Result<Client> {
        let proxy_url = record.url();

        let reqwest_proxy = match record.proxy_type {
            ProxyType::Http | ProxyType::Https => ReqwestProxy::http(&proxy_url)?,
            ProxyType::Socks4 | ProxyType::Socks5 => ReqwestProxy::all(&proxy_url)?,
        };

        let client = Client::builder()
            .proxy(reqwest_proxy)
            .timeout(record.proxy_type.probe_timeout())
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(client)
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_URL)
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, record: &ProxyRecord) -> bool {
        let client = match self.create_client(record) {
            Ok(client) => client,
            Err(e) => {
                debug!("cannot build probe client for {}: {}", record, e);
                return false;
            }
        };

        match client.get(&self.probe_url).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    true
                } else {
                    debug!("probe through {} got status {}", record, response.status());
                    false
                }
            }
            Err(e) => {
                debug!("probe through {} failed: {}", record, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_for_each_protocol() {
        let prober = HttpProber::default();
        for proxy_type in [
            ProxyType::Http,
            ProxyType::Https,
            ProxyType::Socks4,
            ProxyType::Socks5,
        ] {
            let record = ProxyRecord::new(proxy_type, "127.0.0.1".to_string(), 8080);
            assert!(prober.create_client(&record).is_ok(), "{}", proxy_type);
        }
    }

    #[test]
    fn test_default_probe_url() {
        let prober = HttpProber::default();
        assert_eq!(prober.probe_url, DEFAULT_PROBE_URL);
    }
}
