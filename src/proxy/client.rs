//! Listing API access and fetch/verify orchestration
//!
//! This module provides:
//! - Wire types for the proxyscan.io listing endpoint
//! - A `ProxySource` abstraction over the endpoint
//! - `ProxyClient`, which combines a source and a prober into the
//!   fetch-one/fetch-many/export/apply operations

use crate::error::{Error, Result};
use crate::proxy::export;
use crate::proxy::filter::ProxyFilter;
use crate::proxy::models::{ProxyRecord, ProxyType};
use crate::proxy::prober::{HttpProber, Prober, DEFAULT_PROBE_URL};
use crate::system::SystemProxyConfigurator;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Default listing endpoint
pub const DEFAULT_API_URL: &str = "https://www.proxyscan.io/api/proxy";

/// Default bound on how many candidates verification may discard
/// before giving up
pub const DEFAULT_MAX_PROBE_RETRIES: u32 = 20;

/// Geolocation block of a listing entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub country: Option<String>,
}

/// One element of the JSON array returned by the listing endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingEntry {
    #[serde(rename = "Type", default)]
    pub types: Vec<String>,
    #[serde(rename = "Ip")]
    pub ip: String,
    #[serde(rename = "Port")]
    pub port: u16,
    #[serde(rename = "Location", default)]
    pub location: Option<Location>,
    #[serde(rename = "Anonymity", default)]
    pub anonymity: Option<String>,
}

impl ListingEntry {
    /// Pick the protocol name for this entry.
    ///
    /// The endpoint lists tunneling-capable proxies under several names;
    /// a single-element `Type` is taken as-is, otherwise the second
    /// element names the preferred protocol.
    fn protocol_name(&self) -> &str {
        match self.types.as_slice() {
            [single] => single,
            [_, second, ..] => second,
            [] => "",
        }
    }

    /// Convert the wire entry into a typed record
    pub fn into_record(self) -> Result<ProxyRecord> {
        let proxy_type: ProxyType = self.protocol_name().parse()?;
        if self.port == 0 {
            return Err(Error::InvalidQuery(format!(
                "record {} has port 0",
                self.ip
            )));
        }
        Ok(ProxyRecord {
            proxy_type,
            host: self.ip,
            port: self.port,
            country: self.location.and_then(|l| l.country),
            anonymity: self.anonymity,
        })
    }
}

/// Source of candidate proxy listings
#[async_trait]
pub trait ProxySource: Send + Sync {
    /// Fetch a batch of candidates matching the filter
    async fn fetch(&self, filter: &ProxyFilter) -> Result<Vec<ListingEntry>>;
}

/// The real listing endpoint
pub struct ListingApi {
    client: Client,
    api_url: String,
}

impl ListingApi {
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }
}

#[async_trait]
impl ProxySource for ListingApi {
    async fn fetch(&self, filter: &ProxyFilter) -> Result<Vec<ListingEntry>> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&filter.query_params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::InvalidQuery(format!(
                "listing endpoint returned {}",
                status
            )));
        }

        response
            .json::<Vec<ListingEntry>>()
            .await
            .map_err(|e| Error::InvalidQuery(format!("unparseable listing response: {}", e)))
    }
}

/// Configuration for the proxy client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Listing endpoint URL
    pub api_url: String,
    /// IP-echo endpoint probed through candidates
    pub probe_url: String,
    /// How many candidates verification may discard before giving up
    pub max_probe_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            probe_url: DEFAULT_PROBE_URL.to_string(),
            max_probe_retries: DEFAULT_MAX_PROBE_RETRIES,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_probe_url(mut self, url: impl Into<String>) -> Self {
        self.probe_url = url.into();
        self
    }

    pub fn with_max_probe_retries(mut self, retries: u32) -> Self {
        self.max_probe_retries = retries;
        self
    }
}

/// Client over the listing API
pub struct ProxyClient {
    source: Box<dyn ProxySource>,
    prober: Box<dyn Prober>,
    max_probe_retries: u32,
}

impl ProxyClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            source: Box::new(ListingApi::new(config.api_url)?),
            prober: Box::new(HttpProber::new(config.probe_url)),
            max_probe_retries: config.max_probe_retries,
        })
    }

    /// Assemble a client from explicit collaborators
    pub fn from_parts(
        source: Box<dyn ProxySource>,
        prober: Box<dyn Prober>,
        max_probe_retries: u32,
    ) -> Self {
        Self {
            source,
            prober,
            max_probe_retries,
        }
    }

    /// Fetch the next candidate matching the filter
    async fn fetch_candidate(&self, filter: &ProxyFilter) -> Result<ProxyRecord> {
        let entries = self.source.fetch(filter).await?;
        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidQuery("listing returned no records".to_string()))?;
        entry.into_record()
    }

    /// Fetch one proxy record.
    ///
    /// With `verify`, each candidate is probed and discarded on failure;
    /// a fresh candidate is fetched with the same filter until one passes
    /// or the retry budget runs out.
    pub async fn fetch_one(&self, filter: &ProxyFilter, verify: bool) -> Result<ProxyRecord> {
        if !verify {
            return self.fetch_candidate(filter).await;
        }

        for attempt in 1..=self.max_probe_retries {
            let record = self.fetch_candidate(filter).await?;
            if self.prober.probe(&record).await {
                return Ok(record);
            }
            debug!(
                "discarding {} after failed probe (attempt {}/{})",
                record, attempt, self.max_probe_retries
            );
        }

        warn!(
            "no working proxy within {} attempts, giving up",
            self.max_probe_retries
        );
        Err(Error::ProbeExhausted {
            attempts: self.max_probe_retries,
        })
    }

    /// Fetch exactly `count` proxy records
    pub async fn fetch_many(
        &self,
        count: usize,
        filter: &ProxyFilter,
        verify: bool,
    ) -> Result<Vec<ProxyRecord>> {
        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            records.push(self.fetch_one(filter, verify).await?);
        }
        Ok(records)
    }

    /// Fetch `count` records and write them to a CSV file
    pub async fn export_csv<P: AsRef<Path>>(
        &self,
        count: usize,
        filter: &ProxyFilter,
        verify: bool,
        destination: P,
    ) -> Result<Vec<ProxyRecord>> {
        let records = self.fetch_many(count, filter, verify).await?;
        export::write_csv(&records, destination)?;
        Ok(records)
    }

    /// Fetch one record and apply it as the system proxy
    pub async fn apply(
        &self,
        filter: &ProxyFilter,
        verify: bool,
        configurator: &dyn SystemProxyConfigurator,
    ) -> Result<ProxyRecord> {
        let record = self.fetch_one(filter, verify).await?;
        crate::system::apply_record(configurator, &record)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn entry(ip: &str, port: u16, types: &[&str]) -> ListingEntry {
        ListingEntry {
            types: types.iter().map(|t| t.to_string()).collect(),
            ip: ip.to_string(),
            port,
            location: Some(Location {
                country: Some("US".to_string()),
            }),
            anonymity: Some("elite".to_string()),
        }
    }

    /// Source replaying scripted batches, one per fetch
    struct FakeSource {
        batches: Mutex<VecDeque<Vec<ListingEntry>>>,
        fetches: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn new(batches: Vec<Vec<ListingEntry>>) -> Self {
            Self {
                batches: Mutex::new(batches.into()),
                fetches: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl ProxySource for FakeSource {
        async fn fetch(&self, _filter: &ProxyFilter) -> Result<Vec<ListingEntry>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.batches
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| Error::InvalidQuery("fake source ran dry".to_string()))
        }
    }

    /// Prober replaying scripted outcomes
    struct FakeProber {
        outcomes: Mutex<VecDeque<bool>>,
    }

    impl FakeProber {
        fn new(outcomes: Vec<bool>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
            }
        }
    }

    #[async_trait]
    impl Prober for FakeProber {
        async fn probe(&self, _record: &ProxyRecord) -> bool {
            self.outcomes.lock().unwrap().pop_front().unwrap_or(false)
        }
    }

    fn client_with(
        batches: Vec<Vec<ListingEntry>>,
        outcomes: Vec<bool>,
        max_retries: u32,
    ) -> ProxyClient {
        ProxyClient::from_parts(
            Box::new(FakeSource::new(batches)),
            Box::new(FakeProber::new(outcomes)),
            max_retries,
        )
    }

    #[test]
    fn test_parse_listing_json() {
        let json = r#"[{
            "Ip": "1.2.3.4",
            "Port": 8080,
            "Type": ["HTTP"],
            "Location": {"country": "Germany"},
            "Anonymity": "Transparent"
        }]"#;
        let entries: Vec<ListingEntry> = serde_json::from_str(json).unwrap();
        let record = entries[0].clone().into_record().unwrap();
        assert_eq!(record.proxy_type, ProxyType::Http);
        assert_eq!(record.host, "1.2.3.4");
        assert_eq!(record.port, 8080);
        assert_eq!(record.country.as_deref(), Some("Germany"));
        assert_eq!(record.anonymity.as_deref(), Some("Transparent"));
    }

    #[test]
    fn test_protocol_selection_single_and_multi() {
        let single = entry("1.1.1.1", 80, &["https"]);
        assert_eq!(
            single.into_record().unwrap().proxy_type,
            ProxyType::Https
        );

        // Multi-typed entries use the second listed protocol.
        let multi = entry("1.1.1.1", 80, &["http", "socks5"]);
        assert_eq!(multi.into_record().unwrap().proxy_type, ProxyType::Socks5);
    }

    #[test]
    fn test_empty_protocol_is_unsupported() {
        let bad = entry("1.1.1.1", 80, &[]);
        assert!(matches!(
            bad.into_record(),
            Err(Error::UnsupportedProtocol(_))
        ));
    }

    #[test]
    fn test_port_zero_is_rejected() {
        let bad = entry("1.1.1.1", 0, &["http"]);
        assert!(matches!(bad.into_record(), Err(Error::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn test_fetch_one_without_verify() {
        let client = client_with(vec![vec![entry("1.2.3.4", 3128, &["http"])]], vec![], 5);
        let record = client
            .fetch_one(&ProxyFilter::new(), false)
            .await
            .unwrap();
        assert_eq!(record.host, "1.2.3.4");
        assert_eq!(record.port, 3128);
    }

    #[tokio::test]
    async fn test_fetch_one_empty_listing_is_invalid_query() {
        let client = client_with(vec![vec![]], vec![], 5);
        let err = client
            .fetch_one(&ProxyFilter::new(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_verify_discards_failing_candidate() {
        let client = client_with(
            vec![
                vec![entry("1.1.1.1", 80, &["http"])],
                vec![entry("2.2.2.2", 81, &["http"])],
            ],
            vec![false, true],
            5,
        );
        let record = client.fetch_one(&ProxyFilter::new(), true).await.unwrap();
        assert_eq!(record.host, "2.2.2.2");
    }

    #[tokio::test]
    async fn test_verify_exhausts_retry_budget() {
        let batches = (0..3)
            .map(|_| vec![entry("1.1.1.1", 80, &["http"])])
            .collect();
        let source = FakeSource::new(batches);
        let client = ProxyClient::from_parts(
            Box::new(source),
            Box::new(FakeProber::new(vec![false, false, false])),
            3,
        );
        let err = client
            .fetch_one(&ProxyFilter::new(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProbeExhausted { attempts: 3 }));
    }

    #[tokio::test]
    async fn test_fetch_many_returns_exact_count() {
        let batches = (0..4)
            .map(|i| vec![entry(&format!("10.0.0.{}", i), 8000 + i as u16, &["http"])])
            .collect();
        let client = client_with(batches, vec![], 5);
        let records = client
            .fetch_many(4, &ProxyFilter::new(), false)
            .await
            .unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[3].host, "10.0.0.3");
    }

    #[tokio::test]
    async fn test_apply_fails_on_unparseable_protocol() {
        /// Configurator that must never be reached
        struct PanickingConfigurator;

        impl SystemProxyConfigurator for PanickingConfigurator {
            fn set_web_proxy(&self, _: &str, _: u16) -> Result<()> {
                panic!("configurator reached with an invalid record")
            }
            fn set_secure_web_proxy(&self, _: &str, _: u16) -> Result<()> {
                panic!("configurator reached with an invalid record")
            }
            fn set_socks_proxy(&self, _: &str, _: u16) -> Result<()> {
                panic!("configurator reached with an invalid record")
            }
            fn disable_web_proxy(&self) -> Result<()> {
                unreachable!()
            }
            fn disable_secure_web_proxy(&self) -> Result<()> {
                unreachable!()
            }
            fn disable_socks_proxy(&self) -> Result<()> {
                unreachable!()
            }
        }

        let client = client_with(vec![vec![entry("1.1.1.1", 80, &["quic"])]], vec![], 5);
        let err = client
            .apply(&ProxyFilter::new(), false, &PanickingConfigurator)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedProtocol(s) if s == "quic"));
    }

    #[tokio::test]
    async fn test_fetch_many_zero_makes_no_requests() {
        let source = FakeSource::new(vec![]);
        let fetches = Arc::clone(&source.fetches);
        let client = ProxyClient::from_parts(Box::new(source), Box::new(FakeProber::new(vec![])), 5);
        let records = client
            .fetch_many(0, &ProxyFilter::new(), true)
            .await
            .unwrap();
        assert!(records.is_empty());
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }
}
