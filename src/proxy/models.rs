//! Proxy data models

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Proxy protocol enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProxyType {
    #[default]
    Http,
    Https,
    Socks4,
    Socks5,
}

impl ProxyType {
    /// Timeout used when probing a candidate of this protocol.
    ///
    /// HTTPS probes pay for an extra TLS handshake through the relay and
    /// get a longer budget.
    pub fn probe_timeout(&self) -> Duration {
        match self {
            ProxyType::Https => Duration::from_secs(5),
            _ => Duration::from_secs(2),
        }
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyType::Http => write!(f, "http"),
            ProxyType::Https => write!(f, "https"),
            ProxyType::Socks4 => write!(f, "socks4"),
            ProxyType::Socks5 => write!(f, "socks5"),
        }
    }
}

impl FromStr for ProxyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(ProxyType::Http),
            "https" => Ok(ProxyType::Https),
            "socks4" => Ok(ProxyType::Socks4),
            "socks5" => Ok(ProxyType::Socks5),
            _ => Err(Error::UnsupportedProtocol(s.to_string())),
        }
    }
}

/// One candidate relay returned by the listing API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRecord {
    pub proxy_type: ProxyType,
    pub host: String,
    pub port: u16,
    pub country: Option<String>,
    pub anonymity: Option<String>,
}

impl ProxyRecord {
    pub fn new(proxy_type: ProxyType, host: String, port: u16) -> Self {
        Self {
            proxy_type,
            host,
            port,
            country: None,
            anonymity: None,
        }
    }

    /// Get the proxy URL string
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.proxy_type, self.host, self.port)
    }
}

impl fmt::Display for ProxyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_type_display() {
        assert_eq!(ProxyType::Http.to_string(), "http");
        assert_eq!(ProxyType::Https.to_string(), "https");
        assert_eq!(ProxyType::Socks4.to_string(), "socks4");
        assert_eq!(ProxyType::Socks5.to_string(), "socks5");
    }

    #[test]
    fn test_proxy_type_from_str() {
        assert_eq!("http".parse::<ProxyType>().unwrap(), ProxyType::Http);
        assert_eq!("SOCKS5".parse::<ProxyType>().unwrap(), ProxyType::Socks5);
    }

    #[test]
    fn test_proxy_type_from_str_rejects_unknown() {
        assert!(matches!(
            "gopher".parse::<ProxyType>(),
            Err(Error::UnsupportedProtocol(s)) if s == "gopher"
        ));
        assert!(matches!(
            "".parse::<ProxyType>(),
            Err(Error::UnsupportedProtocol(_))
        ));
    }

    #[test]
    fn test_probe_timeout() {
        assert_eq!(ProxyType::Https.probe_timeout(), Duration::from_secs(5));
        assert_eq!(ProxyType::Http.probe_timeout(), Duration::from_secs(2));
        assert_eq!(ProxyType::Socks5.probe_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_record_url() {
        let record = ProxyRecord::new(ProxyType::Http, "127.0.0.1".to_string(), 8080);
        assert_eq!(record.url(), "http://127.0.0.1:8080");
        assert_eq!(record.to_string(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_record_metadata_defaults() {
        let record = ProxyRecord::new(ProxyType::Socks4, "10.0.0.1".to_string(), 1080);
        assert!(record.country.is_none());
        assert!(record.anonymity.is_none());
    }
}
