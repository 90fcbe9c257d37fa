//! Search filters for the listing API

use crate::proxy::models::ProxyType;

/// Filter narrowing which proxies the listing endpoint returns.
///
/// All fields are optional; unset fields are simply omitted from the
/// query. Values are not validated client-side, a filter combination the
/// endpoint rejects surfaces as an invalid-query error on fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyFilter {
    pub proxy_type: Option<ProxyType>,
    pub country: Option<String>,
    pub level: Option<String>,
}

impl ProxyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_proxy_type(mut self, proxy_type: ProxyType) -> Self {
        self.proxy_type = Some(proxy_type);
        self
    }

    /// ISO country code to search in
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Provider-supplied anonymity level (e.g. "anonymous", "elite")
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Build the query parameters for one request.
    ///
    /// Returns a fresh list on every call; nothing is accumulated on the
    /// filter itself, so repeated fetches with the same filter send the
    /// same query.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(proxy_type) = self.proxy_type {
            params.push(("type", proxy_type.to_string()));
        }
        if let Some(country) = &self.country {
            params.push(("country", country.to_lowercase()));
        }
        if let Some(level) = &self.level {
            params.push(("level", level.to_lowercase()));
        }
        params
    }
}
