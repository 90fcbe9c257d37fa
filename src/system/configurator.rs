//! OS proxy configuration behind a narrow interface

use crate::error::Result;
use crate::proxy::models::{ProxyRecord, ProxyType};

/// Applies and clears proxy settings on the running system.
///
/// The three setter/disabler pairs mirror the web, secure-web and SOCKS
/// proxy slots a network service exposes. Implementations only run
/// commands; routing a record to the right slot happens in
/// [`apply_record`] and [`clear_proxy`].
pub trait SystemProxyConfigurator {
    fn set_web_proxy(&self, host: &str, port: u16) -> Result<()>;
    fn set_secure_web_proxy(&self, host: &str, port: u16) -> Result<()>;
    fn set_socks_proxy(&self, host: &str, port: u16) -> Result<()>;
    fn disable_web_proxy(&self) -> Result<()>;
    fn disable_secure_web_proxy(&self) -> Result<()>;
    fn disable_socks_proxy(&self) -> Result<()>;
}

/// Route a record to the proxy slot matching its protocol
pub fn apply_record(
    configurator: &dyn SystemProxyConfigurator,
    record: &ProxyRecord,
) -> Result<()> {
    match record.proxy_type {
        ProxyType::Http => configurator.set_web_proxy(&record.host, record.port),
        ProxyType::Https => configurator.set_secure_web_proxy(&record.host, record.port),
        ProxyType::Socks4 | ProxyType::Socks5 => {
            configurator.set_socks_proxy(&record.host, record.port)
        }
    }
}

/// Turn off one proxy type, or all of them when `kind` is `None`
pub fn clear_proxy(
    configurator: &dyn SystemProxyConfigurator,
    kind: Option<ProxyType>,
) -> Result<()> {
    match kind {
        Some(ProxyType::Http) => configurator.disable_web_proxy(),
        Some(ProxyType::Https) => configurator.disable_secure_web_proxy(),
        Some(ProxyType::Socks4) | Some(ProxyType::Socks5) => configurator.disable_socks_proxy(),
        None => {
            configurator.disable_web_proxy()?;
            configurator.disable_secure_web_proxy()?;
            configurator.disable_socks_proxy()
        }
    }
}
