//! Proxyscan - proxy listing client and system proxy switcher
//!
//! A thin client over the proxyscan.io listing API. It fetches candidate
//! proxies with an optional filter, verifies them by probing through the
//! candidate, and exposes results as values, a CSV file, or an applied
//! system proxy setting.

pub mod error;
pub mod proxy;
pub mod system;

pub use error::{Error, Result};
pub use proxy::*;
pub use system::{apply_record, clear_proxy, Networksetup, SystemProxyConfigurator};
