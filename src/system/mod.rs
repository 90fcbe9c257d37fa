//! System network-proxy configuration

pub mod configurator;
pub mod macos;

pub use configurator::{apply_record, clear_proxy, SystemProxyConfigurator};
pub use macos::Networksetup;
