//! macOS proxy configuration via networksetup(8)

use crate::error::Result;
use crate::system::configurator::SystemProxyConfigurator;
use std::ffi::OsStr;
use std::io::{self, ErrorKind};
use std::process::{Command, Stdio};

/// Network service whose proxy settings are changed by default
pub const DEFAULT_SERVICE: &str = "Wi-Fi";

fn run_command<I, S>(cmd: &str, args: I) -> io::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut handle = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let status = handle.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::new(
            ErrorKind::Other,
            format!("Subcommand exit status: {}", status),
        ))
    }
}

/// Configurator shelling out to networksetup(8)
pub struct Networksetup {
    service: String,
}

impl Networksetup {
    /// Configure the given network service (e.g. "Wi-Fi", "Ethernet")
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn set(&self, subcommand: &str, host: &str, port: u16) -> Result<()> {
        let port = port.to_string();
        run_command(
            "networksetup",
            [subcommand, self.service.as_str(), host, port.as_str()],
        )?;
        Ok(())
    }

    fn disable(&self, subcommand: &str) -> Result<()> {
        run_command("networksetup", [subcommand, self.service.as_str(), "off"])?;
        Ok(())
    }
}

impl Default for Networksetup {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE)
    }
}

impl SystemProxyConfigurator for Networksetup {
    fn set_web_proxy(&self, host: &str, port: u16) -> Result<()> {
        self.set("-setwebproxy", host, port)
    }

    fn set_secure_web_proxy(&self, host: &str, port: u16) -> Result<()> {
        self.set("-setsecurewebproxy", host, port)
    }

    fn set_socks_proxy(&self, host: &str, port: u16) -> Result<()> {
        self.set("-setsocksfirewallproxy", host, port)
    }

    fn disable_web_proxy(&self) -> Result<()> {
        self.disable("-setwebproxystate")
    }

    fn disable_secure_web_proxy(&self) -> Result<()> {
        self.disable("-setsecurewebproxystate")
    }

    fn disable_socks_proxy(&self) -> Result<()> {
        self.disable("-setsocksfirewallproxystate")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_service() {
        let configurator = Networksetup::default();
        assert_eq!(configurator.service, DEFAULT_SERVICE);
    }

    #[test]
    fn test_custom_service() {
        let configurator = Networksetup::new("Ethernet");
        assert_eq!(configurator.service, "Ethernet");
    }
}
