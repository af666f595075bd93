//! Configuration file parsing for vethlink
//!
//! Parses `vethlink.toml` configuration files using serde

use crate::error::{Error, Result};
use crate::network::names::MAX_IFNAME_LEN;
use crate::network::pair::SUFFIX_LEN;
use ipnet::{Ipv4Net, Ipv6Net};
use serde::Deserialize;
use std::fs;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

/// Conventional first-Ethernet name given to the device inside the namespace
pub const DEFAULT_DEVICE: &str = "eth0";

/// Load and validate configuration from a file
pub fn load(path: &Path) -> Result<NetworkConfig> {
    let content = fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: VethlinkConfig = toml::from_str(&content)?;
    config.network.validate()?;

    Ok(config.network)
}

/// Root configuration structure
#[derive(Debug, Deserialize)]
pub struct VethlinkConfig {
    /// The veth attachment to set up
    pub network: NetworkConfig,
}

/// Veth attachment configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkConfig {
    /// Bridge the host-side end is enslaved to (e.g., "br0")
    pub bridge: String,

    /// Prefix for generated device names (e.g., "veth")
    pub prefix: String,

    /// Transmit queue length for both ends; 0 keeps the kernel default
    #[serde(default)]
    pub tx_queue_length: u32,

    /// MTU applied to both ends
    #[serde(default = "default_mtu")]
    pub mtu: u32,

    /// Static MAC address for the namespace-side device
    pub mac_address: Option<String>,

    /// IPv4 address with prefix length (e.g., "10.0.0.5/24")
    pub address: Option<String>,

    /// Additional IPv6 address with prefix length
    pub ipv6_address: Option<String>,

    /// IPv4 default gateway
    pub gateway: Option<String>,

    /// IPv6 default gateway
    pub ipv6_gateway: Option<String>,

    /// Launch a DHCP client inside the namespace once static setup is done
    #[serde(default)]
    pub dhcp: bool,

    /// Name the migrated device takes inside the namespace
    #[serde(default = "default_device")]
    pub device: String,
}

fn default_mtu() -> u32 {
    1500
}

fn default_device() -> String {
    DEFAULT_DEVICE.to_string()
}

impl NetworkConfig {
    /// Create a configuration with defaults for everything but bridge and prefix
    pub fn new(bridge: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            bridge: bridge.into(),
            prefix: prefix.into(),
            tx_queue_length: 0,
            mtu: default_mtu(),
            mac_address: None,
            address: None,
            ipv6_address: None,
            gateway: None,
            ipv6_gateway: None,
            dhcp: false,
            device: default_device(),
        }
    }

    pub fn with_mtu(mut self, mtu: u32) -> Self {
        self.mtu = mtu;
        self
    }

    pub fn with_tx_queue_length(mut self, len: u32) -> Self {
        self.tx_queue_length = len;
        self
    }

    /// Set static MAC address for the namespace-side device
    pub fn with_mac_address(mut self, mac: impl Into<String>) -> Self {
        self.mac_address = Some(mac.into());
        self
    }

    pub fn with_address(mut self, cidr: impl Into<String>) -> Self {
        self.address = Some(cidr.into());
        self
    }

    pub fn with_ipv6_address(mut self, cidr: impl Into<String>) -> Self {
        self.ipv6_address = Some(cidr.into());
        self
    }

    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = Some(gateway.into());
        self
    }

    pub fn with_ipv6_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.ipv6_gateway = Some(gateway.into());
        self
    }

    pub fn with_dhcp(mut self, dhcp: bool) -> Self {
        self.dhcp = dhcp;
        self
    }

    /// Override the in-namespace device name
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.bridge.is_empty() {
            return Err(Error::ConfigValidation("bridge is not specified".into()));
        }
        if self.prefix.is_empty() {
            return Err(Error::ConfigValidation("veth prefix is not specified".into()));
        }
        if self.prefix.len() + SUFFIX_LEN > MAX_IFNAME_LEN {
            return Err(Error::ConfigValidation(format!(
                "veth prefix '{}' is too long (max {} chars)",
                self.prefix,
                MAX_IFNAME_LEN - SUFFIX_LEN
            )));
        }
        if self.device.is_empty() || self.device.len() > MAX_IFNAME_LEN {
            return Err(Error::ConfigValidation(format!("invalid device name '{}'", self.device)));
        }
        if self.mtu == 0 {
            return Err(Error::ConfigValidation("mtu must be greater than 0".into()));
        }

        if let Some(addr) = &self.address {
            addr.parse::<Ipv4Net>().map_err(|e| {
                Error::ConfigValidation(format!("Invalid IPv4 address '{}': {}", addr, e))
            })?;
        } else if !self.dhcp {
            return Err(Error::ConfigValidation(
                "an IPv4 address is required unless dhcp is enabled".into(),
            ));
        }
        if let Some(addr) = &self.ipv6_address {
            addr.parse::<Ipv6Net>().map_err(|e| {
                Error::ConfigValidation(format!("Invalid IPv6 address '{}': {}", addr, e))
            })?;
        }
        if let Some(gw) = &self.gateway {
            gw.parse::<Ipv4Addr>().map_err(|e| {
                Error::ConfigValidation(format!("Invalid IPv4 gateway '{}': {}", gw, e))
            })?;
        }
        if let Some(gw) = &self.ipv6_gateway {
            gw.parse::<Ipv6Addr>().map_err(|e| {
                Error::ConfigValidation(format!("Invalid IPv6 gateway '{}': {}", gw, e))
            })?;
        }
        if let Some(mac) = &self.mac_address {
            let octets: Vec<&str> = mac.split(':').collect();
            if octets.len() != 6
                || octets
                    .iter()
                    .any(|o| o.len() != 2 || u8::from_str_radix(o, 16).is_err())
            {
                return Err(Error::ConfigValidation(format!("Invalid MAC address format: {}", mac)));
            }
        }

        Ok(())
    }
}
