//! Veth attachment strategy
//!
//! A veth pair connects a process's network namespace to a host bridge:
//! - `attach` runs in the host namespace. It creates the pair, enslaves one
//!   end to the bridge and moves the other into the target namespace.
//! - `configure` runs inside the target namespace. It renames the moved end,
//!   gives it addresses and routes, and optionally starts a DHCP client.
//!
//! Devices are never deleted here. They live as long as the namespace does.

use crate::error::{Error, Result};
use crate::manifest::NetworkConfig;
use crate::network::dhcp::{self, DHCLIENT, NamespaceExec, Nsenter};
use crate::network::link::{IpRoute2, LinkOps};
use crate::network::names::{NameGenerator, RandomNames};
use crate::network::pair;
use crate::state::NetworkState;
use std::fmt;
use tracing::{info, warn};

/// Non-fatal problem met while configuring
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The DHCP client could not be started; static configuration still applies
    DhcpLaunch { message: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DhcpLaunch { message } => write!(f, "DHCP client not started: {}", message),
        }
    }
}

/// Result of a successful `configure`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureReport {
    /// Device name inside the namespace
    pub device: String,
    /// Best-effort steps that did not succeed
    pub warnings: Vec<Warning>,
}

impl ConfigureReport {
    /// True when every requested step, DHCP included, went through
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Veth network strategy over pluggable link, naming and namespace operations
#[derive(Debug, Clone, Default)]
pub struct Veth<L = IpRoute2, G = RandomNames, E = Nsenter> {
    links: L,
    names: G,
    exec: E,
}

impl Veth {
    /// Strategy backed by iproute2, `rand` names and `nsenter`
    pub fn system() -> Self {
        Self::default()
    }
}

impl<L, G, E> Veth<L, G, E>
where
    L: LinkOps,
    G: NameGenerator,
    E: NamespaceExec,
{
    pub fn new(links: L, names: G, exec: E) -> Self {
        Self { links, names, exec }
    }

    pub fn links(&self) -> &L {
        &self.links
    }

    pub fn exec(&self) -> &E {
        &self.exec
    }

    /// Host phase: create the pair, bridge the host end, hand the peer to `pid`
    ///
    /// Must run in the host namespace. On success `state` records both device
    /// names and `pid`. A failure part way leaves earlier steps in place.
    pub fn attach(&self, config: &NetworkConfig, pid: i32, state: &mut NetworkState) -> Result<()> {
        if config.bridge.is_empty() {
            return Err(Error::ConfigValidation("bridge is not specified".into()));
        }
        if config.prefix.is_empty() {
            return Err(Error::ConfigValidation("veth prefix is not specified".into()));
        }
        if pid <= 0 {
            return Err(Error::ConfigValidation(format!(
                "namespace PID must be positive, got {}",
                pid
            )));
        }
        if state.is_attached() {
            return Err(Error::ConfigValidation(format!(
                "network state already holds devices {} and {}",
                state.host_device, state.namespace_device
            )));
        }

        let pair = pair::allocate(
            &self.links,
            &self.names,
            &config.prefix,
            config.tx_queue_length,
        )?;

        self.links.set_master(&pair.host, &config.bridge)?;
        self.links.set_mtu(&pair.host, config.mtu)?;
        self.links.set_up(&pair.host, true)?;

        // From here on the peer is only visible inside the target namespace
        self.links.move_to_namespace(&pair.peer, pid)?;

        info!(
            host = %pair.host,
            peer = %pair.peer,
            bridge = %config.bridge,
            pid,
            "attached veth pair"
        );

        state.host_device = pair.host;
        state.namespace_device = pair.peer;
        state.namespace_pid = pid;

        Ok(())
    }

    /// Namespace phase: bring the moved device up as `config.device`
    ///
    /// Must run with the calling process already inside the namespace that
    /// received `state.namespace_device`. Steps run in order and the first
    /// failure stops the rest. A DHCP launch failure is reported as a warning.
    pub fn configure(
        &self,
        config: &NetworkConfig,
        state: &NetworkState,
    ) -> Result<ConfigureReport> {
        let moved = state.namespace_device.as_str();
        if moved.is_empty() {
            return Err(Error::ConfigValidation("namespace device is not specified".into()));
        }
        let device = config.device.as_str();

        // Some kernels refuse to rename a running device
        self.links.set_up(moved, false)?;
        self.links.rename(moved, device)?;

        if let Some(mac) = &config.mac_address {
            self.links.set_mac_address(device, mac)?;
        }
        if let Some(addr) = &config.address {
            self.links.add_address(device, addr)?;
        }
        if let Some(addr) = &config.ipv6_address {
            self.links.add_address(device, addr)?;
        }

        self.links.set_mtu(device, config.mtu)?;
        self.links.set_up(device, true)?;

        if let Some(gw) = &config.gateway {
            self.links.add_default_route(device, gw)?;
        }
        if let Some(gw) = &config.ipv6_gateway {
            self.links.add_default_route(device, gw)?;
        }

        let mut warnings = Vec::new();
        if config.dhcp {
            let pid = state.namespace_pid;
            let args = dhcp::dhclient_args(pid, device);
            if let Err(e) = self.exec.spawn(pid, DHCLIENT, &args) {
                warn!(device, pid, error = %e, "failed to start dhclient");
                warnings.push(Warning::DhcpLaunch {
                    message: e.to_string(),
                });
            }
        }

        info!(from = moved, device, "configured namespace device");

        Ok(ConfigureReport {
            device: device.to_string(),
            warnings,
        })
    }
}
