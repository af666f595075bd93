//! Kernel link primitives
//!
//! Provides:
//! - The `LinkOps` capability set used by the veth strategy
//! - `IpRoute2`, a Linux implementation driving the iproute2 `ip` binary
//!
//! Every call is blocking and either fully applies or fails. A failure
//! carries the operation and device it was issued for.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Kernel network device operations
///
/// Veth creation reports a name collision as `Error::InterfaceExists`; every
/// other failure is an `Error::Primitive` or `Error::CommandFailed`.
pub trait LinkOps {
    /// Create a veth pair `name` <-> `peer`. A `tx_queue_len` of 0 keeps the kernel default.
    fn create_veth_pair(&self, name: &str, peer: &str, tx_queue_len: u32) -> Result<()>;

    /// Enslave `device` to the bridge `master`
    fn set_master(&self, device: &str, master: &str) -> Result<()>;

    fn set_mtu(&self, device: &str, mtu: u32) -> Result<()>;

    /// Set the administrative state of `device`
    fn set_up(&self, device: &str, up: bool) -> Result<()>;

    /// Move `device` into the network namespace of `pid`
    fn move_to_namespace(&self, device: &str, pid: i32) -> Result<()>;

    fn rename(&self, device: &str, new_name: &str) -> Result<()>;

    fn set_mac_address(&self, device: &str, mac: &str) -> Result<()>;

    /// Add an address in CIDR form (IPv4 or IPv6)
    fn add_address(&self, device: &str, cidr: &str) -> Result<()>;

    /// Install a default route via `gateway` out of `device`
    fn add_default_route(&self, device: &str, gateway: &str) -> Result<()>;
}

/// Link operations backed by the iproute2 `ip` command
#[derive(Debug, Clone)]
pub struct IpRoute2 {
    /// Path to the `ip` binary
    binary: PathBuf,
}

impl Default for IpRoute2 {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ip"),
        }
    }
}

impl IpRoute2 {
    /// Use a specific `ip` binary
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run `ip <args>`, returning trimmed stderr on a non-zero exit
    fn run(&self, op: &'static str, device: &str, args: &[&str]) -> Result<()> {
        debug!(op, device, args = ?args, "ip");

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| Error::CommandFailed {
                command: format!("{} {}", self.binary.display(), args.join(" ")),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::primitive(op, device, stderr.trim()));
        }

        Ok(())
    }
}

impl LinkOps for IpRoute2 {
    fn create_veth_pair(&self, name: &str, peer: &str, tx_queue_len: u32) -> Result<()> {
        let txqlen = tx_queue_len.to_string();
        let mut args = vec!["link", "add", name];
        if tx_queue_len > 0 {
            args.extend(["txqueuelen", txqlen.as_str()]);
        }
        args.extend(["type", "veth", "peer", "name", peer]);

        match self.run("create veth pair", name, &args) {
            // RTNETLINK answers: File exists
            Err(Error::Primitive { message, .. }) if message.contains("File exists") => {
                Err(Error::InterfaceExists(name.to_string()))
            }
            other => other,
        }
    }

    fn set_master(&self, device: &str, master: &str) -> Result<()> {
        self.run(
            "set master",
            device,
            &["link", "set", "dev", device, "master", master],
        )
    }

    fn set_mtu(&self, device: &str, mtu: u32) -> Result<()> {
        let mtu = mtu.to_string();
        self.run("set mtu", device, &["link", "set", "dev", device, "mtu", &mtu])
    }

    fn set_up(&self, device: &str, up: bool) -> Result<()> {
        let (op, state) = if up {
            ("interface up", "up")
        } else {
            ("interface down", "down")
        };
        self.run(op, device, &["link", "set", "dev", device, state])
    }

    fn move_to_namespace(&self, device: &str, pid: i32) -> Result<()> {
        let pid = pid.to_string();
        self.run(
            "move to namespace",
            device,
            &["link", "set", "dev", device, "netns", &pid],
        )
    }

    fn rename(&self, device: &str, new_name: &str) -> Result<()> {
        self.run(
            "rename",
            device,
            &["link", "set", "dev", device, "name", new_name],
        )
    }

    fn set_mac_address(&self, device: &str, mac: &str) -> Result<()> {
        self.run(
            "set mac",
            device,
            &["link", "set", "dev", device, "address", mac],
        )
    }

    fn add_address(&self, device: &str, cidr: &str) -> Result<()> {
        self.run("set ip", device, &["addr", "add", cidr, "dev", device])
    }

    fn add_default_route(&self, device: &str, gateway: &str) -> Result<()> {
        self.run(
            "set default gateway",
            device,
            &["route", "add", "default", "via", gateway, "dev", device],
        )
    }
}
