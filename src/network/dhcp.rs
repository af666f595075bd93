//! DHCP client launch inside a network namespace
//!
//! The client is started and left to run on its own. Its lease and pid files
//! are keyed by the namespace pid so concurrent namespaces never share them.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// DHCP client binary
pub const DHCLIENT: &str = "dhclient";

/// Runs commands as if inside the network namespace of a process
pub trait NamespaceExec {
    /// Start `program` with `args` in the namespace of `pid`
    ///
    /// Returns once the program has started and reported its initial exit
    /// status (a daemonizing client exits as soon as it forks).
    fn spawn(&self, pid: i32, program: &str, args: &[String]) -> Result<()>;
}

/// Enters the namespace with `nsenter --target <pid> --net`
#[derive(Debug, Clone)]
pub struct Nsenter {
    /// Path to the `nsenter` binary
    binary: PathBuf,
}

impl Default for Nsenter {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("nsenter"),
        }
    }
}

impl Nsenter {
    /// Use a specific `nsenter` binary
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl NamespaceExec for Nsenter {
    fn spawn(&self, pid: i32, program: &str, args: &[String]) -> Result<()> {
        let pid = pid.to_string();
        debug!(pid = %pid, program, args = ?args, "nsenter");

        let command = || {
            format!(
                "{} --target {} --net -- {}",
                self.binary.display(),
                pid,
                program
            )
        };

        let status = Command::new(&self.binary)
            .args(["--target", &pid, "--net", "--", program])
            .args(args)
            .status()
            .map_err(|e| Error::CommandFailed {
                command: command(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::CommandFailed {
                command: command(),
                message: format!("exited with {}", status),
            });
        }

        Ok(())
    }
}

/// Pid file for the DHCP client serving namespace `pid`
pub fn pid_file(pid: i32) -> String {
    format!("/var/run/dhclient-{}.pid", pid)
}

/// Lease file for the DHCP client serving namespace `pid`
pub fn lease_file(pid: i32) -> String {
    format!("/var/lib/dhclient/{}.lease", pid)
}

/// Arguments for an IPv4-only client on `device`
pub fn dhclient_args(pid: i32, device: &str) -> Vec<String> {
    vec![
        "-4".to_string(),
        "-pf".to_string(),
        pid_file(pid),
        "-lf".to_string(),
        lease_file(pid),
        device.to_string(),
    ]
}
