//! Recording test doubles for link, naming and namespace operations

use crate::error::{Error, Result};
use crate::network::dhcp::NamespaceExec;
use crate::network::link::LinkOps;
use crate::network::names::NameGenerator;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Records every call in order and fails the ones it is told to
#[derive(Debug, Default)]
pub struct Recorder {
    calls: RefCell<Vec<String>>,
    fail_on: Vec<String>,
    collisions: Cell<usize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call whose recorded line starts with `pattern`
    pub fn fail_on(mut self, pattern: &str) -> Self {
        self.fail_on.push(pattern.to_string());
        self
    }

    /// Report the first `n` veth creations as name collisions
    pub fn collide_times(self, n: usize) -> Self {
        self.collisions.set(n);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Recorded lines, reduced to the call name
    pub fn ops(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }

    fn record(&self, op: &'static str, device: &str, line: String) -> Result<()> {
        let failing = self.fail_on.iter().any(|p| line.starts_with(p.as_str()));
        self.calls.borrow_mut().push(line);

        if failing {
            return Err(Error::primitive(op, device, "injected failure"));
        }
        Ok(())
    }
}

impl LinkOps for Recorder {
    fn create_veth_pair(&self, name: &str, peer: &str, tx_queue_len: u32) -> Result<()> {
        self.record(
            "create veth pair",
            name,
            format!("create_veth_pair {} {} {}", name, peer, tx_queue_len),
        )?;

        let remaining = self.collisions.get();
        if remaining > 0 {
            self.collisions.set(remaining - 1);
            return Err(Error::InterfaceExists(name.to_string()));
        }
        Ok(())
    }

    fn set_master(&self, device: &str, master: &str) -> Result<()> {
        self.record("set master", device, format!("set_master {} {}", device, master))
    }

    fn set_mtu(&self, device: &str, mtu: u32) -> Result<()> {
        self.record("set mtu", device, format!("set_mtu {} {}", device, mtu))
    }

    fn set_up(&self, device: &str, up: bool) -> Result<()> {
        let op = if up { "interface up" } else { "interface down" };
        self.record(op, device, format!("set_up {} {}", device, up))
    }

    fn move_to_namespace(&self, device: &str, pid: i32) -> Result<()> {
        self.record(
            "move to namespace",
            device,
            format!("move_to_namespace {} {}", device, pid),
        )
    }

    fn rename(&self, device: &str, new_name: &str) -> Result<()> {
        self.record("rename", device, format!("rename {} {}", device, new_name))
    }

    fn set_mac_address(&self, device: &str, mac: &str) -> Result<()> {
        self.record("set mac", device, format!("set_mac_address {} {}", device, mac))
    }

    fn add_address(&self, device: &str, cidr: &str) -> Result<()> {
        self.record("set ip", device, format!("add_address {} {}", device, cidr))
    }

    fn add_default_route(&self, device: &str, gateway: &str) -> Result<()> {
        self.record(
            "set default gateway",
            device,
            format!("add_default_route {} {}", device, gateway),
        )
    }
}

impl NamespaceExec for Recorder {
    fn spawn(&self, pid: i32, program: &str, args: &[String]) -> Result<()> {
        self.record(
            "spawn",
            program,
            format!("spawn {} {} {}", pid, program, args.join(" ")),
        )
    }
}

/// Hands out a fixed sequence of names
#[derive(Debug, Default)]
pub struct Sequence {
    names: RefCell<VecDeque<String>>,
}

impl Sequence {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: RefCell::new(names.iter().map(|n| n.to_string()).collect()),
        }
    }
}

impl NameGenerator for Sequence {
    fn generate(&self, _prefix: &str, _len: usize) -> Result<String> {
        self.names
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::NameGeneration("sequence exhausted".into()))
    }
}

/// Write an executable shell script standing in for an external command
///
/// The script saves its arguments, one per line, to `<name>.argv` in `dir`,
/// then runs `body`.
pub fn fake_command(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let argv = dir.join(format!("{}.argv", name));
    let script = format!(
        "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\n{}\n",
        argv.display(),
        body
    );

    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Arguments the last run of a `fake_command` script received
pub fn recorded_argv(dir: &Path, name: &str) -> Vec<String> {
    fs::read_to_string(dir.join(format!("{}.argv", name)))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
