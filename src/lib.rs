//! vethlink - veth pair attachment for network namespaces
//!
//! Connects a process's network namespace to a host bridge in two phases.
//! The host phase creates the pair and moves one end into the namespace, the
//! namespace phase renames and addresses that end. `NetworkState` carries the
//! device names between the phases, which may run as separate processes.

pub mod error;
pub mod manifest;
pub mod network;
pub mod state;

pub use error::{Error, Result};
pub use manifest::NetworkConfig;
pub use network::{ConfigureReport, Veth, Warning};
pub use state::NetworkState;
