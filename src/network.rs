//! Veth network attachment for process namespaces
//!
//! Provides:
//! - Kernel link primitives (iproute2 backed)
//! - Random device naming
//! - Collision-tolerant veth pair allocation
//! - The two-phase veth strategy (host attach, namespace configure)
//! - DHCP client launch inside a namespace

pub mod dhcp;
pub mod link;
pub mod names;
pub mod pair;
pub mod veth;

#[cfg(test)]
pub(crate) mod testing;

pub use dhcp::{NamespaceExec, Nsenter};
pub use link::{IpRoute2, LinkOps};
pub use names::{NameGenerator, RandomNames};
pub use pair::VethPair;
pub use veth::{ConfigureReport, Veth, Warning};
