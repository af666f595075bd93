//! Veth pair allocation
//!
//! Both ends get random names, so two invocations on the same host can pick
//! the same name. A collision is retried with fresh names, a bounded number
//! of times. Any other failure stops allocation immediately.

use crate::error::{Error, Result};
use crate::network::link::LinkOps;
use crate::network::names::NameGenerator;
use tracing::{debug, warn};

/// Allocation attempts before giving up on collisions
pub const MAX_ATTEMPTS: usize = 10;

/// Random characters appended to the prefix
pub const SUFFIX_LEN: usize = 7;

/// A created veth pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VethPair {
    /// End that stays in the host namespace
    pub host: String,
    /// End that is moved into the target namespace
    pub peer: String,
}

/// Outcome of one allocation attempt
#[derive(Debug)]
enum Attempt {
    Created(VethPair),
    Collision(String),
    Fatal(Error),
}

/// Create a veth pair named `<prefix><7 random chars>` on both ends
pub fn allocate<L, G>(links: &L, names: &G, prefix: &str, tx_queue_len: u32) -> Result<VethPair>
where
    L: LinkOps + ?Sized,
    G: NameGenerator + ?Sized,
{
    for attempt in 1..=MAX_ATTEMPTS {
        match try_create(links, names, prefix, tx_queue_len) {
            Attempt::Created(pair) => {
                debug!(host = %pair.host, peer = %pair.peer, attempt, "created veth pair");
                return Ok(pair);
            }
            Attempt::Collision(name) => {
                warn!(name = %name, attempt, "veth name already in use, retrying");
            }
            Attempt::Fatal(e) => return Err(e),
        }
    }

    Err(Error::NamesExhausted {
        attempts: MAX_ATTEMPTS,
    })
}

fn try_create<L, G>(links: &L, names: &G, prefix: &str, tx_queue_len: u32) -> Attempt
where
    L: LinkOps + ?Sized,
    G: NameGenerator + ?Sized,
{
    let host = match names.generate(prefix, SUFFIX_LEN) {
        Ok(name) => name,
        Err(e) => return Attempt::Fatal(e),
    };
    let peer = match names.generate(prefix, SUFFIX_LEN) {
        Ok(name) => name,
        Err(e) => return Attempt::Fatal(e),
    };

    // Both draws landing on the same name can never be created
    if host == peer {
        return Attempt::Collision(peer);
    }

    match links.create_veth_pair(&host, &peer, tx_queue_len) {
        Ok(()) => Attempt::Created(VethPair { host, peer }),
        Err(Error::InterfaceExists(name)) => Attempt::Collision(name),
        Err(e) => Attempt::Fatal(e),
    }
}
