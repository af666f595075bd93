//! Random device name generation
//!
//! Names are `<prefix><suffix>` where the suffix is lowercase hex drawn from
//! the thread-local RNG. Linux caps interface names at `IF_NAMESIZE - 1` bytes.

use crate::error::{Error, Result};
use rand::RngCore;

/// Longest interface name the kernel accepts
pub const MAX_IFNAME_LEN: usize = libc::IF_NAMESIZE - 1;

/// Source of candidate device names
pub trait NameGenerator {
    /// Produce `prefix` followed by `len` random characters
    fn generate(&self, prefix: &str, len: usize) -> Result<String>;
}

/// Hex-suffixed names from `rand`
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNames;

impl NameGenerator for RandomNames {
    fn generate(&self, prefix: &str, len: usize) -> Result<String> {
        if prefix.len() + len > MAX_IFNAME_LEN {
            return Err(Error::NameGeneration(format!(
                "'{}' plus {} characters exceeds {} bytes",
                prefix, len, MAX_IFNAME_LEN
            )));
        }

        let mut bytes = vec![0u8; len.div_ceil(2)];
        rand::rng().fill_bytes(&mut bytes);

        let mut suffix = hex::encode(bytes);
        suffix.truncate(len);

        Ok(format!("{}{}", prefix, suffix))
    }
}
