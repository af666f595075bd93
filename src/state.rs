//! Network state handed from the host phase to the namespace phase
//!
//! The two phases may run as separate invocations, so the record is persisted
//! as JSON between them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Devices and namespace produced by attach
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkState {
    /// Host-side veth end, enslaved to the bridge
    pub host_device: String,
    /// Generated name of the end moved into the namespace
    pub namespace_device: String,
    /// Process whose network namespace holds `namespace_device`
    pub namespace_pid: i32,
}

impl NetworkState {
    /// Whether attach has already recorded a device pair
    pub fn is_attached(&self) -> bool {
        !self.host_device.is_empty() || !self.namespace_device.is_empty()
    }

    /// Load state from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading network state");

        let content = fs::read_to_string(path).map_err(|e| Error::StateRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Write state to a JSON file
    ///
    /// The file is written beside its destination and renamed into place.
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "saving network state");

        let write_err = |e: std::io::Error| Error::StateWrite {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, content).map_err(write_err)?;
        fs::rename(&tmp, path).map_err(write_err)?;

        Ok(())
    }
}
