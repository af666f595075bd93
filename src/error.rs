//! Unified error types for vethlink

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vethlink operations
#[derive(Error, Debug)]
pub enum Error {
    // Config errors
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation failed: {0}")]
    ConfigValidation(String),

    // State errors
    #[error("Failed to read network state '{path}': {source}")]
    StateRead { path: PathBuf, source: io::Error },

    #[error("Failed to write network state '{path}': {source}")]
    StateWrite { path: PathBuf, source: io::Error },

    #[error("Failed to parse network state: {0}")]
    StateParse(#[from] serde_json::Error),

    // Device naming errors
    #[error("Failed to generate device name: {0}")]
    NameGeneration(String),

    #[error("could not allocate unique device names after {attempts} attempts")]
    NamesExhausted { attempts: usize },

    // Kernel primitive errors
    #[error("Interface '{0}' already exists")]
    InterfaceExists(String),

    #[error("{op} failed on '{device}': {message}")]
    Primitive {
        op: &'static str,
        device: String,
        message: String,
    },

    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    // Namespace errors
    #[error("No process with PID {0} to take the namespace from")]
    ProcessNotFound(i32),
}

impl Error {
    /// Build a primitive failure for `op` on `device`
    pub fn primitive(op: &'static str, device: &str, message: impl Into<String>) -> Self {
        Error::Primitive {
            op,
            device: device.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for vethlink operations
pub type Result<T> = std::result::Result<T, Error>;
