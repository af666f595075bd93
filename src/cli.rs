//! Command-line interface for vethlink
//!
//! Uses clap with derive for type-safe CLI parsing

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// vethlink - attach a network namespace to a host bridge over a veth pair
#[derive(Parser)]
#[command(name = "vethlink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "vethlink.toml")]
    pub config: PathBuf,

    /// Network state file shared between attach and configure
    #[arg(short, long, default_value = "/run/vethlink/state.json")]
    pub state: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Host phase: create a veth pair, bridge one end, move the other into a namespace
    Attach {
        /// Process whose network namespace receives the peer device
        #[arg(short, long)]
        pid: i32,
    },

    /// Namespace phase: rename, address and bring up the moved device
    ///
    /// Must be run from inside the target network namespace.
    Configure,

    /// Validate configuration
    Check,

    /// Print the saved network state
    State {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Generate shell completion scripts
    pub fn generate_completion(shell: Shell) {
        let mut cmd = Self::command();
        clap_complete::generate(shell, &mut cmd, "vethlink", &mut std::io::stdout());
    }
}
