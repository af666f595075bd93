//! vethlink - veth pair attachment for network namespaces
//!
//! `attach` runs on the host, `configure` runs inside the target namespace.
//! The state file carries the device names from one to the other.

mod cli;

use cli::{Cli, Commands};
use nix::sys::signal::kill;
use nix::unistd::Pid;
use tracing_subscriber::EnvFilter;
use vethlink::error::{Error, Result};
use vethlink::{NetworkState, Veth, manifest};

fn main() {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the tracing subscriber, honouring `RUST_LOG` when set
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Completion { shell } => {
            Cli::generate_completion(shell);
        }

        Commands::Check => {
            let config = manifest::load(&cli.config)?;
            println!("Configuration is valid");
            println!("  Bridge: {}", config.bridge);
            println!("  Prefix: {}", config.prefix);
            println!("  Device: {}", config.device);
        }

        Commands::Attach { pid } => {
            let config = manifest::load(&cli.config)?;

            // Signal 0 only checks that the process exists
            kill(Pid::from_raw(pid), None).map_err(|_| Error::ProcessNotFound(pid))?;

            let mut state = NetworkState::default();
            Veth::system().attach(&config, pid, &mut state)?;
            state.save(&cli.state)?;

            println!(
                "Attached {} to bridge '{}', moved {} into namespace of PID {}",
                state.host_device, config.bridge, state.namespace_device, pid
            );
        }

        Commands::Configure => {
            let config = manifest::load(&cli.config)?;
            let state = NetworkState::load(&cli.state)?;

            let report = Veth::system().configure(&config, &state)?;

            println!("Configured {} as {}", state.namespace_device, report.device);
            for warning in &report.warnings {
                println!("  Warning: {}", warning);
            }
        }

        Commands::State { json } => {
            let state = NetworkState::load(&cli.state)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                println!("Host device:      {}", state.host_device);
                println!("Namespace device: {}", state.namespace_device);
                println!("Namespace PID:    {}", state.namespace_pid);
            }
        }
    }

    Ok(())
}
