//! CLI for checking iOS Simulator runtime and device availability.
//!
//! Test and release scripts call this before launching a simulator run so
//! that a missing runtime or device type fails fast with a clear message.
//!
//! # Usage
//!
//! ```bash
//! # Exit 0 if an "iPhone 15" can run on "iOS 17.0", exit 1 otherwise
//! simcheck check "iOS 17.0" "iPhone 15"
//!
//! # Same, as JSON
//! simcheck -f json check "iOS 17.0" "iPhone 15"
//!
//! # Show every runtime and its device types
//! simcheck list
//!
//! # Runtime names only
//! simcheck runtimes
//!
//! # Use a different listing command (see ~/.simcheck/config.json)
//! simcheck --config ./ci-simcheck.json list
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use simcheck_core::availability::{AvailabilityCheck, AvailabilityError, SimulatorAvailability};
use simcheck_core::config::SimcheckConfig;
use simcheck_core::inventory::Inventory;
use simcheck_core::parser::{EnvironmentParser, InventoryProvider};
use simcheck_core::simctl::SimctlListing;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Check iOS Simulator runtime and device availability.
#[derive(Parser)]
#[command(name = "simcheck")]
#[command(about = "Check which iOS Simulator runtimes and device types are available")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.simcheck/config.json)
    #[arg(short, long, env = "SIMCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Check that a device type is available under a runtime
    Check {
        /// Runtime name as shown by `simctl list` (e.g. "iOS 17.0")
        runtime: String,
        /// Device type name (e.g. "iPhone 15")
        device: String,
    },

    /// List every runtime and its device types
    List,

    /// List runtime names
    Runtimes,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            e.exit_code()
        }
    }
}

#[derive(Debug)]
enum CliError {
    /// The runtime or device is not available. Printed verbatim.
    Unavailable(String),
    Listing(String),
    Config(String),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Unavailable(_) => ExitCode::from(1),
            CliError::Listing(_) => ExitCode::from(2),
            CliError::Config(_) => ExitCode::from(3),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Unavailable(msg) => write!(f, "{}", msg),
            CliError::Listing(msg) => write!(f, "Error: Failed to list simulators: {}", msg),
            CliError::Config(msg) => write!(f, "Error: Failed to load config: {}", msg),
        }
    }
}

fn load_config(cli: &Cli) -> Result<SimcheckConfig, CliError> {
    match &cli.config {
        Some(path) => SimcheckConfig::load_from(path)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e))),
        None => Ok(SimcheckConfig::load()),
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let listing = SimctlListing::from_config(&config);
    debug!(program = listing.program(), "Using listing command");
    let parser = EnvironmentParser::new(listing);

    match &cli.command {
        Command::Check { runtime, device } => {
            let checker = SimulatorAvailability::new(parser);
            let result = checker.check_availability(runtime, device);
            report_check(cli, runtime, device, result)
        }
        Command::List => {
            let inventory = load_inventory(&parser)?;
            print_inventory(cli, &inventory)
        }
        Command::Runtimes => {
            let inventory = load_inventory(&parser)?;
            let runtimes = inventory.runtimes();
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "runtimes": runtimes }));
            } else if runtimes.is_empty() {
                if !cli.quiet {
                    eprintln!("No simulator runtimes found");
                }
            } else {
                for runtime in runtimes {
                    println!("{}", runtime);
                }
            }
            Ok(())
        }
    }
}

fn load_inventory(parser: &impl InventoryProvider) -> Result<Inventory, CliError> {
    parser
        .parse_environment()
        .map_err(|e| CliError::Listing(e.to_string()))
}

fn report_check(
    cli: &Cli,
    runtime: &str,
    device: &str,
    result: Result<(), AvailabilityError>,
) -> Result<(), CliError> {
    let err = match result {
        Ok(()) => None,
        Err(AvailabilityError::Fetch(e)) => return Err(CliError::Listing(e.to_string())),
        Err(e) => Some(e.to_string()),
    };

    if cli.format == OutputFormat::Json {
        let mut json = serde_json::json!({
            "available": err.is_none(),
            "runtime": runtime,
            "device": device,
        });
        if let Some(msg) = &err {
            json["error"] = serde_json::Value::String(msg.clone());
        }
        println!("{}", json);
    } else if err.is_none() && !cli.quiet {
        println!("'{}' is available for '{}' runtime", device, runtime);
    }

    match err {
        Some(msg) => Err(CliError::Unavailable(msg)),
        None => Ok(()),
    }
}

fn print_inventory(cli: &Cli, inventory: &Inventory) -> Result<(), CliError> {
    if cli.format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(inventory)
            .map_err(|e| CliError::Listing(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    if inventory.is_empty() {
        if !cli.quiet {
            eprintln!("No simulator runtimes found");
        }
        return Ok(());
    }

    for (runtime, devices) in inventory.iter() {
        println!("{}", runtime);
        for device in devices {
            println!("    {}", device);
        }
    }
    Ok(())
}
