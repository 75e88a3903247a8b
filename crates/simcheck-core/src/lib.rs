//! # simcheck-core
//!
//! Simulator runtime and device discovery for macOS test tooling.
//!
//! This crate runs `xcrun simctl list`, turns its text output into an
//! [`Inventory`] of runtimes and the device types available under each, and
//! answers whether a given (runtime, device) pair exists before an expensive
//! test run is started.
//!
//! ## Modules
//!
//! - [`simctl`] - Runs the listing command ([`ListingSource`])
//! - [`parser`] - Parses the listing into an inventory ([`InventoryProvider`])
//! - [`availability`] - Availability checks ([`AvailabilityCheck`])
//! - [`inventory`] - The runtime → devices container
//! - [`config`] - Persistent configuration in `~/.simcheck/config.json`
//!
//! ## External Dependencies
//!
//! - **Xcode** (for `xcrun simctl`) unless another listing command is configured
//!
//! ## Example
//!
//! ```no_run
//! use simcheck_core::availability::{AvailabilityCheck, SimulatorAvailability};
//! use simcheck_core::parser::EnvironmentParser;
//! use simcheck_core::simctl::SimctlListing;
//!
//! let checker = SimulatorAvailability::new(EnvironmentParser::new(SimctlListing::default()));
//! match checker.check_availability("iOS 17.0", "iPhone 15") {
//!     Ok(()) => println!("ready to test"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

pub mod availability;
pub mod config;
pub mod inventory;
pub mod parser;
pub mod simctl;

pub use availability::{
    is_device_available, AvailabilityCheck, AvailabilityError, SimulatorAvailability,
};
pub use config::SimcheckConfig;
pub use inventory::Inventory;
pub use parser::{parse_listing, EnvironmentParser, InventoryProvider};
pub use simctl::{ListingSource, SimctlError, SimctlListing};
