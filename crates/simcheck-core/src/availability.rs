//! Runtime and device availability checks.
//!
//! Answers "can a simulator of device type D be created under runtime R?"
//! before a test run is launched. The inventory is fetched and parsed again
//! on every check.
//!
//! # Example
//!
//! ```no_run
//! use simcheck_core::availability::is_device_available;
//!
//! if let Err(e) = is_device_available("iOS 17.0", "iPhone 15") {
//!     eprintln!("{e}");
//! }
//! ```

use thiserror::Error;
use tracing::debug;

use crate::config::SimcheckConfig;
use crate::parser::{EnvironmentParser, InventoryProvider};
use crate::simctl::{SimctlError, SimctlListing};

/// Reasons a (runtime, device) pair is not available.
///
/// The `Display` output of the first two variants is relied upon by the
/// scripts that call `simcheck check`.
#[derive(Error, Debug)]
pub enum AvailabilityError {
    /// The runtime is not listed, or is listed with no devices.
    #[error("Could not find '{runtime}' runtime")]
    RuntimeNotFound { runtime: String },

    /// The runtime is listed but the device type is not among its devices.
    #[error("Could not find '{device}' device for '{runtime}' runtime")]
    DeviceNotFound { device: String, runtime: String },

    /// The simulator listing could not be obtained.
    #[error(transparent)]
    Fetch(#[from] SimctlError),
}

/// Something that can answer availability questions.
pub trait AvailabilityCheck {
    fn check_availability(&self, runtime: &str, device: &str) -> Result<(), AvailabilityError>;
}

/// Checks availability against an [`InventoryProvider`].
#[derive(Debug, Clone)]
pub struct SimulatorAvailability<P> {
    provider: P,
}

impl<P: InventoryProvider> SimulatorAvailability<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: InventoryProvider> AvailabilityCheck for SimulatorAvailability<P> {
    /// # Errors
    ///
    /// - [`AvailabilityError::Fetch`] if the inventory could not be built
    /// - [`AvailabilityError::RuntimeNotFound`] if `runtime` has no devices
    /// - [`AvailabilityError::DeviceNotFound`] if `device` is not listed under `runtime`
    fn check_availability(&self, runtime: &str, device: &str) -> Result<(), AvailabilityError> {
        let inventory = self.provider.parse_environment()?;

        if inventory.devices(runtime).unwrap_or_default().is_empty() {
            return Err(AvailabilityError::RuntimeNotFound {
                runtime: runtime.to_string(),
            });
        }

        if inventory.contains(runtime, device) {
            debug!(runtime, device, "Simulator available");
            return Ok(());
        }

        Err(AvailabilityError::DeviceNotFound {
            device: device.to_string(),
            runtime: runtime.to_string(),
        })
    }
}

/// Checks a (runtime, device) pair against the live `simctl` listing.
///
/// Uses the listing command from [`SimcheckConfig::load`], which defaults to
/// `xcrun simctl list`.
pub fn is_device_available(runtime: &str, device: &str) -> Result<(), AvailabilityError> {
    let listing = SimctlListing::from_config(&SimcheckConfig::load());
    SimulatorAvailability::new(EnvironmentParser::new(listing)).check_availability(runtime, device)
}
