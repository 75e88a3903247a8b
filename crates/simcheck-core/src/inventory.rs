//! Structured view of the simulator environment.
//!
//! An [`Inventory`] maps each runtime name (e.g. `"iOS 17.0"`) to the device
//! types listed under it, in the order the listing tool printed them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Runtimes and the device types available under each of them.
///
/// Built fresh by every parse; nothing is shared between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    runtimes: BTreeMap<String, Vec<String>>,
}

impl Inventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the devices for a runtime, replacing any earlier list for the
    /// same runtime name.
    pub fn insert(&mut self, runtime: impl Into<String>, devices: Vec<String>) {
        self.runtimes.insert(runtime.into(), devices);
    }

    /// Returns the names of all runtimes, in sorted order.
    ///
    /// Runtimes with an empty device list are included.
    pub fn runtimes(&self) -> Vec<&str> {
        self.runtimes.keys().map(String::as_str).collect()
    }

    /// Returns the devices listed under `runtime`, or `None` if the runtime
    /// was never seen.
    pub fn devices(&self, runtime: &str) -> Option<&[String]> {
        self.runtimes.get(runtime).map(Vec::as_slice)
    }

    /// Returns true if `device` is listed under `runtime` (exact match).
    pub fn contains(&self, runtime: &str, device: &str) -> bool {
        self.devices(runtime)
            .is_some_and(|devices| devices.iter().any(|d| d == device))
    }

    /// Number of runtimes.
    pub fn len(&self) -> usize {
        self.runtimes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runtimes.is_empty()
    }

    /// Iterates over `(runtime, devices)` pairs in runtime-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.runtimes
            .iter()
            .map(|(runtime, devices)| (runtime.as_str(), devices.as_slice()))
    }
}
