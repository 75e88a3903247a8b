//! Parsing of the free-text `simctl list` output into an [`Inventory`].
//!
//! Only the devices section is read. It looks like this:
//!
//! ```text
//! == Devices ==
//! -- iOS 17.0 --
//!     iPhone 15 (A1B2C3D4-E5F6-7890-ABCD-EF1234567890) (Shutdown)
//!     iPhone 15 Pro (B2C3D4E5-F6A7-8901-BCDE-F12345678901) (Booted)
//! -- iOS 16.4 --
//!     iPhone 14 (C3D4E5F6-A7B8-9012-CDEF-123456789012) (Shutdown)
//! == Device Pairs ==
//! ```
//!
//! Every other section (`== Device Types ==`, `== Runtimes ==`, ...) is
//! skipped, even where its lines happen to start with `--`.

use tracing::{debug, warn};

use crate::inventory::Inventory;
use crate::simctl::{ListingSource, SimctlError};

/// Line that opens the devices section.
pub const DEVICES_MARKER: &str = "== Devices ==";

/// Line that closes the devices section.
pub const DEVICE_PAIRS_MARKER: &str = "== Device Pairs ==";

const RUNTIME_HEADER_PREFIX: &str = "--";

/// Something that can produce a freshly parsed [`Inventory`].
pub trait InventoryProvider {
    /// Builds the inventory. Each call starts from scratch.
    fn parse_environment(&self) -> Result<Inventory, SimctlError>;
}

/// An already-built inventory can be handed straight to a checker.
impl InventoryProvider for Inventory {
    fn parse_environment(&self) -> Result<Inventory, SimctlError> {
        Ok(self.clone())
    }
}

/// Fetches a listing from a [`ListingSource`] and parses it.
///
/// # Example
///
/// ```no_run
/// use simcheck_core::parser::{EnvironmentParser, InventoryProvider};
/// use simcheck_core::simctl::SimctlListing;
///
/// let parser = EnvironmentParser::new(SimctlListing::default());
/// let inventory = parser.parse_environment().unwrap();
/// for runtime in inventory.runtimes() {
///     println!("{runtime}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct EnvironmentParser<S> {
    source: S,
}

impl<S: ListingSource> EnvironmentParser<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: ListingSource> InventoryProvider for EnvironmentParser<S> {
    /// # Errors
    ///
    /// Returns the source's error unchanged; nothing is parsed in that case.
    fn parse_environment(&self) -> Result<Inventory, SimctlError> {
        let listing = self.source.fetch_listing()?;
        let inventory = parse_listing(&listing);
        debug!(runtimes = inventory.len(), "Parsed simulator inventory");
        Ok(inventory)
    }
}

/// Parses raw listing text into an [`Inventory`] in a single pass.
///
/// Runtime headers are lines starting with `--` inside the devices section;
/// the runtime name is the line with dashes, whitespace and control
/// characters trimmed from both ends. Each following line up to the next
/// header or [`DEVICE_PAIRS_MARKER`] is a device, named by the text before
/// its first `(`.
///
/// Input is never rejected. A devices section with no closing marker is
/// read up to the end of the text and whatever was collected is kept.
pub fn parse_listing(text: &str) -> Inventory {
    let mut inventory = Inventory::new();
    let mut in_devices = false;
    let mut current: Option<(String, Vec<String>)> = None;

    for line in text.lines() {
        if !in_devices {
            in_devices = line == DEVICES_MARKER;
            continue;
        }

        if line == DEVICE_PAIRS_MARKER {
            flush_runtime(&mut inventory, current.take());
            in_devices = false;
        } else if line.starts_with(RUNTIME_HEADER_PREFIX) {
            flush_runtime(&mut inventory, current.take());
            current = Some((runtime_name(line).to_string(), Vec::new()));
        } else if let Some((_, devices)) = current.as_mut() {
            devices.push(device_name(line).to_string());
        }
    }

    if in_devices {
        warn!(
            "Listing ended inside the devices section without a '{}' line",
            DEVICE_PAIRS_MARKER
        );
        flush_runtime(&mut inventory, current.take());
    }

    inventory
}

fn flush_runtime(inventory: &mut Inventory, runtime: Option<(String, Vec<String>)>) {
    if let Some((name, devices)) = runtime {
        inventory.insert(name, devices);
    }
}

fn runtime_name(line: &str) -> &str {
    line.trim_matches(|c: char| c == '-' || c.is_whitespace() || c.is_control())
}

fn device_name(line: &str) -> &str {
    let name = line.split_once('(').map_or(line, |(name, _)| name);
    name.trim_matches(|c: char| c.is_whitespace() || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LISTING: &str = "== Device Types ==\n\
        == Runtimes ==\n\
        == Devices ==\n\
        -- iOS 9.1 --\n\
        \tiPhone 4s (iPhone-4s-id) (iPhone4s-state)\n\
        \tiPhone 6 (iPhone-6-id) (iPhone-6-state)\n\
        -- iOS 10.0 --\n\
        \tiPhone 5 (iPhone-5-id) (iPhone5-state)\n\
        == Device Pairs ==";

    // Shape of a modern `xcrun simctl list` run, trimmed down.
    const XCODE_LISTING: &str = r#"== Device Types ==
iPhone 15 (com.apple.CoreSimulator.SimDeviceType.iPhone-15)
iPad Air (5th generation) (com.apple.CoreSimulator.SimDeviceType.iPad-Air-5th-generation)
== Runtimes ==
iOS 17.0 (17.0 - 21A328) - com.apple.CoreSimulator.SimRuntime.iOS-17-0
-- Not a devices header --
== Devices ==
-- iOS 17.0 --
    iPhone 15 (A1B2C3D4-E5F6-7890-ABCD-EF1234567890) (Shutdown)
    iPhone 15 Pro (B2C3D4E5-F6A7-8901-BCDE-F12345678901) (Booted)
    iPad Air (5th generation) (C3D4E5F6-A7B8-9012-CDEF-123456789012) (Shutdown)
-- watchOS 10.0 --
-- Unavailable: com.apple.CoreSimulator.SimRuntime.iOS-12-4 --
    iPhone 6 (D4E5F6A7-B8C9-0123-DEF0-234567890123) (Shutdown) (unavailable, runtime profile not found)
== Device Pairs ==
-- Paired Watch --
    1F2E3D4C-5B6A-7980-ABCD-EF0123456789 (active, disconnected)
"#;

    struct CannedListing(&'static str);

    impl ListingSource for CannedListing {
        fn fetch_listing(&self) -> Result<String, SimctlError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingListing;

    impl ListingSource for FailingListing {
        fn fetch_listing(&self) -> Result<String, SimctlError> {
            Err(SimctlError::CommandFailed("xcrun: error: unable to find utility".to_string()))
        }
    }

    #[test]
    fn test_parse_environment_from_source() {
        let parser = EnvironmentParser::new(CannedListing(SAMPLE_LISTING));
        let inventory = parser.parse_environment().expect("Should parse listing");

        assert_eq!(
            inventory.devices("iOS 9.1").unwrap(),
            &["iPhone 4s".to_string(), "iPhone 6".to_string()]
        );
        assert_eq!(inventory.devices("iOS 10.0").unwrap(), &["iPhone 5".to_string()]);
        assert!(inventory.devices("iOS 8.0").is_none());
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn test_parse_environment_propagates_source_failure() {
        let parser = EnvironmentParser::new(FailingListing);
        match parser.parse_environment() {
            Err(SimctlError::CommandFailed(msg)) => assert!(msg.contains("unable to find")),
            other => panic!("Expected CommandFailed, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse_listing(XCODE_LISTING), parse_listing(XCODE_LISTING));
    }

    #[test]
    fn test_parenthesized_suffixes_are_dropped() {
        let inventory = parse_listing(
            "== Devices ==\n-- iOS 10.0 --\n    iPhone 5 (id-123) (Booted)\n== Device Pairs ==\n",
        );
        assert_eq!(inventory.devices("iOS 10.0").unwrap(), &["iPhone 5".to_string()]);
    }

    #[test]
    fn test_device_name_keeps_text_before_first_paren() {
        // A device type whose own name contains parentheses is cut at the first one.
        let inventory = parse_listing(XCODE_LISTING);
        let devices = inventory.devices("iOS 17.0").unwrap();
        assert_eq!(devices, &["iPhone 15", "iPhone 15 Pro", "iPad Air"]);
    }

    #[test]
    fn test_headers_outside_devices_section_are_ignored() {
        let inventory = parse_listing(XCODE_LISTING);

        assert!(inventory.devices("Not a devices header").is_none());
        assert!(inventory.devices("Paired Watch").is_none());
        assert!(!inventory.runtimes().iter().any(|r| r.contains("iPhone")));
    }

    #[test]
    fn test_header_without_devices_yields_empty_list() {
        let inventory = parse_listing(XCODE_LISTING);
        assert_eq!(inventory.devices("watchOS 10.0"), Some(&[][..]));

        let inventory = parse_listing("== Devices ==\n-- iOS 11.0 --\n== Device Pairs ==\n");
        assert_eq!(inventory.devices("iOS 11.0"), Some(&[][..]));
    }

    #[test]
    fn test_unavailable_runtime_header_is_kept_verbatim() {
        let inventory = parse_listing(XCODE_LISTING);
        assert_eq!(
            inventory
                .devices("Unavailable: com.apple.CoreSimulator.SimRuntime.iOS-12-4")
                .unwrap(),
            &["iPhone 6".to_string()]
        );
    }

    #[test]
    fn test_missing_terminator_keeps_accumulated_runtimes() {
        let inventory = parse_listing(
            "== Devices ==\n-- iOS 9.1 --\n  iPhone 4s (a)\n-- iOS 10.0 --\n  iPhone 5 (b)\n",
        );
        assert_eq!(inventory.devices("iOS 9.1").unwrap(), &["iPhone 4s".to_string()]);
        assert_eq!(inventory.devices("iOS 10.0").unwrap(), &["iPhone 5".to_string()]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let inventory = parse_listing(
            "== Devices ==\r\n-- iOS 10.0 --\r\n\tiPhone 7 (x) (Shutdown)\r\n== Device Pairs ==\r\n",
        );
        assert_eq!(inventory.devices("iOS 10.0").unwrap(), &["iPhone 7".to_string()]);
    }

    #[test]
    fn test_lines_before_first_header_are_skipped() {
        let inventory = parse_listing(
            "== Devices ==\nstray line (x)\n-- iOS 10.0 --\n  iPhone 7 (x)\n== Device Pairs ==\n",
        );
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.devices("iOS 10.0").unwrap(), &["iPhone 7".to_string()]);
    }

    #[test]
    fn test_blank_line_in_runtime_block_is_an_empty_device_name() {
        let inventory = parse_listing("== Devices ==\n-- iOS 9.1 --\n\n== Device Pairs ==\n");
        assert_eq!(inventory.devices("iOS 9.1").unwrap(), &[String::new()]);

        let inventory = parse_listing(
            "== Devices ==\n-- iOS 10.0 --\n  iPhone 7 (x)\n   \n== Device Pairs ==\n",
        );
        assert_eq!(inventory.devices("iOS 10.0").unwrap(), &["iPhone 7", ""]);
    }

    #[test]
    fn test_repeated_header_replaces_earlier_devices() {
        let inventory = parse_listing(
            "== Devices ==\n-- iOS 10.0 --\n  iPhone 5 (a)\n-- iOS 10.0 --\n  iPhone 7 (b)\n== Device Pairs ==\n",
        );
        assert_eq!(inventory.devices("iOS 10.0").unwrap(), &["iPhone 7".to_string()]);
    }

    #[test]
    fn test_markers_must_match_exactly() {
        let inventory = parse_listing("== Devices == \n-- iOS 10.0 --\n  iPhone 5 (a)\n");
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_listing("").is_empty());
    }
}
