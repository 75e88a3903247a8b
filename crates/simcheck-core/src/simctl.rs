//! Interface to Apple's `xcrun simctl` command-line tool.
//!
//! This module runs the simulator listing command and hands back its raw
//! text output. Parsing lives in [`crate::parser`].
//!
//! # Requirements
//!
//! Xcode must be installed for `xcrun simctl` to be available.
//!
//! # Example
//!
//! ```no_run
//! use simcheck_core::simctl::{ListingSource, SimctlListing};
//!
//! let listing = SimctlListing::default().fetch_listing().unwrap();
//! println!("{listing}");
//! ```

use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::config::SimcheckConfig;

/// Program used to list simulators when nothing else is configured.
pub const DEFAULT_LISTING_PROGRAM: &str = "xcrun";

/// Arguments passed to [`DEFAULT_LISTING_PROGRAM`].
pub const DEFAULT_LISTING_ARGS: [&str; 2] = ["simctl", "list"];

/// Errors that can occur when running the listing command.
#[derive(Error, Debug)]
pub enum SimctlError {
    /// The listing command ran but exited with a non-zero status.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// The listing command could not be spawned (e.g. the tool is missing).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can produce the raw text of a simulator listing.
///
/// Implemented by [`SimctlListing`] for the real tool; tests substitute
/// their own implementation returning canned text.
pub trait ListingSource {
    /// Returns the full listing output, or an error if it could not be
    /// obtained. Partial output is never returned.
    fn fetch_listing(&self) -> Result<String, SimctlError>;
}

/// Runs `xcrun simctl list` (or a configured replacement) and captures stdout.
///
/// The call blocks until the command exits. There is no timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimctlListing {
    program: String,
    args: Vec<String>,
}

impl SimctlListing {
    /// Creates a listing source that runs `program` with `args`.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a listing source from configuration, falling back to
    /// `xcrun simctl list` for anything left unset.
    ///
    /// Configured args are only used together with a configured program.
    pub fn from_config(config: &SimcheckConfig) -> Self {
        match &config.listing_program {
            Some(program) => Self::new(
                program.clone(),
                config.listing_args.clone().unwrap_or_default(),
            ),
            None => Self::default(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for SimctlListing {
    fn default() -> Self {
        Self::new(DEFAULT_LISTING_PROGRAM, DEFAULT_LISTING_ARGS)
    }
}

impl ListingSource for SimctlListing {
    /// Runs the command and returns its stdout, lossily decoded as UTF-8.
    ///
    /// # Errors
    ///
    /// - [`SimctlError::Io`] if the command fails to execute
    /// - [`SimctlError::CommandFailed`] if it returns a non-zero exit code
    fn fetch_listing(&self) -> Result<String, SimctlError> {
        debug!(program = %self.program, args = ?self.args, "Running listing command");

        let output = Command::new(&self.program).args(&self.args).output()?;

        if !output.status.success() {
            return Err(SimctlError::CommandFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        debug!(bytes = output.stdout.len(), "Listing command finished");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
