//! Command handlers

use std::fmt;

pub mod category;
pub mod config;
pub mod quote;
pub mod shell;
pub mod status;
pub mod sync;
pub mod transfer;

/// A failure that was already shown to the user through the display
///
/// Callers exit with a failure status without printing it again.
#[derive(Debug)]
pub struct AlreadyReported;

impl fmt::Display for AlreadyReported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("command failed")
    }
}

impl std::error::Error for AlreadyReported {}

/// Whether an error still needs to be printed
pub fn needs_report(err: &anyhow::Error) -> bool {
    !err.is::<AlreadyReported>()
}
