//! failsnap CLI library
//!
//! Command-line front end for the failsnap harness: lists test manifests
//! under their docstring names and captures browser diagnostics on demand.

#![warn(missing_docs)]

mod commands;
mod error;
pub mod handlers;
pub mod logging;
mod manifest;

pub use commands::{CaptureArgs, Cli, Commands, ListArgs};
pub use error::{CliError, CliResult};
pub use logging::Verbosity;
pub use manifest::Manifest;
