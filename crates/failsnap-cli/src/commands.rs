//! CLI command definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// failsnap: docstring test names and browser failure diagnostics
#[derive(Parser, Debug)]
#[command(name = "failsnap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to ./failsnap.yaml when present)
    #[arg(short, long, global = true, env = "FAILSNAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the tests of a manifest under their docstring names
    List(ListArgs),

    /// Capture screenshot, URL and console log of a page
    Capture(CaptureArgs),

    /// Show the effective configuration
    Config,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// YAML test manifest
    pub manifest: PathBuf,

    /// Only print derived names of documented tests
    #[arg(long)]
    pub collect_only: bool,
}

/// Arguments for the capture command
#[derive(Parser, Debug)]
pub struct CaptureArgs {
    /// Page to open
    pub url: String,

    /// Name used for the report attachment
    #[arg(short, long, default_value = "capture")]
    pub name: String,

    /// Override the screenshot directory
    #[arg(long)]
    pub screenshot_dir: Option<PathBuf>,

    /// Override the results directory
    #[arg(long)]
    pub results_dir: Option<PathBuf>,
}
