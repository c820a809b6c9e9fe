//! failsnap: docstring test names and browser failure diagnostics
//!
//! ## Usage
//!
//! ```bash
//! failsnap list tests.yaml --collect-only   # Print docstring names
//! failsnap capture http://localhost:8080    # Screenshot + console log
//! failsnap config                           # Show effective configuration
//! ```

use clap::Parser;
use failsnap::HarnessConfig;
use failsnap_cli::{handlers, logging, Cli, CliResult, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.quiet, cli.verbose));

    let config = HarnessConfig::discover(cli.config.as_deref())?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::List(args) => {
            let outcome = handlers::run_list(&args, &mut stdout)?;
            if outcome.is_list_only() {
                tracing::debug!(?outcome, "collect-only run, nothing executed");
            }
            Ok(())
        }
        Commands::Capture(args) => {
            let config = handlers::capture_config(config, &args);
            handlers::run_capture(&config, &args, &mut stdout)
        }
        Commands::Config => handlers::run_config(&config, &mut stdout),
    }
}
