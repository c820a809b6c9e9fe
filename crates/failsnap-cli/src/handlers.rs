//! Subcommand handlers

use crate::commands::{CaptureArgs, ListArgs};
use crate::error::CliResult;
use crate::manifest::Manifest;
use console::style;
use failsnap::{on_collection_finish, on_item_collected, CollectionOutcome, HarnessConfig};
use std::io::Write;

/// List manifest tests under their rewritten ids.
///
/// With `--collect-only`, only the derived names of documented tests are
/// printed, one per line.
pub fn run_list<W: Write>(args: &ListArgs, out: &mut W) -> CliResult<CollectionOutcome> {
    let manifest = Manifest::load(&args.manifest)?;
    let mut items = manifest.tests;
    let mut originals = Vec::with_capacity(items.len());

    for item in &mut items {
        originals.push(item.node_id.clone());
        let _ = on_item_collected(item);
    }

    let outcome = on_collection_finish(&items, args.collect_only, out)?;
    if outcome.is_list_only() {
        return Ok(outcome);
    }

    for (item, original) in items.iter().zip(&originals) {
        if item.node_id == *original {
            writeln!(out, "{}", item.node_id)?;
        } else {
            writeln!(out, "{}  {}", item.node_id, style(format!("({original})")).dim())?;
        }
    }
    tracing::debug!(
        suite = manifest.suite.as_deref().unwrap_or("-"),
        count = items.len(),
        "listed tests"
    );
    Ok(outcome)
}

/// Print the effective configuration as YAML
pub fn run_config<W: Write>(config: &HarnessConfig, out: &mut W) -> CliResult<()> {
    write!(out, "{}", config.to_yaml()?)?;
    Ok(())
}

/// Apply capture overrides to the configuration
#[must_use]
pub fn capture_config(config: HarnessConfig, args: &CaptureArgs) -> HarnessConfig {
    let mut config = config;
    if let Some(dir) = &args.screenshot_dir {
        config = config.with_screenshot_dir(dir.clone());
    }
    if let Some(dir) = &args.results_dir {
        config = config.with_results_dir(dir.clone());
    }
    config
}

/// Open a page in Chromium and capture its diagnostics
#[cfg(feature = "browser")]
pub fn run_capture<W: Write>(
    config: &HarnessConfig,
    args: &CaptureArgs,
    out: &mut W,
) -> CliResult<()> {
    use failsnap::{CaptureSettings, ResultsDirSink};

    if !args.url.contains("://") {
        return Err(crate::error::CliError::invalid_argument(format!(
            "expected an absolute URL, got '{}'",
            args.url
        )));
    }

    let settings = CaptureSettings::from_config(config);
    let mut sink = ResultsDirSink::create(&config.results_dir)?;
    let mut driver = failsnap::launch_browser(config)?;

    let captured = capture_page(&mut driver, &settings, args, &mut sink, out);
    let closed = driver.close();
    let report = captured?;
    closed?;

    writeln!(
        out,
        "{} screenshot {}",
        style("✓").green(),
        report.screenshot_path.display()
    )?;
    if let Some(source) = &report.attachment.source {
        writeln!(
            out,
            "{} attachment {}",
            style("✓").green(),
            sink.dir().join(source).display()
        )?;
    }
    Ok(())
}

#[cfg(feature = "browser")]
fn capture_page<W: Write>(
    driver: &mut failsnap::CdpDriver,
    settings: &failsnap::CaptureSettings,
    args: &CaptureArgs,
    sink: &mut failsnap::ResultsDirSink,
    out: &mut W,
) -> CliResult<failsnap::CaptureReport> {
    failsnap::BrowserFixture::new(settings.clone()).setup(driver)?;
    driver.navigate(&args.url)?;
    Ok(failsnap::capture_failure(driver, settings, &args.name, sink, out)?)
}

/// Open a page in Chromium and capture its diagnostics
#[cfg(not(feature = "browser"))]
pub fn run_capture<W: Write>(
    _config: &HarnessConfig,
    _args: &CaptureArgs,
    _out: &mut W,
) -> CliResult<()> {
    Err(failsnap::FailsnapError::BrowserUnavailable.into())
}
