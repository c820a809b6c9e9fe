//! Failure capture around the browser session.
//!
//! [`BrowserFixture`] prepares the borrowed session before a test and, at
//! teardown, collects diagnostics when the recorded `Call` phase failed:
//! a screenshot on disk, the same PNG attached to the report, and the page
//! URL plus console log on the output stream.
//!
//! Capture is best-effort. Its error path ends in [`CaptureOutcome::Failed`]
//! and a warning; the test's own failure is what gets reported.

use crate::attach::{Attachment, AttachmentSink, AttachmentType};
use crate::config::HarnessConfig;
use crate::driver::BrowserDriver;
use crate::report::ExecutionRecord;
use crate::result::FailsnapResult;
use std::io::Write;
use std::path::PathBuf;

/// Script giving screenshots a consistent background
pub const WHITE_BACKGROUND_SCRIPT: &str = "document.body.bgColor = 'white';";

/// Settings for the browser fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    /// Directory receiving screenshot files (must exist)
    pub screenshot_dir: PathBuf,
    /// Viewport width applied at setup
    pub window_width: u32,
    /// Viewport height applied at setup
    pub window_height: u32,
    /// Script injected before the screenshot
    pub background_script: String,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            screenshot_dir: PathBuf::from("screenshots"),
            window_width: 1400,
            window_height: 1000,
            background_script: WHITE_BACKGROUND_SCRIPT.to_string(),
        }
    }
}

impl CaptureSettings {
    /// Settings from the harness configuration
    #[must_use]
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            screenshot_dir: config.screenshot_dir.clone(),
            window_width: config.window_width,
            window_height: config.window_height,
            background_script: config.background_script.clone(),
        }
    }

    /// Set screenshot directory
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Set window size
    #[must_use]
    pub const fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }
}

/// What a successful capture produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    /// Screenshot file on disk
    pub screenshot_path: PathBuf,
    /// Attachment delivered to the report
    pub attachment: Attachment,
    /// Page URL at capture time
    pub url: String,
    /// Number of console entries printed
    pub console_entries: usize,
}

/// Result of the teardown diagnostic step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Call phase did not fail, nothing captured
    NotNeeded,
    /// Diagnostics captured
    Captured(CaptureReport),
    /// Capture itself failed; the reason was logged and discarded
    Failed {
        /// Error description
        reason: String,
    },
}

impl CaptureOutcome {
    /// Check if diagnostics were captured
    #[must_use]
    pub const fn is_captured(&self) -> bool {
        matches!(self, Self::Captured(_))
    }

    /// The capture report, if any
    #[must_use]
    pub const fn report(&self) -> Option<&CaptureReport> {
        match self {
            Self::Captured(report) => Some(report),
            _ => None,
        }
    }
}

/// Capture screenshot, attachment, URL and console log for a failed test.
///
/// The background script is cosmetic; its failure is logged and capture
/// continues. Any later error aborts capture and is returned.
pub fn capture_failure<D, S, W>(
    driver: &mut D,
    settings: &CaptureSettings,
    test_name: &str,
    sink: &mut S,
    out: &mut W,
) -> FailsnapResult<CaptureReport>
where
    D: BrowserDriver + ?Sized,
    S: AttachmentSink + ?Sized,
    W: Write + ?Sized,
{
    if let Err(e) = driver.execute_script(&settings.background_script) {
        tracing::debug!(test = test_name, error = %e, "background script failed");
    }

    let screenshot_path = settings
        .screenshot_dir
        .join(format!("{}.png", uuid::Uuid::new_v4()));
    driver.save_screenshot(&screenshot_path)?;

    let png = driver.screenshot_png()?;
    let attachment = sink.attach(&png, test_name, AttachmentType::Png)?;

    let url = driver.current_url()?;
    writeln!(out, "URL: {url}")?;
    writeln!(out, "Browser logs:")?;
    let entries = driver.console_log()?;
    for entry in &entries {
        writeln!(out, "{entry}")?;
    }

    Ok(CaptureReport {
        screenshot_path,
        attachment,
        url,
        console_entries: entries.len(),
    })
}

/// Browser session fixture with failure capture at teardown
#[derive(Debug, Clone, Default)]
pub struct BrowserFixture {
    settings: CaptureSettings,
}

impl BrowserFixture {
    /// Create a fixture
    #[must_use]
    pub const fn new(settings: CaptureSettings) -> Self {
        Self { settings }
    }

    /// Fixture settings
    #[must_use]
    pub const fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    /// Prepare the session before the test body runs
    pub fn setup<D: BrowserDriver + ?Sized>(&self, driver: &mut D) -> FailsnapResult<()> {
        driver.set_window_size(self.settings.window_width, self.settings.window_height)
    }

    /// Collect diagnostics if the recorded call phase failed. Never fails.
    pub fn teardown<D, S, W>(
        &self,
        driver: &mut D,
        record: &ExecutionRecord,
        test_name: &str,
        sink: &mut S,
        out: &mut W,
    ) -> CaptureOutcome
    where
        D: BrowserDriver + ?Sized,
        S: AttachmentSink + ?Sized,
        W: Write + ?Sized,
    {
        if !record.call_failed() {
            return CaptureOutcome::NotNeeded;
        }

        match capture_failure(driver, &self.settings, test_name, sink, out) {
            Ok(report) => {
                tracing::info!(
                    test = test_name,
                    screenshot = %report.screenshot_path.display(),
                    "captured failure diagnostics"
                );
                CaptureOutcome::Captured(report)
            }
            Err(e) => {
                tracing::warn!(test = test_name, error = %e, "failure capture skipped");
                CaptureOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
