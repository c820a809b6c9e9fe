//! failsnap: browser E2E harness hooks
//!
//! Layers three behaviours over a browser test run:
//!
//! - launch configuration adding `--no-sandbox` and `--log-level=DEBUG`,
//! - failure capture: when a test's call phase fails, a screenshot is saved
//!   to `screenshots/`, attached to the report, and the page URL and
//!   console log are printed,
//! - docstring display names replacing test identifiers at collection time.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   collect    ┌──────────────┐  per phase  ┌──────────────┐
//! │ TestSuite    │─────────────►│ TestHarness  │────────────►│ ReportHooks  │
//! │ (items+body) │  rewrite ids │ (lifecycle)  │             │ -> Execution │
//! └──────────────┘              └──────┬───────┘             │    Record    │
//!                                      │ setup/teardown      └──────┬───────┘
//!                                      ▼                            │ call failed?
//!                               ┌──────────────┐                    ▼
//!                               │BrowserFixture│◄─────────── capture_failure
//!                               └──────┬───────┘   screenshot, attach, console
//!                                      ▼
//!                               dyn BrowserDriver (MockDriver | CdpDriver)
//! ```

#![warn(missing_docs)]

mod attach;
mod capture;
#[cfg(feature = "browser")]
mod cdp;
mod collect;
mod config;
mod driver;
mod item;
mod launch;
mod naming;
mod report;
mod result;
mod runner;

pub use attach::{
    Attachment, AttachmentSink, AttachmentType, MemorySink, ResultsDirSink, ATTACHMENT_INDEX,
};
pub use capture::{
    capture_failure, BrowserFixture, CaptureOutcome, CaptureReport, CaptureSettings,
    WHITE_BACKGROUND_SCRIPT,
};
#[cfg(feature = "browser")]
pub use cdp::CdpDriver;
pub use collect::{duplicate_ids, on_collection_finish, on_item_collected, CollectionOutcome};
pub use config::{HarnessConfig, CONFIG_FILE};
pub use driver::{BrowserDriver, ConsoleEntry, ConsoleLevel, MockDriver, PNG_SIGNATURE};
pub use item::{render_param, Params, TestItem};
pub use launch::{configure_launch, BrowserOptions, LaunchArguments, DEBUG_LOG_LEVEL, NO_SANDBOX};
pub use naming::derive_display_name;
pub use report::{ExecutionRecord, Outcome, Phase, PhaseReport, ReportHooks, ReportObserver};
pub use result::{FailsnapError, FailsnapResult};
pub use runner::{BodyResult, SuiteResults, TestCase, TestHarness, TestResult, TestSuite};

/// Launch a Chromium session configured by `config`
#[cfg(feature = "browser")]
pub fn launch_browser(config: &HarnessConfig) -> FailsnapResult<CdpDriver> {
    CdpDriver::launch(&config.browser_options())
}
