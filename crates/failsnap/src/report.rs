//! Per-phase test reports and the outcome-recording hook.
//!
//! Every test runs in three phases. The runner produces one [`PhaseReport`]
//! per phase and hands it to [`ReportHooks::make_report`], which files it in
//! the test's [`ExecutionRecord`] before any observer sees it. The browser
//! fixture's teardown then reads the `Call` report from the same record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Test execution phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Fixture setup
    Setup,
    /// The test body itself
    Call,
    /// Fixture teardown
    Teardown,
}

impl Phase {
    /// All phases in execution order
    pub const ALL: [Self; 3] = [Self::Setup, Self::Call, Self::Teardown];

    /// Lower-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Call => "call",
            Self::Teardown => "teardown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Phase passed
    Passed,
    /// Phase failed
    Failed,
    /// Phase was skipped
    Skipped,
}

/// Result of one phase of one test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseReport {
    /// Which phase this reports on
    pub phase: Phase,
    /// Outcome
    pub outcome: Outcome,
    /// Duration of the phase
    pub duration: Duration,
    /// Failure representation, if failed
    pub longrepr: Option<String>,
}

impl PhaseReport {
    /// Create a passing report
    #[must_use]
    pub const fn passed(phase: Phase) -> Self {
        Self {
            phase,
            outcome: Outcome::Passed,
            duration: Duration::ZERO,
            longrepr: None,
        }
    }

    /// Create a failing report
    #[must_use]
    pub fn failed(phase: Phase, longrepr: impl Into<String>) -> Self {
        Self {
            phase,
            outcome: Outcome::Failed,
            duration: Duration::ZERO,
            longrepr: Some(longrepr.into()),
        }
    }

    /// Create a skipped report
    #[must_use]
    pub const fn skipped(phase: Phase) -> Self {
        Self {
            phase,
            outcome: Outcome::Skipped,
            duration: Duration::ZERO,
            longrepr: None,
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Check if the phase failed
    #[must_use]
    pub const fn failed_outcome(&self) -> bool {
        matches!(self.outcome, Outcome::Failed)
    }

    /// Check if the phase passed
    #[must_use]
    pub const fn passed_outcome(&self) -> bool {
        matches!(self.outcome, Outcome::Passed)
    }
}

/// Phase reports recorded for one test execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    reports: BTreeMap<Phase, PhaseReport>,
}

impl ExecutionRecord {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// File a report under its phase, replacing any previous one
    pub fn record(&mut self, report: PhaseReport) {
        let _ = self.reports.insert(report.phase, report);
    }

    /// Report for a phase, if recorded
    #[must_use]
    pub fn get(&self, phase: Phase) -> Option<&PhaseReport> {
        self.reports.get(&phase)
    }

    /// Whether the call phase was recorded as failed
    #[must_use]
    pub fn call_failed(&self) -> bool {
        self.get(Phase::Call).is_some_and(PhaseReport::failed_outcome)
    }

    /// Whether any recorded phase failed
    #[must_use]
    pub fn any_failed(&self) -> bool {
        self.reports.values().any(PhaseReport::failed_outcome)
    }

    /// Reports in phase order
    pub fn iter(&self) -> impl Iterator<Item = &PhaseReport> {
        self.reports.values()
    }
}

/// Observer of phase reports, notified after the report is recorded
pub trait ReportObserver {
    /// Called once per phase report
    fn on_report(&mut self, record: &ExecutionRecord, report: &PhaseReport);
}

/// Report-generation hook chain.
///
/// Recording into the [`ExecutionRecord`] always happens first; observers
/// run afterwards in registration order and see the updated record.
#[derive(Default)]
pub struct ReportHooks {
    observers: Vec<Box<dyn ReportObserver>>,
}

impl fmt::Debug for ReportHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportHooks")
            .field("observer_count", &self.observers.len())
            .finish()
    }
}

impl ReportHooks {
    /// Create a hook chain with no observers
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer
    pub fn add_observer<O: ReportObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    /// Number of registered observers
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Record `report` and pass it through unchanged
    pub fn make_report(&mut self, record: &mut ExecutionRecord, report: PhaseReport) -> PhaseReport {
        record.record(report.clone());
        tracing::debug!(phase = %report.phase, outcome = ?report.outcome, "recorded phase report");
        for observer in &mut self.observers {
            observer.on_report(record, &report);
        }
        report
    }
}
