//! Test harness driving the collection and per-test lifecycle.
//!
//! Order of events for a suite:
//!
//! 1. every item is collected and its id rewritten ([`on_item_collected`]),
//! 2. collection finishes ([`on_collection_finish`]); a collect-only run
//!    stops here,
//! 3. each test runs setup, call and teardown, with one report per phase
//!    filed through [`ReportHooks`] before the next phase starts.

use crate::attach::{Attachment, AttachmentSink};
use crate::capture::{BrowserFixture, CaptureOutcome};
use crate::collect::{on_collection_finish, on_item_collected, CollectionOutcome};
use crate::driver::BrowserDriver;
use crate::item::TestItem;
use crate::report::{ExecutionRecord, Phase, PhaseReport, ReportHooks, ReportObserver};
use crate::result::FailsnapResult;
use std::any::Any;
use std::fmt;
use std::io::Write;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

/// Result of a test body
pub type BodyResult = Result<(), String>;

type TestBody<D> = Box<dyn FnOnce(&mut D) -> BodyResult>;

/// A single test case: collected item plus body
pub struct TestCase<D: ?Sized> {
    /// Collected item
    pub item: TestItem,
    body: TestBody<D>,
}

impl<D: ?Sized> TestCase<D> {
    /// Create a new test case
    pub fn new<F>(item: TestItem, body: F) -> Self
    where
        F: FnOnce(&mut D) -> BodyResult + 'static,
    {
        Self {
            item,
            body: Box::new(body),
        }
    }
}

impl<D: ?Sized> fmt::Debug for TestCase<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("item", &self.item).finish()
    }
}

/// A test suite containing multiple tests
pub struct TestSuite<D: ?Sized> {
    /// Suite name
    pub name: String,
    /// Tests in this suite
    pub tests: Vec<TestCase<D>>,
}

impl<D: ?Sized> TestSuite<D> {
    /// Create a new test suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }

    /// Add a test case
    pub fn add_test(&mut self, test: TestCase<D>) {
        self.tests.push(test);
    }

    /// Add a test from an item and a body
    #[must_use]
    pub fn with_test<F>(mut self, item: TestItem, body: F) -> Self
    where
        F: FnOnce(&mut D) -> BodyResult + 'static,
    {
        self.add_test(TestCase::new(item, body));
        self
    }

    /// Get the number of tests
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }
}

impl<D: ?Sized> fmt::Debug for TestSuite<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSuite")
            .field("name", &self.name)
            .field("tests", &self.tests)
            .finish()
    }
}

/// Result of running a single test
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Display identifier after collection
    pub node_id: String,
    /// Whether every phase passed
    pub passed: bool,
    /// First failure message
    pub error: Option<String>,
    /// Phase reports
    pub record: ExecutionRecord,
    /// Failure diagnostics
    pub capture: CaptureOutcome,
    /// Test duration
    pub duration: Duration,
}

/// Results from running a test suite
#[derive(Debug, Clone)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// Individual test results
    pub results: Vec<TestResult>,
    /// How collection ended
    pub collection: CollectionOutcome,
    /// Attachments delivered during the run
    pub attachments: Vec<Attachment>,
    /// Total duration
    pub duration: Duration,
}

impl SuiteResults {
    /// Check if all tests passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Count passed tests
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Count failed tests
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Get total test count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get failed tests
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }
}

/// Test harness for running suites
#[derive(Debug, Default)]
pub struct TestHarness {
    /// Only list the collected tests
    pub collect_only: bool,
    /// Whether to stop on first failure
    pub fail_fast: bool,
    fixture: BrowserFixture,
    hooks: ReportHooks,
}

impl TestHarness {
    /// Create a new test harness
    #[must_use]
    pub fn new(fixture: BrowserFixture) -> Self {
        Self {
            fixture,
            ..Self::default()
        }
    }

    /// Enable collect-only mode
    #[must_use]
    pub const fn with_collect_only(mut self, collect_only: bool) -> Self {
        self.collect_only = collect_only;
        self
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Register a report observer, notified after each report is recorded
    #[must_use]
    pub fn with_observer<O: ReportObserver + 'static>(mut self, observer: O) -> Self {
        self.hooks.add_observer(observer);
        self
    }

    /// Run a test suite against a borrowed browser session
    pub fn run<D, S, W>(
        &mut self,
        suite: TestSuite<D>,
        driver: &mut D,
        sink: &mut S,
        out: &mut W,
    ) -> FailsnapResult<SuiteResults>
    where
        D: BrowserDriver + ?Sized,
        S: AttachmentSink + ?Sized,
        W: Write + ?Sized,
    {
        let start = Instant::now();
        let mut tests = suite.tests;

        for test in &mut tests {
            test.item.ensure_node_id();
            let _ = on_item_collected(&mut test.item);
        }

        let items: Vec<TestItem> = tests.iter().map(|t| t.item.clone()).collect();
        let collection = on_collection_finish(&items, self.collect_only, out)?;
        tracing::debug!(suite = %suite.name, collected = items.len(), ?collection, "collection finished");

        let mut results = Vec::new();
        if !collection.is_list_only() {
            for test in tests {
                let result = self.run_test(test, driver, sink, out);
                let stop = self.fail_fast && !result.passed;
                results.push(result);
                if stop {
                    tracing::info!("fail-fast: stopping after first failure");
                    break;
                }
            }
        }

        Ok(SuiteResults {
            suite_name: suite.name,
            results,
            collection,
            attachments: sink.attachments().to_vec(),
            duration: start.elapsed(),
        })
    }

    fn run_test<D, S, W>(
        &mut self,
        test: TestCase<D>,
        driver: &mut D,
        sink: &mut S,
        out: &mut W,
    ) -> TestResult
    where
        D: BrowserDriver + ?Sized,
        S: AttachmentSink + ?Sized,
        W: Write + ?Sized,
    {
        let TestCase { item, body } = test;
        let start = Instant::now();
        let mut record = ExecutionRecord::new();

        let phase_start = Instant::now();
        let setup = match self.fixture.setup(driver) {
            Ok(()) => PhaseReport::passed(Phase::Setup),
            Err(e) => PhaseReport::failed(Phase::Setup, e.to_string()),
        };
        let setup = self
            .hooks
            .make_report(&mut record, setup.with_duration(phase_start.elapsed()));

        if setup.passed_outcome() {
            let phase_start = Instant::now();
            let call = match catch_unwind(AssertUnwindSafe(|| body(driver))) {
                Ok(Ok(())) => PhaseReport::passed(Phase::Call),
                Ok(Err(message)) => PhaseReport::failed(Phase::Call, message),
                Err(payload) => PhaseReport::failed(Phase::Call, panic_message(payload.as_ref())),
            };
            let _ = self
                .hooks
                .make_report(&mut record, call.with_duration(phase_start.elapsed()));
        }

        let phase_start = Instant::now();
        let capture = self
            .fixture
            .teardown(driver, &record, &item.name, sink, out);
        let _ = self.hooks.make_report(
            &mut record,
            PhaseReport::passed(Phase::Teardown).with_duration(phase_start.elapsed()),
        );

        let error = record.iter().find_map(|r| r.longrepr.clone());
        TestResult {
            node_id: item.node_id,
            passed: !record.any_failed(),
            error,
            record,
            capture,
            duration: start.elapsed(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "test panicked".to_string()
    }
}
