//! BrowserDriver - the browser session seam
//!
//! The harness never owns the browser; it borrows a session implementing
//! [`BrowserDriver`] for the duration of one test. [`MockDriver`] records
//! every call and can be told to fail specific commands, which is how the
//! failure-capture paths are exercised without Chromium.

use crate::result::{FailsnapError, FailsnapResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Console message level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsoleLevel {
    /// Debug level
    Debug,
    /// Info / log level
    Info,
    /// Warning level
    Warning,
    /// Error level
    Severe,
}

impl ConsoleLevel {
    /// Map a browser console method name (`log`, `warn`, ...) to a level
    #[must_use]
    pub fn from_method(method: &str) -> Self {
        match method {
            "debug" | "trace" => Self::Debug,
            "warn" | "warning" => Self::Warning,
            "error" | "assert" => Self::Severe,
            _ => Self::Info,
        }
    }

    /// Upper-case label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Severe => "SEVERE",
        }
    }
}

/// One entry of the browser console log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    /// Message level
    pub level: ConsoleLevel,
    /// Message text
    pub message: String,
    /// Source (script URL, `console-api`, ...)
    pub source: Option<String>,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl ConsoleEntry {
    /// Create a console entry
    #[must_use]
    pub fn new(level: ConsoleLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            source: None,
            timestamp: 0,
        }
    }

    /// Set source
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set timestamp
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

impl fmt::Display for ConsoleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.level.as_str())?;
        if let Some(source) = &self.source {
            write!(f, "{source} ")?;
        }
        write!(f, "{}", self.message)
    }
}

/// Browser session operations used by the harness
pub trait BrowserDriver {
    /// Resize the browser window
    fn set_window_size(&mut self, width: u32, height: u32) -> FailsnapResult<()>;

    /// Execute JavaScript in the page and return its JSON value
    fn execute_script(&mut self, script: &str) -> FailsnapResult<serde_json::Value>;

    /// Capture the viewport as PNG bytes
    fn screenshot_png(&mut self) -> FailsnapResult<Vec<u8>>;

    /// Capture the viewport and write it to `path`
    fn save_screenshot(&mut self, path: &Path) -> FailsnapResult<()> {
        let png = self.screenshot_png()?;
        std::fs::write(path, png)?;
        Ok(())
    }

    /// Current page URL
    fn current_url(&mut self) -> FailsnapResult<String>;

    /// Browser console log collected so far
    fn console_log(&mut self) -> FailsnapResult<Vec<ConsoleEntry>>;
}

/// Mock driver for unit testing
#[derive(Debug, Clone)]
pub struct MockDriver {
    /// Current URL
    pub current_url: String,
    /// Window size after the last resize
    pub window_size: Option<(u32, u32)>,
    /// Screenshot bytes
    pub screenshot_data: Vec<u8>,
    /// Console entries
    pub console: Vec<ConsoleEntry>,
    /// Scripts executed, in order
    pub scripts: Vec<String>,
    /// Call history for verification
    pub call_history: Vec<String>,
    failing: Vec<String>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self {
            current_url: String::from("about:blank"),
            window_size: None,
            screenshot_data: PNG_SIGNATURE.to_vec(),
            console: Vec::new(),
            scripts: Vec::new(),
            call_history: Vec::new(),
            failing: Vec::new(),
        }
    }
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.current_url = url.into();
        self
    }

    /// Add a console entry
    #[must_use]
    pub fn with_console(mut self, entry: ConsoleEntry) -> Self {
        self.console.push(entry);
        self
    }

    /// Set screenshot bytes
    #[must_use]
    pub fn with_screenshot(mut self, data: Vec<u8>) -> Self {
        self.screenshot_data = data;
        self
    }

    /// Make the named command fail
    #[must_use]
    pub fn failing(mut self, command: impl Into<String>) -> Self {
        self.failing.push(command.into());
        self
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.call_history
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(method))
    }

    fn call(&mut self, command: &str, detail: Option<String>) -> FailsnapResult<()> {
        match detail {
            Some(detail) => self.call_history.push(format!("{command}:{detail}")),
            None => self.call_history.push(command.to_string()),
        }
        if self.failing.iter().any(|c| c == command) {
            return Err(FailsnapError::driver(command, "simulated failure"));
        }
        Ok(())
    }
}

impl BrowserDriver for MockDriver {
    fn set_window_size(&mut self, width: u32, height: u32) -> FailsnapResult<()> {
        self.call("set_window_size", Some(format!("{width}x{height}")))?;
        self.window_size = Some((width, height));
        Ok(())
    }

    fn execute_script(&mut self, script: &str) -> FailsnapResult<serde_json::Value> {
        self.call("execute_script", None)?;
        self.scripts.push(script.to_string());
        Ok(serde_json::Value::Null)
    }

    fn screenshot_png(&mut self) -> FailsnapResult<Vec<u8>> {
        self.call("screenshot_png", None)
            .map_err(FailsnapError::screenshot)?;
        Ok(self.screenshot_data.clone())
    }

    fn save_screenshot(&mut self, path: &Path) -> FailsnapResult<()> {
        self.call("save_screenshot", Some(path.display().to_string()))
            .map_err(FailsnapError::screenshot)?;
        std::fs::write(path, &self.screenshot_data)?;
        Ok(())
    }

    fn current_url(&mut self) -> FailsnapResult<String> {
        self.call("current_url", None)?;
        Ok(self.current_url.clone())
    }

    fn console_log(&mut self) -> FailsnapResult<Vec<ConsoleEntry>> {
        self.call("console_log", None)?;
        Ok(self.console.clone())
    }
}
