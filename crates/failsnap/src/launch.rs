//! Launch configuration for the browser process.
//!
//! Anything that can accept extra command-line arguments implements
//! [`LaunchArguments`]; [`configure_launch`] appends the harness flags and
//! hands the value back so other configurators can keep composing it.

use serde::{Deserialize, Serialize};

/// Disable the OS-level sandbox (containers/CI)
pub const NO_SANDBOX: &str = "--no-sandbox";

/// Raise browser log verbosity to debug
pub const DEBUG_LOG_LEVEL: &str = "--log-level=DEBUG";

/// A launch configuration that accepts extra browser arguments.
pub trait LaunchArguments {
    /// Append one argument.
    fn add_argument(&mut self, arg: &str);

    /// Arguments collected so far, in insertion order.
    fn arguments(&self) -> &[String];
}

/// Append the harness flags to `options` and return it.
pub fn configure_launch<T: LaunchArguments>(mut options: T) -> T {
    options.add_argument(NO_SANDBOX);
    options.add_argument(DEBUG_LOG_LEVEL);
    tracing::debug!(args = ?options.arguments(), "configured browser launch arguments");
    options
}

/// Browser launch options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserOptions {
    /// Run in headless mode
    pub headless: bool,
    /// Initial window width
    pub window_width: u32,
    /// Initial window height
    pub window_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Extra command-line arguments
    pub args: Vec<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1400,
            window_height: 1000,
            chromium_path: None,
            args: Vec::new(),
        }
    }
}

impl BrowserOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set window dimensions
    #[must_use]
    pub const fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Add an argument
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Whether an argument is present
    #[must_use]
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

impl LaunchArguments for BrowserOptions {
    fn add_argument(&mut self, arg: &str) {
        self.args.push(arg.to_string());
    }

    fn arguments(&self) -> &[String] {
        &self.args
    }
}
