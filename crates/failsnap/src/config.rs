//! Harness configuration

use crate::capture::WHITE_BACKGROUND_SCRIPT;
use crate::launch::{configure_launch, BrowserOptions};
use crate::result::{FailsnapError, FailsnapResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE: &str = "failsnap.yaml";

/// Harness configuration, loadable from YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory receiving failure screenshots (must exist)
    pub screenshot_dir: PathBuf,
    /// Allure-style results directory for attachments
    pub results_dir: PathBuf,
    /// Viewport width applied before each test
    pub window_width: u32,
    /// Viewport height applied before each test
    pub window_height: u32,
    /// Run the browser headless
    pub headless: bool,
    /// Chromium binary override
    pub chromium_path: Option<String>,
    /// Launch arguments added before the harness flags
    pub extra_args: Vec<String>,
    /// Script run before taking a failure screenshot
    pub background_script: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            screenshot_dir: PathBuf::from("screenshots"),
            results_dir: PathBuf::from("allure-results"),
            window_width: 1400,
            window_height: 1000,
            headless: true,
            chromium_path: None,
            extra_args: Vec::new(),
            background_script: WHITE_BACKGROUND_SCRIPT.to_string(),
        }
    }
}

impl HarnessConfig {
    /// Create default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(yaml: &str) -> FailsnapResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> FailsnapResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FailsnapError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
    }

    /// Load `path` if given, else `failsnap.yaml` if present, else defaults
    pub fn discover(path: Option<&Path>) -> FailsnapResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(CONFIG_FILE).is_file() => Self::load(Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> FailsnapResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Reject unusable values
    pub fn validate(&self) -> FailsnapResult<()> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(FailsnapError::config(format!(
                "window size must be non-zero, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        Ok(())
    }

    /// Set screenshot directory
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Set results directory
    #[must_use]
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    /// Set window size
    #[must_use]
    pub const fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Browser launch options with the harness flags applied
    #[must_use]
    pub fn browser_options(&self) -> BrowserOptions {
        let mut options = BrowserOptions::new()
            .with_headless(self.headless)
            .with_window_size(self.window_width, self.window_height);
        if let Some(path) = &self.chromium_path {
            options = options.with_chromium_path(path.clone());
        }
        for arg in &self.extra_args {
            options = options.with_arg(arg.clone());
        }
        configure_launch(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::{DEBUG_LOG_LEVEL, NO_SANDBOX};

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.screenshot_dir, PathBuf::from("screenshots"));
        assert_eq!((config.window_width, config.window_height), (1400, 1000));
        assert_eq!(config.background_script, WHITE_BACKGROUND_SCRIPT);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = HarnessConfig::from_yaml("window_width: 1280\nheadless: false\n").unwrap();
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.window_height, 1000);
        assert!(!config.headless);
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = HarnessConfig::from_yaml("window_height: 0").unwrap_err();
        assert!(matches!(err, FailsnapError::Config { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            HarnessConfig::from_yaml("window_width: [1, 2]"),
            Err(FailsnapError::Yaml(_))
        ));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = HarnessConfig::new()
            .with_screenshot_dir("out/shots")
            .with_window_size(1024, 768);
        let parsed = HarnessConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = HarnessConfig::load(Path::new("/nonexistent/failsnap.yaml")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_browser_options_include_harness_flags() {
        let mut config = HarnessConfig::new();
        config.extra_args = vec!["--disable-gpu".to_string()];
        let options = config.browser_options();

        assert_eq!(
            options.args,
            vec!["--disable-gpu", NO_SANDBOX, DEBUG_LOG_LEVEL]
        );
        assert_eq!(options.window_width, 1400);
    }
}
