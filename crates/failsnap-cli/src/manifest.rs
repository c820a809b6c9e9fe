//! YAML test manifests
//!
//! ```yaml
//! suite: login
//! tests:
//!   - name: test_login
//!     node_id: tests/test_login.py::test_login[admin]
//!     doc: Login with valid credentials. Uses the staging account.
//!     params:
//!       user: admin
//! ```

use crate::error::{CliError, CliResult};
use failsnap::TestItem;
use serde::Deserialize;
use std::path::Path;

/// A suite of collected test items
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Suite name
    #[serde(default)]
    pub suite: Option<String>,
    /// Collected items
    pub tests: Vec<TestItem>,
}

impl Manifest {
    /// Parse a manifest from YAML text
    pub fn from_yaml(yaml: &str) -> CliResult<Self> {
        let mut manifest: Self = serde_yaml_ng::from_str(yaml)?;
        for (index, item) in manifest.tests.iter_mut().enumerate() {
            if item.name.is_empty() {
                return Err(CliError::manifest(format!("test #{index} has no name")));
            }
            if item.node_id.is_empty() {
                item.node_id.clone_from(&item.name);
            }
        }
        Ok(manifest)
    }

    /// Load a manifest file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::manifest(format!("cannot read {}: {e}", path.display())))?;
        Self::from_yaml(&content)
    }
}
