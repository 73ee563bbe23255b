//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_config(configs::TRADING)
//!         .with_version_file("V1.0", "Applications/App1/A", "a");
//!     fixture.aggregate().assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::env;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    #[allow(unused_imports)]
    pub use super::should_skip_network_tests;
    pub use super::TestFixture;
}

/// Configuration file snippets.
#[allow(dead_code)]
pub mod configs {
    /// One project with two database units, current format.
    pub const TRADING: &str = r#"
projects:
  Trading:
    categories:
      application: Applications
      database: DataBases
      report: Reports
    databases: [Counterparty, AccountManagement]
"#;

    /// Same project, but unmatched database units abort the run.
    pub const TRADING_STRICT: &str = r#"
projects:
  Trading:
    categories:
      application: Applications
      database: DataBases
      report: Reports
    databases: [Counterparty, AccountManagement]
    unknown-database-units: fail
"#;

    /// The legacy appsettings layout.
    pub const LEGACY_APPSETTINGS: &str = r#"{
  "Logging": { "LogLevel": { "Default": "Information" } },
  "Directories": {
    "Trading": {
      "Operations": ["Applications", "DataBases", "Reports"],
      "DataBases": ["Counterparty", "AccountManagement"]
    }
  }
}"#;

    /// Category names where one contains another.
    pub const OVERLAPPING: &str = r#"
projects:
  Broken:
    categories: { application: Report, database: DataBases, report: Reports }
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "projects: [unclosed";
}

/// Name of the checkout directory inside a fixture.
pub const CHECKOUT: &str = "checkout";

/// Returns `true` if the `SKIP_NETWORK_TESTS` environment variable is set.
#[allow(dead_code)]
pub fn should_skip_network_tests() -> bool {
    env::var("SKIP_NETWORK_TESTS").is_ok()
}

/// A temporary directory holding a config file, a local checkout with a
/// `Versions` folder, and room for outputs and workspaces.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `versions-aggregate.yaml` with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child("versions-aggregate.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add a file under `checkout/Versions/<version>/`.
    #[allow(dead_code)]
    pub fn with_version_file(self, version: &str, path: &str, content: &str) -> Self {
        let full = format!("{}/Versions/{}/{}", CHECKOUT, version, path);
        self.with_file(&full, content)
    }

    /// Add an empty directory under `checkout/Versions/<version>/`.
    #[allow(dead_code)]
    pub fn with_version_dir(self, version: &str, path: &str) -> Self {
        self.temp_dir
            .child(format!("{}/Versions/{}/{}", CHECKOUT, version, path))
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("versions-aggregate.yaml")
    }

    /// The local checkout used as `--source`.
    pub fn checkout(&self) -> PathBuf {
        self.temp_dir.path().join(CHECKOUT)
    }

    /// Where per-run workspaces are allocated.
    pub fn workspaces(&self) -> PathBuf {
        self.temp_dir.path().join("work")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("versions-aggregate");
        cmd.current_dir(self.path())
            .env_remove("VERSIONS_AGGREGATE_CONFIG")
            .env_remove("VERSIONS_AGGREGATE_WORKSPACE")
            .env_remove("VERSIONS_AGGREGATE_PASSWORD")
            .env_remove("RUST_LOG");
        cmd
    }

    /// An `aggregate` command for project `Trading` over the local checkout,
    /// with workspaces kept inside the fixture.
    #[allow(dead_code)]
    pub fn aggregate(&self) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg("aggregate")
            .arg("--project")
            .arg("Trading")
            .arg("--source")
            .arg(self.checkout())
            .arg("--workspace-root")
            .arg(self.workspaces());
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_version_file() {
        let fixture = TestFixture::new().with_version_file("V1.0", "Applications/App1/A", "a");
        assert!(fixture
            .checkout()
            .join("Versions/V1.0/Applications/App1/A")
            .is_file());
    }
}
