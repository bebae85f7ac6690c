//! Project-wide settings shared by every destination.

use std::path::PathBuf;

use ensure_manifest::{Config, MockConfig};

/// Default directory for mocks of packages outside any `internal/` tree.
pub const DEFAULT_PRIMARY_MOCK_DIR: &str = "internal/mocks";

/// Default directory name for mocks under an `internal/` tree.
pub const DEFAULT_INTERNAL_MOCK_DIR: &str = "mocks";

/// Extension of generated mock files.
pub const MOCK_FILE_EXTENSION: &str = "go";

/// Everything the resolver needs to know about the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    /// Absolute project root.
    pub root_path: PathBuf,
    /// The project's own module path.
    pub module_path: String,
    /// Directory relative to the root for mocks of non-internal packages.
    pub primary_mock_dir: String,
    /// Directory name used under each `internal/` boundary.
    pub internal_mock_dir: String,
}

impl ProjectContext {
    /// Create a context using the default mock directories.
    pub fn new(root_path: impl Into<PathBuf>, module_path: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            module_path: module_path.into(),
            primary_mock_dir: DEFAULT_PRIMARY_MOCK_DIR.to_string(),
            internal_mock_dir: DEFAULT_INTERNAL_MOCK_DIR.to_string(),
        }
    }

    /// Build the context for `config`, applying the `[mocks]` overrides.
    pub fn from_config(config: &Config, mocks: &MockConfig) -> Self {
        let mut ctx = Self::new(&config.root_path, &config.module_path);
        if let Some(dir) = non_empty(mocks.primary_destination.as_deref()) {
            ctx.primary_mock_dir = dir.to_string();
        }
        if let Some(dir) = non_empty(mocks.internal_destination.as_deref()) {
            ctx.internal_mock_dir = dir.to_string();
        }
        ctx
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
