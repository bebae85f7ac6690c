//! Manifest types and parsing for .ensure.toml files.

mod backend;
mod parse;

use std::fmt;

pub use backend::Backend;
use serde::Deserialize;

/// Root manifest for .ensure.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Mock generation settings.
    /// Optional here so a missing section is reported alongside the other
    /// mock configuration errors.
    pub mocks: Option<MockConfig>,
}

/// The `[mocks]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MockConfig {
    /// Directory (relative to the project root) for mocks of packages
    /// outside any `internal/` tree. Defaults to `internal/mocks`.
    pub primary_destination: Option<String>,

    /// Directory name used under each `internal/` tree. Defaults to `mocks`.
    pub internal_destination: Option<String>,

    /// Run tidy after a successful generation.
    #[serde(default)]
    pub tidy_after_generate: bool,

    /// Generator used to produce mock bodies.
    #[serde(default)]
    pub backend: Backend,

    /// Command invoked by the mockgen backend. Defaults to `mockgen`.
    pub mockgen_command: Option<String>,

    /// Packages to mock.
    #[serde(default)]
    pub packages: Vec<Package>,
}

/// A package and the interfaces within it to mock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Package {
    /// Import path of the package.
    #[serde(default)]
    pub path: String,

    /// Names of the interfaces to mock.
    #[serde(default)]
    pub interfaces: Vec<String>,
}

impl Package {
    pub fn new(path: impl Into<String>, interfaces: &[&str]) -> Self {
        Self {
            path: path.into(),
            interfaces: interfaces.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.interfaces.join(","))
    }
}
