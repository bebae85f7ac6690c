//! Generators of mock source text.
//!
//! A [`MockBackend`] turns one package and a list of its interfaces into the
//! body of a mock file. Calls must be independent of each other, since the
//! generator may run many of them at once.

mod mockgen;
mod native;

use std::{io, path::PathBuf};

use ensure_core::{CancelToken, ExecError};
use thiserror::Error;

pub use mockgen::{DEFAULT_MOCKGEN_COMMAND, MockgenBackend};
pub use native::NativeBackend;

/// One package to generate a mock body for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Directory the generation runs in.
    pub working_dir: PathBuf,
    /// Import path of the package.
    pub package_path: String,
    /// Interfaces in the package to mock.
    pub interfaces: Vec<String>,
}

/// Produces mock source text for a package.
pub trait MockBackend: Send + Sync {
    /// Generate the mock body for `request`.
    ///
    /// Must return [`BackendError::Terminated`] when `cancel` interrupts the
    /// generation.
    fn generate(&self, cancel: &CancelToken, request: &GenerateRequest)
    -> Result<String, BackendError>;
}

#[derive(Debug, Error)]
pub enum BackendError {
    /// Generation was interrupted, either by a signal or by cancellation.
    #[error("terminated before finishing")]
    Terminated,

    /// The generator ran and failed. Holds its output verbatim.
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Exec(ExecError),

    #[error("package '{package}' not found at '{}'", .dir.display())]
    PackageNotFound { package: String, dir: PathBuf },

    #[error("could not read '{}': {cause}", .path.display())]
    Read { path: PathBuf, cause: io::Error },

    #[error("could not parse Go sources: {0}")]
    Parser(String),

    #[error("interface {interface} not found in {package}")]
    InterfaceNotFound { interface: String, package: String },

    #[error("interface {interface} is not supported: {reason}")]
    Unsupported { interface: String, reason: String },
}

impl From<ExecError> for BackendError {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::Terminated => BackendError::Terminated,
            ExecError::Failed(output) => BackendError::Failed(output),
            other => BackendError::Exec(other),
        }
    }
}
