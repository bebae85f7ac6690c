use std::{fmt, io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::BackendError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("invalid mock configuration:{}", BulletList(errors))]
    #[diagnostic(
        code(ensure::mocks::invalid_config),
        help("fix the `[mocks]` section of .ensure.toml")
    )]
    InvalidConfig { errors: Vec<ConfigError> },

    #[error("unable to generate at least one mock:{}", BulletList(failures))]
    #[diagnostic(code(ensure::mocks::generation_failed))]
    GenerationFailed { failures: Vec<GenerationFailure> },

    #[error("unable to list mock directory '{}'", .path.display())]
    #[diagnostic(code(ensure::mocks::tidy_list))]
    TidyList {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to remove '{}'", .path.display())]
    #[diagnostic(code(ensure::mocks::tidy_remove))]
    TidyRemove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::InvalidConfig { errors: vec![err] }
    }
}

/// Problems with the `[mocks]` section, collected before anything is generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing `[mocks]` section in .ensure.toml")]
    MissingMockConfig,

    #[error("no mocks to generate, add some to `[[mocks.packages]]`")]
    MissingPackages,

    #[error("`mocks.packages[{index}]` is missing the `path` key")]
    MissingPackagePath { index: usize },

    #[error("package '{package}' has no interfaces to generate, add them using the `interfaces` key")]
    MissingPackageInterfaces { package: String },

    #[error("found duplicate package path '{package}', package paths must be unique")]
    DuplicatePackagePath { package: String },

    #[error("package '{package}' is internal to a module other than '{module}'")]
    InternalPackageOutsideModule { package: String, module: String },
}

/// A single package that could not be generated.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("could not generate mock for '{package}': {reason}")]
    Backend {
        package: String,
        reason: BackendError,
    },

    #[error("generation of '{package}' was cancelled")]
    Cancelled { package: String },

    #[error("could not create directory '{}' for '{package}': {reason}", .path.display())]
    CreateDir {
        package: String,
        path: PathBuf,
        reason: io::Error,
    },

    #[error("could not create file '{}' for '{package}': {reason}", .path.display())]
    WriteFile {
        package: String,
        path: PathBuf,
        reason: io::Error,
    },
}

impl GenerationFailure {
    /// Description of the package that failed, as `path: Iface1,Iface2`.
    pub fn package(&self) -> &str {
        match self {
            Self::Backend { package, .. }
            | Self::Cancelled { package }
            | Self::CreateDir { package, .. }
            | Self::WriteFile { package, .. } => package,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

struct BulletList<'a, T>(&'a [T]);

impl<T: fmt::Display> fmt::Display for BulletList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.0 {
            write!(f, "\n - {item}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_lists_every_error() {
        let err = Error::InvalidConfig {
            errors: vec![
                ConfigError::MissingPackagePath { index: 1 },
                ConfigError::DuplicatePackagePath {
                    package: "github.com/some/pkg".to_string(),
                },
            ],
        };

        insta::assert_snapshot!(err.to_string(), @r"
        invalid mock configuration:
         - `mocks.packages[1]` is missing the `path` key
         - found duplicate package path 'github.com/some/pkg', package paths must be unique
        ");
    }

    #[test]
    fn test_generation_failure_package() {
        let failure = GenerationFailure::Cancelled {
            package: "github.com/some/pkg: Iface".to_string(),
        };

        assert_eq!(failure.package(), "github.com/some/pkg: Iface");
        assert!(failure.is_cancelled());
    }
}
