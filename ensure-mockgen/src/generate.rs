//! Mock generation across every configured package.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
    thread,
};

use ensure_core::{CancelToken, DIR_PERMISSIONS, ExitCleanup, FILE_PERMISSIONS, FsWrite};
use ensure_manifest::Config;

use crate::{
    BackendError, Destination, Error, GenerateRequest, GenerationFailure, MockBackend, Result,
    helpers::append_helpers, resolve_config,
};

/// Temporary directories the reflection step of `mockgen` may leave behind.
const GOMOCK_REFLECT_DIR_PATTERN: &str = "gomock_reflect_*";

/// A mock file that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMock {
    /// Package description, as `path: Iface1,Iface2`.
    pub package: String,
    pub path: PathBuf,
}

/// Result of a successful generation, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub generated: Vec<GeneratedMock>,
}

/// Generates and tidies mocks for a project.
///
/// Filesystem access and the mock body generator are injected, so the same
/// orchestration drives `mockgen`, the in-process backend, or test fakes.
#[derive(Clone)]
pub struct MockGenerator {
    pub(crate) fs: Arc<dyn FsWrite>,
    backend: Arc<dyn MockBackend>,
    cleanup: ExitCleanup,
}

type Outcome = (usize, std::result::Result<GeneratedMock, GenerationFailure>);

impl MockGenerator {
    pub fn new(fs: Arc<dyn FsWrite>, backend: Arc<dyn MockBackend>, cleanup: ExitCleanup) -> Self {
        Self {
            fs,
            backend,
            cleanup,
        }
    }

    /// Generate a mock for every package in `config`.
    ///
    /// Every package is attempted. When any fail, the returned error lists
    /// all failures in configuration order; mocks that were generated stay
    /// on disk.
    pub fn generate_mocks(&self, cancel: &CancelToken, config: &Config) -> Result<GenerateSummary> {
        let (_, destinations) = resolve_config(config)?;

        for working_dir in destinations.unique_working_dirs() {
            self.register_cleanup(working_dir);
        }

        let outcomes = Mutex::new(Vec::with_capacity(destinations.len()));
        let record = |outcome: Outcome| {
            outcomes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(outcome);
        };

        if config.disable_parallel_generation {
            for (index, destination) in destinations.iter().enumerate() {
                record((index, self.generate_mock(cancel, destination)));
            }
        } else {
            thread::scope(|scope| {
                for (index, destination) in destinations.iter().enumerate() {
                    let record = &record;
                    scope.spawn(move || record((index, self.generate_mock(cancel, destination))));
                }
            });
        }

        let mut outcomes = outcomes.into_inner().unwrap_or_else(PoisonError::into_inner);
        outcomes.sort_by_key(|(index, _)| *index);

        let mut summary = GenerateSummary::default();
        let mut failures = Vec::new();
        for (_, outcome) in outcomes {
            match outcome {
                Ok(generated) => summary.generated.push(generated),
                Err(failure) => failures.push(failure),
            }
        }

        if !failures.is_empty() {
            return Err(Error::GenerationFailed { failures });
        }
        Ok(summary)
    }

    /// Remove leftover reflection directories in `working_dir` if the process
    /// is interrupted.
    fn register_cleanup(&self, working_dir: &Path) {
        let pattern = Path::new(&glob::Pattern::escape(&working_dir.to_string_lossy()))
            .join(GOMOCK_REFLECT_DIR_PATTERN)
            .to_string_lossy()
            .into_owned();
        let fs = Arc::clone(&self.fs);

        self.cleanup.register(move || {
            tracing::info!(%pattern, "cleaning up");
            fs.glob_remove_all(&pattern).map_err(Into::into)
        });
    }

    fn generate_mock(
        &self,
        cancel: &CancelToken,
        destination: &Destination,
    ) -> std::result::Result<GeneratedMock, GenerationFailure> {
        let package = destination.source_package();
        let description = package.to_string();
        tracing::info!(package = %description, "generating mock");

        let request = GenerateRequest {
            working_dir: destination.working_dir().to_path_buf(),
            package_path: package.path.clone(),
            interfaces: package.interfaces.clone(),
        };

        let body = self
            .backend
            .generate(cancel, &request)
            .map_err(|reason| match reason {
                BackendError::Terminated => GenerationFailure::Cancelled {
                    package: description.clone(),
                },
                reason => GenerationFailure::Backend {
                    package: description.clone(),
                    reason,
                },
            })?;
        let contents = append_helpers(body, &package.interfaces);

        let path = destination.mock_file_path();
        if let Some(dir) = path.parent() {
            self.fs
                .create_dir_all(dir, DIR_PERMISSIONS)
                .map_err(|reason| GenerationFailure::CreateDir {
                    package: description.clone(),
                    path: dir.to_path_buf(),
                    reason,
                })?;
        }

        self.fs
            .write_file(path, &contents, FILE_PERMISSIONS)
            .map_err(|reason| GenerationFailure::WriteFile {
                package: description.clone(),
                path: path.to_path_buf(),
                reason,
            })?;

        tracing::info!(package = %description, path = %path.display(), "generated mock");
        Ok(GeneratedMock {
            package: description,
            path: path.to_path_buf(),
        })
    }
}
