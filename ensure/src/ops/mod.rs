//! Core operations.
//!
//! This module contains the business logic for ensure commands,
//! separated from CLI argument parsing and output rendering.

pub mod generate;
pub mod tidy;

use std::sync::Arc;

use ensure_core::{ExitCleanup, OsFs};
use ensure_manifest::{Backend, Config};
use ensure_mockgen::{
    MockBackend, MockGenerator, MockgenBackend, NativeBackend, backend::DEFAULT_MOCKGEN_COMMAND,
};
pub use generate::generate;
pub use tidy::tidy;

/// Build a generator writing to the real filesystem.
///
/// `backend_override` takes precedence over `mocks.backend` in the config.
fn mock_generator(
    config: &Config,
    backend_override: Option<Backend>,
    exit_cleanup: &ExitCleanup,
) -> MockGenerator {
    let mocks = config.mocks.as_ref();
    let selected = backend_override
        .or_else(|| mocks.map(|mocks| mocks.backend))
        .unwrap_or_default();

    let backend: Arc<dyn MockBackend> = match selected {
        Backend::Mockgen => {
            let command = mocks
                .and_then(|mocks| mocks.mockgen_command.as_deref())
                .filter(|command| !command.is_empty())
                .unwrap_or(DEFAULT_MOCKGEN_COMMAND);
            Arc::new(MockgenBackend::new(command))
        }
        Backend::Native => Arc::new(NativeBackend::new(
            config.root_path.clone(),
            config.module_path.clone(),
        )),
    };
    tracing::debug!(backend = %selected, "selected mock backend");

    MockGenerator::new(Arc::new(OsFs), backend, exit_cleanup.clone())
}
