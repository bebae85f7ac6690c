//! Generate operation - write a mock for every configured package.

use ensure_core::ExitCleanup;
use ensure_manifest::{Backend, Config};
use eyre::{Context, Result};

use super::mock_generator;
use crate::reports::{GenerateReport, TidyReport};

/// Options for the generate operation.
pub struct GenerateOptions {
    /// Generate one mock at a time.
    pub disable_parallel: bool,
    /// Backend overriding `mocks.backend`.
    pub backend: Option<Backend>,
    /// Whether `mocks.tidy_after_generate` is honored.
    pub allow_tidy: bool,
}

/// Execute the generate operation.
///
/// Tidies the mock roots afterwards when the config asks for it and every
/// mock was generated.
pub fn generate(
    mut config: Config,
    exit_cleanup: &ExitCleanup,
    opts: GenerateOptions,
) -> Result<GenerateReport> {
    config.disable_parallel_generation |= opts.disable_parallel;

    let generator = mock_generator(&config, opts.backend, exit_cleanup);
    let summary = generator.generate_mocks(&exit_cleanup.token(), &config)?;

    let tidy_after_generate = config
        .mocks
        .as_ref()
        .is_some_and(|mocks| mocks.tidy_after_generate);

    let tidy = if opts.allow_tidy && tidy_after_generate {
        let summary = generator
            .tidy_mocks(&config)
            .wrap_err("Failed to tidy mocks after generating")?;
        Some(TidyReport {
            root: config.root_path.clone(),
            dry_run: false,
            removed: summary.removed,
        })
    } else {
        None
    };

    Ok(GenerateReport {
        root: config.root_path,
        generated: summary.generated,
        tidy,
    })
}
