//! Tidy operation - remove mock files nothing generates anymore.

use ensure_core::ExitCleanup;
use ensure_manifest::Config;
use eyre::Result;

use super::mock_generator;
use crate::reports::TidyReport;

/// Options for the tidy operation.
pub struct TidyOptions {
    /// Whether to preview without removing.
    pub dry_run: bool,
}

/// Execute the tidy operation.
pub fn tidy(config: &Config, exit_cleanup: &ExitCleanup, opts: TidyOptions) -> Result<TidyReport> {
    // Tidying never runs a backend, so the selection does not matter here
    let generator = mock_generator(config, None, exit_cleanup);

    let removed = if opts.dry_run {
        generator.plan_tidy(config)?.removals
    } else {
        generator.tidy_mocks(config)?.removed
    };

    Ok(TidyReport {
        root: config.root_path.clone(),
        dry_run: opts.dry_run,
        removed,
    })
}
