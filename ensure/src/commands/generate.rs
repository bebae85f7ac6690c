use clap::{Args, Subcommand};
use ensure_core::ExitCleanup;
use eyre::{Context, Result};

use super::load_config;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

/// Kept so existing scripts calling `ensure generate mocks` keep working.
#[derive(Args)]
pub struct GenerateCommand {
    #[command(subcommand)]
    target: GenerateTarget,
}

#[derive(Subcommand)]
enum GenerateTarget {
    /// Deprecated, use `ensure mocks generate`
    Mocks(GenerateMocksCommand),
}

#[derive(Args)]
pub struct GenerateMocksCommand {
    /// Generate the mocks one at a time
    #[arg(long)]
    pub disable_parallel: bool,
}

impl GenerateCommand {
    pub fn run(&self, exit_cleanup: &ExitCleanup) -> Result<()> {
        let GenerateTarget::Mocks(cmd) = &self.target;
        tracing::warn!("`ensure generate mocks` is deprecated, use `ensure mocks generate` instead");

        let config = load_config()?;
        let report = ops::generate(
            config,
            exit_cleanup,
            ops::generate::GenerateOptions {
                disable_parallel: cmd.disable_parallel,
                backend: None,
                allow_tidy: false,
            },
        )?;

        report
            .render(&mut TerminalOutput::stdout())
            .wrap_err("failed to write report")?;
        Ok(())
    }
}
