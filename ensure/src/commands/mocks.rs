use clap::{Args, Subcommand};
use ensure_core::ExitCleanup;
use ensure_manifest::Backend;
use eyre::{Context, Result};

use super::load_config;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct MocksCommand {
    #[command(subcommand)]
    command: MocksSubcommand,
}

impl MocksCommand {
    pub fn run(&self, exit_cleanup: &ExitCleanup) -> Result<()> {
        match &self.command {
            MocksSubcommand::Generate(cmd) => cmd.run(exit_cleanup),
            MocksSubcommand::Tidy(cmd) => cmd.run(exit_cleanup),
        }
    }
}

#[derive(Subcommand)]
enum MocksSubcommand {
    /// Generate GoMocks for the packages and interfaces listed in .ensure.toml
    Generate(MocksGenerateCommand),

    /// Remove files and directories that would not be generated for the
    /// packages and interfaces listed in .ensure.toml
    Tidy(MocksTidyCommand),
}

#[derive(Args)]
pub struct MocksGenerateCommand {
    /// Generate the mocks one at a time
    #[arg(long)]
    pub disable_parallel: bool,

    /// Generator to use, overriding `mocks.backend`
    #[arg(long)]
    pub backend: Option<Backend>,
}

impl MocksGenerateCommand {
    pub fn run(&self, exit_cleanup: &ExitCleanup) -> Result<()> {
        let config = load_config()?;

        let report = ops::generate(
            config,
            exit_cleanup,
            ops::generate::GenerateOptions {
                disable_parallel: self.disable_parallel,
                backend: self.backend,
                allow_tidy: true,
            },
        )?;

        report
            .render(&mut TerminalOutput::stdout())
            .wrap_err("failed to write report")?;
        Ok(())
    }
}

#[derive(Args)]
pub struct MocksTidyCommand {
    /// Preview what would be removed without removing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl MocksTidyCommand {
    pub fn run(&self, exit_cleanup: &ExitCleanup) -> Result<()> {
        let config = load_config()?;

        let report = ops::tidy(
            &config,
            exit_cleanup,
            ops::tidy::TidyOptions {
                dry_run: self.dry_run,
            },
        )?;

        report
            .render(&mut TerminalOutput::stdout())
            .wrap_err("failed to write report")?;
        Ok(())
    }
}
