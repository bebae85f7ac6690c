mod completions;
mod generate;
mod mocks;

use clap::{ArgAction, Parser, Subcommand};
use completions::CompletionsCommand;
use ensure_core::ExitCleanup;
use ensure_manifest::Config;
use eyre::{Context, Result};
use generate::GenerateCommand;
use mocks::MocksCommand;

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for ensure_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("ERROR: {:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

/// Load the configuration for the current directory.
fn load_config() -> Result<Config> {
    let pwd = std::env::current_dir().wrap_err("failed to read the current directory")?;
    Ok(Config::load(&pwd).unwrap_or_exit())
}

#[derive(Parser)]
#[command(name = "ensure")]
#[command(version)]
#[command(about = "Generate and tidy GoMocks listed in .ensure.toml")]
pub(crate) struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self, exit_cleanup: &ExitCleanup) -> Result<()> {
        match &self.command {
            Commands::Mocks(cmd) => cmd.run(exit_cleanup),
            Commands::Generate(cmd) => cmd.run(exit_cleanup),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Commands related to mocks
    Mocks(MocksCommand),

    /// Deprecated, use `ensure mocks generate`
    #[command(hide = true)]
    Generate(GenerateCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
