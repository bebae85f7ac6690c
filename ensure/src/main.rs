mod commands;
mod logging;
mod ops;
mod reports;

use clap::Parser;
use ensure_core::ExitCleanup;
use eyre::{Context, Result};

use crate::commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let exit_cleanup = ExitCleanup::install().wrap_err("failed to install signal handler")?;
    let result = cli.run(&exit_cleanup);

    // Interrupted runs exit after their cleanups, whatever the command returned
    if exit_cleanup.finish() {
        std::process::exit(1);
    }

    if let Err(err) = result {
        eprintln!("ERROR: {err:#}");
        std::process::exit(1);
    }
    Ok(())
}
