//! Report data structures for commands.
//!
//! Operations build reports, then commands render them to an [`Output`]
//! target.

mod generate;
mod output;
mod tidy;

use std::path::Path;

pub use generate::GenerateReport;
pub use output::{Report, TerminalOutput};
pub use tidy::TidyReport;

/// Display `path` relative to `root` when it lives below it.
fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
