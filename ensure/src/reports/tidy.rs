//! Tidy command report data structures.

use std::{io, path::PathBuf};

use super::{
    display_relative,
    output::{Output, Report},
};

/// Report data from tidying mock roots.
#[derive(Debug)]
pub struct TidyReport {
    /// Project root, used to shorten displayed paths.
    pub root: PathBuf,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Removed paths (or paths that would be removed in a dry run).
    pub removed: Vec<PathBuf>,
}

impl Report for TidyReport {
    fn render(&self, out: &mut dyn Output) -> io::Result<()> {
        if self.removed.is_empty() {
            return out.note("No stray mock files found.");
        }

        out.heading(if self.dry_run { "Would remove" } else { "Removed" })?;
        for path in &self.removed {
            out.stray(&display_relative(&self.root, path))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::testing::render_text;

    fn report(dry_run: bool, removed: &[&str]) -> TidyReport {
        let root = PathBuf::from("/work/project");
        TidyReport {
            removed: removed.iter().map(|path| root.join(path)).collect(),
            root,
            dry_run,
        }
    }

    #[test]
    fn test_render_nothing_to_remove() {
        assert_eq!(render_text(&report(false, &[])), "No stray mock files found.");
    }

    #[test]
    fn test_render_removed_relative_to_root() {
        let report = report(false, &["internal/mocks/old", "internal/mocks/old/mock_old.go"]);

        insta::assert_snapshot!(render_text(&report), @r"
        Removed:
          - internal/mocks/old
          - internal/mocks/old/mock_old.go
        ");
    }

    #[test]
    fn test_render_dry_run() {
        insta::assert_snapshot!(render_text(&report(true, &["internal/mocks/stale.txt"])), @r"
        Would remove:
          - internal/mocks/stale.txt
        ");
    }
}
