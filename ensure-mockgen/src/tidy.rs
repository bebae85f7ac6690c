//! Reconciliation of mock trees against the configured packages.

use std::path::PathBuf;

use ensure_manifest::Config;

use crate::{Error, MockGenerator, Result, resolve_config};

/// Paths that tidying would remove.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TidyPlan {
    /// Paths in listing order. Descendants of a removed directory are
    /// listed too.
    pub removals: Vec<PathBuf>,
}

impl TidyPlan {
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty()
    }
}

/// Paths that were removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TidySummary {
    pub removed: Vec<PathBuf>,
}

impl MockGenerator {
    /// Work out which paths under each mock root are not expected.
    ///
    /// A path is kept when it is an expected mock file or one of its
    /// ancestors. Every root is listed before anything is returned, so a
    /// root that cannot be listed fails the whole plan.
    pub fn plan_tidy(&self, config: &Config) -> Result<TidyPlan> {
        let (_, destinations) = resolve_config(config)?;

        let mut plan = TidyPlan::default();
        for (root, group) in destinations.group_by_output_root() {
            let paths = self
                .fs
                .list_recursive(&root)
                .map_err(|source| Error::TidyList {
                    path: root.clone(),
                    source,
                })?;

            plan.removals.extend(
                paths
                    .into_iter()
                    .filter(|path| !group.has_expected_file_prefix(path)),
            );
        }

        Ok(plan)
    }

    /// Remove every path under the mock roots that is not expected.
    ///
    /// Stops at the first path that cannot be removed.
    pub fn tidy_mocks(&self, config: &Config) -> Result<TidySummary> {
        let plan = self.plan_tidy(config)?;

        for path in &plan.removals {
            tracing::info!(path = %path.display(), "removing");
            self.fs.remove_all(path).map_err(|source| Error::TidyRemove {
                path: path.clone(),
                source,
            })?;
        }

        Ok(TidySummary {
            removed: plan.removals,
        })
    }
}
