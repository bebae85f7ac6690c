//! Generate command report data structures.

use std::{io, path::PathBuf};

use ensure_mockgen::GeneratedMock;

use super::{
    TidyReport, display_relative,
    output::{Output, Report},
};

/// Report data from generating mocks.
#[derive(Debug)]
pub struct GenerateReport {
    /// Project root, used to shorten displayed paths.
    pub root: PathBuf,
    /// Generated mocks, in configuration order.
    pub generated: Vec<GeneratedMock>,
    /// Result of tidying after generation, when enabled.
    pub tidy: Option<TidyReport>,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) -> io::Result<()> {
        if self.generated.is_empty() {
            out.note("No mocks generated.")?;
        } else {
            out.heading("Generated")?;
            for mock in &self.generated {
                out.mock(&display_relative(&self.root, &mock.path), &mock.package)?;
            }
        }

        if let Some(tidy) = &self.tidy {
            out.blank()?;
            tidy.render(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::reports::testing::render_text;

    fn mock(root: &Path, package: &str, path: &str) -> GeneratedMock {
        GeneratedMock {
            package: package.to_string(),
            path: root.join(path),
        }
    }

    #[test]
    fn test_render_generated_with_tidy() {
        let root = PathBuf::from("/work/project");
        let report = GenerateReport {
            generated: vec![
                mock(
                    &root,
                    "github.com/my/mod/db: Querier",
                    "internal/mocks/db/mock_db/mock_db.go",
                ),
                mock(
                    &root,
                    "github.com/my/mod/api: Signer,Verifier",
                    "internal/mocks/api/mock_api/mock_api.go",
                ),
            ],
            tidy: Some(TidyReport {
                root: root.clone(),
                dry_run: false,
                removed: Vec::new(),
            }),
            root,
        };

        insta::assert_snapshot!(render_text(&report), @r"
        Generated:
          + internal/mocks/db/mock_db/mock_db.go (github.com/my/mod/db: Querier)
          + internal/mocks/api/mock_api/mock_api.go (github.com/my/mod/api: Signer,Verifier)

        No stray mock files found.
        ");
    }

    #[test]
    fn test_render_nothing_generated() {
        let report = GenerateReport {
            root: PathBuf::from("/work/project"),
            generated: Vec::new(),
            tidy: None,
        };

        assert_eq!(render_text(&report), "No mocks generated.");
    }
}
