//! Resolved mock destinations and the views derived from them.

use std::path::{Path, PathBuf};

use ensure_manifest::Package;
use indexmap::{IndexMap, IndexSet};

use crate::context::MOCK_FILE_EXTENSION;

/// Where the mock for one configured package is generated and written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    source_package: Package,
    working_dir: PathBuf,
    output_root: PathBuf,
    raw_relative_package_path: String,
    mock_file_path: PathBuf,
}

impl Destination {
    pub(crate) fn new(
        source_package: Package,
        working_dir: PathBuf,
        output_root: PathBuf,
        raw_relative_package_path: String,
    ) -> Self {
        let mock_file_path = mock_file_path(&output_root, &raw_relative_package_path);
        Self {
            source_package,
            working_dir,
            output_root,
            raw_relative_package_path,
            mock_file_path,
        }
    }

    /// The configured package this destination was resolved from.
    pub fn source_package(&self) -> &Package {
        &self.source_package
    }

    /// Directory the backend runs in.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Directory all mock files for this destination live under.
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Package path relative to the output root.
    pub fn raw_relative_package_path(&self) -> &str {
        &self.raw_relative_package_path
    }

    /// Name of the generated mock package, e.g. `mock_store`.
    pub fn mock_package_name(&self) -> String {
        mock_package_name(&self.raw_relative_package_path)
    }

    /// `<output_root>/<dir>/mock_<name>/mock_<name>.go`
    pub fn mock_file_path(&self) -> &Path {
        &self.mock_file_path
    }
}

/// Name of the mock package generated for `package_path`.
pub fn mock_package_name(package_path: &str) -> String {
    let base = package_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    format!("mock_{base}")
}

fn mock_file_path(output_root: &Path, raw_relative_package_path: &str) -> PathBuf {
    let raw = raw_relative_package_path.trim_end_matches('/');
    let mut path = output_root.to_path_buf();
    if let Some((dir, _)) = raw.rsplit_once('/') {
        path.extend(dir.split('/').filter(|segment| !segment.is_empty()));
    }

    let name = mock_package_name(raw);
    path.push(&name);
    path.push(format!("{name}.{MOCK_FILE_EXTENSION}"));
    path
}

/// Destinations in the order their packages were configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationSet {
    destinations: Vec<Destination>,
}

impl DestinationSet {
    pub fn new(destinations: Vec<Destination>) -> Self {
        Self { destinations }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Destination> {
        self.destinations.iter()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Distinct working directories, in first-seen order.
    pub fn unique_working_dirs(&self) -> IndexSet<&Path> {
        self.iter().map(Destination::working_dir).collect()
    }

    /// Destinations keyed by the mock tree they are written into.
    ///
    /// Packages whose mocks share an output root end up in the same group.
    pub fn group_by_output_root(&self) -> IndexMap<PathBuf, DestinationSet> {
        let mut groups: IndexMap<PathBuf, DestinationSet> = IndexMap::new();
        for destination in self.iter() {
            groups
                .entry(destination.output_root.clone())
                .or_default()
                .destinations
                .push(destination.clone());
        }
        groups
    }

    /// Whether `candidate` is an expected mock file or one of its ancestors.
    ///
    /// Compares whole path components, so `mock_abc` is not a prefix of
    /// `mock_abcd/mock_abcd.go`.
    pub fn has_expected_file_prefix(&self, candidate: &Path) -> bool {
        self.iter()
            .any(|destination| destination.mock_file_path.starts_with(candidate))
    }

    /// Destinations keyed by the configured package path.
    pub fn by_source_package_path(&self) -> IndexMap<&str, &Destination> {
        self.iter()
            .map(|destination| (destination.source_package.path.as_str(), destination))
            .collect()
    }
}

impl<'a> IntoIterator for &'a DestinationSet {
    type Item = &'a Destination;
    type IntoIter = std::slice::Iter<'a, Destination>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
