//! Resolution of configured packages into mock destinations.

use std::path::{Path, PathBuf};

use ensure_manifest::{Config, Package};
use indexmap::IndexMap;

use crate::{ConfigError, Destination, DestinationSet, Error, ProjectContext, Result};

const INTERNAL_SEGMENT: &str = "internal/";

/// Validate and resolve the `[mocks]` section of `config`.
///
/// Every configuration problem is reported at once.
pub fn resolve_config(config: &Config) -> Result<(ProjectContext, DestinationSet)> {
    let mocks = config.mocks.as_ref().ok_or(ConfigError::MissingMockConfig)?;
    let ctx = ProjectContext::from_config(config, mocks);

    let (destinations, errors) = resolve(&ctx, &mocks.packages);
    if !errors.is_empty() {
        return Err(Error::InvalidConfig { errors });
    }

    tracing::debug!(count = destinations.len(), "resolved mock destinations");
    Ok((ctx, destinations))
}

/// Resolve each package to its destination.
///
/// Invalid entries are reported and skipped; destinations for the remaining
/// entries keep the configured order.
pub fn resolve(ctx: &ProjectContext, packages: &[Package]) -> (DestinationSet, Vec<ConfigError>) {
    let mut errors = Vec::new();
    if packages.is_empty() {
        errors.push(ConfigError::MissingPackages);
    }

    let mut occurrences: IndexMap<&str, usize> = IndexMap::new();
    for package in packages.iter().filter(|package| !package.path.is_empty()) {
        *occurrences.entry(package.path.as_str()).or_default() += 1;
    }

    let mut destinations = Vec::with_capacity(packages.len());
    for (index, package) in packages.iter().enumerate() {
        if package.path.is_empty() {
            errors.push(ConfigError::MissingPackagePath { index });
            continue;
        }

        if package.interfaces.is_empty() {
            errors.push(ConfigError::MissingPackageInterfaces {
                package: package.path.clone(),
            });
            continue;
        }

        if occurrences.get(package.path.as_str()).copied().unwrap_or_default() > 1 {
            continue;
        }

        match resolve_destination(ctx, package) {
            Ok(destination) => {
                tracing::debug!(
                    package = %package.path,
                    working_dir = %destination.working_dir().display(),
                    mock_file = %destination.mock_file_path().display(),
                    "resolved destination"
                );
                destinations.push(destination);
            }
            Err(err) => errors.push(err),
        }
    }

    errors.extend(
        occurrences
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(path, _)| ConfigError::DuplicatePackagePath {
                package: path.to_string(),
            }),
    );

    (DestinationSet::new(destinations), errors)
}

/// Resolve a single package.
///
/// Packages without an `internal/` segment are mocked under the primary mock
/// directory and generated from the project root. Otherwise the last
/// `internal/` segment decides: the package must belong to this module, the
/// backend runs in the directory owning that `internal/` tree, and the mock is
/// written to `<dir>/internal/<internal mock dir>`.
pub fn resolve_destination(
    ctx: &ProjectContext,
    package: &Package,
) -> std::result::Result<Destination, ConfigError> {
    let path = package.path.as_str();

    let Some(index) = last_internal_segment(path) else {
        return Ok(Destination::new(
            package.clone(),
            ctx.root_path.clone(),
            join_relative(&ctx.root_path, &ctx.primary_mock_dir),
            path.to_string(),
        ));
    };

    let owner = path[..index].trim_end_matches('/');
    let suffix = &path[index + INTERNAL_SEGMENT.len()..];

    let relative_dir = strip_module(owner, &ctx.module_path).ok_or_else(|| {
        ConfigError::InternalPackageOutsideModule {
            package: path.to_string(),
            module: ctx.module_path.clone(),
        }
    })?;

    let working_dir = join_relative(&ctx.root_path, relative_dir);
    let output_root = join_relative(&working_dir.join("internal"), &ctx.internal_mock_dir);

    Ok(Destination::new(
        package.clone(),
        working_dir,
        output_root,
        suffix.to_string(),
    ))
}

/// Byte index of the last `internal/` that starts a path segment.
fn last_internal_segment(path: &str) -> Option<usize> {
    path.rmatch_indices(INTERNAL_SEGMENT)
        .map(|(index, _)| index)
        .find(|&index| index == 0 || path.as_bytes()[index - 1] == b'/')
}

/// The part of `owner` below `module`, or `None` if `owner` is not in `module`.
pub(crate) fn strip_module<'a>(owner: &'a str, module: &str) -> Option<&'a str> {
    let rest = owner.strip_prefix(module)?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix('/')
}

pub(crate) fn join_relative(base: &Path, relative: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    path.extend(relative.split('/').filter(|segment| !segment.is_empty()));
    path
}
