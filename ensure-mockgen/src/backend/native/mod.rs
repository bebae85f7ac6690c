//! In-process mock generation.
//!
//! Reads the requested interfaces straight from the package's Go sources and
//! renders the mock without running any external tool.

mod code;
mod reader;
mod render;

use std::{
    collections::BTreeSet,
    io,
    path::{Path, PathBuf},
};

use ensure_core::CancelToken;

use self::reader::{
    GoReader, Imports, Interface, Lookup, Scope, SourceFile, TypeExpr, default_import_name,
};
use super::{BackendError, GenerateRequest, MockBackend};
use crate::{
    destination::mock_package_name,
    resolve::{join_relative, strip_module},
};

/// Generates mocks by reading interface declarations from source.
///
/// Packages inside the project's module are read from the project tree, any
/// other package from the project's `vendor` directory.
#[derive(Debug, Clone)]
pub struct NativeBackend {
    root_path: PathBuf,
    module_path: String,
}

impl NativeBackend {
    pub fn new(root_path: impl Into<PathBuf>, module_path: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            module_path: module_path.into(),
        }
    }

    fn package_dir(&self, package_path: &str) -> PathBuf {
        match strip_module(package_path, &self.module_path) {
            Some(relative) => join_relative(&self.root_path, relative),
            None => join_relative(&self.root_path.join("vendor"), package_path),
        }
    }
}

impl MockBackend for NativeBackend {
    fn generate(
        &self,
        cancel: &CancelToken,
        request: &GenerateRequest,
    ) -> Result<String, BackendError> {
        if cancel.is_cancelled() {
            return Err(BackendError::Terminated);
        }

        let package = request.package_path.as_str();
        let dir = self.package_dir(package);
        tracing::debug!(package, dir = %dir.display(), "reading package sources");
        let files = read_package(&GoReader::new()?, package, &dir)?;

        let package_name = files
            .first()
            .map(|file| file.package.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| default_import_name(package));
        let declared: BTreeSet<String> = files
            .iter()
            .flat_map(|file| file.declared_types())
            .map(str::to_string)
            .collect();
        let scope = Scope {
            package_name: &package_name,
            package_path: package,
            declared: &declared,
        };

        let mut imports = Imports::new();
        let mut interfaces = Vec::with_capacity(request.interfaces.len());
        for name in &request.interfaces {
            let (iface, file) = find_interface(&files, name, package)?;
            let iface = file.resolve(iface, &scope, &mut imports).map_err(|reason| {
                BackendError::Unsupported {
                    interface: name.clone(),
                    reason,
                }
            })?;
            interfaces.push(iface);
        }

        if cancel.is_cancelled() {
            return Err(BackendError::Terminated);
        }

        Ok(render::render_mock(
            &mock_package_name(package),
            &imports,
            &interfaces,
        ))
    }
}

fn find_interface<'a>(
    files: &'a [SourceFile],
    name: &str,
    package: &str,
) -> Result<(&'a Interface<TypeExpr>, &'a SourceFile), BackendError> {
    for file in files {
        match file.find_interface(name) {
            Lookup::Found(iface) => return Ok((iface, file)),
            Lookup::Unsupported(reason) => {
                return Err(BackendError::Unsupported {
                    interface: name.to_string(),
                    reason,
                });
            }
            Lookup::Missing => {}
        }
    }

    Err(BackendError::InterfaceNotFound {
        interface: name.to_string(),
        package: package.to_string(),
    })
}

/// Parse every non-test Go file in `dir`, sorted by file name.
fn read_package(
    reader: &GoReader,
    package: &str,
    dir: &Path,
) -> Result<Vec<SourceFile>, BackendError> {
    let not_found = || BackendError::PackageNotFound {
        package: package.to_string(),
        dir: dir.to_path_buf(),
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(cause) => {
            return Err(BackendError::Read {
                path: dir.to_path_buf(),
                cause,
            });
        }
    };

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|cause| BackendError::Read {
                path: dir.to_path_buf(),
                cause,
            })?
            .path();
        let is_source = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(".go") && !name.ends_with("_test.go"));
        if is_source && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(not_found());
    }

    paths
        .into_iter()
        .map(|path| match std::fs::read_to_string(&path) {
            Ok(src) => reader.parse(&src),
            Err(cause) => Err(BackendError::Read { path, cause }),
        })
        .collect()
}
