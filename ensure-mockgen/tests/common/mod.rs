//! Fakes shared by the integration tests.

#![allow(dead_code)]

use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use ensure_core::{CancelToken, FsWrite};
use ensure_manifest::{Config, MockConfig, Package};
use ensure_mockgen::{BackendError, GenerateRequest, MockBackend};

pub const MODULE: &str = "github.com/my/mod";

pub fn config(root: &Path, packages: Vec<Package>) -> Config {
    Config {
        root_path: root.to_path_buf(),
        module_path: MODULE.to_string(),
        mocks: Some(MockConfig {
            packages,
            ..MockConfig::default()
        }),
        disable_parallel_generation: false,
    }
}

/// In-memory filesystem recording every write.
#[derive(Default)]
pub struct MemFs {
    pub files: Mutex<BTreeMap<PathBuf, (String, u32)>>,
    pub dirs: Mutex<BTreeSet<PathBuf>>,
    pub globbed: Mutex<Vec<String>>,
    /// Every path `remove_all` was called with, in order.
    pub removals: Mutex<Vec<PathBuf>>,
    /// Writes to these paths fail.
    pub failing_writes: BTreeSet<PathBuf>,
    /// Creating these directories fails.
    pub failing_dirs: BTreeSet<PathBuf>,
    /// Removing these paths fails.
    pub failing_removals: BTreeSet<PathBuf>,
}

impl MemFs {
    pub fn with_failing_write(path: impl Into<PathBuf>) -> Self {
        Self {
            failing_writes: BTreeSet::from([path.into()]),
            ..Self::default()
        }
    }

    pub fn with_failing_dir(path: impl Into<PathBuf>) -> Self {
        Self {
            failing_dirs: BTreeSet::from([path.into()]),
            ..Self::default()
        }
    }

    pub fn with_failing_removal(path: impl Into<PathBuf>) -> Self {
        Self {
            failing_removals: BTreeSet::from([path.into()]),
            ..Self::default()
        }
    }

    /// Add a file with placeholder contents.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files
            .get_mut()
            .unwrap()
            .insert(path.into(), ("package mock\n".to_string(), 0o664));
        self
    }

    pub fn removals(&self) -> Vec<PathBuf> {
        self.removals.lock().unwrap().clone()
    }

    pub fn snapshot(&self) -> BTreeMap<PathBuf, (String, u32)> {
        self.files.lock().unwrap().clone()
    }
}

impl FsWrite for MemFs {
    fn write_file(&self, path: &Path, contents: &str, mode: u32) -> io::Result<()> {
        if self.failing_writes.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), (contents.to_string(), mode));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path, _mode: u32) -> io::Result<()> {
        if self.failing_dirs.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.dirs.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }

    fn list_recursive(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let files = self.files.lock().unwrap();
        let dirs = self.dirs.lock().unwrap();
        let paths: BTreeSet<PathBuf> = files
            .keys()
            .chain(dirs.iter())
            .filter(|path| path.starts_with(dir))
            .cloned()
            .collect();

        if paths.is_empty() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
        }
        Ok(paths.into_iter().collect())
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        self.removals.lock().unwrap().push(path.to_path_buf());
        if self.failing_removals.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "busy"));
        }
        self.files.lock().unwrap().retain(|p, _| !p.starts_with(path));
        self.dirs.lock().unwrap().retain(|p| !p.starts_with(path));
        Ok(())
    }

    fn glob_remove_all(&self, pattern: &str) -> io::Result<()> {
        self.globbed.lock().unwrap().push(pattern.to_string());
        Ok(())
    }
}

/// Backend producing a recognizable body per package.
#[derive(Default)]
pub struct FakeBackend {
    /// Package paths whose generation fails.
    pub failing: BTreeSet<String>,
    pub requests: Mutex<Vec<GenerateRequest>>,
}

impl FakeBackend {
    pub fn failing(paths: &[&str]) -> Self {
        Self {
            failing: paths.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl MockBackend for FakeBackend {
    fn generate(
        &self,
        cancel: &CancelToken,
        request: &GenerateRequest,
    ) -> Result<String, BackendError> {
        self.requests.lock().unwrap().push(request.clone());

        if cancel.is_cancelled() {
            return Err(BackendError::Terminated);
        }
        if self.failing.contains(&request.package_path) {
            return Err(BackendError::Failed(format!(
                "mockgen: cannot load {}",
                request.package_path
            )));
        }

        Ok(format!(
            "// mock of {} ({}) from {}\n",
            request.package_path,
            request.interfaces.join(","),
            request.working_dir.display()
        ))
    }
}
