use std::{
    io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

/// Permissions used for directories created for generated mocks.
pub const DIR_PERMISSIONS: u32 = 0o775;

/// Permissions used for generated mock files.
pub const FILE_PERMISSIONS: u32 = 0o664;

/// Filesystem operations used while generating and tidying mocks.
///
/// Every method may be called concurrently from multiple generation jobs.
pub trait FsWrite: Send + Sync {
    /// Write `contents` to `path`, creating or truncating the file.
    fn write_file(&self, path: &Path, contents: &str, mode: u32) -> io::Result<()>;

    /// Create `path` and any missing parents.
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// List every path below `dir`, depth first, including `dir` itself.
    fn list_recursive(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Remove `path` and anything below it. Missing paths are not an error.
    fn remove_all(&self, path: &Path) -> io::Result<()>;

    /// Remove everything matching the glob `pattern`.
    fn glob_remove_all(&self, pattern: &str) -> io::Result<()>;
}

/// [`FsWrite`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl FsWrite for OsFs {
    fn write_file(&self, path: &Path, contents: &str, mode: u32) -> io::Result<()> {
        use std::io::Write;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        set_file_mode(&mut options, mode);

        let mut file = options.open(path)?;
        file.write_all(contents.as_bytes())
    }

    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        set_dir_mode(&mut builder, mode);
        builder.create(path)
    }

    fn list_recursive(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
            paths.push(entry?.into_path());
        }
        Ok(paths)
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        let metadata = match std::fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err),
        };

        let result = if metadata.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };

        match result {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn glob_remove_all(&self, pattern: &str) -> io::Result<()> {
        let matches = glob::glob(pattern)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

        for entry in matches {
            let path = entry.map_err(io::Error::from)?;
            self.remove_all(&path)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn set_file_mode(options: &mut std::fs::OpenOptions, mode: u32) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(mode);
}

#[cfg(not(unix))]
fn set_file_mode(_options: &mut std::fs::OpenOptions, _mode: u32) {}

#[cfg(unix)]
fn set_dir_mode(builder: &mut std::fs::DirBuilder, mode: u32) {
    use std::os::unix::fs::DirBuilderExt;
    builder.mode(mode);
}

#[cfg(not(unix))]
fn set_dir_mode(_builder: &mut std::fs::DirBuilder, _mode: u32) {}
