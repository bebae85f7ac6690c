//! Loading the full configuration for one invocation.

use std::path::{Path, PathBuf};

use crate::{Error, Manifest, MockConfig, Result, read_module_path};

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = ".ensure.toml";

/// Find the configuration file in `start` or its closest ancestor.
pub fn find_config_file(start: &Path) -> Result<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| {
            Box::new(Error::ConfigNotFound {
                start: start.to_path_buf(),
            })
        })
}

/// Everything a command needs to know about the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory containing the configuration file.
    pub root_path: PathBuf,

    /// Module path declared in the project's `go.mod`.
    pub module_path: String,

    /// The `[mocks]` section, if present.
    pub mocks: Option<MockConfig>,

    /// Run generation jobs one at a time.
    pub disable_parallel_generation: bool,
}

impl Config {
    /// Load the configuration for a command started in `pwd`.
    pub fn load(pwd: &Path) -> Result<Self> {
        let config_path = find_config_file(pwd)?;
        let root_path = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| pwd.to_path_buf());

        let manifest = Manifest::from_file(&config_path)?;
        let module_path = read_module_path(&root_path)?;

        Ok(Self {
            root_path,
            module_path,
            mocks: manifest.mocks,
            disable_parallel_generation: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::{GO_MOD_FILE_NAME, Package};

    fn write_project(root: &Path, config: &str) {
        fs::write(root.join(CONFIG_FILE_NAME), config).unwrap();
        fs::write(root.join(GO_MOD_FILE_NAME), "module github.com/my/mod\n").unwrap();
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "").unwrap();

        assert_eq!(
            find_config_file(&nested).unwrap(),
            temp.path().join(CONFIG_FILE_NAME)
        );
    }

    #[test]
    fn test_find_config_file_prefers_closest() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("sub");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "").unwrap();
        fs::write(nested.join(CONFIG_FILE_NAME), "").unwrap();

        assert_eq!(
            find_config_file(&nested).unwrap(),
            nested.join(CONFIG_FILE_NAME)
        );
    }

    #[test]
    fn test_load_from_nested_directory() {
        let temp = TempDir::new().unwrap();
        write_project(
            temp.path(),
            r#"
            [[mocks.packages]]
            path = "github.com/my/mod/internal/store"
            interfaces = ["Store"]
            "#,
        );
        let nested = temp.path().join("cmd").join("app");
        fs::create_dir_all(&nested).unwrap();

        let config = Config::load(&nested).unwrap();

        assert_eq!(config.root_path, temp.path());
        assert_eq!(config.module_path, "github.com/my/mod");
        assert!(!config.disable_parallel_generation);
        assert_eq!(
            config.mocks.unwrap().packages,
            vec![Package::new("github.com/my/mod/internal/store", &["Store"])]
        );
    }

    #[test]
    fn test_load_without_go_mod_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "").unwrap();

        let err = Config::load(temp.path()).unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }
}
