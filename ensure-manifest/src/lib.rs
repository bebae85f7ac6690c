// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;
mod manifest;
mod module;

pub use config::{CONFIG_FILE_NAME, Config, find_config_file};
pub use error::{Error, Result};
pub use manifest::{Backend, Manifest, MockConfig, Package};
pub use module::{GO_MOD_FILE_NAME, read_module_path};
