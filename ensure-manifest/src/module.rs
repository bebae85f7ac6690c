//! Go module discovery.

use std::path::Path;

use crate::{Error, Result};

/// Name of the Go module definition file.
pub const GO_MOD_FILE_NAME: &str = "go.mod";

/// Read the module path declared by the `go.mod` in `root`.
pub fn read_module_path(root: &Path) -> Result<String> {
    let path = root.join(GO_MOD_FILE_NAME);
    let content = std::fs::read_to_string(&path).map_err(|e| {
        Box::new(Error::Io {
            path: path.clone(),
            source: e,
        })
    })?;

    parse_module_directive(&content).ok_or_else(|| Box::new(Error::MissingModule { path }))
}

fn parse_module_directive(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        };
        let rest = line.trim().strip_prefix("module")?;
        // `modules` or `module_x` are not the directive
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }

        let module = rest.trim().trim_matches(|c| c == '"' || c == '`');
        (!module.is_empty()).then(|| module.to_string())
    })
}
