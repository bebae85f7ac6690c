//! Mock generation backends.

use std::{fmt, str::FromStr};

use serde::Deserialize;

/// Supported generators for mock bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Run the external `mockgen` tool
    #[default]
    Mockgen,
    /// Read interface declarations and render mocks in-process
    Native,
}

impl Backend {
    /// Returns the backend identifier as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Mockgen => "mockgen",
            Backend::Native => "native",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mockgen" => Ok(Backend::Mockgen),
            "native" => Ok(Backend::Native),
            _ => Err(format!(
                "unknown backend '{}', expected 'mockgen' or 'native'",
                s
            )),
        }
    }
}
