//! Session configuration: the builtin vocabulary and the optional
//! `scry.toml` file that extends it.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{error::SessionError, DEFAULT_BUILTINS};

/// What a [`Session`](crate::Session) is built from. The builtin list
/// is captured by the session once, at construction, and never changes
/// afterwards.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    builtins: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            builtins: DEFAULT_BUILTINS.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl SessionConfig {
    /// Adds always-bound names on top of the default vocabulary.
    pub fn extend_builtins(
        mut self,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.builtins.extend(names.into_iter().map(Into::into));
        self
    }

    /// Applies a discovered `scry.toml`.
    pub fn with_file_config(
        self,
        config: ScryConfig,
    ) -> Self {
        self.extend_builtins(config.builtins.extend)
    }

    pub fn builtins(&self) -> &[String] {
        &self.builtins
    }
}

/// The on-disk `scry.toml` format.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ScryConfig {
    #[serde(default)]
    pub builtins: BuiltinsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BuiltinsConfig {
    /// Names a site-specific prelude injects into every kernel, treated
    /// as always bound alongside the defaults.
    #[serde(default)]
    pub extend: Vec<String>,
}

// check the given folder, then recursively upwards until a scry.toml is found
pub fn find_config(path: Option<PathBuf>) -> Result<Option<ScryConfig>, SessionError> {
    fn search_dir(path: &Path) -> Option<PathBuf> {
        let config_path = path.join("scry.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        path.parent().and_then(search_dir)
    }

    let start_path = match path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let config_path = match search_dir(&start_path) {
        Some(path) => path,
        None => return Ok(None),
    };
    let config_content = fs::read_to_string(config_path)?;
    let config = toml::from_str(&config_content)?;
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    #[test]
    fn toml_with_extended_builtins() {
        let config: ScryConfig = toml::from_str("[builtins]\nextend = [\"display\", \"plot\"]").expect("config should parse");
        expect![[r#"
            ScryConfig {
                builtins: BuiltinsConfig {
                    extend: [
                        "display",
                        "plot",
                    ],
                },
            }
        "#]]
        .assert_debug_eq(&config);
    }

    #[test]
    fn empty_toml_is_a_valid_config() {
        let config: ScryConfig = toml::from_str("").expect("config should parse");
        assert!(config.builtins.extend.is_empty());
    }

    #[test]
    fn file_config_extends_the_defaults() {
        let config: ScryConfig = toml::from_str("[builtins]\nextend = [\"display\"]").expect("config should parse");
        let session_config = SessionConfig::default().with_file_config(config);
        assert!(session_config.builtins().iter().any(|name| name == "print"));
        assert!(session_config.builtins().iter().any(|name| name == "display"));
    }
}
