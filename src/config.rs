//! Environment variable access and build-root configuration.
//!
//! All environment reads go through the [`EnvSource`] trait so tests can
//! simulate arbitrary environment combinations without touching process
//! state. The asset base URL is not a live environment variable at all: the
//! prebuild writes it into a keyed file under the build root, read here by
//! [`read_build_env`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{QtPrepError, Result};

/// Opt-in flag for building against the distribution's own Qt packages.
pub const SYSTEM_QT_VAR: &str = "VIRCADIA_USE_SYSTEM_QT";

/// Directory of a user-supplied Qt install.
pub const QT_PATH_VAR: &str = "VIRCADIA_QT_PATH";

/// Qt version override.
pub const QT_VERSION_VAR: &str = "VIRCADIA_USE_QT_VERSION";

/// Build-root file key holding the external asset base URL.
pub const ASSETS_URL_KEY: &str = "EXTERNAL_BUILD_ASSETS";

/// Source of environment variables.
pub trait EnvSource {
    /// Look up a variable. `None` if unset.
    fn var(&self, key: &str) -> Option<String>;

    /// Look up a variable, treating an empty value as unset.
    fn var_non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|v| !v.is_empty())
    }
}

/// Reads from the real process environment.
#[derive(Debug, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment for tests and embedding.
#[derive(Debug, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable.
    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Path of the keyed configuration file under the build root.
fn build_env_path(build_root: &Path, key: &str) -> PathBuf {
    build_root.join("_env").join(format!("{key}.txt"))
}

/// Read a keyed value written into the build root by the prebuild.
///
/// The value is whitespace-trimmed; a missing or unreadable file is a
/// configuration error.
pub fn read_build_env(build_root: &Path, key: &str) -> Result<String> {
    let path = build_env_path(build_root, key);
    let value = fs::read_to_string(&path).map_err(|e| QtPrepError::BuildEnvUnavailable {
        key: key.to_string(),
        path: path.clone(),
        message: e.to_string(),
    })?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn map_env_returns_set_values() {
        let env = MapEnv::new().set(QT_PATH_VAR, "/opt/qt");
        assert_eq!(env.var(QT_PATH_VAR), Some("/opt/qt".to_string()));
        assert_eq!(env.var(SYSTEM_QT_VAR), None);
    }

    #[test]
    fn var_non_empty_treats_empty_as_unset() {
        let env = MapEnv::new().set(SYSTEM_QT_VAR, "");
        assert_eq!(env.var(SYSTEM_QT_VAR), Some(String::new()));
        assert_eq!(env.var_non_empty(SYSTEM_QT_VAR), None);
    }

    #[test]
    fn var_non_empty_passes_real_values_through() {
        let env = MapEnv::new().set(SYSTEM_QT_VAR, "1");
        assert_eq!(env.var_non_empty(SYSTEM_QT_VAR), Some("1".to_string()));
    }

    #[test]
    fn read_build_env_trims_value() {
        let temp = TempDir::new().unwrap();
        let env_dir = temp.path().join("_env");
        fs::create_dir_all(&env_dir).unwrap();
        fs::write(
            env_dir.join("EXTERNAL_BUILD_ASSETS.txt"),
            "https://assets.example.com\n",
        )
        .unwrap();

        let value = read_build_env(temp.path(), ASSETS_URL_KEY).unwrap();
        assert_eq!(value, "https://assets.example.com");
    }

    #[test]
    fn read_build_env_missing_file_names_key_and_path() {
        let temp = TempDir::new().unwrap();
        let err = read_build_env(temp.path(), ASSETS_URL_KEY).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("EXTERNAL_BUILD_ASSETS"));
        assert!(msg.contains("_env"));
        assert_eq!(err.exit_code(), 1);
    }
}
