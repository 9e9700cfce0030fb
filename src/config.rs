use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{StorageKeys, ViewMode, DEFAULT_STORAGE_PREFIX};

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the key-value slots
    pub data_dir: PathBuf,

    /// Prefix of every storage key
    pub storage_prefix: String,

    /// Whether an empty or unreadable store starts with the sample notes
    pub seed_on_first_run: bool,

    /// Mode used when the stored one is missing or invalid
    pub default_view_mode: ViewMode,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".pixelnotes"));

        Self {
            data_dir,
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            seed_on_first_run: true,
            default_view_mode: ViewMode::Bubble,
        }
    }
}

impl Config {
    /// Where `config.json` lives when no path is given.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Loads the configuration, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(path: Option<&Path>) -> Config {
        let path = match path.map(Path::to_path_buf).or_else(Config::default_path) {
            Some(path) => path,
            None => return Config::default(),
        };

        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Config::default();
        }

        match fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str::<Config>(&raw).map_err(|e| e.to_string()))
        {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(&self.storage_prefix)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "pixelnotes")
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"storage_prefix":"demo","default_view_mode":"list"}"#).unwrap();

        let config = Config::load(Some(&path));
        assert_eq!(config.storage_prefix, "demo");
        assert_eq!(config.default_view_mode, ViewMode::List);
        assert!(config.seed_on_first_run);
        assert_eq!(config.storage_keys().palette, "demo-palette");
    }

    #[test]
    fn malformed_file_falls_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(Config::load(Some(&path)), Config::default());
    }

    #[test]
    fn missing_file_falls_back() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            Config::load(Some(&temp.path().join("nope.json"))),
            Config::default()
        );
    }
}
