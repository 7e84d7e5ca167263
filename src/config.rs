// User configuration
// Read from `config.toml` in the platform config directory. Missing or broken
// files fall back to defaults.

use crate::search::debounce::DEFAULT_SEARCH_DELAY;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const QUALIFIER: &str = "net.keepnotes";
const ORGANIZATION: &str = "Keepnotes";
const APPLICATION: &str = "keep";
const CONFIG_FILE_NAME: &str = "config.toml";
const NOTES_DIR_NAME: &str = "notes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where note files live (default: platform data dir)
    pub data_dir: Option<PathBuf>,
    /// Local user name used as the note owner (default: login name)
    pub user: Option<String>,
    /// Delay before a typed search query is applied
    pub search_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: None,
            user: None,
            search_debounce_ms: DEFAULT_SEARCH_DELAY.as_millis() as u64,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from the default location, or defaults if there is no usable file
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load from `path`. Returns `None` if the file is missing or invalid.
    pub fn load_from(path: &Path) -> Option<Self> {
        let contents = fs::read_to_string(path).ok()?;
        match toml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config file");
                None
            }
        }
    }

    /// Directory holding the note files
    pub fn notes_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_local_dir().join(NOTES_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(".keepnotes").join(NOTES_DIR_NAME))
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search_delay(), Duration::from_millis(300));
        assert!(config.user.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(r#"user = "alice""#).unwrap();
        assert_eq!(config.user.as_deref(), Some("alice"));
        assert_eq!(config.search_debounce_ms, 300);
    }

    #[test]
    fn test_data_dir_overrides_notes_dir() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/my-notes")),
            ..Default::default()
        };
        assert_eq!(config.notes_dir(), PathBuf::from("/tmp/my-notes"));
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "search_debounce_ms = \"soon\"").unwrap();
        assert_eq!(Config::load_from(&path), None);

        fs::write(&path, "search_debounce_ms = 50").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().search_debounce_ms, 50);
        assert_eq!(Config::load_from(&dir.path().join("missing.toml")), None);
    }
}
