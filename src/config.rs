// User configuration, read from ~/.blockpadrc

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use serde::Deserialize;

use crate::keymap::KeyOptions;

const CONFIG_FILE_NAME: &str = ".blockpadrc";
const NOTES_DIR_NAME: &str = ".blockpad";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Notes directory; `~/.blockpad` when unset
    pub directory: Option<PathBuf>,
    /// Language tag for code blocks inserted at the caret
    pub default_code_language: String,
    /// Quiet period after the last change before an autosave is due
    pub autosave_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            directory: None,
            default_code_language: "javascript".to_string(),
            autosave_delay_secs: 2,
        }
    }
}

impl Config {
    /// Load the user's config file, falling back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Config::default(),
        }
    }

    /// Load `path`. A missing file gives the defaults; so does an unreadable
    /// or malformed one, with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Config::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                log::warn!("Failed to read config file {}: {err}", path.display());
                return Config::default();
            }
        };

        match toml::from_str::<Config>(&contents) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                Config::default()
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILE_NAME))
    }

    /// Where notes live, with a leading `~/` expanded
    pub fn notes_dir(&self) -> PathBuf {
        let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        match (&self.directory, home) {
            (Some(dir), Some(home)) => match dir.strip_prefix("~") {
                Ok(rest) => home.join(rest),
                Err(_) => dir.clone(),
            },
            (Some(dir), None) => dir.clone(),
            (None, Some(home)) => home.join(NOTES_DIR_NAME),
            (None, None) => PathBuf::from(NOTES_DIR_NAME),
        }
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_secs(self.autosave_delay_secs)
    }

    pub fn key_options(&self) -> KeyOptions {
        KeyOptions {
            code_language: self.default_code_language.clone(),
        }
    }
}
