//! User configuration loaded from a TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::input::KeyBindings;
use crate::types::TICK_MS;
use crate::APP_DIR;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "BLOCKFALL_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Piece RNG seed; derived from the clock when absent.
    pub seed: Option<u32>,
    /// Target frame period in milliseconds.
    pub frame_ms: u32,
    /// Overrides the default high-score file location.
    pub high_score_path: Option<PathBuf>,
    pub key_bindings: KeyBindings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            frame_ms: TICK_MS,
            high_score_path: None,
            key_bindings: KeyBindings::default(),
        }
    }
}

impl Config {
    /// Read `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, text).with_context(|| format!("failed to write config {}", path.display()))
    }

    /// Where the high score lives: the configured override, else the data directory.
    pub fn high_score_path(&self) -> Option<PathBuf> {
        self.high_score_path
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join("high_score.json")))
    }

    /// Frame period, never below one millisecond.
    pub fn frame_ms(&self) -> u32 {
        self.frame_ms.max(1)
    }
}

/// Config file location: `$BLOCKFALL_CONFIG`, else `<config_dir>/blockfall/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Per-user data directory for the high score and the log file
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameAction;
    use crossterm::event::KeyCode;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.frame_ms, 16);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "seed = 42\n\n[key_bindings]\nhold = { Char = \"h\" }\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.frame_ms, 16);
        assert_eq!(config.key_bindings.hold, KeyCode::Char('h'));
        assert_eq!(config.key_bindings.pause, KeyCode::Char('p'));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config {
            seed: Some(7),
            frame_ms: 20,
            high_score_path: Some(dir.path().join("hs.json")),
            ..Config::default()
        };
        config.key_bindings.rebind(GameAction::HardDrop, KeyCode::Enter);

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "frame_ms = \"fast\"").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }

    #[test]
    fn test_high_score_override() {
        let config = Config {
            high_score_path: Some(PathBuf::from("/tmp/hs.json")),
            ..Config::default()
        };
        assert_eq!(config.high_score_path(), Some(PathBuf::from("/tmp/hs.json")));
    }
}
