//! High-score persistence.
//!
//! The engine only knows the number; where it lives is up to a [`HighScoreStore`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub trait HighScoreStore {
    /// Stored high score, 0 when nothing has been saved yet
    fn load(&self) -> Result<u32>;
    fn save(&mut self, high_score: u32) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u32,
}

/// `{"high_score": N}` in a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<u32> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read {}", self.path.display()))
            }
        };
        let file: HighScoreFile = serde_json::from_str(&text)
            .with_context(|| format!("invalid high score file {}", self.path.display()))?;
        Ok(file.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text = serde_json::to_string(&HighScoreFile { high_score })?;
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

/// In-memory store for tests and runs without a data directory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    high_score: u32,
    saves: usize,
}

impl MemoryStore {
    pub fn new(high_score: u32) -> Self {
        Self {
            high_score,
            saves: 0,
        }
    }

    /// Number of `save` calls so far
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32> {
        Ok(self.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        self.high_score = high_score;
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("high_score.json"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("high_score.json");
        let mut store = JsonFileStore::new(&path);

        store.save(1234).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"high_score":1234}"#);
        assert_eq!(JsonFileStore::new(&path).load().unwrap(), 1234);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("high_score.json");
        fs::write(&path, "not json").unwrap();
        assert!(JsonFileStore::new(&path).load().is_err());
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let mut store = MemoryStore::new(10);
        assert_eq!(store.load().unwrap(), 10);
        store.save(20).unwrap();
        assert_eq!(store.load().unwrap(), 20);
        assert_eq!(store.saves(), 1);
    }
}
