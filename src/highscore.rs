#[cfg(test)]
use std::cell::Cell as StdCell;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};

/// Persists the best score across runs.
pub trait HighScoreStore {
    /// 0 when nothing was stored yet.
    fn load(&self) -> Result<u32, String>;
    fn save(&self, score: u32) -> Result<(), String>;
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

impl Validate for HighScoreRecord {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Keeps the high score in a small YAML file.
pub struct FileHighScoreStore {
    manager: ConfigManager<FileContentConfigProvider, HighScoreRecord, YamlConfigSerializer>,
}

impl FileHighScoreStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self { manager: ConfigManager::from_yaml_file(file_path) }
    }

    pub fn file_path(&self) -> &PathBuf {
        self.manager.content_provider().file_path()
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> Result<u32, String> {
        self.manager.get_config().map(|record| record.high_score)
    }

    fn save(&self, score: u32) -> Result<(), String> {
        self.manager.set_config(&HighScoreRecord { high_score: score })
    }
}

/// In-memory store that also counts saves.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryHighScoreStore {
    high_score: StdCell<u32>,
    saves: StdCell<u32>,
}

#[cfg(test)]
impl MemoryHighScoreStore {
    pub fn with_score(score: u32) -> Self {
        Self { high_score: StdCell::new(score), saves: StdCell::new(0) }
    }

    pub fn save_count(&self) -> u32 {
        self.saves.get()
    }
}

#[cfg(test)]
impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> Result<u32, String> {
        Ok(self.high_score.get())
    }

    fn save(&self, score: u32) -> Result<(), String> {
        self.high_score.set(score);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
