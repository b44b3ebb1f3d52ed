//! High score persistence
//!
//! The game only ever stores one number. `HighScoreStore` is the seam the
//! game loop talks to; `JsonFileStore` keeps the value in a small JSON object
//! on disk and `MemoryStore` keeps it in process.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::warn;

/// Key the high score is stored under
pub const HIGH_SCORE_KEY: &str = "neonSnakeHighScore";

/// Durable storage for the best score ever reached
pub trait HighScoreStore {
    /// Read the stored high score; an empty store reads as 0
    fn load(&self) -> Result<u32>;

    /// Overwrite the stored high score
    fn save(&mut self, score: u32) -> Result<()>;
}

/// Stores the high score in a JSON object file
///
/// The file looks like `{"neonSnakeHighScore": 120}`. Any other keys present
/// in the file are kept when the score is written. A file that cannot be read
/// as a JSON object is replaced.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_object(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read high score from {:?}", self.path))?;
        if json.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&json).context("Failed to deserialize high score file")? {
            Value::Object(map) => Ok(map),
            _ => anyhow::bail!("High score file {:?} is not a JSON object", self.path),
        }
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<u32> {
        let map = self.read_object()?;
        let score = map
            .get(HIGH_SCORE_KEY)
            .and_then(Value::as_u64)
            .map(|score| score.min(u32::MAX as u64) as u32)
            .unwrap_or(0);
        Ok(score)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let mut map = match self.read_object() {
            Ok(map) => map,
            Err(err) => {
                warn!(error = %err, path = ?self.path, "replacing unreadable high score file");
                Map::new()
            }
        };
        map.insert(HIGH_SCORE_KEY.to_string(), Value::from(score));

        let json = serde_json::to_string_pretty(&Value::Object(map))
            .context("Failed to serialize high score")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write high score to {:?}", self.path))?;

        Ok(())
    }
}

/// Keeps the high score in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    score: u32,
}

impl MemoryStore {
    pub fn new(score: u32) -> Self {
        Self { score }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32> {
        Ok(self.score)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.score = score;
        Ok(())
    }
}
