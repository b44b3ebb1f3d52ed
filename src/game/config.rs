use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::action::Direction;
use super::state::Cell;

/// Largest board edge the terminal renderer can lay out
pub const MAX_TILE_COUNT: i32 = 255;

/// Largest particle burst a single food may spawn
pub const MAX_BURST_SIZE: usize = 1024;

/// Configuration for the game
///
/// Every tuning constant of the simulation lives here so that a JSON file can
/// override any of them. Missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of tiles along each side of the square board
    pub tile_count: i32,
    /// Edge length of one tile in pixels
    pub tile_size: f32,
    /// Cell occupied by the one-segment snake at the start of a run
    pub start_cell: Cell,
    /// Heading at the start of a run
    pub initial_direction: Direction,

    /// Points awarded per food eaten
    pub food_reward: u32,
    /// Tick interval at the start of a run, in milliseconds
    pub base_tick_ms: u64,
    /// Amount the tick interval shrinks per food eaten, in milliseconds
    pub tick_decrement_ms: u64,
    /// Fastest allowed tick interval, in milliseconds
    pub min_tick_ms: u64,

    // Particle effects
    /// Particles spawned per food eaten
    pub burst_size: usize,
    /// Frames a particle lives for
    pub particle_life: u32,
    /// Largest absolute velocity component, in pixels per frame
    pub particle_max_speed: f32,
    /// Particle edge length range `[min, max)` in pixels
    pub particle_size_range: (f32, f32),

    /// Random draws the food spawner makes before enumerating free cells
    pub max_spawn_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_count: 20,
            tile_size: 20.0,
            start_cell: Cell::new(10, 10),
            initial_direction: Direction::Right,
            food_reward: 10,
            base_tick_ms: 150,
            tick_decrement_ms: 3,
            min_tick_ms: 80,
            burst_size: 12,
            particle_life: 40,
            particle_max_speed: 5.0,
            particle_size_range: (3.0, 9.0),
            max_spawn_attempts: 1000,
        }
    }
}

impl GameConfig {
    /// Create a configuration for a board with the given number of tiles per side
    pub fn new(tile_count: i32) -> Self {
        Self {
            tile_count,
            start_cell: Cell::new(tile_count / 2, tile_count / 2),
            ..Default::default()
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Load a configuration from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to deserialize config")?;
        config
            .validate()
            .map_err(|msg| anyhow!(msg))
            .with_context(|| format!("Invalid config in {:?}", path))?;
        Ok(config)
    }

    /// Validate configuration parameters
    ///
    /// Returns `Err(String)` describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if !(2..=MAX_TILE_COUNT).contains(&self.tile_count) {
            return Err(format!(
                "tile_count must be between 2 and {}, got {}",
                MAX_TILE_COUNT, self.tile_count
            ));
        }

        if self.tile_size <= 0.0 {
            return Err(format!(
                "tile_size must be positive, got {}",
                self.tile_size
            ));
        }

        if !self.contains(self.start_cell) {
            return Err(format!(
                "start_cell ({}, {}) lies outside a {}x{} board",
                self.start_cell.x, self.start_cell.y, self.tile_count, self.tile_count
            ));
        }

        if self.min_tick_ms == 0 {
            return Err("min_tick_ms must be at least 1".to_string());
        }

        if self.min_tick_ms > self.base_tick_ms {
            return Err(format!(
                "min_tick_ms ({}) cannot exceed base_tick_ms ({})",
                self.min_tick_ms, self.base_tick_ms
            ));
        }

        if self.particle_life == 0 {
            return Err("particle_life must be at least 1".to_string());
        }

        let (min_size, max_size) = self.particle_size_range;
        if min_size <= 0.0 || min_size >= max_size {
            return Err(format!(
                "particle_size_range must satisfy 0 < min < max, got ({}, {})",
                min_size, max_size
            ));
        }

        if self.burst_size > MAX_BURST_SIZE {
            return Err(format!(
                "burst_size must be at most {}, got {}",
                MAX_BURST_SIZE, self.burst_size
            ));
        }

        if self.particle_max_speed < 0.0 {
            return Err(format!(
                "particle_max_speed must be non-negative, got {}",
                self.particle_max_speed
            ));
        }

        Ok(())
    }

    /// Check if a cell lies on the board
    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.tile_count).contains(&cell.x) && (0..self.tile_count).contains(&cell.y)
    }

    /// Board edge length in pixels
    pub fn board_size(&self) -> f32 {
        self.tile_count as f32 * self.tile_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.tile_count, 20);
        assert_eq!(config.start_cell, Cell::new(10, 10));
        assert_eq!(config.initial_direction, Direction::Right);
        assert_eq!(config.base_tick_ms, 150);
        assert_eq!(config.min_tick_ms, 80);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15);
        assert_eq!(config.tile_count, 15);
        assert_eq!(config.start_cell, Cell::new(7, 7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = GameConfig::default();
        config.min_tick_ms = 200;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.start_cell = Cell::new(20, 0);
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.particle_life = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.particle_size_range = (5.0, 5.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bounds_board_and_burst() {
        let mut config = GameConfig::new(MAX_TILE_COUNT);
        assert!(config.validate().is_ok());

        config.tile_count = 33_000;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.burst_size = MAX_BURST_SIZE;
        assert!(config.validate().is_ok());
        config.burst_size = usize::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_rejects_oversized_board() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "tile_count": 33000 }"#).unwrap();

        assert!(GameConfig::load(&path).is_err());
    }

    #[test]
    fn test_board_geometry() {
        let config = GameConfig::default();
        assert_eq!(config.board_size(), 400.0);
        assert!(config.contains(Cell::new(0, 19)));
        assert!(!config.contains(Cell::new(-1, 3)));
        assert!(!config.contains(Cell::new(3, 20)));
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "base_tick_ms": 120, "burst_size": 4 }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.base_tick_ms, 120);
        assert_eq!(config.burst_size, 4);
        assert_eq!(config.tile_count, 20);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "tile_count": 0 }"#).unwrap();

        assert!(GameConfig::load(&path).is_err());
        assert!(GameConfig::load(&temp_dir.path().join("missing.json")).is_err());
    }
}
