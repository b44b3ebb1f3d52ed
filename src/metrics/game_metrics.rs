use anyhow::Result;
use std::time::{Duration, Instant};

use crate::storage::HighScoreStore;

/// Score bookkeeping that lives outside the simulation: run clock, high
/// score and number of runs finished.
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    running: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self::with_high_score(0)
    }

    /// Start from a previously persisted high score
    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score,
            games_played: 0,
            running: false,
        }
    }

    /// Refresh the run clock; it stands still while no run is in progress
    pub fn update(&mut self) {
        if self.running {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.running = true;
    }

    /// Stop the clock while paused
    pub fn on_pause(&mut self) {
        self.update();
        self.running = false;
    }

    /// Restart the clock after a pause without losing the time already played
    pub fn on_resume(&mut self) {
        self.start_time = Instant::now() - self.elapsed_time;
        self.running = true;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.running = false;
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    /// Compare the live score against the high score and persist it when
    /// beaten. Returns whether the high score changed.
    pub fn observe_score(&mut self, score: u32, store: &mut dyn HighScoreStore) -> Result<bool> {
        if score <= self.high_score {
            return Ok(false);
        }
        self.high_score = score;
        store.save(score)?;
        Ok(true)
    }

    /// Whether the game over screen celebrates a record.
    ///
    /// Scores within one food of the high score count as well.
    pub fn is_new_record(&self, score: u32) -> bool {
        score.saturating_add(10) > self.high_score
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
