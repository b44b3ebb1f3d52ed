use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::state::{Cell, Snake};

/// Places food on cells the snake does not cover
#[derive(Clone)]
pub struct FoodSpawner {
    tile_count: i32,
    max_attempts: usize,
    rng: StdRng,
}

impl FoodSpawner {
    pub fn new(tile_count: i32, max_attempts: usize) -> Self {
        Self::with_rng(tile_count, max_attempts, StdRng::from_entropy())
    }

    /// Create a spawner with a fixed seed, for reproducible runs
    pub fn seeded(tile_count: i32, max_attempts: usize, seed: u64) -> Self {
        Self::with_rng(tile_count, max_attempts, StdRng::seed_from_u64(seed))
    }

    fn with_rng(tile_count: i32, max_attempts: usize, rng: StdRng) -> Self {
        Self {
            tile_count,
            max_attempts,
            rng,
        }
    }

    /// Pick a uniformly random free cell.
    ///
    /// Draws random cells until one is free. After `max_attempts` misses the
    /// free cells are enumerated and one is chosen directly, so a crowded
    /// board never stalls the tick. Returns `None` only when the snake covers
    /// every cell.
    pub fn spawn(&mut self, snake: &Snake) -> Option<Cell> {
        for _ in 0..self.max_attempts {
            let cell = Cell::new(
                self.rng.gen_range(0..self.tile_count),
                self.rng.gen_range(0..self.tile_count),
            );

            if !snake.occupies(cell) {
                return Some(cell);
            }
        }

        let free: Vec<Cell> = (0..self.tile_count)
            .flat_map(|y| (0..self.tile_count).map(move |x| Cell::new(x, y)))
            .filter(|cell| !snake.occupies(*cell))
            .collect();

        free.choose(&mut self.rng).copied()
    }
}
