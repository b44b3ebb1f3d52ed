//! Short-lived visual particles thrown off when the snake eats.
//!
//! Particles live in pixel space, not on the grid, and decay once per rendered
//! frame rather than once per simulation tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::GameConfig;
use super::state::Cell;

/// One of the two particle colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleColor {
    Pink,
    Yellow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub color: ParticleColor,
    /// Frames left before removal
    pub life: u32,
    /// Remaining life as a fraction of the initial life
    pub alpha: f32,
}

#[derive(Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    tile_size: f32,
    initial_life: u32,
    max_speed: f32,
    size_range: (f32, f32),
    rng: StdRng,
}

impl ParticleSystem {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn seeded(config: &GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Self {
        Self {
            particles: Vec::new(),
            tile_size: config.tile_size,
            initial_life: config.particle_life.max(1),
            max_speed: config.particle_max_speed,
            size_range: config.particle_size_range,
            rng,
        }
    }

    /// Spawn `count` particles at the pixel centre of `origin`
    pub fn burst(&mut self, origin: Cell, count: usize) {
        let half = self.tile_size / 2.0;
        let cx = origin.x as f32 * self.tile_size + half;
        let cy = origin.y as f32 * self.tile_size + half;

        self.particles.reserve(count);
        for _ in 0..count {
            let (vx, vy) = if self.max_speed > 0.0 {
                (
                    self.rng.gen_range(-self.max_speed..self.max_speed),
                    self.rng.gen_range(-self.max_speed..self.max_speed),
                )
            } else {
                (0.0, 0.0)
            };
            let (min_size, max_size) = self.size_range;
            let size = if max_size > min_size {
                self.rng.gen_range(min_size..max_size)
            } else {
                min_size
            };
            let color = if self.rng.gen_bool(0.5) {
                ParticleColor::Pink
            } else {
                ParticleColor::Yellow
            };

            self.particles.push(Particle {
                x: cx,
                y: cy,
                vx,
                vy,
                size,
                color,
                life: self.initial_life,
                alpha: 1.0,
            });
        }
    }

    /// Move every particle one frame forward and drop the expired ones
    pub fn advance(&mut self) {
        let initial_life = self.initial_life as f32;
        for particle in &mut self.particles {
            particle.x += particle.vx;
            particle.y += particle.vy;
            particle.life = particle.life.saturating_sub(1);
            particle.alpha = particle.life as f32 / initial_life;
        }
        self.particles.retain(|particle| particle.life > 0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
