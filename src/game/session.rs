//! Game lifecycle: menu, playing, paused and game over.
//!
//! `GameSession` owns everything a single run needs and is the only entry
//! point for commands, ticks and frames. It decides which commands apply in
//! which phase; everything else is dropped silently.

use std::time::Duration;

use tracing::{info, trace};

use super::{
    action::Command,
    config::GameConfig,
    food::FoodSpawner,
    particles::{Particle, ParticleSystem},
    simulation::{SnakeSimulation, TickOutcome},
    state::{Cell, Snake},
};

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Read-only view of a session between two ticks
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub snake: &'a Snake,
    pub food: Option<Cell>,
    pub particles: &'a [Particle],
    pub score: u32,
    pub tick_interval: Duration,
    /// How the latest tick of this run went; tells the game over screen why
    pub outcome: Option<TickOutcome>,
    pub config: &'a GameConfig,
}

#[derive(Clone)]
pub struct GameSession {
    phase: GamePhase,
    simulation: SnakeSimulation,
    particles: ParticleSystem,
    last_outcome: Option<TickOutcome>,
}

impl GameSession {
    /// Create a session in the menu phase
    pub fn new(config: GameConfig) -> Self {
        let spawner = FoodSpawner::new(config.tile_count, config.max_spawn_attempts);
        let particles = ParticleSystem::new(&config);
        Self::from_parts(config, spawner, particles)
    }

    /// Create a session whose food and particles follow a fixed seed
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        let spawner = FoodSpawner::seeded(config.tile_count, config.max_spawn_attempts, seed);
        let particles = ParticleSystem::seeded(&config, seed.wrapping_add(1));
        Self::from_parts(config, spawner, particles)
    }

    fn from_parts(config: GameConfig, spawner: FoodSpawner, particles: ParticleSystem) -> Self {
        Self {
            phase: GamePhase::Menu,
            simulation: SnakeSimulation::new(config, spawner),
            particles,
            last_outcome: None,
        }
    }

    /// Apply a command if it is valid for the current phase.
    ///
    /// Returns whether the command changed anything.
    pub fn handle(&mut self, command: Command) -> bool {
        let applied = match (self.phase, command) {
            (GamePhase::Playing, Command::ChangeDirection(direction)) => {
                self.simulation.steer(direction)
            }
            (GamePhase::Menu, Command::Start) | (GamePhase::GameOver, Command::Restart) => {
                self.begin_run();
                true
            }
            (GamePhase::Playing, Command::TogglePause) => {
                self.transition(GamePhase::Paused);
                true
            }
            (GamePhase::Paused, Command::TogglePause) => {
                self.transition(GamePhase::Playing);
                true
            }
            (GamePhase::Paused | GamePhase::GameOver, Command::ReturnToMenu) => {
                self.reset_run();
                self.transition(GamePhase::Menu);
                true
            }
            _ => false,
        };

        if !applied {
            trace!(phase = ?self.phase, ?command, "command ignored");
        }
        applied
    }

    /// Run one simulation tick.
    ///
    /// Does nothing and returns `None` unless the session is playing. A
    /// terminal outcome moves the session to game over.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if self.phase != GamePhase::Playing {
            return None;
        }

        let outcome = self.simulation.tick(&mut self.particles);
        self.last_outcome = Some(outcome);

        if outcome.is_terminal() {
            info!(
                score = self.simulation.score(),
                length = self.simulation.snake().len(),
                ?outcome,
                "run ended"
            );
            self.transition(GamePhase::GameOver);
        }

        Some(outcome)
    }

    /// Per-frame update; particles decay in every phase
    pub fn advance_frame(&mut self) {
        self.particles.advance();
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            snake: self.simulation.snake(),
            food: self.simulation.food(),
            particles: self.particles.particles(),
            score: self.simulation.score(),
            tick_interval: self.simulation.tick_interval(),
            outcome: self.last_outcome,
            config: self.simulation.config(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.simulation.score()
    }

    pub fn tick_interval(&self) -> Duration {
        self.simulation.tick_interval()
    }

    fn begin_run(&mut self) {
        self.reset_run();
        self.transition(GamePhase::Playing);
    }

    fn reset_run(&mut self) {
        self.simulation.reset();
        self.particles.clear();
        self.last_outcome = None;
    }

    fn transition(&mut self, next: GamePhase) {
        info!(from = ?self.phase, to = ?next, "phase change");
        self.phase = next;
    }

    #[cfg(test)]
    pub(crate) fn simulation_mut(&mut self) -> &mut SnakeSimulation {
        &mut self.simulation
    }
}
