//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Time is driven from outside: the caller decides when a tick or a frame happens.

pub mod action;
pub mod config;
pub mod food;
pub mod particles;
pub mod session;
pub mod simulation;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::{GameConfig, MAX_BURST_SIZE, MAX_TILE_COUNT};
pub use food::FoodSpawner;
pub use particles::{Particle, ParticleColor, ParticleSystem};
pub use session::{GamePhase, GameSession, Snapshot};
pub use simulation::{SnakeSimulation, TickOutcome};
pub use state::{Cell, CollisionType, Snake};
