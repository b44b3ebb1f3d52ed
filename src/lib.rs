//! Neon Snake - a terminal Snake game with particle effects
//!
//! This library provides:
//! - Core game logic and the session lifecycle (game module)
//! - High score persistence (storage module)
//! - Draw-list construction and TUI rendering (render module)
//! - Keyboard mapping (input module)
//! - Run clock and high score bookkeeping (metrics module)
//! - The interactive terminal game loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod storage;
