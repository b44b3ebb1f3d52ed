//! Turns a session snapshot into an ordered list of draw commands.
//!
//! Everything here is a pure function of the snapshot and the elapsed wall
//! clock time. The time only sets the phase of the animated effects; it never
//! feeds back into the simulation.

use crate::game::{Cell, ParticleColor, Snapshot};

/// Radius in pixels of the circle the background glow travels along
const BACKGROUND_ORBIT: f32 = 50.0;

/// A single drawing instruction in board pixel space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Radial gradient filling the board, brightest at `center`
    Background { center: (f32, f32), radius: f32 },
    /// `count + 1` evenly spaced lines along each axis
    GridLines { spacing: f32, count: i32, alpha: f32 },
    SnakeSegment {
        cell: Cell,
        index: usize,
        head: bool,
        intensity: f32,
    },
    Food { cell: Cell, pulse: f32 },
    Particle {
        x: f32,
        y: f32,
        size: f32,
        color: ParticleColor,
        alpha: f32,
    },
}

/// Build the draw list for one frame, back to front
pub fn build_frame(snapshot: &Snapshot<'_>, elapsed_secs: f32) -> Vec<DrawCommand> {
    let config = snapshot.config;
    let board = config.board_size();
    let t = elapsed_secs;

    let mut commands = Vec::with_capacity(2 + snapshot.snake.len() + 1 + snapshot.particles.len());

    commands.push(DrawCommand::Background {
        center: (
            board / 2.0 + t.sin() * BACKGROUND_ORBIT,
            board / 2.0 + t.cos() * BACKGROUND_ORBIT,
        ),
        radius: board / 2.0,
    });

    commands.push(DrawCommand::GridLines {
        spacing: config.tile_size,
        count: config.tile_count,
        alpha: grid_alpha(t),
    });

    commands.extend(
        snapshot
            .snake
            .body()
            .iter()
            .enumerate()
            .map(|(index, &cell)| DrawCommand::SnakeSegment {
                cell,
                index,
                head: index == 0,
                intensity: segment_intensity(index),
            }),
    );

    if let Some(cell) = snapshot.food {
        commands.push(DrawCommand::Food {
            cell,
            pulse: food_pulse(t),
        });
    }

    commands.extend(snapshot.particles.iter().map(|p| DrawCommand::Particle {
        x: p.x,
        y: p.y,
        size: p.size,
        color: p.color,
        alpha: p.alpha,
    }));

    commands
}

/// Brightness of a snake segment; the head is 1.0 and the body fades to 0.4
pub fn segment_intensity(index: usize) -> f32 {
    if index == 0 {
        return 1.0;
    }
    (1.0 - index as f32 * 0.08).max(0.4)
}

/// Food brightness, oscillating in [0.4, 1.0]
pub fn food_pulse(t: f32) -> f32 {
    (t * 8.0).sin() * 0.3 + 0.7
}

pub fn grid_alpha(t: f32) -> f32 {
    0.1 + (t * 2.0).sin() * 0.05
}
