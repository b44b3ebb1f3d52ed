//! Terminal presentation: draw-list construction and its ratatui rendering.

pub mod frame;
pub mod renderer;

pub use frame::{DrawCommand, build_frame};
pub use renderer::Renderer;
