use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: Vec<Cell>,
    /// Direction used by the most recent tick
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting cell and direction
    pub fn new(head: Cell, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length.max(1) {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// Build a snake from explicit segments, head first.
    ///
    /// Returns `None` unless the body is non-empty, every segment is distinct
    /// and each segment touches the next one along an axis.
    pub fn from_body(body: Vec<Cell>, direction: Direction) -> Option<Self> {
        if body.is_empty() {
            return None;
        }

        let connected = body
            .windows(2)
            .all(|pair| (pair[0].x - pair[1].x).abs() + (pair[0].y - pair[1].y).abs() == 1);
        let distinct = body
            .iter()
            .enumerate()
            .all(|(i, cell)| !body[i + 1..].contains(cell));
        if !connected || !distinct {
            return None;
        }

        Some(Self { body, direction })
    }

    /// Get the head cell
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// All segments, head first
    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    /// Check if a cell is covered by any segment, tail included
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Put a new head in front of the body
    pub(crate) fn push_head(&mut self, head: Cell) {
        self.body.insert(0, head);
    }

    /// Drop the last segment, never shrinking below one cell
    pub(crate) fn pop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false: a snake has at least one segment
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}
