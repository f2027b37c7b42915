use std::collections::VecDeque;

use crate::surface::Surface;
use crate::{Coords, PixelInt};
use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Pixel velocity for one step of `unit` pixels.
    pub fn delta(self, unit: PixelInt) -> Coords {
        match self {
            Up => (0, -unit),
            Right => (unit, 0),
            Down => (0, unit),
            Left => (-unit, 0),
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }
}

/// What changed on the board after one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub new_head: Coords,
    /// `None` when the snake ate and kept its tail.
    pub old_tail: Option<Coords>,
    pub ate: bool,
}

/// Shared body and movement rules for both the player and the AI.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
    unit: PixelInt,
    score: u32,
}

impl Snake {
    /// Lays out `length` segments trailing away from `direction`, head first.
    ///
    /// Segments that would fall off the board are wrapped by `surface`.
    pub fn new(head: Coords, length: usize, direction: Direction, surface: &Surface) -> Self {
        let unit = surface.unit();
        let (dx, dy) = direction.delta(unit);

        let body = (0..length.max(1) as PixelInt)
            .map(|i| surface.wrap((head.0 - dx * i, head.1 - dy * i)))
            .collect();
        Snake { body, direction, unit, score: 0 }
    }

    /// Rebuilds a snake from explicit segments, head first.
    ///
    /// Returns `None` for an empty body.
    pub fn from_segments<I>(segments: I, direction: Direction, surface: &Surface) -> Option<Self>
    where
        I: IntoIterator<Item = Coords>,
    {
        let body: VecDeque<Coords> = segments.into_iter().map(|pos| surface.wrap(pos)).collect();
        if body.is_empty() {
            return None;
        }

        Some(Snake { body, direction, unit: surface.unit(), score: 0 })
    }

    /// Occupied positions, head first.
    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Advances one unit with wrap-around, growing if the new head lands on `food`.
    pub fn move_step(&mut self, surface: &Surface, food: Coords) -> MoveResult {
        let (dx, dy) = self.direction.delta(self.unit);
        let head = self.head();
        let new_head = surface.wrap((head.0 + dx, head.1 + dy));

        self.body.push_front(new_head);

        if new_head == food {
            self.score += 1;
            MoveResult { new_head, old_tail: None, ate: true }
        } else {
            let old_tail = self.body.pop_back();
            MoveResult { new_head, old_tail, ate: false }
        }
    }

    /// Turns the snake unless the turn would exactly reverse it.
    ///
    /// Returns whether the heading was accepted.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction.is_opposite(self.direction) {
            return false;
        }

        self.direction = new_direction;
        true
    }

    pub fn hits_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    pub fn hits(&self, other: &Snake) -> bool {
        other.body.contains(&self.head())
    }

    pub fn occupies(&self, position: Coords) -> bool {
        self.body.contains(&position)
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}
