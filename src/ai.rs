//! Per-tick steering for the computer-controlled snake.

use tracing::{debug, warn};

use crate::pathfinder::{PathError, Pathfinder};
use crate::snake::{Direction, Snake};
use crate::surface::Surface;
use crate::Coords;

/// Picks the heading that moves `head` onto the first cell of `path`.
///
/// Only the immediate step is looked at. A missing or empty path yields no
/// command, leaving the snake on its current heading. Coordinates are compared
/// as they are, so a step that crosses an edge reads as a move the long way
/// round (column 0 onto the last column is "right").
pub fn decide(path: Option<&[Coords]>, head: Coords) -> Option<Direction> {
    let next = *path?.first()?;

    if next.0 > head.0 {
        Some(Direction::Right)
    } else if next.0 < head.0 {
        Some(Direction::Left)
    } else if next.1 > head.1 {
        Some(Direction::Down)
    } else if next.1 < head.1 {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Drives a snake toward the food by replanning from scratch every tick.
///
/// The only obstacles considered are the snake's own segments; the other
/// snake on the board is ignored.
#[derive(Debug, Clone, Copy)]
pub struct AiPilot {
    pathfinder: Pathfinder,
}

impl AiPilot {
    pub fn new(surface: Surface) -> Self {
        AiPilot { pathfinder: Pathfinder::new(surface) }
    }

    /// Computes this tick's command and hands it to the snake.
    ///
    /// Returns the command issued, if any. The snake may still refuse it
    /// under its anti-reversal rule.
    pub fn steer(&self, snake: &mut Snake, food: Coords) -> Option<Direction> {
        let head = snake.head();
        let obstacles: Vec<Coords> = snake.body().iter().copied().collect();

        let path = match self.pathfinder.find_path(head, food, &obstacles) {
            Ok(path) => Some(path),
            Err(PathError::NoPath) => {
                debug!(?head, ?food, "ai has no route to food");
                None
            }
            Err(err @ PathError::OutOfBounds { .. }) => {
                warn!(%err, ?head, ?food, "ai search rejected");
                None
            }
        };

        let command = decide(path.as_deref(), head)?;
        let accepted = snake.set_direction(command);
        debug!(?command, accepted, steps = path.map_or(0, |p| p.len()), "ai steering");
        Some(command)
    }
}
