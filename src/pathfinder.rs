//! A* over the wrap-around lattice.

use thiserror::Error;
use tracing::trace;

use crate::grid::{CellId, Grid};
use crate::surface::Surface;
use crate::{Coords, PixelInt};

/// Cells to walk, excluding the start and including the goal.
pub type Path = Vec<Coords>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Every reachable cell was closed without touching the goal.
    #[error("goal is unreachable")]
    NoPath,
    #[error("position ({x}, {y}) lies outside the board")]
    OutOfBounds { x: PixelInt, y: PixelInt },
}

/// Manhattan distance in pixels. Ignores wrap-around.
pub fn heuristic(a: Coords, b: Coords) -> PixelInt {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

/// Cells discovered but not yet closed, kept in insertion order.
///
/// Selection is a linear scan where the first minimum wins. A binary heap
/// would be faster on big boards but resolves ties differently.
#[derive(Debug)]
struct OpenSet {
    cells: Vec<CellId>,
}

impl OpenSet {
    fn with_start(start: CellId) -> Self {
        OpenSet { cells: vec![start] }
    }

    fn contains(&self, id: CellId) -> bool {
        self.cells.contains(&id)
    }

    fn push(&mut self, id: CellId) {
        self.cells.push(id);
    }

    /// Index of the first cell holding the lowest total estimate.
    fn best(&self, grid: &Grid) -> Option<usize> {
        let mut best: Option<(usize, PixelInt)> = None;

        for (index, &id) in self.cells.iter().enumerate() {
            let total = grid.cell(id).total_estimate;
            match best {
                Some((_, lowest)) if total >= lowest => {}
                _ => best = Some((index, total)),
            }
        }

        best.map(|(index, _)| index)
    }

    fn take(&mut self, index: usize) -> CellId {
        self.cells.remove(index)
    }
}

/// Shortest-route search over a board of fixed size.
///
/// Holds no search state of its own: every [`Pathfinder::find_path`] call
/// builds a fresh [`Grid`] and drops it on return.
#[derive(Debug, Clone, Copy)]
pub struct Pathfinder {
    surface: Surface,
}

impl Pathfinder {
    pub fn new(surface: Surface) -> Self {
        Pathfinder { surface }
    }

    #[cfg(test)]
    pub(crate) fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Finds a route from `start` to `goal` that never enters `obstacles`.
    ///
    /// Returns an empty path when `start` and `goal` share a cell, and
    /// [`PathError::NoPath`] when the goal cannot be reached at all.
    pub fn find_path(&self, start: Coords, goal: Coords, obstacles: &[Coords]) -> Result<Path, PathError> {
        let mut grid = Grid::build(&self.surface);
        let start_id = locate(&grid, start)?;
        let goal_id = locate(&grid, goal)?;
        let goal_position = grid.cell(goal_id).position();
        let unit = self.surface.unit();

        {
            let cell = grid.cell_mut(start_id);
            cell.cost_so_far = 0;
            cell.heuristic_estimate = heuristic(cell.position(), goal_position);
            cell.total_estimate = cell.heuristic_estimate;
        }

        let mut open = OpenSet::with_start(start_id);
        let mut expanded = 0usize;

        while let Some(index) = open.best(&grid) {
            let current = open.cells[index];

            if current == goal_id {
                trace!(expanded, "search reached goal");
                return Ok(trace_back(&grid, current));
            }

            open.take(index);
            grid.cell_mut(current).visited = true;
            expanded += 1;

            let tentative = grid.cell(current).cost_so_far + unit;
            let neighbors: Vec<CellId> = grid.neighbors(current, obstacles).collect();

            for neighbor in neighbors {
                if grid.cell(neighbor).visited {
                    continue;
                }

                if !open.contains(neighbor) {
                    open.push(neighbor);
                } else if tentative >= grid.cell(neighbor).cost_so_far {
                    continue;
                }

                let cell = grid.cell_mut(neighbor);
                cell.predecessor = Some(current);
                cell.cost_so_far = tentative;
                cell.heuristic_estimate = heuristic(cell.position(), goal_position);
                cell.total_estimate = cell.cost_so_far + cell.heuristic_estimate;
            }
        }

        trace!(expanded, "search exhausted open set");
        Err(PathError::NoPath)
    }
}

fn locate(grid: &Grid, (x, y): Coords) -> Result<CellId, PathError> {
    grid.cell_at((x, y)).ok_or(PathError::OutOfBounds { x, y })
}

/// Walks predecessor links back to the start, which is left out.
fn trace_back(grid: &Grid, goal: CellId) -> Path {
    let mut path = Vec::new();
    let mut cursor = goal;

    while let Some(previous) = grid.cell(cursor).predecessor() {
        path.push(grid.cell(cursor).position());
        cursor = previous;
    }

    path.reverse();
    path
}
