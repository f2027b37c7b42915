//! Search lattice rebuilt for every pathfinding request.

use crate::surface::Surface;
use crate::{Coords, PixelInt};

/// Index of a cell inside the [`Grid`] arena.
pub type CellId = usize;

/// Lattice offsets in the fixed neighbour order: up, right, down, left.
///
/// The search breaks ties by discovery order, so this order decides which of
/// several equally short routes the AI takes.
const NEIGHBOUR_ORDER: [(PixelInt, PixelInt); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// One lattice cell plus the bookkeeping an A* search attaches to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    position: Coords,
    pub(crate) cost_so_far: PixelInt,
    pub(crate) heuristic_estimate: PixelInt,
    pub(crate) total_estimate: PixelInt,
    pub(crate) predecessor: Option<CellId>,
    pub(crate) visited: bool,
}

impl Cell {
    fn fresh(position: Coords) -> Self {
        Cell {
            position,
            cost_so_far: 0,
            heuristic_estimate: 0,
            total_estimate: 0,
            predecessor: None,
            visited: false,
        }
    }

    /// Pixel position of the cell's top-left corner.
    pub fn position(&self) -> Coords {
        self.position
    }

    pub fn cost_so_far(&self) -> PixelInt {
        self.cost_so_far
    }

    #[cfg(test)]
    pub(crate) fn heuristic_estimate(&self) -> PixelInt {
        self.heuristic_estimate
    }

    pub fn total_estimate(&self) -> PixelInt {
        self.total_estimate
    }

    pub fn predecessor(&self) -> Option<CellId> {
        self.predecessor
    }

    pub fn visited(&self) -> bool {
        self.visited
    }
}

/// Dense row-major lattice covering the whole surface.
///
/// A grid is an arena owned by a single search: predecessors are indices into
/// it and die with it, so nothing from one tick can leak into the next.
#[derive(Debug, Clone)]
pub struct Grid {
    surface: Surface,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a lattice of fresh cells tiling `surface`.
    pub fn build(surface: &Surface) -> Self {
        let cells = surface.positions().map(Cell::fresh).collect();
        Grid { surface: *surface, cells }
    }

    #[cfg(test)]
    pub(crate) fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell containing the pixel, or `None` when it lies off the board.
    pub fn cell_at(&self, position: Coords) -> Option<CellId> {
        let (column, row) = self.surface.to_lattice(position);

        if !(0..self.surface.columns()).contains(&column) || !(0..self.surface.rows()).contains(&row) {
            return None;
        }

        let columns = usize::try_from(self.surface.columns()).ok()?;
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        row.checked_mul(columns)?.checked_add(column)
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id]
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id]
    }

    /// The four wrapped positions one step away from `id`, before any filtering.
    pub fn candidates(&self, id: CellId) -> [Coords; 4] {
        let (x, y) = self.cells[id].position;
        let unit = self.surface.unit();

        NEIGHBOUR_ORDER.map(|(dx, dy)| self.surface.wrap((x + dx * unit, y + dy * unit)))
    }

    /// Passable neighbours of `id` in up, right, down, left order.
    ///
    /// A candidate is dropped when it coincides with any obstacle position.
    pub fn neighbors<'a>(
        &'a self,
        id: CellId,
        obstacles: &'a [Coords],
    ) -> impl Iterator<Item = CellId> + 'a {
        self.candidates(id)
            .into_iter()
            .filter(move |candidate| !obstacles.contains(candidate))
            .filter_map(move |candidate| self.cell_at(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(columns: PixelInt, rows: PixelInt, unit: PixelInt) -> Grid {
        Grid::build(&Surface::from_cells(columns, rows, unit).unwrap())
    }

    #[test]
    fn build_tiles_surface_with_fresh_cells() {
        let grid = grid(40, 30, 20);

        assert_eq!(grid.len(), 1200);
        for id in 0..grid.len() {
            let cell = grid.cell(id);
            assert_eq!(cell.cost_so_far(), 0);
            assert_eq!(cell.heuristic_estimate(), 0);
            assert_eq!(cell.total_estimate(), 0);
            assert_eq!(cell.predecessor(), None);
            assert!(!cell.visited());
        }
    }

    #[test]
    fn cell_at_is_a_bijection_over_aligned_positions() {
        for unit in [1, 7, 20] {
            let grid = grid(5, 4, unit);
            let mut seen = vec![false; grid.len()];

            for position in grid.surface().positions() {
                let id = grid.cell_at(position).unwrap();
                assert!(!seen[id]);
                seen[id] = true;
                assert_eq!(grid.cell(id).position(), position);
            }

            assert!(seen.into_iter().all(|hit| hit));
        }
    }

    #[test]
    fn cell_at_floors_unaligned_pixels() {
        let grid = grid(40, 30, 20);
        let id = grid.cell_at((219, 201)).unwrap();

        assert_eq!(grid.cell(id).position(), (200, 200));
    }

    #[test]
    fn cell_at_reports_out_of_bounds() {
        let grid = grid(40, 30, 20);

        assert_eq!(grid.cell_at((800, 0)), None);
        assert_eq!(grid.cell_at((0, 600)), None);
        assert_eq!(grid.cell_at((-1, 0)), None);
        assert_eq!(grid.cell_at((0, -20)), None);
    }

    #[test]
    fn candidates_step_once_in_neighbour_order() {
        let grid = grid(40, 30, 20);
        let id = grid.cell_at((200, 200)).unwrap();

        assert_eq!(grid.candidates(id), [(200, 180), (220, 200), (200, 220), (180, 200)]);
    }

    #[test]
    fn candidates_wrap_at_every_edge() {
        let grid = grid(40, 30, 20);

        let corner = grid.cell_at((0, 0)).unwrap();
        assert_eq!(grid.candidates(corner), [(0, 580), (20, 0), (0, 20), (780, 0)]);

        let opposite = grid.cell_at((780, 580)).unwrap();
        assert_eq!(grid.candidates(opposite), [(780, 560), (0, 580), (780, 0), (760, 580)]);
    }

    #[test]
    fn neighbors_skip_obstacles_and_keep_order() {
        let grid = grid(40, 30, 20);
        let id = grid.cell_at((200, 200)).unwrap();
        let obstacles = [(220, 200), (200, 180)];

        let positions: Vec<Coords> = grid
            .neighbors(id, &obstacles)
            .map(|neighbor| grid.cell(neighbor).position())
            .collect();

        assert_eq!(positions, vec![(200, 220), (180, 200)]);
    }

    #[test]
    fn neighbors_are_empty_when_fully_blocked() {
        let grid = grid(40, 30, 20);
        let id = grid.cell_at((200, 200)).unwrap();
        let obstacles = grid.candidates(id);

        assert_eq!(grid.neighbors(id, &obstacles).count(), 0);
    }
}
