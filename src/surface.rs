use thiserror::Error;

use crate::{Coords, PixelInt};

/// Reasons a playing surface cannot be tiled by the lattice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("unit size must be positive, got {0}")]
    InvalidUnit(PixelInt),
    #[error("surface {width}x{height} has no area")]
    Empty { width: PixelInt, height: PixelInt },
    #[error("surface {width}x{height} is not a multiple of unit size {unit}")]
    Untiled { width: PixelInt, height: PixelInt, unit: PixelInt },
}

/// Pixel extents of the board together with the lattice unit that tiles it.
///
/// Construction guarantees both extents are positive exact multiples of the
/// unit, so every consumer can divide without checking remainders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    width: PixelInt,
    height: PixelInt,
    unit: PixelInt,
}

impl Surface {
    pub fn new(width: PixelInt, height: PixelInt, unit: PixelInt) -> Result<Self, SurfaceError> {
        if unit <= 0 {
            return Err(SurfaceError::InvalidUnit(unit));
        }

        if width <= 0 || height <= 0 {
            return Err(SurfaceError::Empty { width, height });
        }

        if width % unit != 0 || height % unit != 0 {
            return Err(SurfaceError::Untiled { width, height, unit });
        }

        Ok(Surface { width, height, unit })
    }

    pub fn from_cells(columns: PixelInt, rows: PixelInt, unit: PixelInt) -> Result<Self, SurfaceError> {
        if unit <= 0 {
            return Err(SurfaceError::InvalidUnit(unit));
        }

        Self::new(columns.saturating_mul(unit), rows.saturating_mul(unit), unit)
    }

    pub fn width(&self) -> PixelInt {
        self.width
    }

    pub fn height(&self) -> PixelInt {
        self.height
    }

    pub fn unit(&self) -> PixelInt {
        self.unit
    }

    pub fn columns(&self) -> PixelInt {
        self.width / self.unit
    }

    pub fn rows(&self) -> PixelInt {
        self.height / self.unit
    }

    /// Re-enters a position that left the board from the opposite edge.
    pub fn wrap(&self, (x, y): Coords) -> Coords {
        (x.rem_euclid(self.width), y.rem_euclid(self.height))
    }

    pub fn to_lattice(&self, (x, y): Coords) -> Coords {
        (x.div_euclid(self.unit), y.div_euclid(self.unit))
    }

    pub fn to_pixels(&self, column: PixelInt, row: PixelInt) -> Coords {
        (column * self.unit, row * self.unit)
    }

    #[cfg(test)]
    pub(crate) fn is_aligned(&self, (x, y): Coords) -> bool {
        x % self.unit == 0 && y % self.unit == 0
            && (0..self.width).contains(&x)
            && (0..self.height).contains(&y)
    }

    /// Every unit-aligned position on the board, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Coords> + '_ {
        (0..self.rows()).flat_map(move |row| {
            (0..self.columns()).map(move |column| self.to_pixels(column, row))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_surfaces_the_unit_does_not_tile() {
        assert_eq!(
            Surface::new(810, 600, 20),
            Err(SurfaceError::Untiled { width: 810, height: 600, unit: 20 })
        );
        assert_eq!(Surface::new(800, 600, 0), Err(SurfaceError::InvalidUnit(0)));
        assert_eq!(Surface::new(0, 600, 20), Err(SurfaceError::Empty { width: 0, height: 600 }));
    }

    #[test]
    fn from_cells_matches_pixel_extents() {
        let surface = Surface::from_cells(40, 30, 20).unwrap();

        assert_eq!((surface.width(), surface.height()), (800, 600));
        assert_eq!((surface.columns(), surface.rows()), (40, 30));
    }

    #[test]
    fn wrap_reenters_from_the_opposite_edge() {
        let surface = Surface::new(800, 600, 20).unwrap();

        assert_eq!(surface.wrap((-20, 0)), (780, 0));
        assert_eq!(surface.wrap((800, 600)), (0, 0));
        assert_eq!(surface.wrap((400, -20)), (400, 580));
        assert_eq!(surface.wrap((100, 100)), (100, 100));
    }

    #[test]
    fn positions_cover_every_aligned_cell_once() {
        let surface = Surface::from_cells(4, 3, 10).unwrap();
        let positions: Vec<Coords> = surface.positions().collect();

        assert_eq!(positions.len(), 12);
        assert!(positions.iter().all(|pos| surface.is_aligned(*pos)));
        assert_eq!(positions[0], (0, 0));
        assert_eq!(positions[11], (30, 20));
    }
}
