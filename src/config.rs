use std::time::Duration;

use crate::surface::{Surface, SurfaceError};
use crate::PixelInt;

/// Settings for a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Pixel edge of one lattice cell, also the distance of one step
    pub unit: PixelInt,
    pub columns: PixelInt,
    pub rows: PixelInt,
    /// Minimum time between two simulation steps
    pub tick_interval: Duration,
    pub initial_length: usize,
    /// Seed for food placement; random when unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            unit: 20,
            columns: 40,
            rows: 30,
            tick_interval: Duration::from_millis(100),
            initial_length: 3,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn new(columns: PixelInt, rows: PixelInt) -> Self {
        Self {
            columns,
            rows,
            ..Default::default()
        }
    }

    pub fn surface(&self) -> Result<Surface, SurfaceError> {
        Surface::from_cells(self.columns, self.rows, self.unit)
    }
}
