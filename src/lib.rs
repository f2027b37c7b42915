//! Human vs. AI snake on a wrap-around board.
//!
//! The AI steers with an A* search over a lattice rebuilt every tick, avoiding
//! only its own body. Everything below [`game`] and [`term`] is free of I/O.

pub mod ai;
pub mod config;
pub mod food;
pub mod game;
pub mod grid;
pub mod pathfinder;
pub mod snake;
pub mod state;
pub mod surface;
pub mod term;

/// Signed pixel unit. Positions are always multiples of the lattice unit.
pub type PixelInt = i32;

/// Pixel position `(x, y)` on the playing surface.
pub type Coords = (PixelInt, PixelInt);
