//! Integration tests for the marga planning pipeline
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration -- --nocapture
//! ```

mod host;
mod properties;
mod scenarios;

use marga::core::{GridCoord, WorldPoint};
use marga::grid::{GridModel, occupancy};

/// Free square grid at 1m resolution anchored at the world origin.
pub fn free_grid(size: usize) -> GridModel {
    GridModel::filled(size, size, 1.0, WorldPoint::ZERO, occupancy::FREE).unwrap()
}

/// Centre of a cell, used as a start/goal position that maps back to it.
pub fn cell_center(grid: &GridModel, x: i32, y: i32) -> WorldPoint {
    let corner = grid.cell_to_world(GridCoord::new(x, y));
    let half = grid.resolution() * 0.5;
    WorldPoint::new(corner.x + half, corner.y + half)
}
