//! Core geometric types shared by the grid, search and simplifier stages.

mod point;
mod pose;

pub use point::{GridCoord, WorldPoint};
pub use pose::Pose2D;
