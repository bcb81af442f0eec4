//! Marga - grid-based global path planner.
//!
//! Computes a collision-free route across a 2D occupancy grid from the
//! agent's current position to a goal, in three stages per cycle:
//!
//! 1. **Preprocessing** ([`grid`]): binarize raw occupancy values and inflate
//!    obstacles by a safety radius
//! 2. **Search** ([`planning::AStarPlanner`]): 8-connected A* over the
//!    inflated grid
//! 3. **Simplification** ([`planning::PathSimplifier`]): drop waypoints whose
//!    neighbours can see each other
//!
//! [`planning::Planner::plan`] runs all three. The [`threads`] and [`shared`]
//! modules host it in a fixed-rate loop fed by latest-value input slots.
//!
//! ```
//! use marga::core::WorldPoint;
//! use marga::grid::{GridModel, occupancy};
//! use marga::planning::Planner;
//!
//! let grid = GridModel::filled(5, 5, 1.0, WorldPoint::ZERO, occupancy::FREE).unwrap();
//! let output = Planner::with_defaults().plan(
//!     Some(&grid),
//!     WorldPoint::new(0.5, 0.5),
//!     WorldPoint::new(4.5, 4.5),
//! );
//! assert!(output.is_ok());
//! assert_eq!(output.simplified_path.len(), 2);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod grid;
pub mod io;
pub mod planning;
pub mod shared;
pub mod threads;

pub use config::{MargaConfig, PlannerConfig};
pub use error::{MargaError, PlanError, PlanStatus, Result};
pub use grid::{GridMessage, GridModel};
pub use planning::{PlanOutput, Planner};
