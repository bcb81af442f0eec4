//! Path planning pipeline.
//!
//! This module provides:
//! - A* grid search with a swappable visited-set policy
//! - Line-of-sight path simplifier
//! - The per-cycle `plan` operation tying preprocessing, search and
//!   simplification together

mod astar;
mod pipeline;
mod simplifier;

pub use astar::{AStarConfig, AStarPlanner, PathCell, SearchPath, VisitPolicy};
pub use pipeline::{PlanOutput, Planner};
pub use simplifier::{PathSimplifier, SimplifierConfig};
