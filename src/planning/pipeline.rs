//! Per-cycle planning: preprocess, search, simplify.

use serde::Serialize;

use crate::config::PlannerConfig;
use crate::core::WorldPoint;
use crate::error::{PlanError, PlanStatus};
use crate::grid::{GridModel, ObstaclePreprocessor};

use super::astar::{AStarConfig, AStarPlanner, PathCell};
use super::simplifier::{PathSimplifier, SimplifierConfig};

/// Everything one cycle produces for the publishing side.
#[derive(Clone, Debug, Serialize)]
pub struct PlanOutput {
    pub status: PlanStatus,
    /// Binarized grid (absent when no map was available)
    pub binarized: Option<GridModel>,
    /// Inflated grid the search and simplifier ran on
    pub inflated: Option<GridModel>,
    /// Searched cells from start to goal, both included, with their `g`
    pub cells: Vec<PathCell>,
    /// One waypoint per searched cell, start excluded, goal included
    pub raw_path: Vec<WorldPoint>,
    /// Subsequence of `raw_path` with mutually visible neighbors
    pub simplified_path: Vec<WorldPoint>,
    pub nodes_expanded: usize,
}

impl PlanOutput {
    fn failed(status: PlanStatus) -> Self {
        Self {
            status,
            binarized: None,
            inflated: None,
            cells: Vec::new(),
            raw_path: Vec::new(),
            simplified_path: Vec::new(),
            nodes_expanded: 0,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == PlanStatus::Ok
    }
}

/// Planning pipeline for one agent.
///
/// Holds configuration only; every call to [`Planner::plan`] is independent.
#[derive(Clone, Debug)]
pub struct Planner {
    preprocessor: ObstaclePreprocessor,
    search: AStarPlanner,
    simplifier: PathSimplifier,
}

impl Planner {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            preprocessor: ObstaclePreprocessor::new(
                config.inflation_radius,
                config.obstacle_threshold,
            ),
            search: AStarPlanner::new(AStarConfig {
                traversal_threshold: config.traversal_threshold,
                visit_policy: config.visit_policy,
            }),
            simplifier: PathSimplifier::new(SimplifierConfig {
                obstacle_threshold: config.obstacle_threshold,
            }),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&PlannerConfig::default())
    }

    /// Plan from `start` to `goal` on the latest raw grid.
    ///
    /// Never fails: problems are reported through [`PlanOutput::status`]
    /// with empty paths.
    pub fn plan(&self, grid: Option<&GridModel>, start: WorldPoint, goal: WorldPoint) -> PlanOutput {
        let Some(raw) = grid else {
            tracing::debug!("Planning skipped: {}", PlanError::NoMapAvailable);
            return PlanOutput::failed(PlanStatus::NoMap);
        };

        let grids = self.preprocessor.process(raw);
        let inflated = &grids.inflated;

        let start_cell = inflated.world_to_cell(start);
        let goal_cell = inflated.world_to_cell(goal);

        let search = match self.search.find_path(inflated, start_cell, goal_cell) {
            Ok(path) => path,
            Err(e) => {
                let (status, nodes_expanded) = match e {
                    PlanError::Unreachable { nodes_expanded } => {
                        (PlanStatus::Unreachable, nodes_expanded)
                    }
                    other => (other.status().unwrap_or(PlanStatus::Unreachable), 0),
                };
                return PlanOutput {
                    binarized: Some(grids.binarized),
                    inflated: Some(grids.inflated),
                    nodes_expanded,
                    ..PlanOutput::failed(status)
                };
            }
        };

        let raw_path: Vec<WorldPoint> = search
            .coords()
            .skip(1)
            .map(|c| inflated.cell_to_world(c))
            .collect();

        let simplified_path = match self.simplifier.simplify(inflated, &raw_path) {
            Ok(path) => path,
            Err(e) => {
                // Start == goal leaves nothing to simplify
                tracing::debug!("Simplifier: {}", e);
                Vec::new()
            }
        };

        PlanOutput {
            status: PlanStatus::Ok,
            nodes_expanded: search.nodes_expanded,
            cells: search.cells,
            raw_path,
            simplified_path,
            binarized: Some(grids.binarized),
            inflated: Some(grids.inflated),
        }
    }
}
