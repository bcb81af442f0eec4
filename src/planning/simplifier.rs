//! Line-of-sight path pruning.
//!
//! Greedy farthest-visible-point reduction: from the last kept waypoint,
//! scan candidates from the end of the path backwards and keep the first
//! one whose connecting segment is clear.
//!
//! Visibility is a parametric raycast. Waypoints are cell corners, so both
//! ends are shifted by half a cell and the segment between the two cell
//! centres is sampled at steps of at most one cell length.

use crate::core::WorldPoint;
use crate::error::PlanError;
use crate::grid::{GridModel, occupancy};

/// Path simplifier configuration.
#[derive(Clone, Debug)]
pub struct SimplifierConfig {
    /// Samples landing on cells at or above this value block the segment
    pub obstacle_threshold: i8,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self {
            obstacle_threshold: occupancy::OBSTACLE_THRESHOLD,
        }
    }
}

/// Reduces a dense per-cell path to mutually visible waypoints.
#[derive(Clone, Debug, Default)]
pub struct PathSimplifier {
    config: SimplifierConfig,
}

impl PathSimplifier {
    pub fn new(config: SimplifierConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(SimplifierConfig::default())
    }

    /// Simplify `path` against `grid`.
    ///
    /// The first and last waypoints are always kept. When nothing beyond the
    /// current waypoint is visible, the next waypoint is accepted anyway so
    /// every iteration advances by at least one index.
    pub fn simplify(
        &self,
        grid: &GridModel,
        path: &[WorldPoint],
    ) -> Result<Vec<WorldPoint>, PlanError> {
        if path.is_empty() || grid.cells().is_empty() {
            return Err(PlanError::EmptyInput);
        }

        let last = path.len() - 1;
        let mut simplified = vec![path[0]];
        let mut current = 0;
        let mut forced = 0;

        while current < last {
            let next = ((current + 1)..=last)
                .rev()
                .find(|&candidate| self.line_of_sight(grid, path[current], path[candidate]))
                .unwrap_or_else(|| {
                    forced += 1;
                    current + 1
                });

            simplified.push(path[next]);
            current = next;
        }

        if forced > 0 {
            tracing::warn!(
                "Path simplifier forced {} non-visible step(s) on a {}-point path",
                forced,
                path.len()
            );
        }
        tracing::debug!(
            "Simplified path from {} to {} waypoints",
            path.len(),
            simplified.len()
        );

        Ok(simplified)
    }

    /// Check that every sample along `from -> to` lies on an in-bounds cell
    /// below the obstacle threshold.
    pub fn line_of_sight(&self, grid: &GridModel, from: WorldPoint, to: WorldPoint) -> bool {
        let resolution = grid.resolution();
        let half_cell = WorldPoint::new(resolution * 0.5, resolution * 0.5);
        let a = from + half_cell;
        let b = to + half_cell;

        let steps = ((a.distance(&b) / resolution).ceil() as usize).max(1);

        (0..=steps).all(|i| {
            let sample = a.lerp(&b, i as f32 / steps as f32);
            grid.value(grid.world_to_cell(sample))
                .is_some_and(|v| v < self.config.obstacle_threshold)
        })
    }
}
