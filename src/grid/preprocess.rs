//! Obstacle preprocessing: binarization and inflation.
//!
//! Inflation dilates every obstacle along the 8 principal directions only,
//! one cell per radial step up to the inflation radius. This is a ray-cast
//! stencil, not a disk: at radius `r >= 2` the cells between two rays are
//! not guaranteed to be marked.

use super::GridModel;
use super::occupancy;
use crate::core::GridCoord;

/// 8 principal directions used by the inflation stencil
const RAY_DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Binarized and inflated views of one raw grid.
#[derive(Clone, Debug)]
pub struct PreprocessedGrids {
    /// Values collapsed to free/occupied (sub-threshold known values kept)
    pub binarized: GridModel,
    /// Binarized grid with obstacles dilated by the inflation radius
    pub inflated: GridModel,
}

/// Turns raw mapper output into the grids used for planning.
#[derive(Clone, Debug)]
pub struct ObstaclePreprocessor {
    /// Inflation radius in meters
    inflation_radius: f32,
    /// Raw values at or above this become obstacles
    obstacle_threshold: i8,
}

impl ObstaclePreprocessor {
    pub fn new(inflation_radius: f32, obstacle_threshold: i8) -> Self {
        Self {
            inflation_radius,
            obstacle_threshold,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(0.5, occupancy::OBSTACLE_THRESHOLD)
    }

    /// Inflation radius converted to cells: `ceil(radius / resolution)`.
    pub fn radius_cells(&self, resolution: f32) -> usize {
        if self.inflation_radius <= 0.0 {
            return 0;
        }
        (self.inflation_radius / resolution).ceil() as usize
    }

    /// Binarize then inflate. The raw grid is left untouched.
    pub fn process(&self, raw: &GridModel) -> PreprocessedGrids {
        let binarized = binarize(raw, self.obstacle_threshold);
        let radius_cells = self.radius_cells(raw.resolution());
        let inflated = inflate(&binarized, radius_cells, self.obstacle_threshold);

        tracing::debug!(
            "Preprocessed {}x{} grid: {} obstacle cells, {} after inflation ({} cells)",
            raw.width(),
            raw.height(),
            binarized.count_at_or_above(self.obstacle_threshold),
            inflated.count_at_or_above(self.obstacle_threshold),
            radius_cells
        );

        PreprocessedGrids {
            binarized,
            inflated,
        }
    }
}

/// Collapse raw values: unknown/negative to free, `>= threshold` to occupied,
/// anything else unchanged.
pub fn binarize(raw: &GridModel, threshold: i8) -> GridModel {
    let cells = raw
        .cells()
        .iter()
        .map(|&v| {
            if v < 0 {
                occupancy::FREE
            } else if v >= threshold {
                occupancy::OCCUPIED
            } else {
                v
            }
        })
        .collect();
    raw.with_cells(cells)
}

/// Dilate obstacles (`>= threshold`) by `radius_cells` along the 8 rays.
///
/// Reads from `binarized` and writes to a fresh grid so that marks made
/// during the pass never seed further inflation. Writes are clipped to
/// the grid bounds.
pub fn inflate(binarized: &GridModel, radius_cells: usize, threshold: i8) -> GridModel {
    let mut inflated = binarized.clone();
    if radius_cells == 0 {
        return inflated;
    }
    // No ray travels farther than the longest grid side before leaving it
    let longest_side = binarized.width().max(binarized.height());
    let radius = i32::try_from(radius_cells.min(longest_side)).unwrap_or(i32::MAX);

    for (index, &value) in binarized.cells().iter().enumerate() {
        if value < threshold {
            continue;
        }
        let center = binarized.coord_of(index);

        for &(dx, dy) in &RAY_DIRECTIONS {
            for step in 1..=radius {
                let target = GridCoord::new(
                    center.x.saturating_add(dx * step),
                    center.y.saturating_add(dy * step),
                );
                // Rays only leave the grid once; later steps stay outside
                if !inflated.set_value(target, occupancy::OCCUPIED) {
                    break;
                }
            }
        }
    }

    inflated
}
