//! Occupancy grid model and obstacle preprocessing.
//!
//! The grid is a row-major raster of `i8` occupancy values in the usual
//! mapping convention: `-1` unknown, `0..=100` confidence that the cell is
//! obstructed.

mod preprocess;

pub use preprocess::{ObstaclePreprocessor, PreprocessedGrids, binarize, inflate};

use serde::{Deserialize, Serialize};

use crate::core::{GridCoord, WorldPoint};
use crate::error::{MargaError, Result};

/// Occupancy values and thresholds
pub mod occupancy {
    /// Unknown cell as reported by the mapper
    pub const UNKNOWN: i8 = -1;
    /// Free cell after binarization
    pub const FREE: i8 = 0;
    /// Occupied cell after binarization
    pub const OCCUPIED: i8 = 100;
    /// Values at or above this are obstacles for binarization and line-of-sight
    pub const OBSTACLE_THRESHOLD: i8 = 50;
    /// Search only steps onto cells strictly below this value
    pub const NEAR_FREE_THRESHOLD: i8 = 5;
}

/// Raster as delivered by the mapping collaborator, before validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridMessage {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Meters per cell edge
    pub resolution: f32,
    /// World coordinates of the corner of cell (0,0)
    #[serde(default)]
    pub origin: WorldPoint,
    /// Row-major occupancy values, index `y * width + x`
    pub data: Vec<i8>,
}

/// Validated occupancy grid.
///
/// Constructed only through [`GridModel::new`] (or `TryFrom<GridMessage>`),
/// so `cells.len() == width * height` always holds and both dimensions are
/// non-zero.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridModel {
    width: usize,
    height: usize,
    resolution: f32,
    origin: WorldPoint,
    cells: Vec<i8>,
}

impl GridModel {
    /// Create a grid from raw cell values.
    ///
    /// Fails with [`MargaError::InvalidGrid`] on zero dimensions, a
    /// non-positive resolution or a cell array of the wrong length.
    pub fn new(
        width: usize,
        height: usize,
        resolution: f32,
        origin: WorldPoint,
        cells: Vec<i8>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MargaError::InvalidGrid {
                reason: format!("zero-sized grid {}x{}", width, height),
            });
        }
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(MargaError::InvalidGrid {
                reason: format!("resolution must be positive, got {}", resolution),
            });
        }
        if !origin.x.is_finite() || !origin.y.is_finite() {
            return Err(MargaError::InvalidGrid {
                reason: "origin must be finite".to_string(),
            });
        }
        let expected = width.checked_mul(height).ok_or_else(|| MargaError::InvalidGrid {
            reason: format!("grid {}x{} overflows", width, height),
        })?;
        if cells.len() != expected {
            return Err(MargaError::InvalidGrid {
                reason: format!(
                    "expected {} cells for {}x{}, got {}",
                    expected,
                    width,
                    height,
                    cells.len()
                ),
            });
        }

        Ok(Self {
            width,
            height,
            resolution,
            origin,
            cells,
        })
    }

    /// Create a grid with every cell set to `value`.
    pub fn filled(
        width: usize,
        height: usize,
        resolution: f32,
        origin: WorldPoint,
        value: i8,
    ) -> Result<Self> {
        Self::new(
            width,
            height,
            resolution,
            origin,
            vec![value; width.saturating_mul(height)],
        )
    }

    /// Same geometry, different cells. Length is guaranteed by the callers.
    pub(crate) fn with_cells(&self, cells: Vec<i8>) -> Self {
        debug_assert_eq!(cells.len(), self.cells.len());
        Self {
            width: self.width,
            height: self.height,
            resolution: self.resolution,
            origin: self.origin,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    #[inline]
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Row-major cell values.
    #[inline]
    pub fn cells(&self) -> &[i8] {
        &self.cells
    }

    /// Check that a coordinate lies in `[0, width) x [0, height)`.
    #[inline]
    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    /// Linear index of a coordinate, `None` when out of bounds.
    #[inline]
    pub fn index(&self, coord: GridCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    /// Coordinate of a linear index. Caller guarantees `index < width * height`.
    #[inline]
    pub(crate) fn coord_of(&self, index: usize) -> GridCoord {
        GridCoord::new((index % self.width) as i32, (index / self.width) as i32)
    }

    /// Occupancy value at a coordinate, `None` when out of bounds.
    #[inline]
    pub fn value(&self, coord: GridCoord) -> Option<i8> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// Set a cell value. Returns false (and does nothing) when out of bounds.
    pub fn set_value(&mut self, coord: GridCoord, value: i8) -> bool {
        match self.index(coord) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    /// True iff the cell is in bounds and its value is at or above `threshold`.
    #[inline]
    pub fn is_occupied(&self, coord: GridCoord, threshold: i8) -> bool {
        self.value(coord).is_some_and(|v| v >= threshold)
    }

    /// Number of cells at or above `threshold`.
    pub fn count_at_or_above(&self, threshold: i8) -> usize {
        self.cells.iter().filter(|&&v| v >= threshold).count()
    }

    /// Convert world coordinates to grid coordinates (floor, no bounds check).
    #[inline]
    pub fn world_to_cell(&self, point: WorldPoint) -> GridCoord {
        let x = ((point.x - self.origin.x) / self.resolution).floor() as i32;
        let y = ((point.y - self.origin.y) / self.resolution).floor() as i32;
        GridCoord::new(x, y)
    }

    /// Convert grid coordinates to world coordinates (cell corner).
    #[inline]
    pub fn cell_to_world(&self, coord: GridCoord) -> WorldPoint {
        WorldPoint::new(
            coord.x as f32 * self.resolution + self.origin.x,
            coord.y as f32 * self.resolution + self.origin.y,
        )
    }

    /// Convert back to the wire shape.
    pub fn to_message(&self) -> GridMessage {
        GridMessage {
            width: self.width,
            height: self.height,
            resolution: self.resolution,
            origin: self.origin,
            data: self.cells.clone(),
        }
    }
}

impl TryFrom<GridMessage> for GridModel {
    type Error = MargaError;

    fn try_from(msg: GridMessage) -> Result<Self> {
        GridModel::new(msg.width, msg.height, msg.resolution, msg.origin, msg.data)
    }
}
