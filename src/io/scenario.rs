//! Scenario YAML parsing.
//!
//! A scenario defines one planning problem:
//! - The map, either as raw cell values or as ASCII rows
//! - The agent start pose
//! - The goal point

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::{Pose2D, WorldPoint};
use crate::error::{MargaError, Result};
use crate::grid::{GridMessage, occupancy};

/// A planning scenario loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    /// Human-readable scenario name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: String,

    /// Map to plan on
    pub grid: ScenarioGrid,

    /// Agent pose
    pub start: Pose2D,

    /// Goal position
    pub goal: WorldPoint,
}

/// Map section of a scenario.
///
/// `rows` are listed top row first (highest y), so the file reads like the
/// map it describes: `#` occupied, `.` free, `?` unknown, a digit `d` is
/// occupancy `d * 10`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioGrid {
    /// Meters per cell
    pub resolution: f32,

    /// World coordinates of the corner of cell (0,0)
    #[serde(default)]
    pub origin: WorldPoint,

    /// ASCII map rows
    #[serde(default)]
    pub rows: Vec<String>,

    /// Explicit dimensions for `data`
    #[serde(default)]
    pub width: Option<usize>,
    #[serde(default)]
    pub height: Option<usize>,

    /// Row-major values, index `y * width + x`
    #[serde(default)]
    pub data: Vec<i8>,
}

impl Scenario {
    /// Load a scenario from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MargaError::Scenario(format!("Failed to read {:?}: {}", path, e)))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

impl ScenarioGrid {
    /// Build the raster message. Shape problems are left for
    /// `GridModel` validation to reject.
    pub fn to_message(&self) -> Result<GridMessage> {
        if !self.rows.is_empty() {
            return self.rows_to_message();
        }

        let width = self.width.ok_or_else(|| {
            MargaError::Scenario("grid needs either `rows` or `width`/`height`/`data`".into())
        })?;
        let height = self
            .height
            .ok_or_else(|| MargaError::Scenario("grid `height` missing".into()))?;

        Ok(GridMessage {
            width,
            height,
            resolution: self.resolution,
            origin: self.origin,
            data: self.data.clone(),
        })
    }

    fn rows_to_message(&self) -> Result<GridMessage> {
        let height = self.rows.len();
        let width = self.rows[0].chars().count();
        let mut data = vec![occupancy::FREE; width * height];

        for (row_index, row) in self.rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(MargaError::Scenario(format!(
                    "row {} has {} cells, expected {}",
                    row_index,
                    row.chars().count(),
                    width
                )));
            }
            let y = height - 1 - row_index;
            for (x, ch) in row.chars().enumerate() {
                data[y * width + x] = Self::cell_value(ch).ok_or_else(|| {
                    MargaError::Scenario(format!("unknown map character {:?}", ch))
                })?;
            }
        }

        Ok(GridMessage {
            width,
            height,
            resolution: self.resolution,
            origin: self.origin,
            data,
        })
    }

    fn cell_value(ch: char) -> Option<i8> {
        match ch {
            '#' => Some(occupancy::OCCUPIED),
            '.' => Some(occupancy::FREE),
            '?' => Some(occupancy::UNKNOWN),
            d if d.is_ascii_digit() => d.to_digit(10).map(|v| (v * 10) as i8),
            _ => None,
        }
    }
}
