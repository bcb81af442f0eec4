//! Configuration loading for Marga

use crate::error::{MargaError, Result};
use crate::grid::occupancy;
use crate::planning::VisitPolicy;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MargaConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Planning pipeline parameters
#[derive(Clone, Debug, Deserialize)]
pub struct PlannerConfig {
    /// Obstacle inflation radius in meters (default: 0.5)
    #[serde(default = "default_inflation_radius")]
    pub inflation_radius: f32,

    /// Planning cycles per second (default: 1.0)
    #[serde(default = "default_planning_rate")]
    pub planning_rate: f32,

    /// Raw values at or above this are obstacles (default: 50)
    #[serde(default = "default_obstacle_threshold")]
    pub obstacle_threshold: i8,

    /// Search only enters cells below this value (default: 5)
    #[serde(default = "default_traversal_threshold")]
    pub traversal_threshold: i8,

    /// Visited-set policy for the search (default: on_enqueue)
    #[serde(default)]
    pub visit_policy: VisitPolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            inflation_radius: default_inflation_radius(),
            planning_rate: default_planning_rate(),
            obstacle_threshold: default_obstacle_threshold(),
            traversal_threshold: default_traversal_threshold(),
            visit_policy: VisitPolicy::default(),
        }
    }
}

/// Output configuration
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Write the latest cycle as JSON to this path
    #[serde(default)]
    pub snapshot_path: Option<String>,

    /// Stop after this many cycles (0 = run until shutdown)
    #[serde(default)]
    pub max_cycles: u32,
}

// Default value functions
fn default_inflation_radius() -> f32 {
    0.5
}
fn default_planning_rate() -> f32 {
    1.0
}
fn default_obstacle_threshold() -> i8 {
    occupancy::OBSTACLE_THRESHOLD
}
fn default_traversal_threshold() -> i8 {
    occupancy::NEAR_FREE_THRESHOLD
}

impl MargaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MargaError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: MargaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let planner = &self.planner;
        if !planner.planning_rate.is_finite() || planner.planning_rate <= 0.0 {
            return Err(MargaError::Config(format!(
                "planning_rate must be positive, got {}",
                planner.planning_rate
            )));
        }
        planner.cycle_interval()?;
        if !planner.inflation_radius.is_finite() || planner.inflation_radius < 0.0 {
            return Err(MargaError::Config(format!(
                "inflation_radius must be non-negative, got {}",
                planner.inflation_radius
            )));
        }
        Ok(())
    }
}

impl PlannerConfig {
    /// Interval between planning cycles.
    ///
    /// Fails when the rate is so small that its period has no `Duration`.
    pub fn cycle_interval(&self) -> Result<std::time::Duration> {
        std::time::Duration::try_from_secs_f32(1.0 / self.planning_rate).map_err(|e| {
            MargaError::Config(format!(
                "planning_rate {} gives no usable cycle interval: {}",
                self.planning_rate, e
            ))
        })
    }
}
