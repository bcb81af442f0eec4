//! Error types for Marga

use serde::Serialize;
use thiserror::Error;

/// Marga error type
#[derive(Error, Debug)]
pub enum MargaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Invalid grid: {reason}")]
    InvalidGrid { reason: String },
}

impl From<toml::de::Error> for MargaError {
    fn from(e: toml::de::Error) -> Self {
        MargaError::Config(e.to_string())
    }
}

impl From<serde_yaml::Error> for MargaError {
    fn from(e: serde_yaml::Error) -> Self {
        MargaError::Scenario(e.to_string())
    }
}

impl From<serde_json::Error> for MargaError {
    fn from(e: serde_json::Error) -> Self {
        MargaError::Snapshot(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MargaError>;

/// Recoverable per-cycle planning failure.
///
/// None of these are fatal: the cycle reports an empty path and the next
/// cycle retries with whatever inputs are latest by then.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("no map available")]
    NoMapAvailable,

    #[error("goal cell ({x}, {y}) outside {width}x{height} grid")]
    InvalidGoal {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    #[error("goal unreachable after expanding {nodes_expanded} nodes")]
    Unreachable { nodes_expanded: usize },

    #[error("simplifier received an empty grid or path")]
    EmptyInput,
}

/// Outcome of one planning cycle as reported to the publishing side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    Ok,
    NoMap,
    InvalidGoal,
    Unreachable,
}

impl PlanError {
    /// Failure status reported for this error, or `None` for conditions that
    /// do not fail the cycle (the simplifier's empty input).
    pub fn status(&self) -> Option<PlanStatus> {
        match self {
            PlanError::NoMapAvailable => Some(PlanStatus::NoMap),
            PlanError::InvalidGoal { .. } => Some(PlanStatus::InvalidGoal),
            PlanError::Unreachable { .. } => Some(PlanStatus::Unreachable),
            PlanError::EmptyInput => None,
        }
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlanStatus::Ok => "OK",
            PlanStatus::NoMap => "NO_MAP",
            PlanStatus::InvalidGoal => "INVALID_GOAL",
            PlanStatus::Unreachable => "UNREACHABLE",
        };
        f.write_str(s)
    }
}
