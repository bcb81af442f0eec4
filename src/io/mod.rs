//! Inputs and outputs around the planning core.
//!
//! - Scenario files (YAML) standing in for the mapping, localization and
//!   goal-setting collaborators
//! - Plan sinks standing in for the publishing collaborator

mod scenario;
mod sink;

pub use scenario::{Scenario, ScenarioGrid};
pub use sink::{FanoutSink, LogSink, PlanSink, SnapshotSink};
