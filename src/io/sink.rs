//! Plan sinks: where each cycle's output goes.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::planning::PlanOutput;

/// Receiver for the output of each planning cycle.
pub trait PlanSink: Send {
    fn publish(&mut self, cycle: u32, output: &PlanOutput) -> Result<()>;
}

/// Logs a one-line summary per cycle.
#[derive(Debug, Default)]
pub struct LogSink;

impl PlanSink for LogSink {
    fn publish(&mut self, cycle: u32, output: &PlanOutput) -> Result<()> {
        tracing::info!(
            "Cycle {}: status={}, raw={} waypoints, simplified={} waypoints, expanded={}",
            cycle,
            output.status,
            output.raw_path.len(),
            output.simplified_path.len(),
            output.nodes_expanded
        );
        for (i, p) in output.simplified_path.iter().enumerate() {
            tracing::debug!("  waypoint {}: ({:.3}, {:.3})", i, p.x, p.y);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct Snapshot<'a> {
    cycle: u32,
    #[serde(flatten)]
    output: &'a PlanOutput,
}

/// Overwrites a JSON file with the latest cycle.
#[derive(Debug)]
pub struct SnapshotSink {
    path: PathBuf,
}

impl SnapshotSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlanSink for SnapshotSink {
    fn publish(&mut self, cycle: u32, output: &PlanOutput) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&Snapshot { cycle, output })?;
        std::fs::write(&self.path, json)?;
        tracing::debug!("Snapshot for cycle {} written to {:?}", cycle, self.path);
        Ok(())
    }
}

/// Publishes to several sinks in order. A failing sink does not stop the
/// others; the first error is returned.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn PlanSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl PlanSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl PlanSink for FanoutSink {
    fn publish(&mut self, cycle: u32, output: &PlanOutput) -> Result<()> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.publish(cycle, output) {
                tracing::error!("Plan sink failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
