//! Planning thread: one full preprocess/search/simplify cycle per tick.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::MargaConfig;
use crate::error::Result;
use crate::io::PlanSink;
use crate::planning::{PlanOutput, Planner};
use crate::shared::SharedInputs;

/// Planning thread state and logic.
pub struct PlanningThread {
    shared: Arc<SharedInputs>,
    sink: Box<dyn PlanSink>,
    planner: Planner,
    cycle_interval: Duration,
    max_cycles: u32,
}

impl PlanningThread {
    pub fn new(
        config: MargaConfig,
        shared: Arc<SharedInputs>,
        sink: Box<dyn PlanSink>,
    ) -> Result<Self> {
        Ok(Self {
            planner: Planner::new(&config.planner),
            cycle_interval: config.planner.cycle_interval()?,
            max_cycles: config.output.max_cycles,
            shared,
            sink,
        })
    }

    /// Run until shutdown or until `max_cycles` cycles have completed.
    pub fn run(&mut self) {
        tracing::info!(
            "Planning thread started ({:.2}s per cycle)",
            self.cycle_interval.as_secs_f32()
        );

        loop {
            let cycle_start = Instant::now();

            if self.shared.should_shutdown() {
                tracing::info!("Planning thread shutting down");
                break;
            }

            if self.run_cycle().is_some() {
                let cycle = self.shared.increment_cycles();
                if self.max_cycles > 0 && cycle >= self.max_cycles {
                    tracing::info!("Reached {} planning cycles", cycle);
                    self.shared.signal_shutdown();
                    break;
                }
            }

            // Maintain target cycle rate
            let elapsed = cycle_start.elapsed();
            if elapsed < self.cycle_interval {
                std::thread::sleep(self.cycle_interval - elapsed);
            }
        }

        tracing::info!("Planning thread exited");
    }

    /// Run one cycle on the current inputs.
    ///
    /// Returns `None` without planning while pose or goal is still unknown.
    pub fn run_cycle(&mut self) -> Option<PlanOutput> {
        let inputs = self.shared.snapshot();

        let (Some(pose), Some(goal)) = (inputs.pose, inputs.goal) else {
            tracing::debug!("Waiting for pose and goal");
            return None;
        };

        let started = Instant::now();
        let output = self
            .planner
            .plan(inputs.grid.as_deref(), pose.position(), *goal);

        tracing::info!(
            "Planned in {:.1}ms: status={}, {} raw / {} simplified waypoints",
            started.elapsed().as_secs_f64() * 1000.0,
            output.status,
            output.raw_path.len(),
            output.simplified_path.len()
        );

        let cycle = self.shared.cycles() + 1;
        if let Err(e) = self.sink.publish(cycle, &output) {
            tracing::error!("Failed to publish plan: {}", e);
        }

        Some(output)
    }
}
