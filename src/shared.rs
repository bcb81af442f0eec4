//! Shared latest-value state between the input collaborators and the
//! planning thread.
//!
//! Map, pose and goal updates arrive asynchronously and simply overwrite
//! the previous value. The planning thread takes a snapshot of all three
//! at the start of a cycle.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

use crate::core::{Pose2D, WorldPoint};
use crate::error::Result;
use crate::grid::{GridMessage, GridModel};

/// Single-slot store with last-value-wins replacement.
///
/// Readers get an `Arc` to the value that was current when they asked, so a
/// concurrent `replace` never changes data under a running cycle.
#[derive(Debug)]
pub struct LatestValue<T> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T> Default for LatestValue<T> {
    fn default() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }
}

impl<T> LatestValue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored value, returning the previous one.
    pub fn replace(&self, value: T) -> Option<Arc<T>> {
        let value = Arc::new(value);
        match self.slot.write() {
            Ok(mut guard) => guard.replace(value),
            // A writer panicked mid-replace; the slot holds a whole Arc either way
            Err(poisoned) => poisoned.into_inner().replace(value),
        }
    }

    /// Snapshot of the current value.
    pub fn latest(&self) -> Option<Arc<T>> {
        match self.slot.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_set(&self) -> bool {
        self.latest().is_some()
    }
}

/// Consistent view of the inputs for one planning cycle.
#[derive(Clone, Debug)]
pub struct InputSnapshot {
    pub grid: Option<Arc<GridModel>>,
    pub pose: Option<Arc<Pose2D>>,
    pub goal: Option<Arc<WorldPoint>>,
}

/// Shared state between the publishing collaborators and the planning thread.
#[derive(Debug, Default)]
pub struct SharedInputs {
    grid: LatestValue<GridModel>,
    pose: LatestValue<Pose2D>,
    goal: LatestValue<WorldPoint>,

    /// Shutdown signal for graceful termination
    shutdown: AtomicBool,

    /// Number of completed planning cycles
    cycles: AtomicU32,
}

impl SharedInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a new map. An invalid map is rejected and the
    /// previous map stays in place.
    pub fn publish_grid(&self, msg: GridMessage) -> Result<()> {
        match GridModel::try_from(msg) {
            Ok(grid) => {
                self.grid.replace(grid);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Rejected map update: {}", e);
                Err(e)
            }
        }
    }

    /// Store an already validated map.
    pub fn set_grid(&self, grid: GridModel) {
        self.grid.replace(grid);
    }

    /// Update the agent pose (localization).
    pub fn set_pose(&self, pose: Pose2D) {
        self.pose.replace(pose);
    }

    /// Update the goal (goal-setting collaborator).
    pub fn set_goal(&self, goal: WorldPoint) {
        self.goal.replace(goal);
    }

    /// Read all inputs for one cycle.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            grid: self.grid.latest(),
            pose: self.pose.latest(),
            goal: self.goal.latest(),
        }
    }

    /// Signal shutdown.
    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Check if shutdown is signaled.
    pub fn should_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Increment completed cycle count.
    pub fn increment_cycles(&self) -> u32 {
        self.cycles.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Get completed cycle count.
    pub fn cycles(&self) -> u32 {
        self.cycles.load(Ordering::Acquire)
    }
}

/// Thread-safe handle to the shared inputs.
pub type Shared = Arc<SharedInputs>;
