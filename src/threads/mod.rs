//! Thread hosting the fixed-rate planning loop.
//!
//! Map, pose and goal updates are written into [`SharedInputs`] by whoever
//! owns those sources; the planning thread only reads them.

mod planning;

pub use planning::PlanningThread;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::MargaConfig;
use crate::error::Result;
use crate::io::PlanSink;
use crate::shared::SharedInputs;

/// Spawn the planning thread.
///
/// The thread state is built on the caller's side so that a bad cycle
/// interval is reported here instead of inside the thread.
pub fn spawn_planning_thread(
    config: MargaConfig,
    shared: Arc<SharedInputs>,
    sink: Box<dyn PlanSink>,
) -> Result<JoinHandle<()>> {
    let mut planning_thread = PlanningThread::new(config, shared, sink)?;
    let handle = thread::Builder::new()
        .name("planning".into())
        .spawn(move || planning_thread.run())?;
    Ok(handle)
}
