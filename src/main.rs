//! Marga - grid path planner host
//!
//! Loads a scenario (map, start pose, goal), feeds it into the shared input
//! slots and runs the planning thread at the configured rate.
//!
//! Usage: `marga <scenario.yaml> [--config marga.toml] [--cycles N]`

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use marga::config::MargaConfig;
use marga::error::{MargaError, Result};
use marga::io::{FanoutSink, LogSink, Scenario, SnapshotSink};
use marga::shared::SharedInputs;
use marga::threads::spawn_planning_thread;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("marga=info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let scenario_path = args
        .get(1)
        .filter(|a| !a.starts_with("--"))
        .ok_or_else(|| {
            MargaError::Config("usage: marga <scenario.yaml> [--config path] [--cycles N]".into())
        })?;

    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .cloned();

    let cycles = args
        .iter()
        .position(|a| a == "--cycles")
        .and_then(|i| args.get(i + 1))
        .map(|s| {
            s.parse::<u32>()
                .map_err(|e| MargaError::Config(format!("invalid --cycles {:?}: {}", s, e)))
        })
        .transpose()?;

    let mut config = match config_path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            MargaConfig::load(Path::new(&path))?
        }
        None if Path::new("marga.toml").exists() => {
            info!("Loading configuration from marga.toml");
            MargaConfig::load(Path::new("marga.toml"))?
        }
        None => {
            info!("Using default configuration");
            MargaConfig::default()
        }
    };

    if let Some(n) = cycles {
        config.output.max_cycles = n;
    }

    info!("Marga v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Inflation radius {:.2}m, planning at {:.1}Hz, visit policy {:?}",
        config.planner.inflation_radius, config.planner.planning_rate, config.planner.visit_policy
    );

    let scenario = Scenario::load(Path::new(scenario_path))?;
    info!("Scenario {:?}: {}", scenario.name, scenario.description);

    // Feed the collaborator slots
    let shared = Arc::new(SharedInputs::new());
    shared.publish_grid(scenario.grid.to_message()?)?;
    shared.set_pose(scenario.start);
    shared.set_goal(scenario.goal);

    let mut sink = FanoutSink::new().with(LogSink);
    if let Some(path) = &config.output.snapshot_path {
        info!("Writing snapshots to {:?}", path);
        sink = sink.with(SnapshotSink::new(path));
    }

    let handle = spawn_planning_thread(config.clone(), Arc::clone(&shared), Box::new(sink))?;

    // Main thread: wait for the planning thread to finish
    let check_interval = Duration::from_millis(100);
    while !handle.is_finished() {
        std::thread::sleep(check_interval);
    }

    shared.signal_shutdown();
    if let Err(e) = handle.join() {
        error!("Planning thread panicked: {:?}", e);
    }

    if shared.cycles() == 0 {
        warn!("No planning cycles completed");
    }
    info!("Marga finished after {} cycles", shared.cycles());
    Ok(())
}
