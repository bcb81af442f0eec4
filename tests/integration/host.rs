//! Planning thread, scenario files and snapshot output together.

use std::sync::Arc;
use std::time::{Duration, Instant};

use marga::config::MargaConfig;
use marga::core::Pose2D;
use marga::error::PlanStatus;
use marga::io::{FanoutSink, LogSink, Scenario, SnapshotSink};
use marga::shared::SharedInputs;
use marga::threads::spawn_planning_thread;

const ROOM: &str = r#"
name: room_with_divider
description: Two halves joined by a door at the top
grid:
  resolution: 0.25
  origin: { x: 0.0, y: 0.0 }
  rows:
    - "............"
    - "............"
    - "............"
    - "......#....."
    - "......#....."
    - "......#....."
    - "......#....."
    - "......#....."
    - "......#....."
    - "......#....."
start: { x: 0.3, y: 0.3 }
goal: { x: 2.7, y: 0.3 }
"#;

const CONFIG: &str = r#"
[planner]
inflation_radius = 0.2
planning_rate = 50.0

[output]
max_cycles = 2
"#;

fn wait_for(handle: &std::thread::JoinHandle<()>, timeout: Duration) {
    let started = Instant::now();
    while !handle.is_finished() && started.elapsed() < timeout {
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn test_scenario_through_planning_thread() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join("marga.toml");
    let scenario_path = dir.path().join("room.yaml");
    std::fs::write(&config_path, CONFIG).unwrap();
    std::fs::write(&scenario_path, ROOM).unwrap();

    let mut config = MargaConfig::load(&config_path).unwrap();
    let snapshot_path = dir.path().join("snapshots").join("latest.json");
    config.output.snapshot_path = Some(snapshot_path.to_string_lossy().into_owned());

    let scenario = Scenario::load(&scenario_path).unwrap();
    let shared = Arc::new(SharedInputs::new());
    shared
        .publish_grid(scenario.grid.to_message().unwrap())
        .unwrap();
    shared.set_pose(scenario.start);
    shared.set_goal(scenario.goal);

    let sink = FanoutSink::new()
        .with(LogSink)
        .with(SnapshotSink::new(&snapshot_path));
    let handle = spawn_planning_thread(config, Arc::clone(&shared), Box::new(sink)).unwrap();

    wait_for(&handle, Duration::from_secs(10));
    assert!(handle.is_finished());
    handle.join().unwrap();
    assert_eq!(shared.cycles(), 2);

    let snapshot: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&snapshot_path).unwrap()).unwrap();
    assert_eq!(snapshot["cycle"], 2);
    assert_eq!(snapshot["status"], "OK");

    let simplified = snapshot["simplified_path"].as_array().unwrap();
    let raw = snapshot["raw_path"].as_array().unwrap();
    assert!(simplified.len() >= 3, "door forces a bend");
    assert!(simplified.len() < raw.len());
    assert_eq!(simplified.last(), raw.last());
}

#[test]
fn test_goal_update_between_cycles() {
    let scenario = Scenario::from_yaml(ROOM).unwrap();
    let shared = Arc::new(SharedInputs::new());
    shared
        .publish_grid(scenario.grid.to_message().unwrap())
        .unwrap();
    shared.set_pose(Pose2D::new(0.3, 0.3, 0.0));
    shared.set_goal(marga::core::WorldPoint::new(50.0, 50.0));

    let mut config = MargaConfig::from_toml(CONFIG).unwrap();
    config.output.max_cycles = 0;
    let mut thread =
        marga::threads::PlanningThread::new(config, Arc::clone(&shared), Box::new(LogSink))
            .unwrap();

    assert_eq!(thread.run_cycle().unwrap().status, PlanStatus::InvalidGoal);
    shared.set_goal(scenario.goal);
    assert_eq!(thread.run_cycle().unwrap().status, PlanStatus::Ok);
}
