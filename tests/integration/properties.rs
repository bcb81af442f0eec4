//! Properties that must hold on arbitrary grids.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use marga::config::PlannerConfig;
use marga::core::{GridCoord, WorldPoint};
use marga::error::PlanStatus;
use marga::grid::{GridModel, binarize, inflate, occupancy};
use marga::planning::{AStarPlanner, PathSimplifier, Planner, VisitPolicy};

/// Random raw grid with mapper-like values: unknown, faint, strong.
fn random_grid(rng: &mut StdRng, width: usize, height: usize, obstacle_ratio: f64) -> GridModel {
    let cells = (0..width * height)
        .map(|_| {
            if rng.random_bool(obstacle_ratio) {
                rng.random_range(50..=100)
            } else if rng.random_bool(0.1) {
                -1
            } else if rng.random_bool(0.1) {
                rng.random_range(1..50)
            } else {
                0
            }
        })
        .collect();
    let origin = WorldPoint::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0));
    GridModel::new(width, height, 0.1, origin, cells).unwrap()
}

#[test]
fn test_cell_round_trip_within_one_cell() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let resolution = rng.random_range(0.01..2.0);
        let origin = WorldPoint::new(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0));
        let grid = GridModel::filled(10, 10, resolution, origin, occupancy::FREE).unwrap();

        for _ in 0..50 {
            let p = WorldPoint::new(
                origin.x + rng.random_range(-5.0..15.0) * resolution,
                origin.y + rng.random_range(-5.0..15.0) * resolution,
            );
            let back = grid.cell_to_world(grid.world_to_cell(p));
            assert!((p.x - back.x).abs() <= resolution * 1.001);
            assert!((p.y - back.y).abs() <= resolution * 1.001);
        }
    }
}

#[test]
fn test_cell_to_world_exact_for_unit_grid() {
    let grid = super::free_grid(8);
    let p = grid.cell_to_world(GridCoord::new(3, 6));
    assert_relative_eq!(p.x, 3.0);
    assert_relative_eq!(p.y, 6.0);
    assert_eq!(grid.world_to_cell(p), GridCoord::new(3, 6));
}

#[test]
fn test_binarize_idempotent_on_random_grids() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..10 {
        let raw = random_grid(&mut rng, 17, 13, 0.3);
        let once = binarize(&raw, occupancy::OBSTACLE_THRESHOLD);
        assert_eq!(binarize(&once, occupancy::OBSTACLE_THRESHOLD), once);
        assert!(once.cells().iter().all(|&v| (0..50).contains(&v) || v == 100));
    }
}

#[test]
fn test_inflation_monotonic_on_random_grids() {
    let mut rng = StdRng::seed_from_u64(13);
    for radius in 0..4 {
        let raw = random_grid(&mut rng, 20, 20, 0.1);
        let bin = binarize(&raw, occupancy::OBSTACLE_THRESHOLD);
        let inflated = inflate(&bin, radius, occupancy::OBSTACLE_THRESHOLD);

        for (b, i) in bin.cells().iter().zip(inflated.cells()) {
            if *b >= occupancy::OBSTACLE_THRESHOLD {
                assert_eq!(*i, occupancy::OCCUPIED);
            }
        }
        assert_eq!(inflated.width(), bin.width());
        assert_eq!(inflated.height(), bin.height());
    }
}

#[test]
fn test_search_stays_in_bounds() {
    let mut rng = StdRng::seed_from_u64(17);
    for policy in [VisitPolicy::OnEnqueue, VisitPolicy::OnPop] {
        let planner = AStarPlanner::new(marga::planning::AStarConfig {
            visit_policy: policy,
            ..Default::default()
        });
        for _ in 0..20 {
            let grid = binarize(&random_grid(&mut rng, 25, 25, 0.25), 50);
            let start = GridCoord::new(rng.random_range(0..25), rng.random_range(0..25));
            let goal = GridCoord::new(rng.random_range(0..25), rng.random_range(0..25));

            if let Ok(path) = planner.find_path(&grid, start, goal) {
                assert_eq!(path.cells.first().map(|c| c.coord), Some(start));
                assert_eq!(path.cells.last().map(|c| c.coord), Some(goal));
                for cell in path.cells.iter().skip(1) {
                    assert!(grid.in_bounds(cell.coord));
                    assert!(grid.value(cell.coord).unwrap() < occupancy::NEAR_FREE_THRESHOLD);
                }
                for pair in path.cells.windows(2) {
                    assert_eq!(pair[0].coord.chebyshev_distance(&pair[1].coord), 1);
                }
            }
        }
    }
}

#[test]
fn test_simplified_endpoints_match_raw() {
    let mut rng = StdRng::seed_from_u64(19);
    let planner = Planner::new(&PlannerConfig {
        inflation_radius: 0.1,
        ..Default::default()
    });
    let mut planned = 0;

    for _ in 0..30 {
        let grid = random_grid(&mut rng, 30, 30, 0.01);
        let origin = grid.origin();
        let start = WorldPoint::new(
            origin.x + rng.random_range(0.0..3.0),
            origin.y + rng.random_range(0.0..3.0),
        );
        let goal = WorldPoint::new(
            origin.x + rng.random_range(0.0..3.0),
            origin.y + rng.random_range(0.0..3.0),
        );

        let output = planner.plan(Some(&grid), start, goal);
        if output.status != PlanStatus::Ok || output.raw_path.is_empty() {
            continue;
        }
        planned += 1;

        assert_eq!(output.simplified_path.first(), output.raw_path.first());
        assert_eq!(output.simplified_path.last(), output.raw_path.last());
        assert!(output.simplified_path.len() <= output.raw_path.len());
        // Every kept waypoint comes from the raw path, in order
        let mut raw = output.raw_path.iter();
        for p in &output.simplified_path {
            assert!(raw.any(|r| r == p));
        }

        // Kept neighbours see each other unless the simplifier had to fall
        // back to the next raw waypoint
        let inflated = output.inflated.as_ref().unwrap();
        let simplifier = PathSimplifier::with_defaults();
        let index_of = |p: &WorldPoint| output.raw_path.iter().position(|r| r == p).unwrap();
        for pair in output.simplified_path.windows(2) {
            if index_of(&pair[1]) > index_of(&pair[0]) + 1 {
                assert!(simplifier.line_of_sight(inflated, pair[0], pair[1]));
            }
        }
    }
    assert!(planned > 0);
}

#[test]
fn test_enclosed_goal_unreachable() {
    let mut grid = super::free_grid(9);
    let goal = GridCoord::new(6, 6);
    for n in goal.neighbors_8() {
        grid.set_value(n, occupancy::OCCUPIED);
    }
    let planner = Planner::new(&PlannerConfig {
        inflation_radius: 0.0,
        ..Default::default()
    });
    let output = planner.plan(
        Some(&grid),
        super::cell_center(&grid, 1, 1),
        super::cell_center(&grid, 6, 6),
    );
    assert_eq!(output.status, PlanStatus::Unreachable);
    assert!(output.raw_path.is_empty());
    assert!(output.nodes_expanded > 0);
}
