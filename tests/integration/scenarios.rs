//! End-to-end planning scenarios on small grids.

use marga::config::PlannerConfig;
use marga::core::{GridCoord, WorldPoint};
use marga::error::PlanStatus;
use marga::grid::occupancy;
use marga::planning::{Planner, VisitPolicy};

use super::{cell_center, free_grid};

fn planner_without_inflation(policy: VisitPolicy) -> Planner {
    Planner::new(&PlannerConfig {
        inflation_radius: 0.0,
        visit_policy: policy,
        ..Default::default()
    })
}

#[test]
fn test_free_grid_diagonal() {
    let grid = free_grid(5);
    let output = Planner::with_defaults().plan(
        Some(&grid),
        cell_center(&grid, 0, 0),
        cell_center(&grid, 4, 4),
    );

    assert_eq!(output.status, PlanStatus::Ok);

    let cells: Vec<_> = output.cells.iter().map(|c| c.coord).collect();
    let diagonal: Vec<_> = (0..5).map(|i| GridCoord::new(i, i)).collect();
    assert_eq!(cells, diagonal);
    for (i, cell) in output.cells.iter().enumerate() {
        assert_eq!(cell.g, i as u32);
    }

    assert_eq!(output.raw_path.len(), 4);
    assert_eq!(output.raw_path.last(), Some(&WorldPoint::new(4.0, 4.0)));
    assert_eq!(
        output.simplified_path,
        vec![WorldPoint::new(1.0, 1.0), WorldPoint::new(4.0, 4.0)]
    );
}

#[test]
fn test_wall_with_single_gap() {
    let mut grid = free_grid(5);
    for x in 0..5 {
        if x != 2 {
            grid.set_value(GridCoord::new(x, 2), occupancy::OCCUPIED);
        }
    }

    for policy in [VisitPolicy::OnEnqueue, VisitPolicy::OnPop] {
        let output = planner_without_inflation(policy).plan(
            Some(&grid),
            cell_center(&grid, 0, 0),
            cell_center(&grid, 4, 4),
        );
        assert_eq!(output.status, PlanStatus::Ok, "{:?}", policy);
        assert!(output.cells.iter().any(|c| c.coord == GridCoord::new(2, 2)));
        assert!(output.cells.iter().all(|c| c.coord.y != 2 || c.coord.x == 2));
    }
}

#[test]
fn test_wall_with_gap_offset_from_diagonal() {
    let mut grid = free_grid(7);
    for x in 0..7 {
        if x != 5 {
            grid.set_value(GridCoord::new(x, 3), occupancy::OCCUPIED);
        }
    }
    let output = planner_without_inflation(VisitPolicy::OnEnqueue).plan(
        Some(&grid),
        cell_center(&grid, 0, 0),
        cell_center(&grid, 0, 6),
    );

    assert_eq!(output.status, PlanStatus::Ok);
    assert!(output.cells.iter().any(|c| c.coord == GridCoord::new(5, 3)));
    // Detour needs a bend, so at least one interior waypoint survives
    assert!(output.simplified_path.len() >= 3);
    assert!(output.simplified_path.len() < output.raw_path.len());
}

#[test]
fn test_goal_outside_grid() {
    let grid = free_grid(5);
    let output = Planner::with_defaults().plan(
        Some(&grid),
        cell_center(&grid, 0, 0),
        cell_center(&grid, 10, 10),
    );
    assert_eq!(output.status, PlanStatus::InvalidGoal);
    assert!(output.raw_path.is_empty());
    assert!(output.simplified_path.is_empty());
}

#[test]
fn test_no_map_supplied() {
    let output = Planner::with_defaults().plan(None, WorldPoint::ZERO, WorldPoint::new(4.0, 4.0));
    assert_eq!(output.status, PlanStatus::NoMap);
    assert!(output.raw_path.is_empty());
    assert!(output.simplified_path.is_empty());
}

#[test]
fn test_non_unit_resolution_and_origin() {
    let mut grid = marga::grid::GridModel::filled(
        40,
        20,
        0.05,
        WorldPoint::new(-1.0, -0.5),
        occupancy::FREE,
    )
    .unwrap();
    for y in 0..15 {
        grid.set_value(GridCoord::new(20, y), occupancy::OCCUPIED);
    }

    let planner = Planner::new(&PlannerConfig {
        inflation_radius: 0.1,
        ..Default::default()
    });
    let start = WorldPoint::new(-0.8, -0.4);
    let goal = WorldPoint::new(0.8, -0.4);
    let output = planner.plan(Some(&grid), start, goal);

    assert_eq!(output.status, PlanStatus::Ok);
    let inflated = output.inflated.as_ref().unwrap();
    let goal_corner = inflated.cell_to_world(inflated.world_to_cell(goal));
    assert_eq!(output.raw_path.last(), Some(&goal_corner));
    assert_eq!(output.simplified_path.last(), Some(&goal_corner));
    // Route has to climb over the wall end at y >= 15 + inflation
    assert!(output.cells.iter().any(|c| c.coord.y >= 15));
}
