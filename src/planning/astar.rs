//! A* grid search over the inflated occupancy grid.
//!
//! Every move (orthogonal or diagonal) costs 1 and the heuristic is the
//! Euclidean distance in cells. With unit diagonals the heuristic can
//! overestimate, so results are not guaranteed to be shortest.
//!
//! Nodes are stored in an arena for the duration of one call; each node
//! holds the arena handle of its predecessor, so the predecessor links form
//! a tree rooted at the start node.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::core::GridCoord;
use crate::error::PlanError;
use crate::grid::{GridModel, occupancy};

/// When a cell is committed to during the search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitPolicy {
    /// Mark a cell visited the moment it is first enqueued. A cell keeps the
    /// first `g` it was discovered with, even if a cheaper route shows up later.
    #[default]
    OnEnqueue,
    /// Mark a cell closed when it is popped and let cheaper routes replace
    /// queued entries (textbook A*).
    OnPop,
}

/// A* search configuration.
#[derive(Clone, Debug)]
pub struct AStarConfig {
    /// Neighbors at or above this value are not entered
    pub traversal_threshold: i8,
    /// Visited-set policy
    pub visit_policy: VisitPolicy,
}

impl Default for AStarConfig {
    fn default() -> Self {
        Self {
            traversal_threshold: occupancy::NEAR_FREE_THRESHOLD,
            visit_policy: VisitPolicy::OnEnqueue,
        }
    }
}

/// Arena node.
#[derive(Clone, Debug)]
struct SearchNode {
    coord: GridCoord,
    g: u32,
    h: f32,
    parent: Option<usize>,
}

impl SearchNode {
    #[inline]
    fn f(&self) -> f32 {
        self.g as f32 + self.h
    }
}

/// Frontier entry pointing into the arena.
#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    f: f32,
    seq: u64,
    handle: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (lower f = higher priority),
        // earlier insertion first among equal f
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One cell of a found path with its cost from the start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PathCell {
    pub coord: GridCoord,
    pub g: u32,
}

/// Successful search result: cells from start to goal, both included.
#[derive(Clone, Debug)]
pub struct SearchPath {
    pub cells: Vec<PathCell>,
    pub nodes_expanded: usize,
}

impl SearchPath {
    /// Cost of the whole path (steps taken).
    pub fn cost(&self) -> u32 {
        self.cells.last().map_or(0, |c| c.g)
    }

    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.cells.iter().map(|c| c.coord)
    }
}

/// Mutable state for a single `find_path` call; dropped as a whole on return.
struct Search {
    goal: GridCoord,
    arena: Vec<SearchNode>,
    frontier: BinaryHeap<FrontierEntry>,
    seq: u64,
}

impl Search {
    fn new(goal: GridCoord) -> Self {
        Self {
            goal,
            arena: Vec::new(),
            frontier: BinaryHeap::new(),
            seq: 0,
        }
    }

    fn push(&mut self, coord: GridCoord, g: u32, parent: Option<usize>) {
        let node = SearchNode {
            coord,
            g,
            h: coord.euclidean_distance(&self.goal),
            parent,
        };
        let entry = FrontierEntry {
            f: node.f(),
            seq: self.seq,
            handle: self.arena.len(),
        };
        self.seq += 1;
        self.arena.push(node);
        self.frontier.push(entry);
    }

    fn reconstruct(&self, goal_handle: usize, nodes_expanded: usize) -> SearchPath {
        let mut cells = Vec::new();
        let mut current = Some(goal_handle);

        while let Some(handle) = current {
            let node = &self.arena[handle];
            cells.push(PathCell {
                coord: node.coord,
                g: node.g,
            });
            current = node.parent;
        }

        cells.reverse();
        SearchPath {
            cells,
            nodes_expanded,
        }
    }
}

/// A* planner over a [`GridModel`].
#[derive(Clone, Debug, Default)]
pub struct AStarPlanner {
    config: AStarConfig,
}

impl AStarPlanner {
    pub fn new(config: AStarConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(AStarConfig::default())
    }

    pub fn config(&self) -> &AStarConfig {
        &self.config
    }

    /// Find a path from `start` to `goal`.
    ///
    /// The goal must be inside the grid. The start is not checked: an
    /// out-of-bounds start is expanded like any node, and since neighbors are
    /// bounds-checked the search simply finds nothing to enter.
    pub fn find_path(
        &self,
        grid: &GridModel,
        start: GridCoord,
        goal: GridCoord,
    ) -> Result<SearchPath, PlanError> {
        tracing::trace!(
            "[AStar] find_path: start=({},{}) goal=({},{})",
            start.x,
            start.y,
            goal.x,
            goal.y
        );

        if !grid.in_bounds(goal) {
            tracing::debug!("[AStar] FAILED: goal ({},{}) out of bounds", goal.x, goal.y);
            return Err(PlanError::InvalidGoal {
                x: goal.x,
                y: goal.y,
                width: grid.width(),
                height: grid.height(),
            });
        }

        let result = match self.config.visit_policy {
            VisitPolicy::OnEnqueue => self.search_mark_on_enqueue(grid, start, goal),
            VisitPolicy::OnPop => self.search_mark_on_pop(grid, start, goal),
        };

        match &result {
            Ok(path) => tracing::debug!(
                "[AStar] found {} cells, cost {}, {} nodes expanded",
                path.cells.len(),
                path.cost(),
                path.nodes_expanded
            ),
            Err(e) => tracing::debug!("[AStar] FAILED: {}", e),
        }
        result
    }

    #[inline]
    fn is_enterable(&self, grid: &GridModel, index: usize) -> bool {
        grid.cells()[index] < self.config.traversal_threshold
    }

    fn search_mark_on_enqueue(
        &self,
        grid: &GridModel,
        start: GridCoord,
        goal: GridCoord,
    ) -> Result<SearchPath, PlanError> {
        let mut search = Search::new(goal);
        let mut visited = vec![false; grid.cells().len()];

        if let Some(i) = grid.index(start) {
            visited[i] = true;
        }
        search.push(start, 0, None);

        let mut nodes_expanded = 0;

        while let Some(entry) = search.frontier.pop() {
            nodes_expanded += 1;
            let (coord, g) = {
                let node = &search.arena[entry.handle];
                (node.coord, node.g)
            };

            if coord == goal {
                return Ok(search.reconstruct(entry.handle, nodes_expanded));
            }

            for neighbor in coord.neighbors_8() {
                let Some(idx) = grid.index(neighbor) else {
                    continue;
                };
                if visited[idx] || !self.is_enterable(grid, idx) {
                    continue;
                }
                visited[idx] = true;
                search.push(neighbor, g + 1, Some(entry.handle));
            }
        }

        Err(PlanError::Unreachable { nodes_expanded })
    }

    fn search_mark_on_pop(
        &self,
        grid: &GridModel,
        start: GridCoord,
        goal: GridCoord,
    ) -> Result<SearchPath, PlanError> {
        let mut search = Search::new(goal);
        let mut closed = vec![false; grid.cells().len()];
        let mut best_g = vec![u32::MAX; grid.cells().len()];

        if let Some(i) = grid.index(start) {
            best_g[i] = 0;
        }
        search.push(start, 0, None);

        let mut nodes_expanded = 0;

        while let Some(entry) = search.frontier.pop() {
            let (coord, g) = {
                let node = &search.arena[entry.handle];
                (node.coord, node.g)
            };

            // Skip stale entries superseded by a cheaper one
            if let Some(i) = grid.index(coord) {
                if closed[i] {
                    continue;
                }
                closed[i] = true;
            }
            nodes_expanded += 1;

            if coord == goal {
                return Ok(search.reconstruct(entry.handle, nodes_expanded));
            }

            for neighbor in coord.neighbors_8() {
                let Some(idx) = grid.index(neighbor) else {
                    continue;
                };
                if closed[idx] || !self.is_enterable(grid, idx) {
                    continue;
                }
                let tentative = g + 1;
                if tentative < best_g[idx] {
                    best_g[idx] = tentative;
                    search.push(neighbor, tentative, Some(entry.handle));
                }
            }
        }

        Err(PlanError::Unreachable { nodes_expanded })
    }
}
