//! Path-finding trait and default A* implementation.
//!
//! # Pluggability
//!
//! `fleet-agent` plans routes through the [`PathFinder`] trait, so a
//! different search (plain BFS, time-expanded A*, a learned policy) can be
//! swapped in without touching the agent state machine.
//!
//! # Exclusions
//!
//! A neighbour is never expanded when it is
//!
//! - blocked or outside the map,
//! - held for movement by a different agent (via [`Occupancy`]), or
//! - under an in-progress handling operation (`blocked_until > now`).
//!
//! # Cost units
//!
//! One step costs [`STEP_COST`] (10).  Congestion adds `weight × visits` on
//! the entered cell.  The heuristic is Manhattan distance × `STEP_COST`, which
//! never overestimates, so the first time the goal is popped its path is
//! optimal.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use fleet_core::{AgentId, Cell, Tick};

use crate::error::{GridError, GridResult};
use crate::path::Path;
use crate::world::GridWorld;

/// Cost of moving one cell.
pub const STEP_COST: u64 = 10;

// ── Occupancy ─────────────────────────────────────────────────────────────────

/// Read access to current movement reservations.
pub trait Occupancy {
    /// `true` if `cell` is reserved by an agent other than `agent`.
    fn is_held_by_other(&self, cell: Cell, agent: AgentId) -> bool;
}

/// Occupancy that never reports a conflict.
pub struct NoOccupancy;

impl Occupancy for NoOccupancy {
    fn is_held_by_other(&self, _cell: Cell, _agent: AgentId) -> bool {
        false
    }
}

// ── PathQuery ─────────────────────────────────────────────────────────────────

/// Everything a search needs besides the map.
#[derive(Clone, Copy)]
pub struct PathQuery<'a> {
    pub start: Cell,
    pub goal: Cell,
    pub agent: AgentId,
    pub now: Tick,
    /// Cells under handling, with the tick at which they free up.
    pub blocked_until: Option<&'a BTreeMap<Cell, Tick>>,
    /// Recent visit counts per cell.
    pub congestion: Option<&'a BTreeMap<Cell, u32>>,
    pub congestion_weight: u32,
    pub occupancy: &'a dyn Occupancy,
}

impl<'a> PathQuery<'a> {
    pub fn new(start: Cell, goal: Cell, agent: AgentId) -> Self {
        Self {
            start,
            goal,
            agent,
            now: Tick::ZERO,
            blocked_until: None,
            congestion: None,
            congestion_weight: 0,
            occupancy: &NoOccupancy,
        }
    }

    pub fn at(mut self, now: Tick) -> Self {
        self.now = now;
        self
    }

    pub fn with_blocks(mut self, blocked_until: &'a BTreeMap<Cell, Tick>) -> Self {
        self.blocked_until = Some(blocked_until);
        self
    }

    pub fn with_congestion(mut self, counts: &'a BTreeMap<Cell, u32>, weight: u32) -> Self {
        self.congestion = Some(counts);
        self.congestion_weight = weight;
        self
    }

    pub fn with_occupancy(mut self, occupancy: &'a dyn Occupancy) -> Self {
        self.occupancy = occupancy;
        self
    }

    /// `true` if the search must not enter `cell`.
    pub fn is_excluded(&self, grid: &GridWorld, cell: Cell) -> bool {
        if !grid.is_traversable(cell) {
            return true;
        }
        if self.occupancy.is_held_by_other(cell, self.agent) {
            return true;
        }
        self.blocked_until
            .and_then(|m| m.get(&cell))
            .is_some_and(|&until| until > self.now)
    }

    /// Cost of stepping into `cell`.
    #[inline]
    fn step_cost(&self, cell: Cell) -> u64 {
        let visits = self
            .congestion
            .and_then(|m| m.get(&cell))
            .copied()
            .unwrap_or(0);
        STEP_COST + self.congestion_weight as u64 * visits as u64
    }
}

// ── PathFinder trait ──────────────────────────────────────────────────────────

/// Pluggable route planner.
///
/// Implementations must be `Send + Sync` so a finder can be shared by engines
/// running on different threads during batch analysis.
pub trait PathFinder: Send + Sync {
    /// Shortest admissible path from `query.start` to `query.goal`, both
    /// inclusive.  `start == goal` yields a one-cell path.  Never returns a
    /// partial path: if the goal is unreachable the result is `NoPath`.
    fn find(&self, grid: &GridWorld, query: &PathQuery<'_>) -> GridResult<Path>;
}

// ── AStarPathFinder ───────────────────────────────────────────────────────────

/// Best-first search with a Manhattan heuristic over four-connected cells.
///
/// Heap entries carry an insertion sequence number after the f-score, so
/// equal-priority cells pop in insertion order and neighbour visit order
/// (up, down, left, right) decides between equal-cost routes.
#[derive(Clone, Copy, Debug, Default)]
pub struct AStarPathFinder;

impl PathFinder for AStarPathFinder {
    fn find(&self, grid: &GridWorld, query: &PathQuery<'_>) -> GridResult<Path> {
        astar(grid, query)
    }
}

fn astar(grid: &GridWorld, q: &PathQuery<'_>) -> GridResult<Path> {
    grid.check_traversable(q.start)?;
    grid.check_traversable(q.goal)?;
    if q.start == q.goal {
        return Ok(Path::stay(q.start));
    }
    let (Some(start), Some(goal)) = (grid.index_of(q.start), grid.index_of(q.goal)) else {
        return Err(GridError::NoPath { from: q.start, to: q.goal });
    };

    let n = grid.len();
    let h = |cell: Cell| cell.manhattan(q.goal) as u64 * STEP_COST;

    // g[v] = best known cost to v; prev[v] = predecessor index (usize::MAX = none).
    let mut g = vec![u64::MAX; n];
    let mut prev = vec![usize::MAX; n];
    let mut closed = vec![false; n];

    let mut seq: u64 = 0;
    let mut heap: BinaryHeap<Reverse<(u64, u64, usize)>> = BinaryHeap::new();
    g[start] = 0;
    heap.push(Reverse((h(q.start), seq, start)));

    while let Some(Reverse((_, _, i))) = heap.pop() {
        if closed[i] {
            continue; // stale entry
        }
        closed[i] = true;
        if i == goal {
            return Ok(reconstruct(grid, &prev, start, goal));
        }

        let cell = grid.cell_at(i);
        for nb in cell.neighbors() {
            let Some(j) = grid.index_of(nb) else { continue };
            if closed[j] || q.is_excluded(grid, nb) {
                continue;
            }
            let cost = g[i] + q.step_cost(nb);
            if cost < g[j] {
                g[j] = cost;
                prev[j] = i;
                seq += 1;
                heap.push(Reverse((cost + h(nb), seq, j)));
            }
        }
    }

    Err(GridError::NoPath { from: q.start, to: q.goal })
}

fn reconstruct(grid: &GridWorld, prev: &[usize], start: usize, goal: usize) -> Path {
    let mut cells = Vec::new();
    let mut cur = goal;
    while cur != start {
        cells.push(grid.cell_at(cur));
        cur = prev[cur];
    }
    cells.push(grid.cell_at(start));
    cells.reverse();
    Path::new(cells)
}
