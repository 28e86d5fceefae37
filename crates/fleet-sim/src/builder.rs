//! Fluent builder for constructing an [`Engine`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use fleet_agent::Agent;
use fleet_core::{AgentId, AgentRng, Cell, CellKind, FleetConfig, SimClock, Tick};
use fleet_dispatch::{Dispatcher, NearestDispatcher};
use fleet_grid::{layouts, AStarPathFinder, GridWorld, PathFinder};
use fleet_reserve::ReservationLedger;
use fleet_stats::StatsCollector;
use tracing::info;

use crate::{Engine, RecoveryCounters, SimError, SimResult};

/// Fluent builder for [`Engine<P, D>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                                      |
/// |-------------------------|----------------------------------------------|
/// | `.grid(g)`              | `config.sim.map`, else `config.sim.layout`   |
/// | `.agent_count(n)`       | length of `.starts`, else 1                  |
/// | `.starts(v)`            | bottom rows upward, even columns first       |
/// | `.seed(s)`              | `config.sim.seed`                            |
/// | `.duration(ticks)`      | `config.sim.initial_duration_ticks`          |
/// | `.speed(factor)`        | `config.control.speed_factor`                |
/// | `.interactive(true)`    | off: the run stops at its horizon            |
/// | `.policies(p, d)`       | `AStarPathFinder`, `NearestDispatcher`       |
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = EngineBuilder::new(FleetConfig::default())
///     .agent_count(4)
///     .build()?;
/// let report = engine.run(&mut NoopObserver);
/// ```
pub struct EngineBuilder<P: PathFinder = AStarPathFinder, D: Dispatcher = NearestDispatcher> {
    config:      FleetConfig,
    grid:        Option<GridWorld>,
    agent_count: Option<usize>,
    starts:      Option<Vec<Cell>>,
    interactive: bool,
    finder:      P,
    dispatcher:  D,
}

impl EngineBuilder {
    pub fn new(config: FleetConfig) -> Self {
        Self {
            config,
            grid:        None,
            agent_count: None,
            starts:      None,
            interactive: false,
            finder:      AStarPathFinder,
            dispatcher:  NearestDispatcher,
        }
    }
}

impl<P: PathFinder, D: Dispatcher> EngineBuilder<P, D> {
    /// Use this map instead of the configured one.
    pub fn grid(mut self, grid: GridWorld) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn agent_count(mut self, n: usize) -> Self {
        self.agent_count = Some(n);
        self
    }

    /// Explicit start cells, one per agent in id order.
    pub fn starts(mut self, starts: Vec<Cell>) -> Self {
        self.starts = Some(starts);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.sim.seed = seed;
        self
    }

    pub fn duration(mut self, ticks: u64) -> Self {
        self.config.sim.initial_duration_ticks = ticks;
        self
    }

    pub fn speed(mut self, factor: f64) -> Self {
        self.config.control.speed_factor = factor;
        self
    }

    /// Interactive runs auto-extend their horizon instead of ending.
    pub fn interactive(mut self, on: bool) -> Self {
        self.interactive = on;
        self
    }

    /// Swap in a different path finder and dispatcher.
    pub fn policies<P2: PathFinder, D2: Dispatcher>(
        self,
        finder: P2,
        dispatcher: D2,
    ) -> EngineBuilder<P2, D2> {
        EngineBuilder {
            config:      self.config,
            grid:        self.grid,
            agent_count: self.agent_count,
            starts:      self.starts,
            interactive: self.interactive,
            finder,
            dispatcher,
        }
    }

    /// Validate inputs, place agents and return a ready-to-run engine.
    pub fn build(self) -> SimResult<Engine<P, D>> {
        let speed = self.config.control.speed_factor;
        if !(speed.is_finite() && speed > 0.0) {
            return Err(SimError::InvalidSpeed(speed));
        }
        self.config.validate()?;

        let grid = match self.grid {
            Some(g) => g,
            None => layouts::from_settings(&self.config.sim)?,
        };
        if grid.pickups().is_empty() {
            return Err(SimError::MissingZone(CellKind::Pickup));
        }
        if grid.dropoffs().is_empty() {
            return Err(SimError::MissingZone(CellKind::Dropoff));
        }

        let agent_count = self
            .agent_count
            .or(self.starts.as_ref().map(Vec::len))
            .unwrap_or(1);
        if agent_count == 0 {
            return Err(SimError::NoAgents);
        }

        let starts = match self.starts {
            Some(s) => check_starts(&grid, s, agent_count)?,
            None => {
                let s = default_starts(&grid, agent_count);
                if s.len() < agent_count {
                    return Err(SimError::NotEnoughStarts {
                        requested: agent_count,
                        available: s.len(),
                    });
                }
                s
            }
        };

        // ── Place agents, each holding its start cell ─────────────────────
        let seed = self.config.sim.seed;
        let mut ledger = ReservationLedger::new();
        let mut stats = StatsCollector::new(
            agent_count,
            self.config.sim.report_interval_ticks,
            self.config.agent.trace_capacity,
        );
        let mut agents = Vec::with_capacity(agent_count);
        let mut rngs = Vec::with_capacity(agent_count);
        for (i, &cell) in starts.iter().enumerate() {
            let id = AgentId(i as u32);
            ledger.try_reserve(cell, id);
            stats.record_position(id, Tick::ZERO, cell);
            agents.push(Agent::new(id, cell));
            rngs.push(AgentRng::new(seed, id));
        }

        let mut clock = SimClock::new(
            self.config.sim.tick_duration_secs,
            self.config.sim.initial_duration_ticks,
            speed,
        );
        if self.interactive {
            clock = clock.with_auto_extend(self.config.sim.extension_ticks);
        }

        info!(
            agents = agent_count,
            rows = grid.rows(),
            cols = grid.cols(),
            seed,
            horizon = %clock.end_tick,
            "engine built"
        );

        Ok(Engine {
            config: self.config,
            clock,
            grid: Arc::new(grid),
            ledger,
            agents,
            rngs,
            stats,
            blocked_until: BTreeMap::new(),
            congestion: BTreeMap::new(),
            recovery: RecoveryCounters::default(),
            collisions: 0,
            finder: self.finder,
            dispatcher: self.dispatcher,
        })
    }
}

/// Staging cells for `n` agents: free (non-zone) cells from the bottom row
/// upward, even columns before odd ones so neighbours start a cell apart.
pub fn default_starts(grid: &GridWorld, n: usize) -> Vec<Cell> {
    let mut out = Vec::with_capacity(n);
    for row in (0..grid.rows()).rev() {
        let cols = (0..grid.cols()).step_by(2).chain((1..grid.cols()).step_by(2));
        for col in cols {
            if out.len() == n {
                return out;
            }
            let cell = Cell::new(row, col);
            if grid.kind_of(cell) == Some(CellKind::Free) {
                out.push(cell);
            }
        }
    }
    out
}

fn check_starts(grid: &GridWorld, starts: Vec<Cell>, agent_count: usize) -> SimResult<Vec<Cell>> {
    if starts.len() != agent_count {
        return Err(SimError::StartCountMismatch { expected: agent_count, got: starts.len() });
    }
    let mut seen = BTreeSet::new();
    for &cell in &starts {
        if !grid.is_traversable(cell) {
            return Err(SimError::InvalidStart(cell));
        }
        if !seen.insert(cell) {
            return Err(SimError::DuplicateStart(cell));
        }
    }
    Ok(starts)
}
