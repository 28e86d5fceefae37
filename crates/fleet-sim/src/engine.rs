//! The `Engine` struct and its tick loop.

use std::collections::BTreeMap;
use std::sync::Arc;

use fleet_agent::{Agent, AgentEvent, StepContext};
use fleet_core::{AgentId, AgentRng, Cell, FleetConfig, SimClock, Tick};
use fleet_dispatch::{Dispatcher, NearestDispatcher};
use fleet_grid::{AStarPathFinder, GridWorld, PathFinder};
use fleet_reserve::ReservationLedger;
use fleet_stats::{Report, StatsCollector};
use tracing::{debug, info, trace, warn};

use crate::{EngineSnapshot, LiveFrame, SimObserver};

/// Tallies of per-tick recoverable conditions.  None of them ends a run;
/// a steadily climbing count points at systemic deadlock.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RecoveryCounters {
    pub path_not_found:       u64,
    pub reservation_timeouts: u64,
    pub stuck_resets:         u64,
    pub retargets:            u64,
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// One simulation run: the grid, the ledger, every agent and the clock.
///
/// Each tick steps every agent once in ascending `AgentId` order, so later
/// agents see the reservations of earlier ones and conflicts resolve without
/// any real parallelism.  Engines share nothing mutable; a batch analysis
/// simply builds several.
///
/// Create via [`EngineBuilder`][crate::EngineBuilder].
pub struct Engine<P: PathFinder = AStarPathFinder, D: Dispatcher = NearestDispatcher> {
    pub config: FleetConfig,

    /// Virtual time, horizon, speed factor and pause flag.
    pub clock: SimClock,

    /// Read-only after construction; shared with snapshots.
    pub grid: Arc<GridWorld>,

    pub ledger: ReservationLedger,

    /// Indexed by `AgentId`.
    pub agents: Vec<Agent>,

    /// Per-agent RNGs, kept apart from `agents` for the split borrow in `tick`.
    pub rngs: Vec<AgentRng>,

    pub stats: StatsCollector,

    /// Cells under a handling operation and the tick they free up.
    pub blocked_until: BTreeMap<Cell, Tick>,

    /// Cell entries in the current congestion window.
    pub congestion: BTreeMap<Cell, u32>,

    pub recovery: RecoveryCounters,

    /// Agent pairs found sharing a rounded cell, summed over all ticks.
    pub collisions: u64,

    pub finder: P,

    pub dispatcher: D,
}

impl<P: PathFinder, D: Dispatcher> Engine<P, D> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until the horizon as it stands when called.
    ///
    /// With auto-extension on the clock keeps pushing its own horizon out,
    /// so the target is fixed up front; interactive drivers use
    /// [`run_ticks`][Self::run_ticks] instead.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> Report {
        let end = self.clock.end_tick;
        while self.clock.current_tick < end {
            self.tick_observed(observer);
        }
        let report = self.report();
        observer.on_sim_end(self.clock.current_tick, &report);
        info!(
            tick = %self.clock.current_tick,
            delivered = report.delivered,
            "run finished"
        );
        report
    }

    /// Run exactly `n` ticks from the current position, ignoring the horizon.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.tick_observed(observer);
        }
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) {
        let now = self.clock.current_tick;
        self.begin_tick(now);

        for i in 0..self.agents.len() {
            let id = self.agents[i].id;
            let outcome = {
                let mut ctx = StepContext {
                    now,
                    grid:          &self.grid,
                    ledger:        &mut self.ledger,
                    finder:        &self.finder,
                    dispatcher:    &self.dispatcher,
                    blocked_until: &mut self.blocked_until,
                    congestion:    &mut self.congestion,
                    settings:      &self.config.agent,
                    warmup_ticks:  self.config.sim.warmup_ticks,
                };
                self.agents[i].step(&mut ctx, &mut self.rngs[i])
            };
            for event in outcome.events {
                self.apply_event(id, now, event);
            }
            self.stats.record_activity(id, outcome.busy);
        }

        self.count_collisions(now);

        self.clock.advance();
        self.stats.sample(self.clock.current_tick);
        if let Some(end) = self.clock.extend_if_needed() {
            info!(tick = %self.clock.current_tick, %end, "horizon extended");
        }
    }

    /// Live view of every agent at the current time.
    pub fn live_frame(&self) -> LiveFrame {
        LiveFrame::capture(&self.clock, &self.agents, self.stats.delivered())
    }

    /// Aggregate report as of the current tick.
    pub fn report(&self) -> Report {
        self.stats.report(self.clock.elapsed_ticks(), self.clock.tick_duration_secs)
    }

    /// Capture the full engine state at this tick boundary.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            config:        self.config.clone(),
            clock:         self.clock.clone(),
            grid:          Arc::clone(&self.grid),
            ledger:        self.ledger.clone(),
            agents:        self.agents.clone(),
            rngs:          self.rngs.clone(),
            stats:         self.stats.clone(),
            blocked_until: self.blocked_until.clone(),
            congestion:    self.congestion.clone(),
            recovery:      self.recovery,
            collisions:    self.collisions,
        }
    }

    /// Rebuild an engine from a snapshot.  Virtual time, every agent and the
    /// RNG streams carry over, so the restored engine evolves exactly as an
    /// uninterrupted one would have.
    pub fn restore(snapshot: EngineSnapshot, finder: P, dispatcher: D) -> Self {
        Self {
            config:        snapshot.config,
            clock:         snapshot.clock,
            grid:          snapshot.grid,
            ledger:        snapshot.ledger,
            agents:        snapshot.agents,
            rngs:          snapshot.rngs,
            stats:         snapshot.stats,
            blocked_until: snapshot.blocked_until,
            congestion:    snapshot.congestion,
            recovery:      snapshot.recovery,
            collisions:    snapshot.collisions,
            finder,
            dispatcher,
        }
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.stats.delivered()
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn tick_observed<O: SimObserver>(&mut self, observer: &mut O) {
        let end = self.clock.end_tick;
        self.tick();
        if self.clock.end_tick != end {
            observer.on_horizon_extended(self.clock.end_tick);
        }
        observer.on_tick_end(&self.live_frame());
    }

    /// Expire stale handling blocks and roll the congestion window.
    fn begin_tick(&mut self, now: Tick) {
        self.blocked_until.retain(|_, until| *until > now);

        let window = self.config.agent.congestion_window_ticks;
        if window > 0 && now.0 > 0 && now.0 % window == 0 {
            self.congestion.clear();
        }
    }

    fn apply_event(&mut self, agent: AgentId, now: Tick, event: AgentEvent) {
        match event {
            AgentEvent::EnteredCell { cell, .. } => {
                self.stats.record_position(agent, now, cell);
            }
            AgentEvent::HandlingStarted { op, cell } => {
                trace!(%agent, %cell, ?op, "handling started");
            }
            AgentEvent::PickedUp { cell } => {
                self.stats.record_pickup(agent);
                debug!(%agent, %cell, tick = %now, "picked up");
            }
            AgentEvent::Delivered { cell, cycle, wait, travel } => {
                self.stats.record_delivery(agent, cycle, wait, travel);
                debug!(%agent, %cell, tick = %now, ?cycle, "delivered");
            }
            AgentEvent::Retargeted { lost } => {
                self.recovery.retargets += 1;
                debug!(%agent, %lost, "destination taken over, retargeting");
            }
            AgentEvent::PathNotFound { target } => {
                self.recovery.path_not_found += 1;
                debug!(%agent, %target, "no path, will retry");
            }
            AgentEvent::ReservationTimeout { blocked } => {
                self.recovery.reservation_timeouts += 1;
                warn!(%agent, %blocked, tick = %now, "reservation timeout, rerouting");
            }
            AgentEvent::StuckReset { cell } => {
                self.recovery.stuck_resets += 1;
                warn!(%agent, %cell, tick = %now, "stuck, resetting");
            }
        }
    }

    fn count_collisions(&mut self, now: Tick) {
        let mut cells: Vec<Cell> = self.agents.iter().map(Agent::cell).collect();
        cells.sort_unstable();
        let shared = cells.windows(2).filter(|w| w[0] == w[1]).count() as u64;
        if shared > 0 {
            self.collisions += shared;
            warn!(tick = %now, shared, "agents share a cell");
        }
    }
}
