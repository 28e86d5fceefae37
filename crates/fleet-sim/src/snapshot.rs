//! Consistent, self-contained engine state captured at a tick boundary.

use std::collections::BTreeMap;
use std::sync::Arc;

use fleet_agent::Agent;
use fleet_core::{AgentRng, Cell, FleetConfig, SimClock, Tick};
use fleet_dispatch::NearestDispatcher;
use fleet_grid::{AStarPathFinder, GridWorld};
use fleet_reserve::ReservationLedger;
use fleet_stats::{Report, StatsCollector};

use crate::{Engine, LiveFrame, RecoveryCounters};

/// Everything needed to rebuild an [`Engine`]: clock, every agent (position,
/// cargo, path, phase, target, timers), ledger, statistics, handling blocks,
/// congestion counts and each agent's RNG state.
///
/// The grid is shared, not copied.
#[derive(Clone, Debug)]
pub struct EngineSnapshot {
    pub config:        FleetConfig,
    pub clock:         SimClock,
    pub grid:          Arc<GridWorld>,
    pub ledger:        ReservationLedger,
    pub agents:        Vec<Agent>,
    pub rngs:          Vec<AgentRng>,
    pub stats:         StatsCollector,
    pub blocked_until: BTreeMap<Cell, Tick>,
    pub congestion:    BTreeMap<Cell, u32>,
    pub recovery:      RecoveryCounters,
    pub collisions:    u64,
}

impl EngineSnapshot {
    #[inline]
    pub fn tick(&self) -> Tick {
        self.clock.current_tick
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.stats.delivered()
    }

    /// The frame a paused run keeps publishing.
    pub fn live_frame(&self) -> LiveFrame {
        LiveFrame::capture(&self.clock, &self.agents, self.stats.delivered())
    }

    pub fn report(&self) -> Report {
        self.stats.report(self.clock.elapsed_ticks(), self.clock.tick_duration_secs)
    }

    /// Rebuild an engine with the default path finder and dispatcher.
    pub fn into_engine(self) -> Engine {
        Engine::restore(self, AStarPathFinder, NearestDispatcher)
    }
}
