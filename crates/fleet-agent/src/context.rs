//! `StepContext`: the slice of engine state one agent step may touch.

use std::collections::BTreeMap;

use fleet_core::{AgentSettings, Cell, Tick};
use fleet_dispatch::Dispatcher;
use fleet_grid::{GridWorld, PathFinder};
use fleet_reserve::ReservationLedger;

/// Lent by the engine to each agent in turn, in ascending id order.
///
/// Mutable members (`ledger`, `blocked_until`, `congestion`) are written by
/// exactly one agent at a time, so later agents in the same tick observe the
/// claims of earlier ones.
pub struct StepContext<'a> {
    pub now:           Tick,
    pub grid:          &'a GridWorld,
    pub ledger:        &'a mut ReservationLedger,
    pub finder:        &'a dyn PathFinder,
    pub dispatcher:    &'a dyn Dispatcher,
    /// Cells under a handling operation and the tick they free up.
    pub blocked_until: &'a mut BTreeMap<Cell, Tick>,
    /// Cell entries in the current congestion window.
    pub congestion:    &'a mut BTreeMap<Cell, u32>,
    pub settings:      &'a AgentSettings,
    /// Pickups before this tick are excluded from cycle-time statistics.
    pub warmup_ticks:  u64,
}
