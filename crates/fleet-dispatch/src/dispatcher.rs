//! The `Dispatcher` trait and the default nearest-unclaimed policy.

use fleet_core::Cell;
use fleet_grid::Occupancy;
use fleet_reserve::ReservationLedger;
use tracing::trace;

use crate::DispatchRequest;

/// Pluggable destination policy.
///
/// # Contract
///
/// `choose` only reads the ledger.  A returned cell must be one the
/// requesting agent could claim right now; the agent claims it once it has
/// a route there, and otherwise asks again with the cell excluded.  `None`
/// means nothing is on offer and the caller retries after a short delay.
///
/// Implementations must be `Send + Sync` so one dispatcher can serve engines
/// on several threads during batch analysis.
pub trait Dispatcher: Send + Sync {
    fn choose(&self, req: &DispatchRequest<'_>, ledger: &ReservationLedger) -> Option<Cell>;
}

// ── NearestDispatcher ─────────────────────────────────────────────────────────

/// Sends an empty AGV to the nearest pickup and a loaded one to the nearest
/// dropoff it can rightfully claim.
///
/// A cell is a candidate if it is not excluded by the request, the agent
/// could win its claim (unclaimed, its own, or held by someone strictly
/// farther / equally far with a higher id) and no other AGV is physically
/// standing on it.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestDispatcher;

impl Dispatcher for NearestDispatcher {
    fn choose(&self, req: &DispatchRequest<'_>, ledger: &ReservationLedger) -> Option<Cell> {
        let candidate = req.grid.nearest_where(req.zone(), req.from, |cell| {
            !req.excludes(cell)
                && ledger.can_claim(cell, req.agent, req.from.manhattan(cell))
                && !ledger.is_held_by_other(cell, req.agent)
        });
        if candidate.is_none() {
            trace!(agent = %req.agent, zone = ?req.zone(), excluded = req.exclude.len(), "nothing to dispatch");
        }
        candidate
    }
}
