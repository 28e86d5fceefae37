//! The reservation ledger.
//!
//! # Movement reservations
//!
//! `cell → agent`.  An AGV always holds the cell it stands on, and also the
//! next cell of its path while it is interpolating into it.  The departure
//! cell is released when the hop completes.  Because every occupied cell is
//! held, no two AGVs can share a cell and a same-tick swap cannot start:
//! each party's target is already held by the other.
//!
//! # Destination reservations
//!
//! `pickup/dropoff cell → (agent, distance)`.  A claim is taken over only by
//! an agent that is strictly closer; equal distances go to the lower id.
//! Holders refresh their distance every tick so an approaching holder
//! becomes harder to displace.  An agent holds at most one destination at a
//! time: a successful claim drops any other claim of the same agent.
//!
//! # Yield requests
//!
//! An agent that fails to reserve its next cell asks the holder to yield.
//! The request is only a flag; the holder reads and clears it on its own
//! step and steps aside if it is idle.
//!
//! Both maps are `BTreeMap`s so iteration (and therefore snapshots and debug
//! output) is ordered deterministically.

use std::collections::{BTreeMap, BTreeSet};

use fleet_core::{AgentId, Cell};
use fleet_grid::Occupancy;
use tracing::trace;

// ── Claim types ───────────────────────────────────────────────────────────────

/// A destination claim and the claimant's Manhattan distance when last
/// refreshed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DestinationClaim {
    pub agent: AgentId,
    pub distance: u32,
}

impl DestinationClaim {
    /// `true` if a claimant at `distance` with id `agent` outranks `self`.
    #[inline]
    pub fn is_beaten_by(&self, agent: AgentId, distance: u32) -> bool {
        distance < self.distance || (distance == self.distance && agent < self.agent)
    }
}

/// Result of [`ReservationLedger::claim_destination`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The cell was unclaimed.
    Granted,
    /// The caller already held it; distance updated.
    Refreshed,
    /// The caller displaced `previous`.
    TookOver { previous: AgentId },
    /// `holder` keeps the claim.
    Rejected { holder: AgentId },
}

impl ClaimOutcome {
    #[inline]
    pub fn is_held(self) -> bool {
        !matches!(self, ClaimOutcome::Rejected { .. })
    }
}

// ── ReservationLedger ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReservationLedger {
    movement: BTreeMap<Cell, AgentId>,
    destinations: BTreeMap<Cell, DestinationClaim>,
    yield_requests: BTreeSet<AgentId>,
}

impl ReservationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Claim `cell` for `agent`.  Succeeds if unclaimed or already held by
    /// `agent`.
    pub fn try_reserve(&mut self, cell: Cell, agent: AgentId) -> bool {
        match self.movement.get(&cell) {
            Some(&holder) => holder == agent,
            None => {
                self.movement.insert(cell, agent);
                true
            }
        }
    }

    /// Release `cell` if `agent` holds it.  Returns `true` if released.
    pub fn release(&mut self, cell: Cell, agent: AgentId) -> bool {
        if self.movement.get(&cell) == Some(&agent) {
            self.movement.remove(&cell);
            true
        } else {
            false
        }
    }

    /// Drop every movement reservation of `agent` except `keep`, then make
    /// sure `keep` is held.  Returns the number of cells released.
    pub fn release_all_except(&mut self, agent: AgentId, keep: Cell) -> usize {
        let before = self.movement.len();
        self.movement.retain(|&cell, &mut holder| holder != agent || cell == keep);
        let released = before - self.movement.len();
        self.try_reserve(keep, agent);
        released
    }

    #[inline]
    pub fn holder(&self, cell: Cell) -> Option<AgentId> {
        self.movement.get(&cell).copied()
    }

    /// Cells currently held by `agent`, row-major.
    pub fn cells_held_by(&self, agent: AgentId) -> Vec<Cell> {
        self.movement
            .iter()
            .filter(|&(_, &holder)| holder == agent)
            .map(|(&cell, _)| cell)
            .collect()
    }

    // ── Destinations ──────────────────────────────────────────────────────

    /// `true` if `agent` at `distance` could hold `cell` right now.
    pub fn can_claim(&self, cell: Cell, agent: AgentId, distance: u32) -> bool {
        match self.destinations.get(&cell) {
            None => true,
            Some(claim) => claim.agent == agent || claim.is_beaten_by(agent, distance),
        }
    }

    /// Claim `cell` for `agent`.  On success any other destination claim of
    /// `agent` is released.
    pub fn claim_destination(&mut self, cell: Cell, agent: AgentId, distance: u32) -> ClaimOutcome {
        let outcome = match self.destinations.get(&cell) {
            None => ClaimOutcome::Granted,
            Some(claim) if claim.agent == agent => ClaimOutcome::Refreshed,
            Some(claim) if claim.is_beaten_by(agent, distance) => {
                ClaimOutcome::TookOver { previous: claim.agent }
            }
            Some(claim) => return ClaimOutcome::Rejected { holder: claim.agent },
        };
        self.destinations.retain(|&c, claim| c == cell || claim.agent != agent);
        self.destinations.insert(cell, DestinationClaim { agent, distance });
        if let ClaimOutcome::TookOver { previous } = outcome {
            trace!(%cell, %agent, %previous, distance, "destination taken over");
        }
        outcome
    }

    /// Update the holder's distance.  Returns `false` if `agent` no longer
    /// holds `cell`.
    pub fn refresh_claim(&mut self, cell: Cell, agent: AgentId, distance: u32) -> bool {
        match self.destinations.get_mut(&cell) {
            Some(claim) if claim.agent == agent => {
                claim.distance = distance;
                true
            }
            _ => false,
        }
    }

    /// Release `cell` if `agent` holds it.
    pub fn release_destination(&mut self, cell: Cell, agent: AgentId) -> bool {
        if self.destination_holder(cell) == Some(agent) {
            self.destinations.remove(&cell);
            true
        } else {
            false
        }
    }

    /// Release whatever destination `agent` holds.
    pub fn release_destinations_of(&mut self, agent: AgentId) -> Option<Cell> {
        let cell = self.destination_of(agent)?;
        self.destinations.remove(&cell);
        Some(cell)
    }

    #[inline]
    pub fn destination_holder(&self, cell: Cell) -> Option<AgentId> {
        self.destinations.get(&cell).map(|c| c.agent)
    }

    pub fn destination_claim(&self, cell: Cell) -> Option<DestinationClaim> {
        self.destinations.get(&cell).copied()
    }

    /// The destination `agent` currently holds, if any.
    pub fn destination_of(&self, agent: AgentId) -> Option<Cell> {
        self.destinations
            .iter()
            .find(|(_, claim)| claim.agent == agent)
            .map(|(&cell, _)| cell)
    }

    pub fn destinations(&self) -> impl Iterator<Item = (Cell, DestinationClaim)> + '_ {
        self.destinations.iter().map(|(&c, &claim)| (c, claim))
    }

    // ── Yield requests ────────────────────────────────────────────────────

    /// Ask `agent` to get out of the way.
    pub fn request_yield(&mut self, agent: AgentId) {
        self.yield_requests.insert(agent);
    }

    /// Clear `agent`'s pending request.  Returns `true` if there was one.
    pub fn take_yield_request(&mut self, agent: AgentId) -> bool {
        self.yield_requests.remove(&agent)
    }
}

impl Occupancy for ReservationLedger {
    #[inline]
    fn is_held_by_other(&self, cell: Cell, agent: AgentId) -> bool {
        self.holder(cell).is_some_and(|holder| holder != agent)
    }
}
