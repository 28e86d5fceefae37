use fleet_core::Cell;

/// Which handling operation is in progress.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HandlingOp {
    Pick,
    Drop,
}

/// Top-level AGV state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    /// No usable path; looking for a destination (possibly after a delay).
    #[default]
    Seeking,
    /// Following a path toward the claimed destination.
    Moving,
    /// Blocking pick or drop with `remaining` ticks to go.
    Handling { op: HandlingOp, remaining: u64 },
}

impl Phase {
    #[inline]
    pub fn is_handling(self) -> bool {
        matches!(self, Phase::Handling { .. })
    }
}

/// An in-progress hop between two adjacent cells.  Both cells are reserved
/// by the mover for the duration of the hop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Motion {
    pub from:     Cell,
    pub to:       Cell,
    /// Fraction of the hop completed, in [0, 1].
    pub progress: f64,
}
