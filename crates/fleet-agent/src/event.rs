use fleet_core::Cell;

use crate::HandlingOp;

/// Something noteworthy that happened during one agent step.
///
/// The engine turns these into statistics, recovery counters and log lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentEvent {
    /// The rounded position moved from `from` into `cell`.
    EnteredCell { from: Cell, cell: Cell },
    HandlingStarted { op: HandlingOp, cell: Cell },
    PickedUp { cell: Cell },
    /// A unit was dropped.  `cycle` is `None` when the matching pickup fell
    /// inside the warm-up window.  `wait` and `travel` cover the ticks since
    /// the previous delivery.
    Delivered { cell: Cell, cycle: Option<u64>, wait: u64, travel: u64 },
    /// The destination claim was taken by a higher-priority agent.
    Retargeted { lost: Cell },
    PathNotFound { target: Cell },
    ReservationTimeout { blocked: Cell },
    StuckReset { cell: Cell },
}

/// What one call to `Agent::step` produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub events: Vec<AgentEvent>,
    /// The continuous position changed this tick.
    pub moved: bool,
    /// Moving or handling; feeds utilization.
    pub busy: bool,
}
