use fleet_core::{AgentId, Cargo, Cell, CellKind};
use fleet_grid::GridWorld;

/// A target request from one AGV.
#[derive(Clone, Copy)]
pub struct DispatchRequest<'a> {
    pub agent: AgentId,
    /// The agent's current cell.
    pub from:  Cell,
    pub cargo: Cargo,
    /// Cells the agent must not be given: a destination it just lost, or
    /// candidates it already found no route to.
    pub exclude: &'a [Cell],
    pub grid:  &'a GridWorld,
}

impl<'a> DispatchRequest<'a> {
    pub fn new(agent: AgentId, from: Cell, cargo: Cargo, grid: &'a GridWorld) -> Self {
        Self { agent, from, cargo, exclude: &[], grid }
    }

    pub fn excluding(mut self, cells: &'a [Cell]) -> Self {
        self.exclude = cells;
        self
    }

    #[inline]
    pub fn excludes(&self, cell: Cell) -> bool {
        self.exclude.contains(&cell)
    }

    /// Pickup when empty, dropoff when loaded.
    #[inline]
    pub fn zone(&self) -> CellKind {
        self.cargo.wanted_zone()
    }
}
