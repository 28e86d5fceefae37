//! `Path`: the ordered cell sequence an AGV follows.

use std::collections::VecDeque;

use fleet_core::Cell;

/// Cells from the owner's current cell to its destination, both inclusive.
///
/// The front is always the cell the owner currently occupies; it is popped
/// by [`advance`](Path::advance) as the owner enters the next cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    cells: VecDeque<Cell>,
}

impl Path {
    pub fn new(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self { cells: cells.into_iter().collect() }
    }

    /// A path that stays on `cell`.
    pub fn stay(cell: Cell) -> Self {
        Self::new([cell])
    }

    #[inline]
    pub fn current(&self) -> Option<Cell> {
        self.cells.front().copied()
    }

    /// The cell after the current one.
    #[inline]
    pub fn next(&self) -> Option<Cell> {
        self.cells.get(1).copied()
    }

    #[inline]
    pub fn destination(&self) -> Option<Cell> {
        self.cells.back().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of hops left (cells minus one).
    #[inline]
    pub fn hops(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// Drop the current cell; the next one becomes current.
    pub fn advance(&mut self) -> Option<Cell> {
        self.cells.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }
}
