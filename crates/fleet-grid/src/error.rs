//! Grid-subsystem error type.

use thiserror::Error;

use fleet_core::Cell;

/// Errors produced by `fleet-grid`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("no path from {from} to {to}")]
    NoPath { from: Cell, to: Cell },

    #[error("cell {0} is out of bounds or blocked")]
    NotTraversable(Cell),

    #[error("cell {cell} is outside a {rows}x{cols} grid")]
    OutOfBounds { cell: Cell, rows: i32, cols: i32 },

    #[error("map is empty")]
    Empty,

    #[error("map row {row} has {found} cells, expected {expected}")]
    RaggedRows { row: usize, expected: usize, found: usize },

    #[error("unknown map code {code:?} at row {row}, column {col}")]
    UnknownCellCode { code: char, row: usize, col: usize },

    #[error("unknown layout {0:?}")]
    UnknownLayout(String),
}

pub type GridResult<T> = Result<T, GridError>;
