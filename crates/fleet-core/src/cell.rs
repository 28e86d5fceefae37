//! Grid cell coordinates, cell kinds, cargo state and continuous positions.
//!
//! Coordinates are `(row, col)` with row 0 at the top of a printed map.
//! They are signed so that neighbour arithmetic at the map edge produces an
//! out-of-bounds cell instead of wrapping; bounds are checked by the grid.

use std::fmt;

// ── Cell ──────────────────────────────────────────────────────────────────────

/// An integer grid coordinate.
///
/// `Ord` is row-major, which is the deterministic tie-break order used by
/// nearest-cell queries and by the reservation ledger's maps.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    /// Manhattan (L1) distance in cells.
    #[inline]
    pub fn manhattan(self, other: Cell) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// The four-connected neighbours in fixed visit order: up, down, left, right.
    ///
    /// The order is part of the path-finding contract; equal-cost routes are
    /// resolved by which neighbour is expanded first.
    #[inline]
    pub fn neighbors(self) -> [Cell; 4] {
        [
            Cell::new(self.row - 1, self.col),
            Cell::new(self.row + 1, self.col),
            Cell::new(self.row, self.col - 1),
            Cell::new(self.row, self.col + 1),
        ]
    }

    /// `true` if `other` is one of the four neighbours.
    #[inline]
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, col): (i32, i32)) -> Self {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ── CellKind ──────────────────────────────────────────────────────────────────

/// Static zone semantics of a grid cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    #[default]
    Free,
    Blocked,
    Pickup,
    Dropoff,
}

impl CellKind {
    /// Text-map code: `.` free, `#` blocked, `P` pickup, `D` dropoff.
    pub fn from_code(c: char) -> Option<CellKind> {
        match c {
            '.' => Some(CellKind::Free),
            '#' => Some(CellKind::Blocked),
            'P' | 'p' => Some(CellKind::Pickup),
            'D' | 'd' => Some(CellKind::Dropoff),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            CellKind::Free => '.',
            CellKind::Blocked => '#',
            CellKind::Pickup => 'P',
            CellKind::Dropoff => 'D',
        }
    }

    #[inline]
    pub fn is_traversable(self) -> bool {
        self != CellKind::Blocked
    }

    /// Pickup or dropoff.
    #[inline]
    pub fn is_dock(self) -> bool {
        matches!(self, CellKind::Pickup | CellKind::Dropoff)
    }
}

// ── Cargo ─────────────────────────────────────────────────────────────────────

/// Whether an AGV is carrying a unit.  Flips only when a handling operation
/// completes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cargo {
    #[default]
    Empty,
    Loaded,
}

impl Cargo {
    /// The zone an agent with this cargo state is heading for.
    #[inline]
    pub fn wanted_zone(self) -> CellKind {
        match self {
            Cargo::Empty => CellKind::Pickup,
            Cargo::Loaded => CellKind::Dropoff,
        }
    }

    #[inline]
    pub fn is_loaded(self) -> bool {
        self == Cargo::Loaded
    }
}

// ── Position ──────────────────────────────────────────────────────────────────

/// Continuous position used for smooth external observation.
///
/// `x` tracks the row axis and `y` the column axis, matching the telemetry
/// frame layout.  The canonical integer cell is the rounded position.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Rounded integer cell.
    #[inline]
    pub fn cell(self) -> Cell {
        Cell::new(self.x.round() as i32, self.y.round() as i32)
    }

    /// Linear interpolation between two cell centres; `t` is clamped to [0, 1].
    pub fn lerp(from: Cell, to: Cell, t: f64) -> Position {
        let t = t.clamp(0.0, 1.0);
        Position {
            x: from.row as f64 + (to.row - from.row) as f64 * t,
            y: from.col as f64 + (to.col - from.col) as f64 * t,
        }
    }
}

impl From<Cell> for Position {
    fn from(c: Cell) -> Self {
        Position::new(c.row as f64, c.col as f64)
    }
}
