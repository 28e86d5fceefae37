//! `GridWorld`: immutable cell-kind lookup plus the pickup/dropoff sets.
//!
//! Cells are stored row-major in a flat `Vec<CellKind>`, so `kind_of` is a
//! bounds check and an index.  The zone lists are kept sorted row-major;
//! nearest-cell queries scan them and break distance ties by that order.

use fleet_core::{Cell, CellKind};

use crate::error::{GridError, GridResult};

// ── GridWorld ─────────────────────────────────────────────────────────────────

/// The static warehouse map.  Never mutated after construction; engines share
/// it behind an `Arc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridWorld {
    rows: i32,
    cols: i32,
    cells: Vec<CellKind>,
    pickups: Vec<Cell>,
    dropoffs: Vec<Cell>,
}

impl GridWorld {
    /// Build from a row-major table of kinds.  Rows must all be the same length.
    pub fn from_rows(rows: Vec<Vec<CellKind>>) -> GridResult<Self> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || expected == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(rows.len() * expected);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(GridError::RaggedRows { row: r, expected, found: row.len() });
            }
            cells.extend_from_slice(row);
        }
        Ok(Self::from_cells(rows.len() as i32, expected as i32, cells))
    }

    /// Parse a text map: `.` free, `#` blocked, `P` pickup, `D` dropoff.
    ///
    /// Blank lines and surrounding whitespace are ignored.
    pub fn parse(text: &str) -> GridResult<Self> {
        let mut rows = Vec::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let r = rows.len();
            let row = line
                .chars()
                .enumerate()
                .map(|(c, code)| {
                    CellKind::from_code(code)
                        .ok_or(GridError::UnknownCellCode { code, row: r, col: c })
                })
                .collect::<GridResult<Vec<_>>>()?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    fn from_cells(rows: i32, cols: i32, cells: Vec<CellKind>) -> Self {
        let mut pickups = Vec::new();
        let mut dropoffs = Vec::new();
        for (i, kind) in cells.iter().enumerate() {
            let cell = Cell::new(i as i32 / cols, i as i32 % cols);
            match kind {
                CellKind::Pickup => pickups.push(cell),
                CellKind::Dropoff => dropoffs.push(cell),
                _ => {}
            }
        }
        Self { rows, cols, cells, pickups, dropoffs }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Total number of cells (rows × cols).
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.rows).contains(&cell.row) && (0..self.cols).contains(&cell.col)
    }

    /// Flat row-major index, `None` when out of bounds.
    #[inline]
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.row * self.cols + cell.col) as usize)
    }

    /// Inverse of [`index_of`](Self::index_of).
    #[inline]
    pub fn cell_at(&self, index: usize) -> Cell {
        Cell::new(index as i32 / self.cols, index as i32 % self.cols)
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// Kind of an in-bounds cell; `None` outside the map.
    #[inline]
    pub fn kind_of(&self, cell: Cell) -> Option<CellKind> {
        self.index_of(cell).map(|i| self.cells[i])
    }

    /// `true` iff in bounds and not blocked.
    #[inline]
    pub fn is_traversable(&self, cell: Cell) -> bool {
        self.kind_of(cell).is_some_and(CellKind::is_traversable)
    }

    /// `Ok(())` for a traversable cell, `NotTraversable` otherwise.
    pub fn check_traversable(&self, cell: Cell) -> GridResult<()> {
        if self.is_traversable(cell) {
            Ok(())
        } else {
            Err(GridError::NotTraversable(cell))
        }
    }

    /// All pickup cells, row-major.
    pub fn pickups(&self) -> &[Cell] {
        &self.pickups
    }

    /// All dropoff cells, row-major.
    pub fn dropoffs(&self) -> &[Cell] {
        &self.dropoffs
    }

    /// Cells of `kind` in row-major order.
    pub fn cells_of(&self, kind: CellKind) -> Vec<Cell> {
        match kind {
            CellKind::Pickup => self.pickups.clone(),
            CellKind::Dropoff => self.dropoffs.clone(),
            _ => (0..self.cells.len())
                .filter(|&i| self.cells[i] == kind)
                .map(|i| self.cell_at(i))
                .collect(),
        }
    }

    /// The cell of `kind` closest to `from` by Manhattan distance.
    pub fn nearest(&self, kind: CellKind, from: Cell) -> Option<Cell> {
        self.nearest_where(kind, from, |_| true)
    }

    /// Like [`nearest`](Self::nearest) but only among cells accepted by `pred`.
    ///
    /// Ties are broken by row-major order, so results are deterministic.
    pub fn nearest_where(
        &self,
        kind: CellKind,
        from: Cell,
        mut pred: impl FnMut(Cell) -> bool,
    ) -> Option<Cell> {
        let mut best: Option<(u32, Cell)> = None;
        let mut consider = |cell: Cell| {
            if !pred(cell) {
                return;
            }
            let d = from.manhattan(cell);
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, cell));
            }
        };
        match kind {
            CellKind::Pickup => self.pickups.iter().copied().for_each(&mut consider),
            CellKind::Dropoff => self.dropoffs.iter().copied().for_each(&mut consider),
            _ => (0..self.cells.len())
                .filter(|&i| self.cells[i] == kind)
                .for_each(|i| consider(self.cell_at(i))),
        }
        best.map(|(_, c)| c)
    }

    /// Render back to the text-map format.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.rows as usize);
        for (i, kind) in self.cells.iter().enumerate() {
            out.push(kind.code());
            if (i + 1) % self.cols as usize == 0 {
                out.push('\n');
            }
        }
        out
    }
}

// ── GridWorldBuilder ──────────────────────────────────────────────────────────

/// Incremental construction of a `GridWorld` starting from an all-free map.
///
/// Out-of-bounds marks are collected and reported by [`build`](Self::build).
pub struct GridWorldBuilder {
    rows: i32,
    cols: i32,
    cells: Vec<CellKind>,
    bad: Option<Cell>,
}

impl GridWorldBuilder {
    pub fn new(rows: i32, cols: i32) -> Self {
        let n = (rows.max(0) * cols.max(0)) as usize;
        Self { rows, cols, cells: vec![CellKind::Free; n], bad: None }
    }

    fn mark(mut self, cell: Cell, kind: CellKind) -> Self {
        let inside = (0..self.rows).contains(&cell.row) && (0..self.cols).contains(&cell.col);
        if inside {
            self.cells[(cell.row * self.cols + cell.col) as usize] = kind;
        } else if self.bad.is_none() {
            self.bad = Some(cell);
        }
        self
    }

    pub fn block(self, cell: impl Into<Cell>) -> Self {
        self.mark(cell.into(), CellKind::Blocked)
    }

    pub fn pickup(self, cell: impl Into<Cell>) -> Self {
        self.mark(cell.into(), CellKind::Pickup)
    }

    pub fn dropoff(self, cell: impl Into<Cell>) -> Self {
        self.mark(cell.into(), CellKind::Dropoff)
    }

    /// Mark every cell of `row` with `kind`.
    pub fn row_of(mut self, row: i32, kind: CellKind) -> Self {
        for col in 0..self.cols {
            self = self.mark(Cell::new(row, col), kind);
        }
        self
    }

    pub fn build(self) -> GridResult<GridWorld> {
        if self.rows <= 0 || self.cols <= 0 {
            return Err(GridError::Empty);
        }
        if let Some(cell) = self.bad {
            return Err(GridError::OutOfBounds { cell, rows: self.rows, cols: self.cols });
        }
        Ok(GridWorld::from_cells(self.rows, self.cols, self.cells))
    }
}
