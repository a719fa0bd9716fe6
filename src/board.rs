//! The grid of locked cells: collision, lock-in, row detection and collapse.

use crate::piece::{BlockColor, Piece};

pub const WIDTH: usize = 10;
pub const HEIGHT: usize = 20;

/// A cell is either empty or occupied with a colour.
pub type Cell = Option<BlockColor>;
pub type Row = [Cell; WIDTH];

const EMPTY_ROW: Row = [None; WIDTH];

/// Playfield. `rows[0]` is the top row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: [EMPTY_ROW; HEIGHT],
        }
    }

    pub fn rows(&self) -> &[Row; HEIGHT] {
        &self.rows
    }

    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.rows.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(Option::is_none)
    }

    /// True if any filled cell of `piece` lies outside the grid or on an
    /// occupied cell.
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|(x, y)| {
            if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
                return true;
            }
            self.rows[y as usize][x as usize].is_some()
        })
    }

    /// Write the piece's colour into every cell it covers.
    /// The caller must have checked that `piece` does not collide.
    pub fn lock(&mut self, piece: &Piece) {
        debug_assert!(!self.collides(piece), "locking a colliding piece");
        for (x, y) in piece.cells() {
            self.set(x as usize, y as usize, Some(piece.color));
        }
    }

    /// Indices of completely filled rows, top to bottom.
    pub fn full_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().all(Option::is_some))
            .map(|(y, _)| y)
            .collect()
    }

    /// Copies of the given rows, for consumers that need the colours of
    /// cleared cells after the collapse.
    pub fn row_snapshot(&self, rows: &[usize]) -> Vec<Row> {
        rows.iter()
            .filter_map(|&y| self.rows.get(y).copied())
            .collect()
    }

    /// Remove `rows` and push the same number of empty rows in at the top.
    /// The new grid is built from the current one in a single pass, so the
    /// row indices all refer to the grid as it was before the call.
    pub fn collapse_rows(&mut self, rows: &[usize]) {
        if rows.is_empty() {
            return;
        }
        let kept: Vec<Row> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(y, _)| !rows.contains(y))
            .map(|(_, row)| *row)
            .collect();
        let removed = HEIGHT - kept.len();
        let mut next = [EMPTY_ROW; HEIGHT];
        next[removed..].copy_from_slice(&kept);
        self.rows = next;
    }
}
