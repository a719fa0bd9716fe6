//! Tetromino shapes, rotation table and the falling piece.

use rand::Rng;
use rand::seq::IndexedRandom;
use std::sync::LazyLock;

use crate::board::WIDTH;

/// Largest bounding box of any shape (I is 4x4).
pub const MAX_SHAPE_SIZE: usize = 4;

/// Number of rotation states per shape.
pub const ROTATIONS: u8 = 4;

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    I,
    J,
    L,
    O,
    S,
    Z,
    T,
}

impl ShapeKind {
    pub const ALL: [Self; 7] = [Self::I, Self::J, Self::L, Self::O, Self::S, Self::Z, Self::T];

    fn index(self) -> usize {
        match self {
            Self::I => 0,
            Self::J => 1,
            Self::L => 2,
            Self::O => 3,
            Self::S => 4,
            Self::Z => 5,
            Self::T => 6,
        }
    }

    /// Base orientation (rotation 0).
    fn base(self) -> Matrix {
        match self {
            Self::I => Matrix::from_rows(&[[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
            Self::J => Matrix::from_rows(&[[1, 0, 0], [1, 1, 1], [0, 0, 0]]),
            Self::L => Matrix::from_rows(&[[0, 0, 1], [1, 1, 1], [0, 0, 0]]),
            Self::O => Matrix::from_rows(&[[1, 1], [1, 1]]),
            Self::S => Matrix::from_rows(&[[0, 1, 1], [1, 1, 0], [0, 0, 0]]),
            Self::Z => Matrix::from_rows(&[[1, 1, 0], [0, 1, 1], [0, 0, 0]]),
            Self::T => Matrix::from_rows(&[[0, 1, 0], [1, 1, 1], [0, 0, 0]]),
        }
    }

    /// Matrix for this shape at `rotation` (taken mod 4).
    pub fn matrix(self, rotation: u8) -> &'static Matrix {
        &ROTATION_TABLE[self.index()][(rotation % ROTATIONS) as usize]
    }
}

/// Every shape's four orientations, computed once from the base matrix.
static ROTATION_TABLE: LazyLock<[[Matrix; 4]; 7]> = LazyLock::new(|| {
    ShapeKind::ALL.map(|kind| {
        let r0 = kind.base();
        let r1 = r0.rotated_cw();
        let r2 = r1.rotated_cw();
        let r3 = r2.rotated_cw();
        [r0, r1, r2, r3]
    })
});

/// Square boolean cell matrix of side `size` (at most 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matrix {
    size: usize,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Matrix {
    fn from_rows<const N: usize>(rows: &[[u8; N]; N]) -> Self {
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                cells[r][c] = v != 0;
            }
        }
        Self { size: N, cells }
    }

    /// Filled cells as `(col, row)` offsets from the top-left corner.
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.size).flat_map(move |r| {
            (0..self.size).filter_map(move |c| self.cells[r][c].then_some((c, r)))
        })
    }

    /// 90 degrees clockwise: reverse the row order, then transpose.
    fn rotated_cw(&self) -> Self {
        let n = self.size;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in cells.iter_mut().enumerate().take(n) {
            for (c, cell) in row.iter_mut().enumerate().take(n) {
                *cell = self.cells[n - 1 - c][r];
            }
        }
        Self { size: n, cells }
    }
}

/// Colour tag carried by a piece and by the board cells it locks into.
/// Black and white are reserved for the UI and never appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockColor {
    Red,
    Green,
    Blue,
    Cyan,
    Magenta,
    Yellow,
    Orange,
    Purple,
    Lime,
    Pink,
}

impl BlockColor {
    pub const ALL: [Self; 10] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Cyan,
        Self::Magenta,
        Self::Yellow,
        Self::Orange,
        Self::Purple,
        Self::Lime,
        Self::Pink,
    ];

    /// Position in [`BlockColor::ALL`]; used to index theme palettes.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Neon RGB value.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Red => (255, 50, 50),
            Self::Green => (50, 255, 50),
            Self::Blue => (50, 50, 255),
            Self::Cyan => (50, 255, 255),
            Self::Magenta => (255, 50, 255),
            Self::Yellow => (255, 255, 50),
            Self::Orange => (255, 165, 50),
            Self::Purple => (200, 50, 255),
            Self::Lime => (150, 255, 50),
            Self::Pink => (255, 100, 150),
        }
    }

    /// Theme file key for this colour (`theme[block_red]="#..."`).
    pub fn key(self) -> &'static str {
        match self {
            Self::Red => "block_red",
            Self::Green => "block_green",
            Self::Blue => "block_blue",
            Self::Cyan => "block_cyan",
            Self::Magenta => "block_magenta",
            Self::Yellow => "block_yellow",
            Self::Orange => "block_orange",
            Self::Purple => "block_purple",
            Self::Lime => "block_lime",
            Self::Pink => "block_pink",
        }
    }
}

/// A piece on (or about to enter) the board. `x`, `y` locate the top-left
/// corner of the rotated matrix's bounding box in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: ShapeKind,
    pub rotation: u8,
    pub x: i32,
    pub y: i32,
    pub color: BlockColor,
}

impl Piece {
    /// Spawn column for every piece.
    pub const SPAWN_X: i32 = WIDTH as i32 / 2 - 1;

    /// Piece at the spawn position in its base orientation.
    pub fn new(kind: ShapeKind, color: BlockColor) -> Self {
        Self {
            kind,
            rotation: 0,
            x: Self::SPAWN_X,
            y: 0,
            color,
        }
    }

    /// Uniformly random shape and colour.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        // Both slices are non-empty constants.
        let kind = ShapeKind::ALL.choose(rng).copied().unwrap_or(ShapeKind::T);
        let color = BlockColor::ALL.choose(rng).copied().unwrap_or(BlockColor::Cyan);
        Self::new(kind, color)
    }

    pub fn matrix(&self) -> &'static Matrix {
        self.kind.matrix(self.rotation)
    }

    /// Next clockwise rotation index. Counter-clockwise is not supported.
    pub fn rotate(&self) -> u8 {
        (self.rotation + 1) % ROTATIONS
    }

    /// Copy of this piece with the rotation advanced one step clockwise.
    pub fn rotated(&self) -> Self {
        Self {
            rotation: self.rotate(),
            ..*self
        }
    }

    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Absolute `(x, y)` grid coordinates of the filled cells.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.matrix()
            .filled()
            .map(|(c, r)| (self.x + c as i32, self.y + r as i32))
    }
}
