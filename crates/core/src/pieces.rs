//! Pieces module - falling shapes, rotation and placement legality
//!
//! A piece is an ordered list of cells, each with a `(row, col)` offset from the
//! piece anchor and its own tile level. Rotation is a plain 90° transform followed by
//! renormalization; there are no wall kicks.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::types::{ShapeKind, GRID_COLS};

/// Largest number of cells any shape has
pub const MAX_PIECE_CELLS: usize = 3;

/// One cell of a falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceCell {
    pub d_row: i8,
    pub d_col: i8,
    pub level: u8,
}

/// Falling piece
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: ShapeKind,
    pub cells: ArrayVec<PieceCell, MAX_PIECE_CELLS>,
    pub row: i8,
    pub col: i8,
}

impl Piece {
    /// Create a piece in spawn orientation at its spawn position.
    ///
    /// `levels` are assigned to the shape's cells in order; missing levels default
    /// to 1.
    pub fn new(kind: ShapeKind, levels: &[u8]) -> Self {
        let cells = kind
            .offsets()
            .iter()
            .enumerate()
            .map(|(i, &(d_row, d_col))| PieceCell {
                d_row,
                d_col,
                level: levels.get(i).copied().unwrap_or(1),
            })
            .collect();

        let mut piece = Self {
            kind,
            cells,
            row: 0,
            col: 0,
        };
        piece.row = spawn_row(&piece);
        piece.col = spawn_col(&piece);
        piece
    }

    /// Same piece at another anchor
    pub fn at(mut self, row: i8, col: i8) -> Self {
        self.row = row;
        self.col = col;
        self
    }

    /// Absolute `(row, col, level)` of every cell
    pub fn positions(&self) -> impl Iterator<Item = (i8, i8, u8)> + '_ {
        self.cells
            .iter()
            .map(move |c| (self.row + c.d_row, self.col + c.d_col, c.level))
    }

    pub fn width(&self) -> i8 {
        self.cells.iter().map(|c| c.d_col).max().unwrap_or(0) + 1
    }

    pub fn height(&self) -> i8 {
        self.cells.iter().map(|c| c.d_row).max().unwrap_or(0) + 1
    }

    pub fn levels(&self) -> ArrayVec<u8, MAX_PIECE_CELLS> {
        self.cells.iter().map(|c| c.level).collect()
    }

    /// Back to spawn orientation and spawn position, levels kept in cell order.
    pub fn reset_to_spawn(&self) -> Self {
        Self::new(self.kind, &self.levels())
    }

    /// Copy with offsets turned 90° and renormalized to a zero minimum row/col.
    /// The anchor is unchanged.
    pub fn rotated(&self, clockwise: bool) -> Self {
        let mut out = self.clone();
        for cell in out.cells.iter_mut() {
            let (r, c) = (cell.d_row, cell.d_col);
            // Screen coordinates: clockwise sends right to down and down to left.
            (cell.d_row, cell.d_col) = if clockwise { (c, -r) } else { (-c, r) };
        }
        let min_row = out.cells.iter().map(|c| c.d_row).min().unwrap_or(0);
        let min_col = out.cells.iter().map(|c| c.d_col).min().unwrap_or(0);
        for cell in out.cells.iter_mut() {
            cell.d_row -= min_row;
            cell.d_col -= min_col;
        }
        out
    }
}

/// Anchor column that centres the piece horizontally
pub fn spawn_col(piece: &Piece) -> i8 {
    (GRID_COLS as i8 - piece.width()) / 2
}

/// Anchor row that puts the piece's bottom cell on row 0, the rest above the grid
pub fn spawn_row(piece: &Piece) -> i8 {
    1 - piece.height()
}

/// Every cell lands on an open slot when the anchor is at (row, col)
pub fn can_place_at(grid: &Grid, piece: &Piece, row: i8, col: i8) -> bool {
    piece
        .cells
        .iter()
        .all(|c| grid.is_open(row + c.d_row, col + c.d_col))
}

/// Translation by (d_row, d_col) is legal
pub fn can_move(grid: &Grid, piece: &Piece, d_row: i8, d_col: i8) -> bool {
    can_place_at(grid, piece, piece.row + d_row, piece.col + d_col)
}

/// Rotate in place. Returns false and leaves the piece untouched when the rotated
/// shape would collide or leave the grid. Single cells never rotate.
pub fn try_rotate(grid: &Grid, piece: &mut Piece, clockwise: bool) -> bool {
    if piece.cells.len() <= 1 {
        return false;
    }
    let candidate = piece.rotated(clockwise);
    if !can_place_at(grid, &candidate, candidate.row, candidate.col) {
        return false;
    }
    *piece = candidate;
    true
}

/// Lowest anchor row the piece can fall to from its current row
pub fn landing_row(grid: &Grid, piece: &Piece) -> i8 {
    let mut row = piece.row;
    while can_place_at(grid, piece, row + 1, piece.col) {
        row += 1;
    }
    row
}
