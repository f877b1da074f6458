use crate::pieces::{Piece, MAX_PIECE_CELLS};
use crate::types::{Phase, ShapeKind, GRID_COLS, GRID_ROWS};

/// Absolute position and level of one falling cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveCell {
    pub row: i8,
    pub col: i8,
    pub level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: ShapeKind,
    pub row: i8,
    pub col: i8,
    pub cells: [Option<ActiveCell>; MAX_PIECE_CELLS],
}

impl From<&Piece> for ActiveSnapshot {
    fn from(value: &Piece) -> Self {
        let mut cells = [None; MAX_PIECE_CELLS];
        for (slot, (row, col, level)) in cells.iter_mut().zip(value.positions()) {
            *slot = Some(ActiveCell { row, col, level });
        }
        Self {
            kind: value.kind,
            row: value.row,
            col: value.col,
            cells,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    /// Integer cell codes, top row first
    pub grid: [[i8; GRID_COLS as usize]; GRID_ROWS as usize],
    /// FNV-1a over `grid`
    pub board_hash: u64,
    pub active: Option<ActiveSnapshot>,
    pub ghost_row: Option<i8>,
    pub hold: Option<ShapeKind>,
    pub next: Option<ShapeKind>,
    pub can_hold: bool,
    /// Columns that receive junk when the current turn finishes
    pub junk_warning: [bool; GRID_COLS as usize],
    pub phase: Phase,
    pub seed: u32,
    pub score: u32,
    pub turn: u32,
    pub chain: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn playable(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn dead(&self) -> bool {
        self.phase == Phase::Dead
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let grid = [[0i8; GRID_COLS as usize]; GRID_ROWS as usize];
        Self {
            board_hash: board_hash(&grid),
            grid,
            active: None,
            ghost_row: None,
            hold: None,
            next: None,
            can_hold: true,
            junk_warning: [false; GRID_COLS as usize],
            phase: Phase::Ready,
            seed: 0,
            score: 0,
            turn: 0,
            chain: 0,
        }
    }
}

/// Stable 64-bit FNV-1a over the cell codes, row-major.
///
/// Avoids `DefaultHasher`, whose output is not guaranteed stable across Rust
/// versions/platforms.
pub fn board_hash(grid: &[[i8; GRID_COLS as usize]; GRID_ROWS as usize]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut state = OFFSET_BASIS;
    for &code in grid.iter().flatten() {
        state ^= code as u8 as u64;
        state = state.wrapping_mul(PRIME);
    }
    state
}
