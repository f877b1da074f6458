//! Grid module - the fixed-size cell matrix and its gravity
//!
//! The grid is a 6x12 matrix where each cell is empty, junk, a tile or an explosive.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (row, col) where row ranges 0..11 (top to bottom), col ranges 0..5
//! (left to right).

use crate::types::{Cell, GRID_COLS, GRID_ROWS};

/// Total number of cells on the grid
pub const GRID_SIZE: usize = (GRID_COLS as usize) * (GRID_ROWS as usize);

/// Orthogonal neighbour offsets, `(row, col)`
pub const NEIGHBORS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// The game grid - 6 columns x 12 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    /// Flat array of cells, row-major order (row * COLS + col)
    cells: [Cell; GRID_SIZE],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; GRID_SIZE],
        }
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    pub fn index(row: i8, col: i8) -> Option<usize> {
        if row < 0 || row >= GRID_ROWS as i8 || col < 0 || col >= GRID_COLS as i8 {
            return None;
        }
        Some((row as usize) * (GRID_COLS as usize) + (col as usize))
    }

    /// Inverse of [`Grid::index`]
    #[inline(always)]
    pub fn position(idx: usize) -> (i8, i8) {
        (
            (idx / GRID_COLS as usize) as i8,
            (idx % GRID_COLS as usize) as i8,
        )
    }

    pub fn cols(&self) -> u8 {
        GRID_COLS
    }

    pub fn rows(&self) -> u8 {
        GRID_ROWS
    }

    /// Get cell at (row, col), `None` when out of bounds
    pub fn get(&self, row: i8, col: i8) -> Option<Cell> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col)
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i8, col: i8, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether a falling cell may occupy (row, col).
    ///
    /// Columns must be on the grid and rows below the floor are rejected. Rows above
    /// the grid are open so pieces can fall in from outside.
    pub fn is_open(&self, row: i8, col: i8) -> bool {
        if col < 0 || col >= GRID_COLS as i8 || row >= GRID_ROWS as i8 {
            return false;
        }
        if row < 0 {
            return true;
        }
        matches!(self.get(row, col), Some(Cell::Empty))
    }

    /// Check if position is occupied (within bounds and non-empty)
    pub fn is_occupied(&self, row: i8, col: i8) -> bool {
        matches!(self.get(row, col), Some(cell) if !cell.is_empty())
    }

    /// Row of the highest non-empty cell in `col`
    pub fn topmost_occupied(&self, col: i8) -> Option<i8> {
        (0..GRID_ROWS as i8).find(|&row| self.is_occupied(row, col))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Iterate `(row, col, cell)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (i8, i8, Cell)> + '_ {
        self.cells.iter().enumerate().map(|(idx, &cell)| {
            let (row, col) = Self::position(idx);
            (row, col, cell)
        })
    }

    /// Compact every column downward, keeping relative vertical order.
    pub fn settle(&mut self) {
        let mut untracked = ActiveSet::new();
        self.settle_tracking(&mut untracked);
    }

    /// Gravity that carries active flags with the cells they belong to.
    ///
    /// Junk falls like any tile. After the call `active` names the cells' final
    /// positions rather than the pre-gravity ones.
    pub fn settle_tracking(&mut self, active: &mut ActiveSet) {
        let cols = GRID_COLS as usize;
        for col in 0..cols {
            let mut write_row = GRID_ROWS as usize;
            for read_row in (0..GRID_ROWS as usize).rev() {
                let src = read_row * cols + col;
                if self.cells[src].is_empty() {
                    continue;
                }
                write_row -= 1;
                if write_row != read_row {
                    let dst = write_row * cols + col;
                    self.cells[dst] = self.cells[src];
                    self.cells[src] = Cell::Empty;
                    let flag = active.flags[src];
                    active.flags[dst] = flag;
                    active.flags[src] = false;
                }
            }
            for row in 0..write_row {
                active.flags[row * cols + col] = false;
            }
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        self.cells = [Cell::Empty; GRID_SIZE];
    }

    /// Build a grid from integer codes, top row first (`0` empty, `-1` junk,
    /// `1..=MAX_LEVEL` tiles, anything higher explosive).
    ///
    /// Unknown negative codes read as empty.
    pub fn from_codes(rows: &[[i8; GRID_COLS as usize]; GRID_ROWS as usize]) -> Self {
        let mut grid = Self::new();
        for (row, line) in rows.iter().enumerate() {
            for (col, &code) in line.iter().enumerate() {
                grid.cells[row * GRID_COLS as usize + col] =
                    Cell::from_code(code).unwrap_or(Cell::Empty);
            }
        }
        grid
    }

    /// Write the integer encoding into a caller-owned buffer (no allocation)
    pub fn write_codes(&self, out: &mut [[i8; GRID_COLS as usize]; GRID_ROWS as usize]) {
        for (idx, cell) in self.cells.iter().enumerate() {
            let (row, col) = Self::position(idx);
            out[row as usize][col as usize] = cell.code();
        }
    }

    pub fn to_codes(&self) -> [[i8; GRID_COLS as usize]; GRID_ROWS as usize] {
        let mut out = [[0i8; GRID_COLS as usize]; GRID_ROWS as usize];
        self.write_codes(&mut out);
        out
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

/// Coordinates eligible for merge consideration in the next resolver iteration.
///
/// Stored as one flag per grid slot so gravity can move flags together with the
/// cells they tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSet {
    flags: [bool; GRID_SIZE],
}

impl ActiveSet {
    pub fn new() -> Self {
        Self {
            flags: [false; GRID_SIZE],
        }
    }

    /// Every tile or explosive currently on the grid
    pub fn all_tiles(grid: &Grid) -> Self {
        let mut set = Self::new();
        for (idx, cell) in grid.cells().iter().enumerate() {
            set.flags[idx] = cell.is_tile();
        }
        set
    }

    pub fn insert(&mut self, row: i8, col: i8) -> bool {
        match Grid::index(row, col) {
            Some(idx) => {
                self.flags[idx] = true;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, row: i8, col: i8) {
        if let Some(idx) = Grid::index(row, col) {
            self.flags[idx] = false;
        }
    }

    pub fn contains(&self, row: i8, col: i8) -> bool {
        Grid::index(row, col)
            .map(|idx| self.flags[idx])
            .unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.flags = [false; GRID_SIZE];
    }

    pub fn is_empty(&self) -> bool {
        !self.flags.iter().any(|&f| f)
    }

    pub fn len(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// Active coordinates in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, f)| **f)
            .map(|(idx, _)| Grid::position(idx))
    }

    /// Drop coordinates that no longer hold a tile
    pub fn retain_tiles(&mut self, grid: &Grid) {
        for (idx, cell) in grid.cells().iter().enumerate() {
            if !cell.is_tile() {
                self.flags[idx] = false;
            }
        }
    }
}

impl Default for ActiveSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_index_calculation() {
        assert_eq!(Grid::index(0, 0), Some(0));
        assert_eq!(Grid::index(0, 5), Some(5));
        assert_eq!(Grid::index(1, 0), Some(6));
        assert_eq!(Grid::index(11, 5), Some(71));
        assert_eq!(Grid::index(-1, 0), None);
        assert_eq!(Grid::index(0, 6), None);
        assert_eq!(Grid::index(12, 0), None);
        assert_eq!(Grid::position(71), (11, 5));
    }

    #[test]
    fn test_is_open_allows_rows_above_grid() {
        let mut grid = Grid::new();
        assert!(grid.is_open(-3, 2));
        assert!(!grid.is_open(-1, -1));
        assert!(!grid.is_open(-1, 6));
        assert!(!grid.is_open(12, 0));

        grid.set(4, 2, Cell::Junk);
        assert!(!grid.is_open(4, 2));
    }

    #[test]
    fn test_settle_compacts_and_keeps_order() {
        let mut grid = Grid::new();
        grid.set(2, 1, Cell::Tile(3));
        grid.set(5, 1, Cell::Junk);
        grid.set(9, 1, Cell::Tile(1));

        grid.settle();

        assert_eq!(grid.get(9, 1), Some(Cell::Tile(3)));
        assert_eq!(grid.get(10, 1), Some(Cell::Junk));
        assert_eq!(grid.get(11, 1), Some(Cell::Tile(1)));
        assert_eq!(grid.occupied_count(), 3);
    }

    #[test]
    fn test_settle_tracking_moves_active_flags() {
        let mut grid = Grid::new();
        grid.set(3, 4, Cell::Tile(2));
        grid.set(11, 4, Cell::Tile(1));
        let mut active = ActiveSet::new();
        active.insert(3, 4);

        grid.settle_tracking(&mut active);

        assert!(active.contains(10, 4));
        assert!(!active.contains(3, 4));
        assert!(!active.contains(11, 4));
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn test_codes_roundtrip_through_buffer() {
        let mut rows = [[0i8; 6]; 12];
        rows[11] = [1, 2, -1, 0, 6, 5];
        let grid = Grid::from_codes(&rows);
        assert_eq!(grid.get(11, 4), Some(Cell::Explosive));
        assert_eq!(grid.to_codes(), rows);
    }
}
