//! Heat module - periodic escalation of every tile on the board

use crate::grid::{ActiveSet, Grid};
use crate::types::{Cell, HEAT_INTERVAL};

/// Whether the lock that produced `turn` fires heat instead of the plain resolver
pub fn is_heat_turn(turn: u32) -> bool {
    turn > 0 && turn % HEAT_INTERVAL == 0
}

/// Raise every tile by one level (tiles at `MAX_LEVEL` turn explosive).
///
/// Empty and junk cells are untouched. Returns the new active set: every tile on the
/// board.
pub fn heat(grid: &mut Grid) -> ActiveSet {
    let mut raised = 0u32;
    for row in 0..grid.rows() as i8 {
        for col in 0..grid.cols() as i8 {
            if let Some(cell @ Cell::Tile(_)) = grid.get(row, col) {
                grid.set(row, col, cell.raised(1));
                raised += 1;
            }
        }
    }
    log::debug!("[heat] raised {} tile(s)", raised);
    ActiveSet::all_tiles(grid)
}
