//! Junk module - garbage planning and injection
//!
//! Junk batches are planned at the end of a turn, shown as a warning for the whole
//! next turn, and dropped onto their columns when that turn finishes. The cadence
//! tightens and the batches grow as the game goes on:
//!
//! - `ne = turn + 1 - JUNK_START`
//! - `interval = max(3, JUNK_BASE_INTERVAL - ne / 20)`, a batch is planned when
//!   `ne % interval == 0`
//! - `size = min(2 + ne / 15, 4)` columns

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::types::{
    Cell, GRID_COLS, GRID_ROWS, JUNK_BASE_INTERVAL, JUNK_BATCH_GROWTH_TURNS,
    JUNK_INTERVAL_DECAY_TURNS, JUNK_MAX_BATCH, JUNK_MIN_BATCH, JUNK_MIN_INTERVAL,
    JUNK_PICK_RETRIES, JUNK_START,
};

/// Column list of one junk batch
pub type JunkColumns = ArrayVec<u8, { JUNK_MAX_BATCH as usize }>;

/// Salt mixed into the game seed so junk draws do not mirror piece draws
const JUNK_SEED_SALT: u32 = 0x9e37_79b9;

/// Turns elapsed since junk became eligible, `None` before `JUNK_START`
pub fn junk_age(turn: u32) -> Option<u32> {
    if turn < JUNK_START {
        return None;
    }
    Some(turn + 1 - JUNK_START)
}

/// Turns between batches at junk age `ne`
pub fn junk_interval(ne: u32) -> u32 {
    JUNK_BASE_INTERVAL
        .saturating_sub(ne / JUNK_INTERVAL_DECAY_TURNS)
        .max(JUNK_MIN_INTERVAL)
}

/// Columns per batch at junk age `ne`
pub fn junk_batch_size(ne: u32) -> u32 {
    (JUNK_MIN_BATCH + ne / JUNK_BATCH_GROWTH_TURNS).min(JUNK_MAX_BATCH)
}

/// Plans junk batches and holds the one currently shown as a warning
#[derive(Debug, Clone)]
pub struct JunkScheduler {
    rng: SimpleRng,
    warning: JunkColumns,
}

impl JunkScheduler {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed ^ JUNK_SEED_SALT),
            warning: JunkColumns::new(),
        }
    }

    /// Columns that will receive junk when the current turn finishes
    pub fn warning(&self) -> &[u8] {
        &self.warning
    }

    /// Plan the batch for `turn`; empty when junk is not due.
    ///
    /// Columns are distinct on a best-effort basis: after `JUNK_PICK_RETRIES` failed
    /// draws a duplicate is accepted.
    pub fn plan_next(&mut self, turn: u32) -> JunkColumns {
        let mut columns = JunkColumns::new();
        let Some(ne) = junk_age(turn) else {
            return columns;
        };
        if ne % junk_interval(ne) != 0 {
            return columns;
        }

        for _ in 0..junk_batch_size(ne) {
            let mut col = self.rng.next_range(GRID_COLS as u32) as u8;
            let mut tries = 0;
            while columns.contains(&col) && tries < JUNK_PICK_RETRIES {
                col = self.rng.next_range(GRID_COLS as u32) as u8;
                tries += 1;
            }
            columns.push(col);
        }
        columns
    }

    /// Finish a turn: drop the warned batch onto the grid, then plan the next one.
    /// Returns how many junk cells were placed.
    pub fn end_turn(&mut self, grid: &mut Grid, turn: u32) -> u32 {
        let warned = std::mem::take(&mut self.warning);
        let placed = inject(grid, &warned);
        self.warning = self.plan_next(turn);
        if !self.warning.is_empty() {
            log::debug!("[junk] turn {} warns columns {:?}", turn, self.warning.as_slice());
        }
        placed
    }
}

/// Place one junk cell on top of each listed column, then settle.
///
/// An empty column gets junk on the bottom row. A column whose target would be the
/// top row or above is skipped, so junk alone never overflows the board.
pub fn inject(grid: &mut Grid, columns: &[u8]) -> u32 {
    let mut placed = 0;
    for &col in columns {
        let col = col as i8;
        let target = match grid.topmost_occupied(col) {
            Some(top) => top - 1,
            None => GRID_ROWS as i8 - 1,
        };
        if target <= 0 {
            continue;
        }
        if grid.set(target, col, Cell::Junk) {
            placed += 1;
        }
    }
    if placed > 0 {
        grid.settle();
        log::debug!("[junk] injected {} cell(s)", placed);
    }
    placed
}
