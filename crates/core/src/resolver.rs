//! Resolver module - the post-lock merge/explosion/gravity loop
//!
//! One resolver iteration runs the merge step; if nothing merged it runs the
//! explosion step; whichever changed the grid is followed by gravity and bumps the
//! chain counter. An iteration where neither step changes anything means the board
//! is stable.
//!
//! Explosions are batched: every explosive cell found by one grid scan is cleared in
//! that step, and neighbours pushed over the limit wait for the next iteration.

use arrayvec::ArrayVec;

use crate::grid::{ActiveSet, Grid, GRID_SIZE, NEIGHBORS};
use crate::scoring::{explosion_score, merge_score};
use crate::types::{Cell, MAX_LEVEL};

/// Result of one merge step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    /// Groups of two or more that collapsed into one tile
    pub groups: u32,
    /// Cells removed (group size minus one, summed)
    pub cleared: u32,
    pub score: u32,
}

impl MergeOutcome {
    pub fn changed(&self) -> bool {
        self.groups > 0
    }
}

/// Result of one explosion step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExplosionOutcome {
    pub exploded: u32,
    pub junk_destroyed: u32,
    pub score: u32,
}

impl ExplosionOutcome {
    pub fn changed(&self) -> bool {
        self.exploded > 0
    }
}

/// What a single resolver iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStep {
    Merged(MergeOutcome),
    Exploded(ExplosionOutcome),
    Stable,
}

/// Orthogonally connected cells holding exactly `level`, starting at (row, col).
fn flood_fill(grid: &Grid, row: i8, col: i8, level: u8) -> ArrayVec<(i8, i8), GRID_SIZE> {
    let mut group = ArrayVec::new();
    let mut seen = [false; GRID_SIZE];
    let mut stack: ArrayVec<(i8, i8), GRID_SIZE> = ArrayVec::new();

    let Some(start) = Grid::index(row, col) else {
        return group;
    };
    seen[start] = true;
    stack.push((row, col));

    while let Some((r, c)) = stack.pop() {
        group.push((r, c));
        for (dr, dc) in NEIGHBORS {
            let (nr, nc) = (r + dr, c + dc);
            let Some(idx) = Grid::index(nr, nc) else {
                continue;
            };
            if seen[idx] || grid.get(nr, nc) != Some(Cell::Tile(level)) {
                continue;
            }
            seen[idx] = true;
            stack.push((nr, nc));
        }
    }

    group
}

/// Merge every same-level group reachable from an active coordinate.
///
/// The surviving cell of a group is the lowest one, leftmost on ties; it gains one
/// level per absorbed tile, capped at explosive. Afterwards `active` holds exactly
/// the survivors.
pub fn process_merges(grid: &mut Grid, active: &mut ActiveSet, chain: u32) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    let mut processed = ActiveSet::new();
    let mut next_active = ActiveSet::new();
    let starts: ArrayVec<(i8, i8), GRID_SIZE> = active.iter().collect();

    for (row, col) in starts {
        if processed.contains(row, col) {
            continue;
        }
        let Some(level) = grid.get(row, col).and_then(Cell::level) else {
            continue;
        };

        let group = flood_fill(grid, row, col, level);
        for &(r, c) in &group {
            processed.insert(r, c);
        }
        if group.len() < 2 {
            continue;
        }

        let Some(&(keep_row, keep_col)) = group
            .iter()
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)))
        else {
            continue;
        };

        for &(r, c) in &group {
            if (r, c) != (keep_row, keep_col) {
                grid.set(r, c, Cell::Empty);
                next_active.remove(r, c);
            }
        }
        let raised = (level as usize + group.len() - 1).min(MAX_LEVEL as usize + 1) as u8;
        grid.set(keep_row, keep_col, Cell::tile(raised));
        next_active.insert(keep_row, keep_col);

        outcome.groups += 1;
        outcome.cleared += (group.len() - 1) as u32;
        outcome.score = outcome
            .score
            .saturating_add(merge_score(group.len(), level, chain));
    }

    *active = next_active;
    outcome
}

/// Clear every explosive cell found in one scan.
///
/// Each blast destroys orthogonal junk and raises orthogonal tiles by one level;
/// raised tiles become the active set for the next merge step.
pub fn process_explosions(grid: &mut Grid, active: &mut ActiveSet, chain: u32) -> ExplosionOutcome {
    let mut outcome = ExplosionOutcome::default();
    let targets: ArrayVec<(i8, i8), GRID_SIZE> = grid
        .iter()
        .filter(|&(_, _, cell)| cell == Cell::Explosive)
        .map(|(row, col, _)| (row, col))
        .collect();

    if targets.is_empty() {
        return outcome;
    }

    let mut next_active = ActiveSet::new();
    for &(row, col) in &targets {
        grid.set(row, col, Cell::Empty);
        next_active.remove(row, col);

        for (dr, dc) in NEIGHBORS {
            let (nr, nc) = (row + dr, col + dc);
            match grid.get(nr, nc) {
                Some(Cell::Junk) => {
                    grid.set(nr, nc, Cell::Empty);
                    outcome.junk_destroyed += 1;
                }
                Some(cell @ Cell::Tile(_)) => {
                    grid.set(nr, nc, cell.raised(1));
                    next_active.insert(nr, nc);
                }
                // Explosives already in this batch are cleared in their own turn.
                _ => {}
            }
        }
    }

    next_active.retain_tiles(grid);
    *active = next_active;

    outcome.exploded = targets.len() as u32;
    outcome.score = explosion_score(targets.len(), chain);
    outcome
}

/// Resolver loop state for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    active: ActiveSet,
    chain: u32,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            active: ActiveSet::new(),
            chain: 0,
        }
    }

    /// Start a turn: chain back to zero, `active` seeds the first merge step.
    pub fn begin(&mut self, active: ActiveSet) {
        self.active = active;
        self.chain = 0;
    }

    pub fn chain(&self) -> u32 {
        self.chain
    }

    pub fn active(&self) -> &ActiveSet {
        &self.active
    }

    /// Run one iteration: merge, else explode, then gravity on change.
    pub fn step(&mut self, grid: &mut Grid) -> ResolveStep {
        let merged = process_merges(grid, &mut self.active, self.chain);
        if merged.changed() {
            grid.settle_tracking(&mut self.active);
            self.chain += 1;
            log::debug!(
                "[resolver] chain {} merged {} group(s) for {}",
                self.chain,
                merged.groups,
                merged.score
            );
            return ResolveStep::Merged(merged);
        }

        let exploded = process_explosions(grid, &mut self.active, self.chain);
        if exploded.changed() {
            grid.settle_tracking(&mut self.active);
            self.chain += 1;
            log::debug!(
                "[resolver] chain {} exploded {} cell(s) for {}",
                self.chain,
                exploded.exploded,
                exploded.score
            );
            return ResolveStep::Exploded(exploded);
        }

        ResolveStep::Stable
    }

    /// Iterate until the board is stable, returning the total score earned.
    pub fn run_to_stable(&mut self, grid: &mut Grid) -> u32 {
        let mut score = 0u32;
        loop {
            match self.step(grid) {
                ResolveStep::Merged(m) => score = score.saturating_add(m.score),
                ResolveStep::Exploded(e) => score = score.saturating_add(e.score),
                ResolveStep::Stable => return score,
            }
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
