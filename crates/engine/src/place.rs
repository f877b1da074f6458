use arrayvec::ArrayVec;

use crate::core::GameState;
use crate::types::{GameAction, Phase, GRID_COLS};

/// Upper bound on distinct placements of one piece (four turns, every column)
pub const MAX_PLACEMENTS: usize = 4 * GRID_COLS as usize;

/// A whole-piece move: turn the piece `rotation_steps` times clockwise, shift its
/// anchor to `col`, then hard drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub col: i8,
    pub rotation_steps: u8,
    pub use_hold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    HoldUnavailable,
    RotationBlocked,
    ColOutOfBounds,
    ColBlocked,
    NotPlayable,
    NoActive,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::HoldUnavailable => "hold_unavailable",
            PlaceError::RotationBlocked
            | PlaceError::ColOutOfBounds
            | PlaceError::ColBlocked
            | PlaceError::NotPlayable
            | PlaceError::NoActive => "invalid_place",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::HoldUnavailable => "hold requested when unavailable",
            PlaceError::RotationBlocked => "could not rotate to target orientation",
            PlaceError::ColOutOfBounds => "target column would place piece out of bounds",
            PlaceError::ColBlocked => "could not move to target column due to collision",
            PlaceError::NotPlayable => "game is not playable",
            PlaceError::NoActive => "no active piece",
        }
    }
}

/// Play one placement. On error the session is left exactly as it was.
pub fn apply_place(
    state: &mut GameState,
    target_col: i8,
    rotation_steps: u8,
    use_hold: bool,
) -> Result<(), PlaceError> {
    if state.phase() != Phase::Playing {
        return Err(PlaceError::NotPlayable);
    }

    let original = state.clone();
    let result = place(state, target_col, rotation_steps, use_hold);
    if result.is_err() {
        *state = original;
    }
    result
}

fn place(
    state: &mut GameState,
    target_col: i8,
    rotation_steps: u8,
    use_hold: bool,
) -> Result<(), PlaceError> {
    // Hold first if requested.
    if use_hold && !state.apply_action(GameAction::Hold) {
        return Err(PlaceError::HoldUnavailable);
    }
    // Promoting the queued piece can top out.
    if state.phase() != Phase::Playing {
        return Err(PlaceError::NotPlayable);
    }

    steer(state, target_col, rotation_steps)?;

    if !state.apply_action(GameAction::HardDrop) {
        return Err(if state.active().is_none() {
            PlaceError::NoActive
        } else {
            PlaceError::NotPlayable
        });
    }
    Ok(())
}

/// Rotate and shift the active piece without dropping it.
fn steer(state: &mut GameState, target_col: i8, rotation_steps: u8) -> Result<(), PlaceError> {
    let Some(active0) = state.active() else {
        return Err(PlaceError::NoActive);
    };

    // Single cells look the same every way up.
    let cw = if active0.cells.len() <= 1 {
        0
    } else {
        rotation_steps % 4
    };
    let ccw = (4 - cw) % 4;

    // Try both directions; keep shorter first.
    let mut plans: [(bool, u8); 2] = [(true, cw), (false, ccw)];
    if plans[1].1 < plans[0].1 {
        plans.swap(0, 1);
    }

    let snapshot = state.clone();
    let mut rotated = false;
    for (is_cw, steps) in plans {
        *state = snapshot.clone();
        if (0..steps).all(|_| state.try_rotate(is_cw)) {
            rotated = true;
            break;
        }
    }
    if !rotated {
        return Err(PlaceError::RotationBlocked);
    }

    let Some(active) = state.active() else {
        return Err(PlaceError::NoActive);
    };
    if target_col < 0 || target_col + active.width() > GRID_COLS as i8 {
        return Err(PlaceError::ColOutOfBounds);
    }

    let d_col = target_col - active.col;
    for _ in 0..d_col.abs() {
        if !state.try_move(0, d_col.signum()) {
            return Err(PlaceError::ColBlocked);
        }
    }
    Ok(())
}

/// Every placement of the active piece that can be steered into position.
pub fn legal_placements(state: &GameState) -> ArrayVec<Placement, MAX_PLACEMENTS> {
    let mut out = ArrayVec::new();
    if state.phase() != Phase::Playing {
        return out;
    }
    let Some(active) = state.active() else {
        return out;
    };

    let orientations = if active.cells.len() <= 1 { 1 } else { 4 };
    for rotation_steps in 0..orientations {
        for col in 0..GRID_COLS as i8 {
            let mut probe = state.clone();
            if steer(&mut probe, col, rotation_steps).is_ok() {
                out.push(Placement {
                    col,
                    rotation_steps,
                    use_hold: false,
                });
            }
        }
    }
    out
}
