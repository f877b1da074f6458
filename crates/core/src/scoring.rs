//! Scoring module - merge and explosion points
//!
//! - A merge of `k` tiles at level `L` is worth `k * L * 15`, times the chain
//!   counter (at least 1).
//! - An explosion step is worth `200` per exploding cell, times the chain counter
//!   plus one.

use crate::types::{EXPLOSION_POINTS, MERGE_POINTS};

/// Points for one merged group
pub fn merge_score(group_size: usize, level: u8, chain: u32) -> u32 {
    (group_size as u32)
        .saturating_mul(level as u32)
        .saturating_mul(MERGE_POINTS)
        .saturating_mul(chain.max(1))
}

/// Points for one explosion step that cleared `exploding` cells
pub fn explosion_score(exploding: usize, chain: u32) -> u32 {
    (exploding as u32)
        .saturating_mul(EXPLOSION_POINTS)
        .saturating_mul(chain.saturating_add(1))
}
