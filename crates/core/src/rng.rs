//! RNG module - weighted random piece generation
//!
//! Shapes and per-cell levels are drawn independently from the weight tables in
//! [`crate::types`]. A simple LCG keeps every game reproducible from its seed.

use crate::pieces::{Piece, MAX_PIECE_CELLS};
use crate::types::{ShapeKind, LEVEL_WEIGHTS, SHAPE_WEIGHTS};

use arrayvec::ArrayVec;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits (multiply-shift); the low bits of an LCG have short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max <= 1 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Pick a value from a `(value, weight)` table. Zero total weight picks the first entry.
    pub fn pick_weighted<T: Copy>(&mut self, table: &[(T, u32)]) -> T {
        let total: u32 = table.iter().map(|&(_, w)| w).sum();
        let mut roll = self.next_range(total);
        for &(value, weight) in table {
            if roll < weight {
                return value;
            }
            roll -= weight;
        }
        table[0].0
    }

    /// Current state (reseeding with it continues the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Weighted piece generator
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: SimpleRng,
    seed: u32,
}

impl PieceGenerator {
    /// Create a new generator with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            seed,
        }
    }

    /// Draw the next piece: a weighted shape whose cells each get a weighted level,
    /// anchored at its spawn position.
    pub fn next(&mut self) -> Piece {
        let kind: ShapeKind = self.rng.pick_weighted(&SHAPE_WEIGHTS);
        let levels: ArrayVec<u8, MAX_PIECE_CELLS> = kind
            .offsets()
            .iter()
            .map(|_| self.rng.pick_weighted(&LEVEL_WEIGHTS))
            .collect();
        Piece::new(kind, &levels)
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}
