//! Engine module - placement planning for automated players
//!
//! Automated players think in whole placements ("this piece, turned this way, in
//! that column") rather than individual key presses. This crate turns a placement
//! into the equivalent sequence of session actions and offers simple policies that
//! pick one.
//!
//! - See [`place`] for the planner and its error codes
//! - See [`policy`] for the `Policy` trait and the seeded random player

pub mod place;
pub mod policy;

pub use heatfall_core as core;
pub use heatfall_types as types;

pub use place::{apply_place, legal_placements, PlaceError, Placement, MAX_PLACEMENTS};
pub use policy::{Policy, RandomPolicy};
