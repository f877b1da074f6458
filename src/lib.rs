//! Heatfall (workspace facade crate).
//!
//! Re-exports the workspace crates as `heatfall::{core,engine,adapter,types}` and
//! hosts the headless match runner used by the `heatfall` binary.

pub use heatfall_adapter as adapter;
pub use heatfall_core as core;
pub use heatfall_engine as engine;
pub use heatfall_types as types;

pub mod cli;
pub mod local_match;
