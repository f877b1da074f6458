//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **no dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games (pieces and junk alike)
//! - **Testable**: Unit tests for every rule, scenario tests in the workspace root
//! - **Portable**: Runs headless, under the lobby host, or behind any front end
//! - **Allocation-free**: Grids, groups and active sets live in fixed-size arrays
//!
//! # Module Structure
//!
//! - [`grid`]: 6x12 cell grid, gravity and the active-coordinate set
//! - [`pieces`]: Shapes with per-cell levels, rotation and placement legality
//! - [`rng`]: Seeded LCG and the weighted piece generator
//! - [`resolver`]: Merge, explosion and chain loop run after every lock
//! - [`heat`]: Periodic escalation of every tile
//! - [`junk`]: Junk planning, warning and injection
//! - [`scoring`]: Merge and explosion scoring
//! - [`game_state`]: Session controller tying the above into turns
//! - [`snapshot`]: Plain-data view of a session for observers
//!
//! # Game Rules
//!
//! - **Merging**: Two or more orthogonally connected tiles of one level collapse
//!   into the lowest (then leftmost) of them, gaining a level per absorbed tile
//! - **Explosions**: Tiles pushed past `MAX_LEVEL` explode, destroying adjacent
//!   junk and raising adjacent tiles
//! - **Chains**: Every changing resolver iteration bumps the chain multiplier
//! - **Heat**: Every `HEAT_INTERVAL`th lock raises every tile on the board
//! - **Junk**: From `JUNK_START` on, warned junk drops onto random columns
//! - **Hold**: Store one piece for later use (once per turn)
//!
//! # Example
//!
//! ```
//! use heatfall_core::{GameState, ResolveMode};
//! use heatfall_types::{GameAction, Phase};
//!
//! // Resolve synchronously so each hard drop finishes its turn
//! let mut game = GameState::with_mode(12345, ResolveMode::Immediate);
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.turn(), 1);
//! assert_eq!(game.phase(), Phase::Playing);
//! ```
//!
//! # Timing
//!
//! In [`ResolveMode::Paced`] the session runs on a fixed timestep:
//! - **Gravity**: `DROP_INTERVAL_MS` per row, divided by `SOFT_DROP_MULTIPLIER` on soft drop
//! - **Resolver**: One iteration per `RESOLVE_STEP_MS`
//! - **Hit-stop**: `HIT_STOP_MS` freeze after a chain of `HIT_STOP_CHAIN` or more
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with elapsed time.

pub mod game_state;
pub mod grid;
pub mod heat;
pub mod junk;
pub mod pieces;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use heatfall_types as types;

// Re-export commonly used types for convenience
pub use game_state::{GameState, ResolveMode};
pub use grid::{ActiveSet, Grid};
pub use junk::JunkScheduler;
pub use pieces::{can_place_at, landing_row, try_rotate, Piece};
pub use resolver::{ResolveStep, Resolver};
pub use rng::{PieceGenerator, SimpleRng};
pub use scoring::{explosion_score, merge_score};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
