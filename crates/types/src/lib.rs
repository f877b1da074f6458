//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, automated players, the lobby protocol).
//!
//! # Grid Dimensions
//!
//! - **Columns**: 6 (indexed 0-5, left to right)
//! - **Rows**: 12 (indexed 0-11, top to bottom)
//! - Coordinates are `(row, col)`; rows above the grid (`row < 0`) are legal for a
//!   falling piece but never for a locked cell.
//!
//! # Cell Levels
//!
//! Tiles carry a level `1..=MAX_LEVEL`. A tile pushed past `MAX_LEVEL` becomes
//! [`Cell::Explosive`] and is cleared by the next explosion step.
//!
//! # Turn Cadence
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `HEAT_INTERVAL` | 10 | Every Nth lock escalates the whole board |
//! | `JUNK_START` | 15 | First turn that may plan junk |
//! | `JUNK_BASE_INTERVAL` | 6 | Turns between junk batches before tightening |
//! | `JUNK_MIN_INTERVAL` | 3 | Tightest junk cadence |
//!
//! # Pacing
//!
//! Timing values are in milliseconds and only affect presentation; outcomes are
//! identical when the resolver runs synchronously.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `DROP_INTERVAL_MS` | 700 | Falling piece gravity |
//! | `RESOLVE_STEP_MS` | 180 | Delay between resolver iterations |
//! | `HIT_STOP_MS` | 300 | Input freeze after a long chain |
//!
//! # Examples
//!
//! ```
//! use heatfall_types::{Cell, GameAction, ShapeKind, GRID_COLS, MAX_LEVEL};
//!
//! assert_eq!(Cell::from_code(3), Some(Cell::Tile(3)));
//! assert_eq!(Cell::Tile(MAX_LEVEL).raised(1), Cell::Explosive);
//! assert_eq!(ShapeKind::from_str("l"), Some(ShapeKind::LTriple));
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//! assert_eq!(GRID_COLS, 6);
//! ```

/// Grid width in cells
pub const GRID_COLS: u8 = 6;

/// Grid height in cells
pub const GRID_ROWS: u8 = 12;

/// Highest stable tile level; anything above is explosive
pub const MAX_LEVEL: u8 = 5;

/// Raw code of a junk cell in the integer encoding
pub const JUNK_CODE: i8 = -1;

/// Heat fires on every lock whose turn number is a multiple of this
pub const HEAT_INTERVAL: u32 = 10;

/// First turn at which junk may be planned
pub const JUNK_START: u32 = 15;

/// Junk cadence before it starts tightening
pub const JUNK_BASE_INTERVAL: u32 = 6;

/// Floor of the junk cadence
pub const JUNK_MIN_INTERVAL: u32 = 3;

/// Every this many eligible turns the cadence tightens by one
pub const JUNK_INTERVAL_DECAY_TURNS: u32 = 20;

/// Smallest junk batch
pub const JUNK_MIN_BATCH: u32 = 2;

/// Largest junk batch
pub const JUNK_MAX_BATCH: u32 = 4;

/// Every this many eligible turns the batch grows by one column
pub const JUNK_BATCH_GROWTH_TURNS: u32 = 15;

/// Attempts at drawing a column not already in the batch
pub const JUNK_PICK_RETRIES: u32 = 20;

/// Base points per merged cell per level
pub const MERGE_POINTS: u32 = 15;

/// Base points per exploding cell
pub const EXPLOSION_POINTS: u32 = 200;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Falling piece gravity (one row per interval)
pub const DROP_INTERVAL_MS: u32 = 700;

/// Soft drop speed multiplier
pub const SOFT_DROP_MULTIPLIER: u32 = 10;

/// Delay between two resolver iterations
pub const RESOLVE_STEP_MS: u32 = 180;

/// Chain length that triggers a hit-stop once the board is stable
pub const HIT_STOP_CHAIN: u32 = 3;

/// Hit-stop duration
pub const HIT_STOP_MS: u32 = 300;

/// Relative spawn weights of each shape
pub const SHAPE_WEIGHTS: [(ShapeKind, u32); 4] = [
    (ShapeKind::Single, 20),
    (ShapeKind::Vertical2, 25),
    (ShapeKind::Vertical3, 30),
    (ShapeKind::LTriple, 25),
];

/// Relative weights of the level drawn for each piece cell
pub const LEVEL_WEIGHTS: [(u8, u32); 3] = [(1, 40), (2, 35), (3, 25)];


/// A cell on the grid
///
/// - `Empty`: nothing here
/// - `Junk`: indestructible filler, only removed by an adjacent explosion
/// - `Tile(level)`: colored tile, `1..=MAX_LEVEL`
/// - `Explosive`: a tile that went past `MAX_LEVEL` and waits for the explosion step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Junk,
    Tile(u8),
    Explosive,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn is_junk(self) -> bool {
        self == Cell::Junk
    }

    /// Tiles and explosives; the cells that heat and explosions act on
    pub fn is_tile(self) -> bool {
        matches!(self, Cell::Tile(_) | Cell::Explosive)
    }

    /// Level of a mergeable tile
    pub fn level(self) -> Option<u8> {
        match self {
            Cell::Tile(level) => Some(level),
            _ => None,
        }
    }

    /// Tile level raised by `by`, turning explosive past `MAX_LEVEL`.
    /// Empty and junk cells are returned unchanged.
    pub fn raised(self, by: u8) -> Cell {
        match self {
            Cell::Tile(level) => Cell::tile(level.saturating_add(by)),
            other => other,
        }
    }

    /// Tile of the given level, explosive when above `MAX_LEVEL`
    pub fn tile(level: u8) -> Cell {
        if level > MAX_LEVEL {
            Cell::Explosive
        } else {
            Cell::Tile(level)
        }
    }

    /// Integer encoding: 0 empty, -1 junk, level, `MAX_LEVEL + 1` explosive
    pub fn code(self) -> i8 {
        match self {
            Cell::Empty => 0,
            Cell::Junk => JUNK_CODE,
            Cell::Tile(level) => level as i8,
            Cell::Explosive => (MAX_LEVEL + 1) as i8,
        }
    }

    pub fn from_code(code: i8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            JUNK_CODE => Some(Cell::Junk),
            c if c > 0 => Some(Cell::tile(c as u8)),
            _ => None,
        }
    }
}

/// The falling shapes
///
/// Offsets are `(row, col)` in spawn orientation:
/// - **Single**: one cell, never rotates
/// - **Vertical2**: two stacked cells
/// - **Vertical3**: three stacked cells
/// - **LTriple**: two stacked cells with a foot to the right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Single,
    Vertical2,
    Vertical3,
    LTriple,
}

impl ShapeKind {
    /// Parse shape kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use heatfall_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("single"), Some(ShapeKind::Single));
    /// assert_eq!(ShapeKind::from_str("V3"), Some(ShapeKind::Vertical3));
    /// assert_eq!(ShapeKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" | "1" => Some(ShapeKind::Single),
            "v2" | "vertical2" => Some(ShapeKind::Vertical2),
            "v3" | "vertical3" => Some(ShapeKind::Vertical3),
            "l" | "ltriple" => Some(ShapeKind::LTriple),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Single => "single",
            ShapeKind::Vertical2 => "v2",
            ShapeKind::Vertical3 => "v3",
            ShapeKind::LTriple => "l",
        }
    }

    /// Spawn-orientation offsets, normalized so the minimum row and column are 0
    pub fn offsets(&self) -> &'static [(i8, i8)] {
        match self {
            ShapeKind::Single => &[(0, 0)],
            ShapeKind::Vertical2 => &[(0, 0), (1, 0)],
            ShapeKind::Vertical3 => &[(0, 0), (1, 0), (2, 0)],
            ShapeKind::LTriple => &[(0, 0), (1, 0), (1, 1)],
        }
    }
}

/// Game actions that can be applied to modify game state
///
/// These actions are used by both human input and automated players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down
    SoftDrop,
    /// Drop piece to its lowest legal row and lock it
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Swap with the held piece (once per turn)
    Hold,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use heatfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotateCw"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("pause"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "hold" => Some(GameAction::Hold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Hold => "hold",
        }
    }
}

/// Session lifecycle
///
/// `Ready → Playing → Resolving → (HitStop) → Playing ... → Dead`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Constructed, first piece not spawned yet
    #[default]
    Ready,
    /// A piece is falling and input is accepted
    Playing,
    /// Merge/explosion/gravity loop is draining
    Resolving,
    /// Board is stable but input is frozen after a long chain
    HitStop,
    /// Terminal; score and turn are frozen
    Dead,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Ready => "ready",
            Phase::Playing => "playing",
            Phase::Resolving => "resolving",
            Phase::HitStop => "hit_stop",
            Phase::Dead => "dead",
        }
    }
}

/// Summary of one finished turn (lock through stable board).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnReport {
    pub turn: u32,
    pub score_gained: u32,
    /// Highest chain counter reached this turn
    pub chain: u32,
    pub merges: u32,
    pub explosions: u32,
    pub heat: bool,
    pub junk_injected: u32,
}

/// Terminal state handed to the lobby when a session dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathReport {
    pub score: u32,
    pub turn: u32,
    pub cause: DeathCause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// A locked cell would sit above the visible grid
    Overflow,
    /// The next piece could not be placed at its spawn position
    SpawnBlocked,
}

impl DeathCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::Overflow => "overflow",
            DeathCause::SpawnBlocked => "spawn_blocked",
        }
    }
}
