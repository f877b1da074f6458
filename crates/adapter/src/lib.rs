//! Adapter module - host-authoritative multiplayer lobby
//!
//! In a multiplayer match only the host runs sessions to completion and owns the
//! roster. Guests never simulate other players; they report their own death and
//! receive the host's broadcasts.
//!
//! # Protocol Overview
//!
//! Messages are single-line JSON objects tagged by `event`:
//!
//! 1. **Session start** (host → all): `game-start` with the roster, scores zeroed
//! 2. **Player death** (guest → host, or local on the host): `player-dead`
//! 3. **Rankings** (host → all): sent once every player is dead, sorted by score
//!    descending with ties kept in roster order
//!
//! Unknown players, repeated death reports, malformed lines and host-only events
//! sent by a guest are ignored.
//!
//! # Example Protocol Flow
//!
//! ```text
//! Host -> All:   {"event":"game-start","players":[{"id":"p1","name":"Ada","avatar":"fox","score":0},...]}
//! Guest -> Host: {"event":"player-dead","id":"p2","score":480,"turn":37}
//! Host -> All:   {"event":"player-dead","id":"p2","score":480,"turn":37}
//! Host -> All:   {"event":"rankings","rankings":[{"id":"p2","name":"Bo","avatar":"owl","score":480,"turn":37,"dead":true},...]}
//! ```
//!
//! # Environment Variables
//!
//! - `HEATFALL_PROFILE`: Best-score key for this device (default: "default")
//! - `HEATFALL_BEST_SCORE_PATH`: Best-score file (default: "heatfall-best.json")
//! - `HEATFALL_SEED`: Match seed (default: 1)
//! - `HEATFALL_MAX_PENDING`: Inbound queue depth (default: 64)
//!
//! # Implementation
//!
//! - Uses **tokio** for the host task; the transport is any code holding the
//!   channel ends (see [`runtime`])
//! - See [`protocol`] for message structure definitions
//! - See [`lobby`] for roster and rankings
//! - See [`best_score`] for per-profile best-score persistence

pub mod best_score;
pub mod lobby;
pub mod protocol;
pub mod runtime;

pub use heatfall_types as types;

pub use best_score::{BestScoreStore, DEFAULT_BEST_SCORE_PATH};
pub use lobby::Lobby;
pub use protocol::*;
pub use runtime::{run_host, spawn_host, Host, HostConfig, HostHandle, Inbound, OutboundMessage};
