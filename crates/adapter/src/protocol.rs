//! Protocol module - JSON messages of the host-authoritative lobby
//!
//! Every message is a single JSON object tagged by `event`. The transport that
//! carries the lines is not part of this crate.

use serde::{Deserialize, Serialize};

use crate::types::DeathReport;

/// A participant as announced at session start
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub score: u32,
}

impl PlayerInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: avatar.into(),
            score: 0,
        }
    }
}

/// Host-side record of one participant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub score: u32,
    pub turn: u32,
    pub dead: bool,
}

impl From<&PlayerInfo> for PlayerRecord {
    fn from(value: &PlayerInfo) -> Self {
        Self {
            id: value.id.clone(),
            name: value.name.clone(),
            avatar: value.avatar.clone(),
            score: 0,
            turn: 0,
            dead: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum LobbyMessage {
    /// Host → all: the match begins with this roster (scores zeroed)
    GameStart { players: Vec<PlayerInfo> },
    /// Guest → host (or local on the host): a player's session ended
    PlayerDead { id: String, score: u32, turn: u32 },
    /// Host → all: final standings, best score first
    Rankings { rankings: Vec<PlayerRecord> },
}

impl LobbyMessage {
    /// Death announcement for a session that just ended
    pub fn player_dead(id: impl Into<String>, report: &DeathReport) -> Self {
        LobbyMessage::PlayerDead {
            id: id.into(),
            score: report.score,
            turn: report.turn,
        }
    }

    pub fn event(&self) -> &'static str {
        match self {
            LobbyMessage::GameStart { .. } => "game-start",
            LobbyMessage::PlayerDead { .. } => "player-dead",
            LobbyMessage::Rankings { .. } => "rankings",
        }
    }

    /// Encode as one JSON line (no trailing newline)
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Parse one line. Malformed or unknown messages yield `None`.
pub fn parse_message(line: &str) -> Option<LobbyMessage> {
    match serde_json::from_str::<LobbyMessage>(line.trim()) {
        Ok(msg) => Some(msg),
        Err(e) => {
            log::warn!("[lobby] ignoring malformed message: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_start_wire_format() {
        let msg = LobbyMessage::GameStart {
            players: vec![PlayerInfo::new("p1", "Ada", "fox")],
        };
        let line = msg.to_line().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["event"], "game-start");
        assert_eq!(value["players"][0]["id"], "p1");
        assert_eq!(value["players"][0]["avatar"], "fox");
        assert_eq!(value["players"][0]["score"], 0);
    }

    #[test]
    fn test_parse_player_dead() {
        let msg = parse_message(r#"{"event":"player-dead","id":"p2","score":480,"turn":37}"#);
        assert_eq!(
            msg,
            Some(LobbyMessage::PlayerDead {
                id: "p2".to_string(),
                score: 480,
                turn: 37
            })
        );
        assert_eq!(msg.unwrap().event(), "player-dead");
    }

    #[test]
    fn test_player_dead_from_report() {
        let report = DeathReport {
            score: 75,
            turn: 9,
            cause: crate::types::DeathCause::SpawnBlocked,
        };
        assert_eq!(
            LobbyMessage::player_dead("p3", &report),
            LobbyMessage::PlayerDead {
                id: "p3".to_string(),
                score: 75,
                turn: 9
            }
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_message("not json"), None);
        assert_eq!(parse_message(r#"{"event":"resign","id":"p1"}"#), None);
        assert_eq!(parse_message(r#"{"event":"player-dead","id":"p1"}"#), None);
        assert_eq!(parse_message(r#"{"id":"p1","score":1,"turn":1}"#), None);
    }

    #[test]
    fn test_rankings_carry_records() {
        let msg = LobbyMessage::Rankings {
            rankings: vec![PlayerRecord {
                id: "p1".to_string(),
                name: "Ada".to_string(),
                avatar: String::new(),
                score: 90,
                turn: 12,
                dead: true,
            }],
        };
        let line = msg.to_line().unwrap();
        assert!(line.starts_with(r#"{"event":"rankings","rankings":[{"id":"p1""#));
        assert_eq!(parse_message(&line), Some(msg));
    }
}
