//! Lobby module - the host's roster and rankings
//!
//! Only the host owns a `Lobby`. Guests report their own deaths; the host records
//! them and, once every player is dead, publishes the rankings.

use crate::protocol::{LobbyMessage, PlayerInfo, PlayerRecord};

#[derive(Debug, Clone)]
pub struct Lobby {
    /// Roster order; ties in the rankings keep this order
    records: Vec<PlayerRecord>,
    ranked: bool,
}

impl Lobby {
    pub fn new(players: &[PlayerInfo]) -> Self {
        Self {
            records: players.iter().map(PlayerRecord::from).collect(),
            ranked: false,
        }
    }

    /// The `game-start` broadcast for this roster
    pub fn start_message(&self) -> LobbyMessage {
        LobbyMessage::GameStart {
            players: self
                .records
                .iter()
                .map(|r| PlayerInfo::new(r.id.as_str(), r.name.as_str(), r.avatar.as_str()))
                .collect(),
        }
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&PlayerRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn alive_count(&self) -> usize {
        self.records.iter().filter(|r| !r.dead).count()
    }

    pub fn all_dead(&self) -> bool {
        self.records.iter().all(|r| r.dead)
    }

    /// Record a death. Unknown ids and repeated reports are ignored.
    pub fn report_death(&mut self, id: &str, score: u32, turn: u32) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            log::warn!("[lobby] death report for unknown player {}", id);
            return false;
        };
        if record.dead {
            log::warn!("[lobby] duplicate death report for {}", id);
            return false;
        }

        record.score = score;
        record.turn = turn;
        record.dead = true;
        log::info!(
            "[lobby] {} died at turn {} with {} ({} alive)",
            id,
            turn,
            score,
            self.alive_count()
        );
        true
    }

    /// Players by score, best first; equal scores keep roster order.
    pub fn standings(&self) -> Vec<PlayerRecord> {
        let mut out = self.records.clone();
        out.sort_by(|a, b| b.score.cmp(&a.score));
        out
    }

    /// The `rankings` message, produced once, when the last player has died.
    pub fn take_rankings(&mut self) -> Option<LobbyMessage> {
        if self.ranked || !self.all_dead() {
            return None;
        }
        self.ranked = true;
        Some(LobbyMessage::Rankings {
            rankings: self.standings(),
        })
    }

    pub fn is_ranked(&self) -> bool {
        self.ranked
    }
}
