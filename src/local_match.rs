//! Headless local match: automated players on one device, refereed by the host
//! runtime exactly like a networked lobby.

use anyhow::{anyhow, Result};

use crate::adapter::{BestScoreStore, Host, OutboundMessage, PlayerInfo, PlayerRecord};
use crate::cli::MatchConfig;
use crate::core::{GameState, ResolveMode};
use crate::engine::{apply_place, Policy, RandomPolicy};
use crate::types::GameAction;

const AVATARS: [&str; 8] = ["fox", "owl", "elk", "yak", "cod", "bee", "ram", "eel"];

/// Salt for per-player policy seeds; every player gets the same piece sequence.
const POLICY_SEED_SALT: u32 = 0x85eb_ca6b;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub rankings: Vec<PlayerRecord>,
    /// Every line the host published, in order
    pub transcript: Vec<String>,
    /// Score of the host's own player (`p1`)
    pub local_score: u32,
    pub best_score: u32,
    pub new_best: bool,
}

struct Seat {
    id: String,
    state: GameState,
    policy: RandomPolicy,
    reported: bool,
}

impl Seat {
    fn new(index: usize, seed: u32) -> Self {
        let mut state = GameState::with_mode(seed, ResolveMode::Immediate);
        state.start();
        Self {
            id: player_id(index),
            state,
            policy: RandomPolicy::new(seed ^ POLICY_SEED_SALT.wrapping_mul(index as u32 + 1)),
            reported: false,
        }
    }

    /// Play one placement; falls back to dropping where the piece stands.
    fn play_turn(&mut self) {
        let placed = self
            .policy
            .choose(&self.state)
            .map(|p| apply_place(&mut self.state, p.col, p.rotation_steps, p.use_hold).is_ok())
            .unwrap_or(false);
        if !placed {
            self.state.apply_action(GameAction::HardDrop);
        }
    }
}

fn player_id(index: usize) -> String {
    format!("p{}", index + 1)
}

pub fn roster(count: usize) -> Vec<PlayerInfo> {
    (0..count)
        .map(|i| {
            PlayerInfo::new(
                player_id(i),
                format!("Player {}", i + 1),
                AVATARS[i % AVATARS.len()],
            )
        })
        .collect()
}

/// Run every seat to death (or the turn limit), collect the rankings and update
/// the local best score.
pub fn run_match(config: &MatchConfig) -> Result<MatchOutcome> {
    let mut store = BestScoreStore::open(&config.host.best_score_path);
    let previous_best = store.best(&config.host.profile);

    let mut host = Host::start(&config.host, roster(config.players))?;
    let mut seats: Vec<Seat> = (0..config.players)
        .map(|i| Seat::new(i, config.host.seed))
        .collect();

    while seats.iter().any(|s| !s.reported) {
        for seat in seats.iter_mut().filter(|s| !s.reported) {
            if !seat.state.is_dead() && seat.state.turn() < config.max_turns {
                seat.play_turn();
            }

            let (score, turn) = if let Some(death) = seat.state.take_death_report() {
                (death.score, death.turn)
            } else if seat.state.turn() >= config.max_turns {
                log::info!("[match] {} retired at turn {}", seat.id, seat.state.turn());
                (seat.state.score(), seat.state.turn())
            } else {
                continue;
            };
            host.report_death(&seat.id, score, turn)?;
            seat.reported = true;
        }
    }

    let rankings = host.wait_rankings()?;
    let mut transcript = Vec::new();
    while let Some(msg) = host.try_recv() {
        if let OutboundMessage::Broadcast { line } = msg {
            transcript.push(line);
        }
    }
    host.shutdown()?;

    let local_score = rankings
        .iter()
        .find(|r| r.id == player_id(0))
        .map(|r| r.score)
        .ok_or_else(|| anyhow!("local player missing from rankings"))?;
    let new_best = store.record(&config.host.profile, local_score)?;

    Ok(MatchOutcome {
        rankings,
        transcript,
        local_score,
        best_score: previous_best.max(local_score),
        new_best,
    })
}
