//! Host runtime integration.
//!
//! Runs the lobby on a tokio task. The transport (whatever carries lines between
//! devices) feeds `Inbound` values in and delivers `OutboundMessage`s out; the
//! game loop on the host reports its own players' deaths through the same channel.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::best_score::DEFAULT_BEST_SCORE_PATH;
use crate::lobby::Lobby;
use crate::protocol::{parse_message, LobbyMessage, PlayerInfo, PlayerRecord};

/// Host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Best-score key for this device
    pub profile: String,
    pub best_score_path: PathBuf,
    pub seed: u32,
    pub max_pending: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            profile: "default".to_string(),
            best_score_path: PathBuf::from(DEFAULT_BEST_SCORE_PATH),
            seed: 1,
            max_pending: 64,
        }
    }
}

impl HostConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let profile = env::var("HEATFALL_PROFILE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.profile);

        let best_score_path = env::var("HEATFALL_BEST_SCORE_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.best_score_path);

        let seed = env::var("HEATFALL_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);

        let max_pending = env::var("HEATFALL_MAX_PENDING")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending);

        Self {
            profile,
            best_score_path,
            seed,
            max_pending,
        }
    }
}

/// Input delivered to the host task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Raw line received from a guest
    Line { from: String, line: String },
    /// A player simulated on the host died
    LocalDeath { id: String, score: u32, turn: u32 },
    Shutdown,
}

/// Outbound message to be delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Broadcast { line: String },
    ToPlayer { id: String, line: String },
}

fn publish(outbound: &mpsc::UnboundedSender<OutboundMessage>, msg: OutboundMessage) {
    if outbound.send(msg).is_err() {
        log::debug!("[lobby] transport gone, dropping outbound message");
    }
}

fn broadcast(outbound: &mpsc::UnboundedSender<OutboundMessage>, msg: &LobbyMessage) -> Result<()> {
    let line = msg
        .to_line()
        .with_context(|| format!("Failed to encode {}", msg.event()))?;
    publish(outbound, OutboundMessage::Broadcast { line });
    Ok(())
}

/// Run the lobby until `Shutdown` or until every inbound sender is gone.
///
/// `finished` receives the rankings the moment the last player dies. The task keeps
/// running afterwards and answers late guests with the rankings. Returns the final
/// standings.
pub async fn run_host(
    players: Vec<PlayerInfo>,
    mut inbound: mpsc::Receiver<Inbound>,
    outbound: mpsc::UnboundedSender<OutboundMessage>,
    finished: oneshot::Sender<Vec<PlayerRecord>>,
) -> Result<Vec<PlayerRecord>> {
    let mut lobby = Lobby::new(&players);
    let mut finished = Some(finished);
    let mut rankings_line: Option<String> = None;

    broadcast(&outbound, &lobby.start_message())?;
    log::info!("[lobby] game started with {} player(s)", players.len());

    while let Some(msg) = inbound.recv().await {
        let (id, score, turn) = match msg {
            Inbound::Shutdown => break,
            Inbound::LocalDeath { id, score, turn } => (id, score, turn),
            Inbound::Line { from, line } => {
                if let Some(ref rankings) = rankings_line {
                    publish(
                        &outbound,
                        OutboundMessage::ToPlayer {
                            id: from,
                            line: rankings.clone(),
                        },
                    );
                    continue;
                }
                match parse_message(&line) {
                    // Guests only ever report their own death.
                    Some(LobbyMessage::PlayerDead { id, score, turn }) if id == from => {
                        (id, score, turn)
                    }
                    Some(other) => {
                        log::warn!("[lobby] ignoring {} from {}", other.event(), from);
                        continue;
                    }
                    None => continue,
                }
            }
        };

        if !lobby.report_death(&id, score, turn) {
            continue;
        }
        broadcast(&outbound, &LobbyMessage::PlayerDead { id, score, turn })?;

        if let Some(rankings) = lobby.take_rankings() {
            let line = rankings.to_line().context("Failed to encode rankings")?;
            publish(&outbound, OutboundMessage::Broadcast { line: line.clone() });
            rankings_line = Some(line);
            log::info!("[lobby] all players dead, rankings published");
            if let Some(tx) = finished.take() {
                let _ = tx.send(lobby.standings());
            }
        }
    }

    Ok(lobby.standings())
}

/// Async handle to a spawned host task
pub struct HostHandle {
    inbound: mpsc::Sender<Inbound>,
    finished: Option<oneshot::Receiver<Vec<PlayerRecord>>>,
    task: JoinHandle<Result<Vec<PlayerRecord>>>,
}

/// Spawn the host task on the current tokio runtime.
pub fn spawn_host(
    config: &HostConfig,
    players: Vec<PlayerInfo>,
) -> (HostHandle, mpsc::UnboundedReceiver<OutboundMessage>) {
    let (in_tx, in_rx) = mpsc::channel::<Inbound>(config.max_pending.max(1));
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (done_tx, done_rx) = oneshot::channel();

    let task = tokio::spawn(run_host(players, in_rx, out_tx, done_tx));

    (
        HostHandle {
            inbound: in_tx,
            finished: Some(done_rx),
            task,
        },
        out_rx,
    )
}

impl HostHandle {
    /// Sender for the transport
    pub fn sender(&self) -> mpsc::Sender<Inbound> {
        self.inbound.clone()
    }

    /// Hand a raw line from guest `from` to the host
    pub async fn deliver(&self, from: &str, line: &str) -> Result<()> {
        self.inbound
            .send(Inbound::Line {
                from: from.to_string(),
                line: line.to_string(),
            })
            .await
            .map_err(|_| anyhow!("host stopped"))
    }

    /// Report the death of a player simulated on the host
    pub async fn report_death(&self, id: &str, score: u32, turn: u32) -> Result<()> {
        self.inbound
            .send(Inbound::LocalDeath {
                id: id.to_string(),
                score,
                turn,
            })
            .await
            .map_err(|_| anyhow!("host stopped"))
    }

    /// Wait until every player has died and return the rankings
    pub async fn finished(&mut self) -> Result<Vec<PlayerRecord>> {
        let rx = self
            .finished
            .take()
            .ok_or_else(|| anyhow!("rankings already taken"))?;
        rx.await
            .map_err(|_| anyhow!("host stopped before every player died"))
    }

    /// Stop the host and return the standings at that point
    pub async fn shutdown(self) -> Result<Vec<PlayerRecord>> {
        // The task may already be gone; the join below reports how it ended.
        let _ = self.inbound.send(Inbound::Shutdown).await;
        self.task.await.context("host task failed")?
    }
}

/// Running host for synchronous callers.
pub struct Host {
    rt: Runtime,
    handle: HostHandle,
    out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
}

impl Host {
    pub fn start(config: &HostConfig, players: Vec<PlayerInfo>) -> Result<Self> {
        let rt = Runtime::new().context("Failed to create tokio runtime")?;
        let (handle, out_rx) = {
            let _guard = rt.enter();
            spawn_host(config, players)
        };
        Ok(Self { rt, handle, out_rx })
    }

    pub fn report_death(&self, id: &str, score: u32, turn: u32) -> Result<()> {
        self.handle
            .inbound
            .blocking_send(Inbound::LocalDeath {
                id: id.to_string(),
                score,
                turn,
            })
            .map_err(|_| anyhow!("host stopped"))
    }

    pub fn try_recv(&mut self) -> Option<OutboundMessage> {
        self.out_rx.try_recv().ok()
    }

    /// Block until the rankings are published
    pub fn wait_rankings(&mut self) -> Result<Vec<PlayerRecord>> {
        self.rt.block_on(self.handle.finished())
    }

    pub fn shutdown(self) -> Result<Vec<PlayerRecord>> {
        let Host { rt, handle, .. } = self;
        rt.block_on(handle.shutdown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players() -> Vec<PlayerInfo> {
        vec![
            PlayerInfo::new("host", "Ada", "fox"),
            PlayerInfo::new("guest", "Bo", "owl"),
        ]
    }

    fn line_of(msg: OutboundMessage) -> String {
        match msg {
            OutboundMessage::Broadcast { line } => line,
            OutboundMessage::ToPlayer { line, .. } => line,
        }
    }

    #[tokio::test]
    async fn host_publishes_start_deaths_and_rankings() {
        let (mut handle, mut out) = spawn_host(&HostConfig::default(), players());

        let start = parse_message(&line_of(out.recv().await.unwrap())).unwrap();
        assert_eq!(start.event(), "game-start");

        handle
            .deliver("guest", r#"{"event":"player-dead","id":"guest","score":300,"turn":22}"#)
            .await
            .unwrap();
        handle.report_death("host", 120, 14).await.unwrap();

        let dead = parse_message(&line_of(out.recv().await.unwrap())).unwrap();
        assert_eq!(
            dead,
            LobbyMessage::PlayerDead {
                id: "guest".to_string(),
                score: 300,
                turn: 22
            }
        );
        assert_eq!(
            parse_message(&line_of(out.recv().await.unwrap())).unwrap().event(),
            "player-dead"
        );
        let Some(LobbyMessage::Rankings { rankings }) =
            parse_message(&line_of(out.recv().await.unwrap()))
        else {
            panic!("expected rankings");
        };
        assert_eq!(rankings[0].id, "guest");
        assert_eq!(rankings[1].id, "host");

        let finished = handle.finished().await.unwrap();
        assert_eq!(finished, rankings);

        let standings = handle.shutdown().await.unwrap();
        assert_eq!(standings, rankings);
    }

    #[tokio::test]
    async fn guest_cannot_report_someone_else() {
        let (handle, mut out) = spawn_host(&HostConfig::default(), players());
        let _start = out.recv().await.unwrap();

        handle
            .deliver("guest", r#"{"event":"player-dead","id":"host","score":1,"turn":1}"#)
            .await
            .unwrap();
        handle.deliver("guest", "garbage").await.unwrap();
        handle
            .deliver("guest", r#"{"event":"game-start","players":[]}"#)
            .await
            .unwrap();
        handle.report_death("host", 40, 3).await.unwrap();

        let dead = parse_message(&line_of(out.recv().await.unwrap())).unwrap();
        assert_eq!(
            dead,
            LobbyMessage::PlayerDead {
                id: "host".to_string(),
                score: 40,
                turn: 3
            }
        );

        let standings = handle.shutdown().await.unwrap();
        assert!(standings.iter().find(|r| r.id == "guest").is_some_and(|r| !r.dead));
    }

    #[tokio::test]
    async fn late_guest_gets_rankings_directly() {
        let (mut handle, mut out) = spawn_host(&HostConfig::default(), players());
        handle.report_death("host", 10, 2).await.unwrap();
        handle.report_death("guest", 20, 4).await.unwrap();
        let rankings = handle.finished().await.unwrap();

        handle
            .deliver("guest", r#"{"event":"player-dead","id":"guest","score":99,"turn":9}"#)
            .await
            .unwrap();
        let standings = handle.shutdown().await.unwrap();
        assert_eq!(standings, rankings);

        let mut last = None;
        while let Ok(msg) = out.try_recv() {
            last = Some(msg);
        }
        let Some(OutboundMessage::ToPlayer { id, line }) = last else {
            panic!("expected a direct reply");
        };
        assert_eq!(id, "guest");
        assert_eq!(parse_message(&line).unwrap().event(), "rankings");
    }

    #[test]
    fn sync_host_runs_its_own_runtime() {
        let mut host = Host::start(&HostConfig::default(), players()).unwrap();
        host.report_death("guest", 5, 1).unwrap();
        host.report_death("host", 7, 2).unwrap();

        let rankings = host.wait_rankings().unwrap();
        assert_eq!(rankings[0].id, "host");

        let mut lines = 0;
        while host.try_recv().is_some() {
            lines += 1;
        }
        // game-start, two deaths, rankings
        assert_eq!(lines, 4);

        host.shutdown().unwrap();
    }

    #[test]
    fn default_config() {
        let config = HostConfig::default();
        assert_eq!(config.profile, "default");
        assert_eq!(config.best_score_path, PathBuf::from(DEFAULT_BEST_SCORE_PATH));
    }
}
