//! Game state module - the session controller
//!
//! This module ties together all core components: grid, pieces, generator, resolver,
//! heat and junk. It owns the score and turn counters and drives the turn cycle:
//! spawn → fall → lock → resolve (or heat, then resolve) → junk → next spawn.

use crate::grid::{ActiveSet, Grid};
use crate::heat::{heat, is_heat_turn};
use crate::junk::JunkScheduler;
use crate::pieces::{can_place_at, landing_row, try_rotate, Piece};
use crate::resolver::{ResolveStep, Resolver};
use crate::rng::PieceGenerator;
use crate::snapshot::{board_hash, ActiveSnapshot, GameSnapshot};
use crate::types::*;

/// How the resolver loop is drained after a lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// One iteration per `RESOLVE_STEP_MS` of ticked time, hit-stop after long chains
    #[default]
    Paced,
    /// Run to a stable board inside the lock call
    Immediate,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    active: Option<Piece>,
    hold: Option<Piece>,
    next: Piece,
    generator: PieceGenerator,
    junk: JunkScheduler,
    resolver: Resolver,
    mode: ResolveMode,
    phase: Phase,
    seed: u32,
    score: u32,
    /// Completed locks; drives heat and junk cadence
    turn: u32,
    can_hold: bool,
    drop_timer_ms: u32,
    resolve_timer_ms: u32,
    hit_stop_ms: u32,
    /// Report for the turn currently resolving
    turn_report: TurnReport,
    /// Last finished turn (consumed by observers).
    last_report: Option<TurnReport>,
    death: Option<DeathReport>,
    death_taken: bool,
}

impl GameState {
    /// Create a new paced game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::with_mode(seed, ResolveMode::Paced)
    }

    pub fn with_mode(seed: u32, mode: ResolveMode) -> Self {
        let mut generator = PieceGenerator::new(seed);
        let next = generator.next();

        Self {
            grid: Grid::new(),
            active: None,
            hold: None,
            next,
            generator,
            junk: JunkScheduler::new(seed),
            resolver: Resolver::new(),
            mode,
            phase: Phase::Ready,
            seed,
            score: 0,
            turn: 0,
            can_hold: true,
            drop_timer_ms: 0,
            resolve_timer_ms: 0,
            hit_stop_ms: 0,
            turn_report: TurnReport::default(),
            last_report: None,
            death: None,
            death_taken: false,
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.phase != Phase::Ready {
            return;
        }
        self.spawn_next();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_dead(&self) -> bool {
        self.phase == Phase::Dead
    }

    pub fn mode(&self) -> ResolveMode {
        self.mode
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Chain counter of the turn in progress (or the last one once stable)
    pub fn chain(&self) -> u32 {
        self.resolver.chain()
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for scenario setup and tooling.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn hold_piece(&self) -> Option<&Piece> {
        self.hold.as_ref()
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    /// Columns that receive junk when the current turn finishes
    pub fn junk_warning(&self) -> &[u8] {
        self.junk.warning()
    }

    pub fn death_report(&self) -> Option<DeathReport> {
        self.death
    }

    /// Death report, handed out once (for the lobby).
    pub fn take_death_report(&mut self) -> Option<DeathReport> {
        if self.death_taken {
            return None;
        }
        let report = self.death?;
        self.death_taken = true;
        Some(report)
    }

    /// Take and clear the last finished-turn report.
    pub fn take_last_report(&mut self) -> Option<TurnReport> {
        self.last_report.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.grid.write_codes(&mut out.grid);
        out.board_hash = board_hash(&out.grid);
        out.active = self.active.as_ref().map(ActiveSnapshot::from);
        out.ghost_row = self.ghost_row();
        out.hold = self.hold.as_ref().map(|p| p.kind);
        out.next = Some(self.next.kind);
        out.can_hold = self.can_hold;
        out.junk_warning = [false; GRID_COLS as usize];
        for &col in self.junk.warning() {
            if let Some(slot) = out.junk_warning.get_mut(col as usize) {
                *slot = true;
            }
        }
        out.phase = self.phase;
        out.seed = self.seed;
        out.score = self.score;
        out.turn = self.turn;
        out.chain = self.resolver.chain();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Replace the falling piece (scripted play and scenario setup).
    ///
    /// Only while playing, and only when the piece is legal where it stands.
    pub fn set_active(&mut self, piece: Piece) -> bool {
        if self.phase != Phase::Playing || !can_place_at(&self.grid, &piece, piece.row, piece.col)
        {
            return false;
        }
        self.active = Some(piece);
        self.drop_timer_ms = 0;
        true
    }

    /// Promote the queued piece and refill the queue
    pub fn spawn_next(&mut self) -> bool {
        let piece = std::mem::replace(&mut self.next, self.generator.next());
        self.activate(piece)
    }

    fn activate(&mut self, piece: Piece) -> bool {
        if !can_place_at(&self.grid, &piece, piece.row, piece.col) {
            self.active = None;
            self.die(DeathCause::SpawnBlocked);
            return false;
        }
        self.active = Some(piece);
        self.drop_timer_ms = 0;
        self.phase = Phase::Playing;
        true
    }

    fn die(&mut self, cause: DeathCause) {
        self.phase = Phase::Dead;
        self.death = Some(DeathReport {
            score: self.score,
            turn: self.turn,
            cause,
        });
        log::info!(
            "[session] game over ({}) at turn {} with score {}",
            cause.as_str(),
            self.turn,
            self.score
        );
    }

    /// Current drop interval
    pub fn drop_interval_ms(&self, soft_drop: bool) -> u32 {
        if soft_drop {
            DROP_INTERVAL_MS / SOFT_DROP_MULTIPLIER
        } else {
            DROP_INTERVAL_MS
        }
    }

    /// Check if the active piece can move by (d_row, d_col)
    pub fn can_move(&self, d_row: i8, d_col: i8) -> bool {
        match self.active {
            Some(ref piece) => crate::pieces::can_move(&self.grid, piece, d_row, d_col),
            None => false,
        }
    }

    /// Check if the active piece fits with its anchor at (row, col)
    pub fn can_place_at(&self, row: i8, col: i8) -> bool {
        match self.active {
            Some(ref piece) => can_place_at(&self.grid, piece, row, col),
            None => false,
        }
    }

    /// Try to move the active piece
    pub fn try_move(&mut self, d_row: i8, d_col: i8) -> bool {
        if self.phase != Phase::Playing || !self.can_move(d_row, d_col) {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        piece.row += d_row;
        piece.col += d_col;
        true
    }

    /// Try to rotate the active piece; illegal rotations leave it unchanged
    pub fn try_rotate(&mut self, clockwise: bool) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        try_rotate(&self.grid, piece, clockwise)
    }

    /// Row the active piece would land on
    pub fn ghost_row(&self) -> Option<i8> {
        let piece = self.active.as_ref()?;
        Some(landing_row(&self.grid, piece))
    }

    /// Drop the active piece to the bottom and lock it
    pub fn hard_drop(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(row) = self.ghost_row() else {
            return false;
        };
        if let Some(piece) = self.active.as_mut() {
            piece.row = row;
        }
        self.lock_piece();
        true
    }

    /// Swap active piece with hold piece
    pub fn hold(&mut self) -> bool {
        if !self.can_hold || self.phase != Phase::Playing {
            return false;
        }
        let Some(current) = self.active.take() else {
            return false;
        };

        let stashed = current.reset_to_spawn();
        match self.hold.replace(stashed) {
            Some(held) => {
                self.activate(held.reset_to_spawn());
            }
            None => {
                self.spawn_next();
            }
        }
        self.can_hold = false;
        true
    }

    /// Lock the active piece onto the grid and start resolving.
    ///
    /// A cell above the visible grid ends the game instead.
    pub fn lock_piece(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        let Some(piece) = self.active.take() else {
            return;
        };

        if piece.positions().any(|(row, _, _)| row < 0) {
            self.die(DeathCause::Overflow);
            return;
        }

        let mut fresh = ActiveSet::new();
        for (row, col, level) in piece.positions() {
            self.grid.set(row, col, Cell::tile(level));
            fresh.insert(row, col);
        }
        self.grid.settle_tracking(&mut fresh);

        self.turn += 1;
        self.can_hold = true;
        self.turn_report = TurnReport {
            turn: self.turn,
            ..TurnReport::default()
        };

        if is_heat_turn(self.turn) {
            fresh = heat(&mut self.grid);
            self.turn_report.heat = true;
            log::debug!("[session] heat at turn {}", self.turn);
        }
        self.resolver.begin(fresh);

        self.phase = Phase::Resolving;
        self.resolve_timer_ms = 0;
        if self.mode == ResolveMode::Immediate {
            self.resolve_now();
        }
    }

    /// Run one resolver iteration. Returns true if the grid changed; a stable board
    /// finishes the turn.
    pub fn step_resolver(&mut self) -> bool {
        if self.phase != Phase::Resolving {
            return false;
        }
        match self.resolver.step(&mut self.grid) {
            ResolveStep::Merged(merged) => {
                self.award(merged.score);
                self.turn_report.merges += merged.groups;
                self.turn_report.chain = self.resolver.chain();
                true
            }
            ResolveStep::Exploded(exploded) => {
                self.award(exploded.score);
                self.turn_report.explosions += exploded.exploded;
                self.turn_report.chain = self.resolver.chain();
                true
            }
            ResolveStep::Stable => {
                self.finish_turn();
                false
            }
        }
    }

    /// Drain the resolver synchronously
    pub fn resolve_now(&mut self) {
        while self.phase == Phase::Resolving {
            self.step_resolver();
        }
    }

    fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.turn_report.score_gained = self.turn_report.score_gained.saturating_add(points);
    }

    fn finish_turn(&mut self) {
        self.turn_report.junk_injected = self.junk.end_turn(&mut self.grid, self.turn);
        self.last_report = Some(self.turn_report);

        let chain = self.resolver.chain();
        if !self.spawn_next() {
            return;
        }
        if self.mode == ResolveMode::Paced && chain >= HIT_STOP_CHAIN {
            self.phase = Phase::HitStop;
            self.hit_stop_ms = HIT_STOP_MS;
        }
    }

    /// Main game tick - falling piece gravity, paced resolving and hit-stop
    pub fn tick(&mut self, elapsed_ms: u32, soft_drop: bool) -> bool {
        match self.phase {
            Phase::Playing => {
                self.drop_timer_ms += elapsed_ms;
                if self.drop_timer_ms < self.drop_interval_ms(soft_drop) {
                    return false;
                }
                self.drop_timer_ms = 0;
                if !self.try_move(1, 0) {
                    self.lock_piece();
                }
                true
            }
            Phase::Resolving => {
                if self.mode == ResolveMode::Immediate {
                    self.resolve_now();
                    return true;
                }
                self.resolve_timer_ms += elapsed_ms;
                let mut advanced = false;
                while self.phase == Phase::Resolving && self.resolve_timer_ms >= RESOLVE_STEP_MS {
                    self.resolve_timer_ms -= RESOLVE_STEP_MS;
                    self.step_resolver();
                    advanced = true;
                }
                advanced
            }
            Phase::HitStop => {
                self.hit_stop_ms = self.hit_stop_ms.saturating_sub(elapsed_ms);
                if self.hit_stop_ms == 0 {
                    self.phase = Phase::Playing;
                }
                false
            }
            Phase::Ready | Phase::Dead => false,
        }
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        match action {
            GameAction::MoveLeft => self.try_move(0, -1),
            GameAction::MoveRight => self.try_move(0, 1),
            GameAction::SoftDrop => self.try_move(1, 0),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.try_rotate(true),
            GameAction::RotateCcw => self.try_rotate(false),
            GameAction::Hold => self.hold(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
