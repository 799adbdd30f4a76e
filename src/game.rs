//! Engine: piece lifecycle, input commands, locking, line clears, scoring and levels.

use crate::board::Board;
use crate::config::{GameConfig, InputDelays};
use crate::ghost;
use crate::piece::{Piece, Shape, ShapeKind};
use log::{debug, info, trace};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of upcoming pieces kept visible.
pub const LOOKAHEAD: usize = 3;
/// Flat score per cleared row; no multi-line bonus.
pub const POINTS_PER_ROW: u32 = 10;
pub const LINES_PER_LEVEL: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    GameOver,
}

/// Discrete player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    HardDrop,
    /// Stash the active piece, or swap with the stashed one.
    Hold,
    /// Swap with the stashed piece; ignored when nothing is stashed.
    SwapHold,
}

/// Minimum-interval gate for one command class. A gate that has never fired is open.
#[derive(Debug, Clone, Copy)]
struct Cooldown {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl Cooldown {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    fn ready(&self, now: Instant) -> bool {
        self.last_fired
            .is_none_or(|t| now.saturating_duration_since(t) > self.interval)
    }

    fn fire(&mut self, now: Instant) {
        self.last_fired = Some(now);
    }
}

#[derive(Debug, Clone)]
struct Cooldowns {
    shift: Cooldown,
    rotate: Cooldown,
    soft_drop: Cooldown,
    hard_drop: Cooldown,
    hold: Cooldown,
    swap_hold: Cooldown,
}

impl Cooldowns {
    fn new(delays: &InputDelays) -> Self {
        Self {
            shift: Cooldown::new(delays.shift),
            rotate: Cooldown::new(delays.rotate),
            soft_drop: Cooldown::new(delays.soft_drop),
            hard_drop: Cooldown::new(delays.hard_drop),
            hold: Cooldown::new(delays.hold),
            swap_hold: Cooldown::new(delays.hold),
        }
    }

    fn gate(&mut self, command: Command) -> &mut Cooldown {
        match command {
            Command::MoveLeft | Command::MoveRight => &mut self.shift,
            Command::Rotate => &mut self.rotate,
            Command::SoftDrop => &mut self.soft_drop,
            Command::HardDrop => &mut self.hard_drop,
            Command::Hold => &mut self.hold,
            Command::SwapHold => &mut self.swap_hold,
        }
    }
}

fn random_piece(rng: &mut fastrand::Rng, board_width: usize) -> Piece {
    let kind = ShapeKind::ALL[rng.usize(..ShapeKind::ALL.len())];
    Piece::new(kind, board_width)
}

/// Owns the board, the active piece, the lookahead queue and the hold slot.
/// The presentation layer only reads it through the accessors and feeds it
/// [`Command`]s and gravity ticks.
#[derive(Debug)]
pub struct Engine {
    config: GameConfig,
    rng: fastrand::Rng,
    state: GameState,
    board: Board,
    active: Option<Piece>,
    next: VecDeque<Piece>,
    held: Option<ShapeKind>,
    score: u32,
    level: u32,
    lines_cleared: u32,
    drop_interval: Duration,
    last_drop: Instant,
    cooldowns: Cooldowns,
}

impl Engine {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, fastrand::Rng::new())
    }

    fn with_rng(config: GameConfig, mut rng: fastrand::Rng) -> Self {
        let next = (0..LOOKAHEAD)
            .map(|_| random_piece(&mut rng, config.width))
            .collect();
        Self {
            board: Board::new(config.width, config.height),
            state: GameState::Menu,
            active: None,
            next,
            held: None,
            score: 0,
            level: 1,
            lines_cleared: 0,
            drop_interval: config.speed.initial,
            last_drop: Instant::now(),
            cooldowns: Cooldowns::new(&config.delays),
            rng,
            config,
        }
    }

    /// Menu -> Playing. Activates the first queued piece.
    pub fn start(&mut self, now: Instant) {
        if self.state != GameState::Menu {
            return;
        }
        info!("game started on a {}x{} board", self.board.width(), self.board.height());
        self.state = GameState::Playing;
        self.last_drop = now;
        self.spawn_next();
    }

    /// GameOver -> fresh Playing. Board, queue, hold slot, counters and timers are rebuilt.
    pub fn restart(&mut self, now: Instant) {
        if self.state != GameState::GameOver {
            return;
        }
        info!("restarting after final score {}", self.score);
        self.board = Board::new(self.config.width, self.config.height);
        self.active = None;
        self.next = (0..LOOKAHEAD)
            .map(|_| random_piece(&mut self.rng, self.config.width))
            .collect();
        self.held = None;
        self.score = 0;
        self.level = 1;
        self.lines_cleared = 0;
        self.drop_interval = self.config.speed.initial;
        self.last_drop = now;
        self.cooldowns = Cooldowns::new(&self.config.delays);
        self.state = GameState::Playing;
        self.spawn_next();
    }

    /// Applies a player command unless its cooldown is still running.
    /// Returns whether the command was accepted; an accepted command may still be a
    /// no-op on the board (blocked move or rotation).
    pub fn handle(&mut self, command: Command, now: Instant) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let gate = self.cooldowns.gate(command);
        if !gate.ready(now) {
            trace!("{command:?} debounced");
            return false;
        }
        gate.fire(now);

        match command {
            Command::MoveLeft => {
                self.move_piece(-1, 0);
            }
            Command::MoveRight => {
                self.move_piece(1, 0);
            }
            Command::Rotate => {
                self.rotate();
            }
            Command::SoftDrop => {
                // Soft drop shares the gravity clock.
                self.last_drop = now;
                self.move_piece(0, 1);
            }
            Command::HardDrop => self.hard_drop(),
            Command::Hold => {
                self.hold();
            }
            Command::SwapHold => {
                self.swap_hold();
            }
        }
        true
    }

    /// Gravity: one row down once the drop interval has elapsed. Returns whether it fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        if now.saturating_duration_since(self.last_drop) <= self.drop_interval {
            return false;
        }
        self.last_drop = now;
        self.move_piece(0, 1);
        true
    }

    /// Read-only probe: would `shape` collide if the active piece's anchor moved by `(dx, dy)`?
    /// With no active piece everything collides.
    pub fn will_collide(&self, shape: &Shape, dx: i32, dy: i32) -> bool {
        self.active
            .as_ref()
            .is_none_or(|p| self.board.collides(shape, p.x + dx, p.y + dy))
    }

    /// Translates the active piece. A blocked downward move locks it and spawns the next
    /// piece; blocked sideways or upward moves do nothing. Returns whether the piece moved.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        let Some(mut piece) = self.active else {
            return false;
        };
        if !self.will_collide(&piece.shape, dx, dy) {
            piece.x += dx;
            piece.y += dy;
            self.active = Some(piece);
            return true;
        }
        if dy > 0 {
            self.lock_and_spawn();
        }
        false
    }

    /// Clockwise rotation in place, no wall kicks. Rejected outright if it would collide.
    pub fn rotate(&mut self) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        let rotated = piece.shape.rotated_cw();
        if self.board.collides(&rotated, piece.x, piece.y) {
            trace!("rotation of {:?} blocked", piece.kind);
            return false;
        }
        piece.shape = rotated;
        true
    }

    /// Drops the active piece to its landing row and locks it, exactly once.
    pub fn hard_drop(&mut self) {
        let Some(mut piece) = self.active else {
            return;
        };
        piece.y = ghost::landing_y(&self.board, &piece);
        self.active = Some(piece);
        self.lock_and_spawn();
    }

    /// Empty slot: stash the active kind and take the next queued piece.
    /// Occupied slot: swap. Not limited to once per drop.
    pub fn hold(&mut self) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        match self.held {
            None => {
                debug!("holding {:?}", active.kind);
                self.held = Some(active.kind);
                self.spawn_next();
                true
            }
            Some(kind) => self.swap_with_held(active, kind),
        }
    }

    /// Swap only; nothing happens while the slot is empty.
    pub fn swap_hold(&mut self) -> bool {
        match (self.active, self.held) {
            (Some(active), Some(kind)) => self.swap_with_held(active, kind),
            _ => false,
        }
    }

    fn swap_with_held(&mut self, active: Piece, held: ShapeKind) -> bool {
        let incoming = Piece::new(held, self.board.width());
        if self.board.collides(&incoming.shape, incoming.x, incoming.y) {
            trace!("swap to {held:?} blocked at spawn");
            return false;
        }
        debug!("swapping {:?} for held {held:?}", active.kind);
        self.held = Some(active.kind);
        self.active = Some(incoming);
        true
    }

    fn lock_and_spawn(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.board.lock(&piece);
        let cleared = self.board.clear_full_rows();
        if cleared > 0 {
            self.score += POINTS_PER_ROW * cleared;
            self.lines_cleared += cleared;
            debug!(
                "{:?} locked at ({}, {}), cleared {cleared} row(s), score {}",
                piece.kind, piece.x, piece.y, self.score
            );
        } else {
            trace!("{:?} locked at ({}, {})", piece.kind, piece.x, piece.y);
        }
        self.update_level();
        self.spawn_next();
    }

    fn update_level(&mut self) {
        if self.lines_cleared / LINES_PER_LEVEL >= self.level {
            self.level += 1;
            self.drop_interval = self.config.speed.next(self.drop_interval);
            debug!(
                "level {} reached, drop interval {:?}",
                self.level, self.drop_interval
            );
        }
    }

    fn spawn_next(&mut self) {
        let width = self.board.width();
        let piece = match self.next.pop_front() {
            Some(piece) => piece,
            None => random_piece(&mut self.rng, width),
        };
        self.next.push_back(random_piece(&mut self.rng, width));
        self.active = Some(piece);
        if self.board.collides(&piece.shape, piece.x, piece.y) {
            info!("game over: {:?} cannot spawn, final score {}", piece.kind, self.score);
            self.state = GameState::GameOver;
        } else {
            trace!("spawned {:?} at ({}, {})", piece.kind, piece.x, piece.y);
        }
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    /// Active piece moved to where it would land.
    pub fn ghost(&self) -> Option<Piece> {
        self.active
            .as_ref()
            .map(|piece| ghost::project(&self.board, piece))
    }

    #[inline]
    pub fn held(&self) -> Option<ShapeKind> {
        self.held
    }

    /// Upcoming pieces, front first.
    pub fn lookahead(&self) -> impl Iterator<Item = &Piece> {
        self.next.iter()
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    #[inline]
    pub fn drop_interval(&self) -> Duration {
        self.drop_interval
    }
}
