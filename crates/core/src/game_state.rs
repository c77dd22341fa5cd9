//! Game state module - the single aggregate every operation works on
//!
//! Ties together the board, spawn queue, lock controller, hold slot and scoring.
//! Input actions apply immediately; [`GameState::tick`] advances gravity and the
//! lock timer by the elapsed frame time.

use std::collections::VecDeque;

use log::{debug, info, trace};

use crate::board::Board;
use crate::lock::LockController;
use crate::pieces::{self, Piece};
use crate::rng::{PieceQueue, RandomSource, SimpleRng};
use crate::scoring::{calculate_level, get_drop_interval_ms, hard_drop_score, sweep_score};
use crate::snapshot::{GameSnapshot, Status, TimersSnapshot};
use crate::types::{GameAction, GameEvent, LockPhase, RotationDir, LOCK_DELAY_MS};

/// Undrained events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 256;

/// Result of spawning the next piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned,
    /// The new piece collided at the spawn position; the game was reset.
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<R: RandomSource = SimpleRng> {
    board: Board,
    active: Option<Piece>,
    held: Option<Piece>,
    hold_used: bool,
    queue: PieceQueue<R>,
    lock: LockController,
    events: VecDeque<GameEvent>,
    /// Increments on every game over.
    episode_id: u32,
    score: u32,
    level: u32,
    lines: u32,
    high_score: u32,
    drop_interval_ms: u32,
    drop_timer_ms: u32,
    paused: bool,
    started: bool,
}

impl GameState<SimpleRng> {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::with_source(SimpleRng::new(seed))
    }
}

impl<R: RandomSource> GameState<R> {
    /// Create a new game drawing pieces from `rng`
    pub fn with_source(rng: R) -> Self {
        Self {
            board: Board::new(),
            active: None,
            held: None,
            hold_used: false,
            queue: PieceQueue::with_source(rng),
            lock: LockController::new(LOCK_DELAY_MS),
            events: VecDeque::new(),
            episode_id: 0,
            score: 0,
            level: 0,
            lines: 0,
            high_score: 0,
            drop_interval_ms: get_drop_interval_ms(0),
            drop_timer_ms: 0,
            paused: false,
            started: false,
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_piece();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn hold_used(&self) -> bool {
        self.hold_used
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Seed the high score read from persistent storage
    pub fn set_high_score(&mut self, high_score: u32) {
        self.high_score = high_score;
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn drop_timer_ms(&self) -> u32 {
        self.drop_timer_ms
    }

    pub fn lock_timer_ms(&self) -> u32 {
        self.lock.timer_ms()
    }

    pub fn lock_phase(&self) -> LockPhase {
        self.lock.phase()
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn next(&self) -> Option<&Piece> {
        self.queue.peek()
    }

    pub fn held(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for setting up positions
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn status(&self) -> Status {
        Status {
            score: self.score,
            level: self.level,
            lines: self.lines,
            high_score: self.high_score,
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.active = self.active;
        out.ghost_y = self.ghost_y();
        out.next = self.queue.peek().copied();
        out.held = self.held;
        out.hold_used = self.hold_used;
        out.paused = self.paused;
        out.lock_phase = self.lock.phase();
        out.episode_id = self.episode_id;
        out.status = self.status();
        out.timers = TimersSnapshot {
            drop_ms: self.drop_timer_ms,
            lock_ms: self.lock.timer_ms(),
            drop_interval_ms: self.drop_interval_ms,
        };
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Take all events emitted since the last call, oldest first.
    ///
    /// At most [`MAX_PENDING_EVENTS`] are kept between calls.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    fn emit(&mut self, event: GameEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Promote the next piece to current and re-arm hold.
    ///
    /// A collision at the spawn position is a game over: the board and counters are
    /// reset and the new piece stays in play on the empty board.
    pub fn spawn_piece(&mut self) -> SpawnOutcome {
        let piece = self.queue.advance();
        self.active = Some(piece);
        self.hold_used = false;
        self.lock.reset();

        if self.board.collides(&piece) {
            self.game_over();
            return SpawnOutcome::GameOver;
        }

        SpawnOutcome::Spawned
    }

    fn game_over(&mut self) {
        let final_score = self.score;
        if final_score > self.high_score {
            self.high_score = final_score;
            self.emit(GameEvent::HighScore(final_score));
        }
        info!(
            "game over: score={} lines={} level={}",
            final_score, self.lines, self.level
        );

        self.board.clear();
        self.score = 0;
        self.lines = 0;
        self.level = 0;
        self.drop_interval_ms = get_drop_interval_ms(0);
        self.episode_id = self.episode_id.wrapping_add(1);
        self.emit(GameEvent::GameOver { final_score });
    }

    fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
            self.emit(GameEvent::HighScore(self.score));
        }
    }

    /// Move the active piece horizontally; rejected moves leave it untouched
    pub fn try_move(&mut self, dx: i8) -> bool {
        let Some(mut piece) = self.active else {
            return false;
        };

        piece.x += dx;
        if self.board.collides(&piece) {
            return false;
        }

        self.active = Some(piece);
        self.lock.on_successful_move();
        true
    }

    /// One gravity step. Also the soft drop action.
    ///
    /// A blocked step is undone and grounds the piece; either way the gravity
    /// accumulator restarts.
    pub fn soft_drop(&mut self) -> bool {
        let Some(mut piece) = self.active else {
            return false;
        };
        self.drop_timer_ms = 0;

        piece.y += 1;
        if self.board.collides(&piece) {
            self.lock.on_blocked_descent();
            return false;
        }

        self.active = Some(piece);
        self.lock.on_successful_move();
        true
    }

    /// Rotate with kick search; a failed rotation is a silent no-op
    pub fn try_rotate(&mut self, dir: RotationDir) -> bool {
        let Some(mut piece) = self.active else {
            return false;
        };

        let board = &self.board;
        match pieces::try_rotate(&mut piece, dir, |x, y| board.is_valid(x, y)) {
            Some(offset) => {
                if offset != 0 {
                    trace!("rotation kicked by {offset}");
                }
                self.active = Some(piece);
                self.lock.on_successful_move();
                true
            }
            None => {
                trace!("rotation {dir:?} rejected");
                false
            }
        }
    }

    /// Drop straight down and lock immediately, bypassing the lock timer.
    ///
    /// Returns the drop distance, which counts every step tried including the one
    /// that collided. Awards `distance * 2` points.
    pub fn hard_drop(&mut self) -> Option<u32> {
        let mut piece = self.active?;

        let mut distance: u32 = 0;
        while !self.board.collides(&piece) {
            piece.y += 1;
            distance += 1;
        }
        piece.y -= 1;

        self.active = Some(piece);
        self.drop_timer_ms = 0;
        self.finalize_lock(hard_drop_score(distance), true);
        Some(distance)
    }

    /// Swap the active piece with the held one (once per spawn).
    ///
    /// With an empty hold slot the active piece is stashed and the next piece spawns.
    /// A swap whose incoming piece would collide at the spawn position is rejected.
    pub fn hold(&mut self) -> bool {
        if self.hold_used {
            trace!("hold already used this spawn");
            return false;
        }
        let Some(current) = self.active else {
            return false;
        };

        match self.held {
            Some(mut incoming) => {
                incoming.move_to_spawn();
                if self.board.collides(&incoming) {
                    trace!("hold swap blocked at spawn");
                    return false;
                }
                self.held = Some(current);
                self.active = Some(incoming);
                self.lock.reset();
            }
            None => {
                self.held = Some(current);
                self.spawn_piece();
            }
        }

        self.hold_used = true;
        true
    }

    /// Lock the active piece where it is: merge, sweep, spawn the next piece.
    pub fn lock_piece(&mut self) {
        self.finalize_lock(0, false);
    }

    fn finalize_lock(&mut self, bonus: u32, hard_drop: bool) {
        let Some(piece) = self.active.take() else {
            return;
        };

        self.board.merge(&piece);
        self.add_score(bonus);
        let (rows_cleared, sweep_points) = self.sweep();
        let points = bonus + sweep_points;
        debug!(
            "locked {:?} at ({}, {}): rows={} points={}",
            piece.kind, piece.x, piece.y, rows_cleared, points
        );
        self.emit(GameEvent::Locked {
            rows_cleared,
            points,
            hard_drop,
        });

        self.spawn_piece();
    }

    /// Remove full rows and update score, lines, level and gravity.
    fn sweep(&mut self) -> (u32, u32) {
        let rows = self.board.sweep().len() as u32;
        let points = sweep_score(rows);

        self.lines += rows;
        self.add_score(points);
        self.level = calculate_level(self.lines);
        self.drop_interval_ms = get_drop_interval_ms(self.level);

        (rows, points)
    }

    /// Check if the active piece would collide one row down
    pub fn is_grounded(&self) -> bool {
        match self.active {
            Some(mut piece) => {
                piece.y += 1;
                self.board.collides(&piece)
            }
            None => false,
        }
    }

    /// Lowest non-colliding y for the active piece
    pub fn ghost_y(&self) -> Option<i8> {
        let mut piece = self.active?;
        loop {
            piece.y += 1;
            if self.board.collides(&piece) {
                return Some(piece.y - 1);
            }
        }
    }

    /// Advance one frame by `elapsed_ms`
    ///
    /// Runs gravity when the accumulator exceeds the interval, then checks the lock
    /// condition. Returns whether anything happened. Does nothing while paused.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.paused || !self.started || self.active.is_none() {
            return false;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        self.lock.accumulate(elapsed_ms);

        let mut changed = false;
        if self.drop_timer_ms > self.drop_interval_ms {
            self.soft_drop();
            changed = true;
        }

        if self.lock.evaluate(self.is_grounded()) == LockPhase::Locked {
            self.lock_piece();
            changed = true;
        }

        changed
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        debug!("paused={}", self.paused);
    }

    /// Apply a player action. Returns false when the action was rejected.
    ///
    /// Pause only stops [`GameState::tick`]; input still applies while paused.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.try_move(-1),
            GameAction::MoveRight => self.try_move(1),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => self.hard_drop().is_some(),
            GameAction::RotateLeft => self.try_rotate(RotationDir::CounterClockwise),
            GameAction::RotateRight => self.try_rotate(RotationDir::Clockwise),
            GameAction::Hold => self.hold(),
            GameAction::Pause => {
                self.toggle_pause();
                true
            }
        }
    }
}

impl Default for GameState<SimpleRng> {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceSource;
    use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

    fn game_with(kinds: &[PieceKind]) -> GameState<SequenceSource> {
        let mut state = GameState::with_source(SequenceSource::new(kinds.to_vec()));
        state.start();
        state
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert!(!state.started);
        assert!(!state.paused);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 0);
        assert_eq!(state.lines, 0);
        assert_eq!(state.drop_interval_ms, 1000);
        assert!(state.active.is_none());
        assert!(state.held.is_none());
        assert!(state.next().is_none());
    }

    #[test]
    fn test_game_start() {
        let mut state = GameState::new(12345);
        state.start();
        assert!(state.started);
        assert!(state.active.is_some());
        assert!(state.next().is_some());
    }

    #[test]
    fn test_spawn_centers_piece() {
        let state = game_with(&[PieceKind::O, PieceKind::T]);
        let active = state.active.unwrap();
        assert_eq!(active.kind, PieceKind::O);
        assert_eq!((active.x, active.y), (5, 0));
        assert_eq!(state.next().map(|p| p.kind), Some(PieceKind::T));
    }

    #[test]
    fn test_move_into_wall_is_noop() {
        let mut state = game_with(&[PieceKind::O]);
        for _ in 0..20 {
            state.try_move(-1);
        }
        assert_eq!(state.active.unwrap().x, 0);
        assert!(!state.try_move(-1));
        assert_eq!(state.active.unwrap().x, 0);
    }

    #[test]
    fn test_soft_drop_blocked_grounds_piece() {
        let mut state = game_with(&[PieceKind::O]);
        while state.soft_drop() {}
        let piece = state.active.unwrap();
        assert_eq!(piece.y, BOARD_HEIGHT as i8 - 2);
        assert_eq!(state.lock_phase(), LockPhase::Grounded);
        assert!(state.is_grounded());
    }

    #[test]
    fn test_gravity_after_interval() {
        let mut state = game_with(&[PieceKind::T]);
        assert!(!state.tick(1000)); // not strictly greater
        assert_eq!(state.active.unwrap().y, 0);
        assert!(state.tick(1));
        assert_eq!(state.active.unwrap().y, 1);
        assert_eq!(state.drop_timer_ms, 0);
    }

    #[test]
    fn test_lock_after_delay() {
        let mut state = game_with(&[PieceKind::O, PieceKind::T]);
        while state.soft_drop() {}

        state.tick(500);
        assert!(state.active.is_some());
        assert_eq!(state.active.unwrap().kind, PieceKind::O);

        state.tick(1);
        assert_eq!(state.active.unwrap().kind, PieceKind::T);
        let bottom = BOARD_HEIGHT as i8 - 1;
        assert_eq!(state.board.get(5, bottom), Some(PieceKind::O.tag()));
        assert_eq!(state.lock.timer_ms(), 0);
        assert_eq!(
            state.take_events(),
            vec![GameEvent::Locked {
                rows_cleared: 0,
                points: 0,
                hard_drop: false
            }]
        );
    }

    #[test]
    fn test_lateral_move_resets_lock_timer() {
        let mut state = game_with(&[PieceKind::O, PieceKind::T]);
        while state.soft_drop() {}

        state.tick(400);
        assert_eq!(state.lock_timer_ms(), 400);
        assert!(state.try_move(1));
        assert_eq!(state.lock_timer_ms(), 0);

        state.tick(400);
        assert_eq!(state.active.unwrap().kind, PieceKind::O);
        state.tick(101);
        assert_eq!(state.active.unwrap().kind, PieceKind::T);
    }

    #[test]
    fn test_hard_drop_scores_distance() {
        let mut state = game_with(&[PieceKind::O]);
        // O occupies rows y and y+1; it lands at y = 18 after trying 19 steps.
        assert_eq!(state.hard_drop(), Some(19));
        assert_eq!(state.score, 38);
        assert_eq!(state.board.get(5, 19), Some(PieceKind::O.tag()));
        assert_eq!(state.board.get(6, 18), Some(PieceKind::O.tag()));
    }

    #[test]
    fn test_two_row_clear_compounds() {
        let mut state = game_with(&[PieceKind::O]);
        let bottom = BOARD_HEIGHT as i8 - 1;
        state.board.fill_row_except(bottom, &[5, 6], 1);
        state.board.fill_row_except(bottom - 1, &[5, 6], 1);

        state.hard_drop();
        assert_eq!(state.lines, 2);
        // 19 steps * 2 + 100 + 200
        assert_eq!(state.score, 38 + 300);
        assert!(state.board.is_empty());
    }

    #[test]
    fn test_level_and_gravity_follow_lines() {
        let mut state = game_with(&[PieceKind::O]);
        state.lines = 9;
        let bottom = BOARD_HEIGHT as i8 - 1;
        state.board.fill_row_except(bottom, &[5, 6], 1);
        state.hard_drop();
        assert_eq!(state.lines, 10);
        assert_eq!(state.level, 1);
        assert_eq!(state.drop_interval_ms, 900);
    }

    #[test]
    fn test_hold_stashes_then_swaps_once_per_spawn() {
        let mut state = game_with(&[PieceKind::T, PieceKind::O, PieceKind::I]);

        assert!(state.hold());
        assert_eq!(state.held.map(|p| p.kind), Some(PieceKind::T));
        assert_eq!(state.active.unwrap().kind, PieceKind::O);
        assert!(state.hold_used);

        let before = (state.active, state.held, state.next().copied());
        assert!(!state.hold());
        assert_eq!((state.active, state.held, state.next().copied()), before);

        state.hard_drop();
        assert!(!state.hold_used);
        assert_eq!(state.active.unwrap().kind, PieceKind::I);

        assert!(state.try_move(-2));
        assert!(state.hold());
        let active = state.active.unwrap();
        assert_eq!(active.kind, PieceKind::T);
        assert_eq!((active.x, active.y), (5, 0));
        assert_eq!(state.held.map(|p| p.kind), Some(PieceKind::I));
    }

    #[test]
    fn test_game_over_resets_and_reports() {
        let mut state = game_with(&[PieceKind::O]);
        state.score = 1234;
        state.lines = 25;
        state.level = 2;
        state.drop_interval_ms = 800;
        // Block the spawn area without completing any row.
        for y in 0..BOARD_HEIGHT as i8 {
            state.board.fill_row_except(y, &[0], 3);
        }
        state.active = Some(Piece::spawn(PieceKind::O));
        state.take_events();

        assert_eq!(state.spawn_piece(), SpawnOutcome::GameOver);
        assert!(state.board.is_empty());
        assert_eq!(state.status(), Status {
            score: 0,
            level: 0,
            lines: 0,
            high_score: 1234,
        });
        assert_eq!(state.drop_interval_ms, 1000);
        assert_eq!(state.episode_id, 1);
        assert_eq!(
            state.take_events(),
            vec![
                GameEvent::HighScore(1234),
                GameEvent::GameOver { final_score: 1234 }
            ]
        );
        // The new piece keeps playing on the empty board.
        assert!(state.active.is_some());
    }

    #[test]
    fn test_pause_stops_time_but_not_input() {
        let mut state = game_with(&[PieceKind::T]);
        assert!(state.apply_action(GameAction::Pause));
        assert!(state.paused());

        assert!(!state.tick(5000));
        assert_eq!(state.active.unwrap().y, 0);
        assert_eq!(state.drop_timer_ms, 0);

        assert!(state.apply_action(GameAction::MoveLeft));
        assert_eq!(state.active.unwrap().x, 4);
        assert!(state.apply_action(GameAction::Pause));
        assert!(!state.paused());
    }

    #[test]
    fn test_rotation_resets_lock_timer() {
        let mut state = game_with(&[PieceKind::O, PieceKind::T]);
        while state.soft_drop() {}

        state.tick(400);
        assert_eq!(state.lock_timer_ms(), 400);
        assert!(state.try_rotate(RotationDir::Clockwise));
        assert_eq!(state.lock_timer_ms(), 0);

        state.tick(400);
        assert_eq!(state.active.unwrap().kind, PieceKind::O);
        state.tick(101);
        assert_eq!(state.active.unwrap().kind, PieceKind::T);
    }

    #[test]
    fn test_undrained_events_are_capped() {
        let mut state = game_with(&[PieceKind::O]);
        for _ in 0..MAX_PENDING_EVENTS + 40 {
            state.lock_piece();
        }

        let events = state.take_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_ghost_y() {
        let mut state = game_with(&[PieceKind::O]);
        assert_eq!(state.ghost_y(), Some(BOARD_HEIGHT as i8 - 2));
        state.board.set(5, 10, 2);
        assert_eq!(state.ghost_y(), Some(8));
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = game_with(&[PieceKind::I, PieceKind::O]);
        state.board.set(0, BOARD_HEIGHT as i8 - 1, 4);
        let snap = state.snapshot();
        assert_eq!(snap.board[BOARD_HEIGHT as usize - 1][0], 4);
        assert_eq!(snap.board[0].len(), BOARD_WIDTH as usize);
        assert_eq!(snap.active.map(|p| p.kind), Some(PieceKind::I));
        assert_eq!(snap.next.map(|p| p.kind), Some(PieceKind::O));
        assert_eq!(snap.ghost_y, state.ghost_y());
        assert_eq!(snap.status, state.status());
    }
}
