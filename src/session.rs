//! Session: one running game plus its clock and high-score store.
//!
//! The front end calls [`Session::frame`] with a monotonic timestamp once per frame
//! and [`Session::apply`] for every resolved key press. Events the game emits are
//! flushed after each call: high scores are persisted, everything is logged and
//! kept for the presenter until [`Session::take_events`].

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::core::{GameSnapshot, GameState, RandomSource, SimpleRng};
use crate::storage::{HighScoreStore, JsonFileStore};
use crate::types::{GameAction, GameEvent};

/// Turns monotonically increasing timestamps into per-frame deltas.
///
/// The first timestamp yields 0. Every timestamp is consumed, paused or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameClock {
    last_ms: Option<u64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous timestamp
    pub fn delta(&mut self, now_ms: u64) -> u32 {
        let elapsed = match self.last_ms {
            Some(last) => now_ms.saturating_sub(last),
            None => 0,
        };
        self.last_ms = Some(now_ms);
        u32::try_from(elapsed).unwrap_or(u32::MAX)
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

pub struct Session<R: RandomSource = SimpleRng, S: HighScoreStore = JsonFileStore> {
    game: GameState<R>,
    store: S,
    clock: FrameClock,
    events: Vec<GameEvent>,
}

impl<R: RandomSource, S: HighScoreStore> Session<R, S> {
    /// Seed the high score from `store` and start `game`.
    pub fn new(mut game: GameState<R>, store: S) -> Result<Self> {
        let high_score = store.load().context("failed to load high score")?;
        game.set_high_score(high_score);
        game.start();
        debug!("session started, high score {high_score}");

        Ok(Self {
            game,
            store,
            clock: FrameClock::new(),
            events: Vec::new(),
        })
    }

    /// Advance the game to `now_ms`. Returns whether the state changed.
    pub fn frame(&mut self, now_ms: u64) -> bool {
        let elapsed = self.clock.delta(now_ms);
        let changed = self.game.tick(elapsed);
        self.flush();
        changed
    }

    /// Apply a player action immediately. Returns false when it was rejected.
    pub fn apply(&mut self, action: GameAction) -> bool {
        let accepted = self.game.apply_action(action);
        self.flush();
        accepted
    }

    pub fn game(&self) -> &GameState<R> {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameState<R> {
        &mut self.game
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.game.snapshot_into(out);
    }

    /// Drain the events flushed since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn flush(&mut self) {
        for event in self.game.take_events() {
            match event {
                GameEvent::HighScore(score) => {
                    // Persistence failures must not stop the game.
                    if let Err(err) = self.store.save(score) {
                        warn!("failed to save high score {score}: {err:#}");
                    }
                }
                GameEvent::GameOver { final_score } => {
                    info!(
                        "episode {} ended with {final_score}",
                        self.game.episode_id()
                    );
                }
                GameEvent::Locked { .. } => {}
            }
            self.events.push(event);
        }
    }
}
