//! Lock controller - decides when a grounded piece becomes permanent
//!
//! ```text
//!            blocked descent / grounded at frame check
//!   Falling ───────────────────────────────────────────▶ Grounded
//!      ▲                                                    │
//!      └──── successful move, rotation or gravity step ─────┤
//!                                                           │ timer > delay
//!                                                           ▼
//!                                                         Locked
//! ```
//!
//! The timer accumulates every unpaused frame and is cleared whenever the piece is
//! not grounded. Successful moves reset it without limit.

use crate::types::{LockPhase, LOCK_DELAY_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockController {
    phase: LockPhase,
    timer_ms: u32,
    delay_ms: u32,
}

impl LockController {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            phase: LockPhase::Falling,
            timer_ms: 0,
            delay_ms,
        }
    }

    pub fn phase(&self) -> LockPhase {
        self.phase
    }

    pub fn timer_ms(&self) -> u32 {
        self.timer_ms
    }

    /// Add frame time to the timer
    pub fn accumulate(&mut self, elapsed_ms: u32) {
        self.timer_ms = self.timer_ms.saturating_add(elapsed_ms);
    }

    /// A gravity step or soft drop was blocked and undone.
    pub fn on_blocked_descent(&mut self) {
        if self.phase == LockPhase::Falling {
            self.phase = LockPhase::Grounded;
        }
    }

    /// A lateral move, rotation or gravity step succeeded.
    pub fn on_successful_move(&mut self) {
        self.phase = LockPhase::Falling;
        self.timer_ms = 0;
    }

    /// Per-frame decision given whether the piece collides one row below.
    pub fn evaluate(&mut self, grounded: bool) -> LockPhase {
        if !grounded {
            self.phase = LockPhase::Falling;
            self.timer_ms = 0;
        } else if self.timer_ms > self.delay_ms {
            self.phase = LockPhase::Locked;
        } else {
            self.phase = LockPhase::Grounded;
        }
        self.phase
    }

    /// Start over for a freshly spawned piece
    pub fn reset(&mut self) {
        self.phase = LockPhase::Falling;
        self.timer_ms = 0;
    }
}

impl Default for LockController {
    fn default() -> Self {
        Self::new(LOCK_DELAY_MS)
    }
}
