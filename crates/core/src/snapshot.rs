//! Read-only view of the game for presenters
//!
//! A snapshot carries everything a drawer needs: locked cells, the falling piece,
//! its ghost position, the next and held pieces, and the status counters.

use crate::pieces::Piece;
use crate::types::{Cell, LockPhase, BOARD_HEIGHT, BOARD_WIDTH, EMPTY};

/// Score, level, lines and high score as shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Status {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub high_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimersSnapshot {
    pub drop_ms: u32,
    pub lock_ms: u32,
    pub drop_interval_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<Piece>,
    pub ghost_y: Option<i8>,
    pub next: Option<Piece>,
    pub held: Option<Piece>,
    pub hold_used: bool,
    pub paused: bool,
    pub lock_phase: LockPhase,
    pub episode_id: u32,
    pub status: Status,
    pub timers: TimersSnapshot,
}

impl GameSnapshot {
    /// Cell to draw at (x, y): the active piece over locked cells.
    ///
    /// Returns the tag and whether it belongs to the ghost projection. Coordinates
    /// outside the board read as an empty cell.
    pub fn cell_at(&self, x: usize, y: usize) -> (Cell, bool) {
        if let Some(active) = &self.active {
            if let Some(tag) = piece_cell(active, active.y, x, y) {
                return (tag, false);
            }
            if let Some(ghost_y) = self.ghost_y {
                if let Some(tag) = piece_cell(active, ghost_y, x, y) {
                    return (tag, true);
                }
            }
        }
        let tag = self
            .board
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(EMPTY);
        (tag, false)
    }
}

fn piece_cell(piece: &Piece, top: i8, x: usize, y: usize) -> Option<Cell> {
    let mx = x as i32 - i32::from(piece.x);
    let my = y as i32 - i32::from(top);
    if mx < 0 || my < 0 {
        return None;
    }
    match piece.matrix.get(mx as usize, my as usize) {
        EMPTY => None,
        tag => Some(tag),
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[EMPTY; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            next: None,
            held: None,
            hold_used: false,
            paused: false,
            lock_phase: LockPhase::Falling,
            episode_id: 0,
            status: Status::default(),
            timers: TimersSnapshot::default(),
        }
    }
}
