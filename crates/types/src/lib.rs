//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! by the simulation core, key-binding configuration, and any presentation layer.
//!
//! # Board Dimensions
//!
//! - **Width**: 12 columns (indexed 0-11)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Default frame period (~60 FPS) |
//! | `BASE_DROP_MS` | 1000 | Gravity interval at level 0 |
//! | `DROP_STEP_MS` | 100 | Gravity speed-up per level |
//! | `DROP_INTERVAL_FLOOR_MS` | 100 | Gravity never gets faster than this |
//! | `LOCK_DELAY_MS` | 500 | Grounded time before a piece locks |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{PieceKind, BOARD_WIDTH, BOARD_HEIGHT};
//!
//! assert_eq!(PieceKind::from_tag(5), Some(PieceKind::I));
//! assert_eq!(PieceKind::T.tag(), 1);
//! assert_eq!((BOARD_WIDTH, BOARD_HEIGHT), (12, 20));
//! ```

/// Board width in cells (12 columns)
pub const BOARD_WIDTH: u8 = 12;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Default frame period in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval at level 0 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Gravity interval reduction per level
pub const DROP_STEP_MS: u32 = 100;

/// Fastest gravity interval; reached at level 9
pub const DROP_INTERVAL_FLOOR_MS: u32 = 100;

/// Grounded time a piece must exceed before it locks (500ms)
pub const LOCK_DELAY_MS: u32 = 500;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Points per row, multiplied by the row's 1-based position within a sweep
pub const LINE_CLEAR_UNIT: u32 = 100;

/// Hard drop bonus per row travelled
pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;

/// A cell on the game board or in a piece matrix
///
/// - `0`: empty
/// - `1..=7`: occupied, tagged with the owning piece kind (see [`PieceKind::tag`])
pub type Cell = u8;

/// Empty cell tag
pub const EMPTY: Cell = 0;

/// 24-bit display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Display colors indexed by tag. Index 0 is the empty cell and has no color.
pub const PALETTE: [Option<Rgb>; 8] = [
    None,
    Some(Rgb(0xFF, 0x0D, 0x72)), // T
    Some(Rgb(0x0D, 0xC2, 0xFF)), // O
    Some(Rgb(0x0D, 0xFF, 0x72)), // L
    Some(Rgb(0xF5, 0x38, 0xFF)), // J
    Some(Rgb(0xFF, 0x8E, 0x0D)), // I
    Some(Rgb(0xFF, 0xE1, 0x38)), // S
    Some(Rgb(0x38, 0x77, 0xFF)), // Z
];

/// The seven piece kinds
///
/// Every kind owns one fixed, non-zero tag and one display color. The mapping is
/// part of the visible contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds, in the order random selection indexes them.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::L,
        PieceKind::J,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Board tag written for cells of this kind
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::T.tag(), 1);
    /// assert_eq!(PieceKind::Z.tag(), 7);
    /// ```
    pub fn tag(self) -> Cell {
        match self {
            PieceKind::T => 1,
            PieceKind::O => 2,
            PieceKind::L => 3,
            PieceKind::J => 4,
            PieceKind::I => 5,
            PieceKind::S => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::tag`]
    pub fn from_tag(tag: Cell) -> Option<Self> {
        match tag {
            1 => Some(PieceKind::T),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::J),
            5 => Some(PieceKind::I),
            6 => Some(PieceKind::S),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    pub fn color(self) -> Rgb {
        match PALETTE[self.tag() as usize] {
            Some(rgb) => rgb,
            None => unreachable!("every piece tag has a palette entry"),
        }
    }
}

/// Direction of a 90° rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDir {
    Clockwise,
    CounterClockwise,
}

impl RotationDir {
    pub fn reverse(self) -> Self {
        match self {
            RotationDir::Clockwise => RotationDir::CounterClockwise,
            RotationDir::CounterClockwise => RotationDir::Clockwise,
        }
    }
}

/// Discrete player actions
///
/// Each action is bound to exactly one raw key code by the input layer; the core
/// only ever sees the resolved action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Force one gravity step
    SoftDrop,
    /// Drop to the lowest valid position and lock immediately
    HardDrop,
    /// Rotate 90° counter-clockwise
    RotateLeft,
    /// Rotate 90° clockwise
    RotateRight,
    /// Swap with the held piece (once per spawn)
    Hold,
    /// Toggle pause
    Pause,
}

impl GameAction {
    pub const ALL: [GameAction; 8] = [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::RotateLeft,
        GameAction::RotateRight,
        GameAction::Hold,
        GameAction::Pause,
    ];
}

/// Lock controller state for the current piece
///
/// `Locked` is terminal for a piece instance: the piece is merged and the next one
/// spawns with the controller back in `Falling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LockPhase {
    #[default]
    Falling,
    Grounded,
    Locked,
}

/// Observable transitions emitted by the core, drained by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A piece was merged into the board.
    Locked {
        rows_cleared: u32,
        /// Points from the row sweep plus any hard drop bonus.
        points: u32,
        hard_drop: bool,
    },
    /// The score passed the previous high score.
    HighScore(u32),
    /// A freshly spawned piece collided; board and counters were reset.
    GameOver { final_score: u32 },
}
