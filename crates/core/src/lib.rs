//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and simulation logic.
//! It has no dependencies on UI, input devices, or I/O:
//!
//! - **Deterministic**: the random source is injectable, so tests script piece order
//! - **Observable**: game over and locks are reported as [`GameEvent`](types::GameEvent)s
//! - **Zero-allocation board**: flat cell array and in-place row sweep
//!
//! # Module Structure
//!
//! - [`board`]: 12x20 grid with collision, merge and row sweep
//! - [`pieces`]: shape factory, in-place matrix rotation, wall-kick search
//! - [`rng`]: random source seam and the spawn queue
//! - [`lock`]: lock-delay state machine
//! - [`scoring`]: compounding row-clear points, level and gravity interval
//! - [`game_state`]: the aggregate; hold, actions and the frame driver
//! - [`snapshot`]: read-only view for presenters
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::GameAction;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateRight);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert!(game.score() > 0); // Hard drop awards points
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with the elapsed
//! milliseconds. Gravity fires once the accumulator exceeds the level's interval
//! (1000ms at level 0, 100ms less per level, never below 100ms); a grounded piece
//! locks once it has stayed grounded for more than 500ms.

pub mod board;
pub mod game_state;
pub mod lock;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

pub use board::Board;
pub use game_state::{GameState, SpawnOutcome};
pub use lock::LockController;
pub use pieces::{create_piece, try_rotate, Matrix, Piece};
pub use rng::{PieceQueue, RandomSource, SequenceSource, SimpleRng};
pub use snapshot::{GameSnapshot, Status, TimersSnapshot};
