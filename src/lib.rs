//! Blockfall (workspace facade crate).
//!
//! Re-exports the engine crates under `blockfall::{core,input,types}` and hosts the
//! pieces that touch the outside world: configuration, high-score storage and the
//! [`session::Session`] that drives a game from wall-clock time.

pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_types as types;

pub mod config;
pub mod session;
pub mod storage;

/// Directory name used under the platform config and data directories
pub const APP_DIR: &str = "blockfall";
