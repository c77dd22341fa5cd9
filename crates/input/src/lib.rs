//! Terminal input module (engine-facing).
//!
//! Resolves raw `crossterm` key events into [`crate::types::GameAction`] through a
//! configurable one-key-per-action binding table. The simulation core never sees
//! key codes.

pub mod map;

pub use blockfall_types as types;

pub use map::{should_quit, KeyBindings};
