//! Key mapping from terminal events to game actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::types::GameAction;

/// One key code per action. Letter keys match regardless of case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub soft_drop: KeyCode,
    pub hard_drop: KeyCode,
    pub rotate_left: KeyCode,
    pub rotate_right: KeyCode,
    pub hold: KeyCode,
    pub pause: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: KeyCode::Left,
            move_right: KeyCode::Right,
            soft_drop: KeyCode::Down,
            hard_drop: KeyCode::Char(' '),
            rotate_left: KeyCode::Char('q'),
            rotate_right: KeyCode::Char('w'),
            hold: KeyCode::Char('c'),
            pause: KeyCode::Char('p'),
        }
    }
}

impl KeyBindings {
    /// Key currently bound to `action`
    pub fn key_for(&self, action: GameAction) -> KeyCode {
        match action {
            GameAction::MoveLeft => self.move_left,
            GameAction::MoveRight => self.move_right,
            GameAction::SoftDrop => self.soft_drop,
            GameAction::HardDrop => self.hard_drop,
            GameAction::RotateLeft => self.rotate_left,
            GameAction::RotateRight => self.rotate_right,
            GameAction::Hold => self.hold,
            GameAction::Pause => self.pause,
        }
    }

    /// Bind `action` to `code`, replacing its previous key.
    pub fn rebind(&mut self, action: GameAction, code: KeyCode) {
        let slot = match action {
            GameAction::MoveLeft => &mut self.move_left,
            GameAction::MoveRight => &mut self.move_right,
            GameAction::SoftDrop => &mut self.soft_drop,
            GameAction::HardDrop => &mut self.hard_drop,
            GameAction::RotateLeft => &mut self.rotate_left,
            GameAction::RotateRight => &mut self.rotate_right,
            GameAction::Hold => &mut self.hold,
            GameAction::Pause => &mut self.pause,
        };
        *slot = code;
    }

    /// Resolve a raw key code. The first action in [`GameAction::ALL`] order wins
    /// if two actions share a key.
    pub fn resolve(&self, code: KeyCode) -> Option<GameAction> {
        GameAction::ALL
            .into_iter()
            .find(|&action| same_key(self.key_for(action), code))
    }

    /// Map keyboard input to game actions.
    pub fn handle_key_event(&self, key: KeyEvent) -> Option<GameAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }
        self.resolve(key.code)
    }
}

fn same_key(bound: KeyCode, pressed: KeyCode) -> bool {
    match (bound, pressed) {
        (KeyCode::Char(a), KeyCode::Char(b)) => a.to_ascii_lowercase() == b.to_ascii_lowercase(),
        _ => bound == pressed,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_default_layout() {
        let keys = KeyBindings::default();
        assert_eq!(
            keys.handle_key_event(KeyEvent::from(KeyCode::Left)),
            Some(GameAction::MoveLeft)
        );
        assert_eq!(
            keys.handle_key_event(KeyEvent::from(KeyCode::Right)),
            Some(GameAction::MoveRight)
        );
        assert_eq!(
            keys.handle_key_event(KeyEvent::from(KeyCode::Down)),
            Some(GameAction::SoftDrop)
        );
        assert_eq!(
            keys.handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(GameAction::HardDrop)
        );
        assert_eq!(
            keys.handle_key_event(KeyEvent::from(KeyCode::Char('q'))),
            Some(GameAction::RotateLeft)
        );
        assert_eq!(
            keys.handle_key_event(KeyEvent::from(KeyCode::Char('W'))),
            Some(GameAction::RotateRight)
        );
        assert_eq!(
            keys.handle_key_event(KeyEvent::from(KeyCode::Char('c'))),
            Some(GameAction::Hold)
        );
        assert_eq!(
            keys.handle_key_event(KeyEvent::from(KeyCode::Char('p'))),
            Some(GameAction::Pause)
        );
        assert_eq!(keys.handle_key_event(KeyEvent::from(KeyCode::Up)), None);
    }

    #[test]
    fn test_rebind_replaces_previous_key() {
        let mut keys = KeyBindings::default();
        keys.rebind(GameAction::RotateRight, KeyCode::Up);
        assert_eq!(keys.resolve(KeyCode::Up), Some(GameAction::RotateRight));
        assert_eq!(keys.resolve(KeyCode::Char('w')), None);
        assert_eq!(keys.key_for(GameAction::RotateRight), KeyCode::Up);
    }

    #[test]
    fn test_control_chord_is_not_an_action() {
        let keys = KeyBindings::default();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(keys.handle_key_event(ctrl_c), None);
        assert!(should_quit(ctrl_c));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }

    #[test]
    fn test_bindings_from_toml() {
        let keys: KeyBindings = toml::from_str(
            r#"
            move_left = "Home"
            hold = { Char = "h" }
            "#,
        )
        .unwrap();
        assert_eq!(keys.move_left, KeyCode::Home);
        assert_eq!(keys.hold, KeyCode::Char('h'));
        assert_eq!(keys.move_right, KeyCode::Right);
    }
}
