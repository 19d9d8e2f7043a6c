//! Keyboard bindings and touch joystick handling.
//!
//! Keys arrive as DOM `KeyboardEvent.key` strings. The joystick is a continuous vector
//! in normalized units (length 1.0 at the edge of the pad).

use std::collections::HashMap;

use glam::Vec2;

use crate::direction::Direction;

pub mod commands;

pub use commands::GameCommand;

#[derive(Debug, Clone)]
pub struct Bindings {
    key_bindings: HashMap<String, GameCommand>,
}

impl Default for Bindings {
    fn default() -> Self {
        let mut key_bindings = HashMap::new();
        let mut bind = |keys: &[&str], command: GameCommand| {
            for key in keys {
                key_bindings.insert(key.to_string(), command);
            }
        };

        // Player movement
        bind(&["ArrowUp", "w"], GameCommand::Move(Direction::Up));
        bind(&["ArrowDown", "s"], GameCommand::Move(Direction::Down));
        bind(&["ArrowLeft", "a"], GameCommand::Move(Direction::Left));
        bind(&["ArrowRight", "d"], GameCommand::Move(Direction::Right));

        // Game actions
        bind(&["Escape", "p"], GameCommand::TogglePause);
        bind(&["m"], GameCommand::ToggleMute);
        bind(&["r"], GameCommand::Restart);

        Self { key_bindings }
    }
}

impl Bindings {
    /// Looks up the command for a key. Single letters match regardless of case.
    pub fn command_for(&self, key: &str) -> Option<GameCommand> {
        self.key_bindings
            .get(key)
            .or_else(|| self.key_bindings.get(&key.to_lowercase()))
            .copied()
    }

    /// Rebinds a key, returning the command it was previously bound to.
    pub fn bind(&mut self, key: impl Into<String>, command: GameCommand) -> Option<GameCommand> {
        self.key_bindings.insert(key.into(), command)
    }
}

/// Converts a joystick vector into a 4-way direction.
///
/// Vectors shorter than `dead_zone` are ignored; otherwise the dominant axis wins.
pub fn joystick_direction(vector: Vec2, dead_zone: f32) -> Option<Direction> {
    if !vector.is_finite() || vector.length() < dead_zone {
        return None;
    }
    Direction::from_dominant_axis(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_and_wasd_bindings() {
        let bindings = Bindings::default();
        assert_eq!(bindings.command_for("ArrowLeft"), Some(GameCommand::Move(Direction::Left)));
        assert_eq!(bindings.command_for("W"), Some(GameCommand::Move(Direction::Up)));
        assert_eq!(bindings.command_for("Escape"), Some(GameCommand::TogglePause));
        assert_eq!(bindings.command_for("P"), Some(GameCommand::TogglePause));
        assert_eq!(bindings.command_for("Tab"), None);
    }

    #[test]
    fn test_joystick_dead_zone() {
        assert_eq!(joystick_direction(Vec2::new(0.1, 0.1), 0.25), None);
        assert_eq!(joystick_direction(Vec2::new(0.2, -0.6), 0.25), Some(Direction::Up));
        assert_eq!(joystick_direction(Vec2::new(-0.8, 0.3), 0.25), Some(Direction::Left));
    }
}
