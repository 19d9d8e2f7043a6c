use crate::direction::Direction;

/// Everything the player can ask the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    /// Steer in a direction. The first one also starts an idle session.
    Move(Direction),
    /// Pause when playing, resume when paused.
    TogglePause,
    ToggleMute,
    /// Start over after a game over, a win, or from the pause menu.
    Restart,
    /// Leave the game and tear the session down.
    Quit,
}
