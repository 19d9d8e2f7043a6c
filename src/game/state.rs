//! Session lifecycle types.

use serde::Serialize;

use crate::item::PowerupKind;

/// The overall stage of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GameStage {
    /// Nothing running; the first movement input starts a session.
    #[default]
    Idle,
    /// The intro sound is playing. Input sets the facing but nobody moves.
    Starting,
    /// The main gameplay loop is active.
    Playing,
    /// Frozen; resuming returns to exactly the stage that was paused.
    Paused(Resumable),
    /// The player was caught and the death sequence is in progress.
    Dying(DyingSequence),
    GameOver,
    Won,
}

/// Stages that can be paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Resumable {
    Starting,
    Playing,
    Dying(DyingSequence),
}

impl From<Resumable> for GameStage {
    fn from(resumable: Resumable) -> Self {
        match resumable {
            Resumable::Starting => GameStage::Starting,
            Resumable::Playing => GameStage::Playing,
            Resumable::Dying(sequence) => GameStage::Dying(sequence),
        }
    }
}

/// The multi-step death and respawn sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DyingSequence {
    /// The player shrinks and spins.
    Animating,
    /// The page scrolls back to the respawn point.
    Scrolling,
    /// "3, 2, 1" before play resumes.
    Countdown { remaining: u8 },
}

impl GameStage {
    /// Stages that can be paused, as their resumable form.
    pub fn resumable(self) -> Option<Resumable> {
        match self {
            GameStage::Starting => Some(Resumable::Starting),
            GameStage::Playing => Some(Resumable::Playing),
            GameStage::Dying(sequence) => Some(Resumable::Dying(sequence)),
            _ => None,
        }
    }

    /// Whether the session has ended in a game over or a win.
    pub fn is_finished(self) -> bool {
        matches!(self, GameStage::GameOver | GameStage::Won)
    }

    /// Whether the host should keep scheduling frames.
    pub fn wants_frames(self) -> bool {
        !matches!(self, GameStage::Idle | GameStage::GameOver | GameStage::Won)
    }
}

/// Power pellet mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PowerMode {
    #[default]
    Off,
    Active,
    /// The last stretch, when frightened ghosts flash.
    Ending,
}

impl PowerMode {
    pub fn is_on(self) -> bool {
        self != PowerMode::Off
    }
}

/// The authoritative scoreboard of a session. Only the session writes to it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SessionState {
    pub score: u32,
    /// Points from dots and pellets only, without multipliers. Drives section unlocks.
    pub dots_score: u32,
    pub lives: u8,
    pub stage: GameStage,
    pub power: PowerMode,
    /// Respawn countdown value while one is showing.
    pub countdown: Option<u8>,
    /// A section was just unlocked and its dots have not been generated yet.
    pub regeneration_pending: bool,
}

/// Deferred work scheduled on the session's timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedEvent {
    /// The intro sound never reported finishing.
    IntroTimeout,
    CountdownStep,
    InvincibilityEnd,
    PowerEnding,
    PowerEnd,
    EffectExpired(PowerupKind),
    RegenerateDots,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resumable_roundtrip() {
        let stages = [
            GameStage::Starting,
            GameStage::Playing,
            GameStage::Dying(DyingSequence::Countdown { remaining: 2 }),
        ];
        for stage in stages {
            let resumable = stage.resumable().unwrap();
            assert_eq!(GameStage::from(resumable), stage);
        }
        assert_eq!(GameStage::GameOver.resumable(), None);
        assert_eq!(GameStage::Paused(Resumable::Playing).resumable(), None);
    }

    #[test]
    fn test_wants_frames() {
        assert!(!GameStage::Idle.wants_frames());
        assert!(GameStage::Paused(Resumable::Playing).wants_frames());
        assert!(!GameStage::Won.wants_frames());
    }
}
