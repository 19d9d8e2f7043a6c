use glam::Vec2;
use serde::Serialize;

use crate::game::state::GameStage;
use crate::ghost::Personality;
use crate::item::PowerupKind;

/// Something the host may want to react to: sound cues it plays itself, DOM classes,
/// score popups, analytics. Drained with [`crate::game::Session::drain_events`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionEvent {
    StageChanged { from: GameStage, to: GameStage },
    DotCollected { id: u32, position: Vec2, pellet: bool, points: u32 },
    PowerModeStarted,
    PowerModeEnding,
    PowerModeEnded,
    GhostEaten { personality: Personality, position: Vec2, points: u32 },
    LifeLost { remaining: u8 },
    PowerupCollected { kind: PowerupKind, position: Vec2, points: i32 },
    EffectExpired(PowerupKind),
    KeySpawned { section: usize, position: Vec2 },
    SectionUnlocked { section: usize, id: String },
    DotsRegenerated { count: usize },
    CountdownTick(u8),
    /// The player started overlapping a hoverable page element.
    HoverEnter(String),
    HoverLeave(String),
    Won { score: u32 },
    GameOver { score: u32 },
}
