//! Data the host renders each frame.
//!
//! Nothing here draws anything. [`Hud`] is the scoreboard overlay and [`RenderState`]
//! is the world snapshot; both serialize to JSON so a host can forward them to a page
//! script unchanged.

use glam::Vec2;
use serde::Serialize;
use thousands::Separable;

use crate::animation::PlayerPose;
use crate::effects::{EffectBar, EffectFlags};
use crate::game::state::GameStage;
use crate::ghost::{GhostIndicator, Personality};
use crate::item::{Dot, Powerup};
use crate::section::{SectionManager, SectionState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u32,
    /// The score with thousands separators.
    pub score_text: String,
    pub dots_score: u32,
    /// Number of life icons to show.
    pub lives: u8,
    pub unlock_text: String,
    /// Every timed effect currently running.
    pub effects: EffectFlags,
    pub effect_bars: Vec<EffectBar>,
    pub countdown: Option<u8>,
    pub power_mode: bool,
    pub power_ending: bool,
    pub muted: bool,
    pub stage: GameStage,
}

/// The progress line shown under the score.
pub fn unlock_text(sections: &SectionManager, dots_score: u32) -> String {
    let Some(section) = sections.current() else {
        return "All sections unlocked!".to_string();
    };

    match section.state {
        SectionState::ThresholdReached => format!("Find the key to unlock {}!", section.name),
        _ => {
            let needed = section.threshold.saturating_sub(dots_score);
            format!("{} more points to unlock {}", needed.separate_with_commas(), section.name)
        }
    }
}

pub fn format_score(score: u32) -> String {
    score.separate_with_commas()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub position: Vec2,
    pub pose: PlayerPose,
    pub sprite: String,
    pub invincible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GhostView {
    pub personality: Personality,
    pub position: Vec2,
    pub sprite: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionOverlay {
    pub id: String,
    pub state: SectionState,
    /// Lock overlay opacity.
    pub opacity: f32,
}

/// Everything needed to draw one frame, in document space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub scroll_y: f32,
    /// Translation for the fixed world container so it tracks the page.
    pub world_translation: Vec2,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    pub dots: Vec<Dot>,
    pub powerups: Vec<Powerup>,
    pub key: Option<Vec2>,
    /// Viewport-relative arrows for off-screen ghosts.
    pub indicators: Vec<GhostIndicator>,
    pub sections: Vec<SectionOverlay>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::layout::{PageLayout, Rect, SectionRect};

    fn sections() -> SectionManager {
        let rect = |top: f32| Rect::new(Vec2::new(0.0, top), Vec2::new(1000.0, top + 800.0));
        let layout = PageLayout {
            viewport: Vec2::new(1000.0, 800.0),
            document_height: 4000.0,
            header_bottom: 80.0,
            footer_top: 3800.0,
            sections: ["about", "projects", "contact"]
                .iter()
                .zip([1000.0, 1900.0, 2800.0])
                .map(|(id, top)| SectionRect {
                    id: id.to_string(),
                    rect: rect(top),
                })
                .collect(),
            hoverables: vec![],
        };
        SectionManager::new(&GameConfig::default().sections, &layout).unwrap()
    }

    #[test]
    fn test_unlock_text_progression() {
        let mut sections = sections();
        assert_eq!(unlock_text(&sections, 120), "180 more points to unlock About");

        let bounds = Rect::new(Vec2::new(0.0, 80.0), Vec2::new(1000.0, 1000.0));
        let key = sections.check_threshold(300, Vec2::new(500.0, 500.0), bounds).unwrap();
        assert_eq!(unlock_text(&sections, 300), "Find the key to unlock About!");

        sections.try_collect_key(key);
        assert_eq!(unlock_text(&sections, 300), "400 more points to unlock Projects");
    }

    #[test]
    fn test_score_separators() {
        assert_eq!(format_score(1234567), "1,234,567");
        assert_eq!(format_score(90), "90");
    }
}
