//! Edge-of-screen arrows for ghosts the player can't see.

use glam::Vec2;
use serde::Serialize;

use crate::constants::ghost::INDICATOR_MARGIN;
use crate::ghost::Personality;
use crate::layout::Rect;

/// An arrow pinned to the viewport edge, pointing at an off-screen ghost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GhostIndicator {
    pub personality: Personality,
    /// Viewport-relative position of the arrow.
    pub position: Vec2,
    /// Rotation in radians, 0 pointing right, clockwise on screen.
    pub angle: f32,
    pub frightened: bool,
}

/// Builds the indicator for a ghost at `ghost_position`, or `None` if it is visible.
pub fn indicator_for(personality: Personality, ghost_position: Vec2, frightened: bool, viewport: Rect) -> Option<GhostIndicator> {
    if viewport.contains(ghost_position) {
        return None;
    }

    let inner = viewport.expand(-INDICATOR_MARGIN);
    let edge = inner.clamp(ghost_position);
    let toward = ghost_position - viewport.center();

    Some(GhostIndicator {
        personality,
        position: edge - viewport.min,
        angle: toward.y.atan2(toward.x),
        frightened,
    })
}
