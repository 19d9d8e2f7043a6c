//! Proximity tests, movement bounds and hover tracking.
//!
//! There is no physics here: everything is a radius check between two points, plus an
//! axis-aligned rectangle for the area the player and ghosts may occupy.

use std::collections::HashSet;

use glam::Vec2;
use smallvec::SmallVec;
use tracing::trace;

use crate::constants::collider::PLAYER_RADIUS;
use crate::layout::{Hoverable, PageLayout, Rect};

/// True when `a` and `b` are within `radius` of each other.
#[inline]
pub fn within(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) <= radius * radius
}

/// The area entities may occupy: the full page width, from the header down to
/// `boundary_y` (the footer, or the top of the first locked section).
pub fn movement_bounds(layout: &PageLayout, boundary_y: f32) -> Rect {
    let bottom = boundary_y.clamp(layout.header_bottom, layout.footer_top);
    Rect::new(
        Vec2::new(0.0, layout.header_bottom),
        Vec2::new(layout.width(), bottom),
    )
}

/// Applies the player's movement constraints: horizontal wrap, vertical clamp.
///
/// Returns the constrained position and whether the vertical clamp engaged.
pub fn constrain_player(position: Vec2, bounds: Rect) -> (Vec2, bool) {
    let mut constrained = position;

    let width = bounds.width();
    if width > 0.0 {
        if constrained.x < bounds.min.x {
            constrained.x += width;
        } else if constrained.x > bounds.max.x {
            constrained.x -= width;
        }
    }

    let top = bounds.min.y + PLAYER_RADIUS;
    let bottom = (bounds.max.y - PLAYER_RADIUS).max(top);
    let clamped_y = constrained.y.clamp(top, bottom);
    let blocked = clamped_y != constrained.y;
    constrained.y = clamped_y;

    (constrained, blocked)
}

/// A change in which page elements the player overlaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverChange {
    Enter(String),
    Leave(String),
}

/// Collision queries the session runs every tick, plus hover state.
#[derive(Debug, Clone, Default)]
pub struct CollisionManager {
    hovered: HashSet<String>,
}

impl CollisionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates hover state for the player at `position`; returns enter/leave changes.
    ///
    /// Leaves are reported before enters so the host never shows two highlights for
    /// a single frame when the player moves between adjacent elements.
    pub fn update_hover(&mut self, position: Vec2, hoverables: &[Hoverable]) -> SmallVec<[HoverChange; 2]> {
        let mut changes = SmallVec::new();

        let now: HashSet<&str> = hoverables
            .iter()
            .filter(|hoverable| hoverable.rect.intersects_circle(position, PLAYER_RADIUS))
            .map(|hoverable| hoverable.id.as_str())
            .collect();

        let mut left: Vec<String> = self.hovered.iter().filter(|id| !now.contains(id.as_str())).cloned().collect();
        left.sort();
        for id in left {
            trace!(id = %id, "Hover leave");
            self.hovered.remove(&id);
            changes.push(HoverChange::Leave(id));
        }

        let mut entered: Vec<&str> = now.into_iter().filter(|id| !self.hovered.contains(*id)).collect();
        entered.sort_unstable();
        for id in entered {
            trace!(id, "Hover enter");
            self.hovered.insert(id.to_string());
            changes.push(HoverChange::Enter(id.to_string()));
        }

        changes
    }

    /// Clears every highlight, returning the leaves the host must apply.
    pub fn clear_hover(&mut self) -> Vec<HoverChange> {
        let mut ids: Vec<String> = self.hovered.drain().collect();
        ids.sort();
        ids.into_iter().map(HoverChange::Leave).collect()
    }

    pub fn is_hovering(&self, id: &str) -> bool {
        self.hovered.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> PageLayout {
        PageLayout {
            viewport: Vec2::new(1000.0, 800.0),
            document_height: 4000.0,
            header_bottom: 80.0,
            footer_top: 3800.0,
            sections: vec![],
            hoverables: vec![
                Hoverable {
                    id: "cta".into(),
                    rect: Rect::from_origin_size(Vec2::new(100.0, 100.0), Vec2::new(200.0, 50.0)),
                },
                Hoverable {
                    id: "nav".into(),
                    rect: Rect::from_origin_size(Vec2::new(310.0, 100.0), Vec2::new(100.0, 50.0)),
                },
            ],
        }
    }

    #[test]
    fn test_within_is_inclusive() {
        assert!(within(Vec2::ZERO, Vec2::new(3.0, 4.0), 5.0));
        assert!(!within(Vec2::ZERO, Vec2::new(3.0, 4.1), 5.0));
    }

    #[test]
    fn test_bounds_stop_at_locked_section() {
        let bounds = movement_bounds(&layout(), 1500.0);
        assert_eq!(bounds.min.y, 80.0);
        assert_eq!(bounds.max.y, 1500.0);
        // A boundary past the footer is clamped to it.
        assert_eq!(movement_bounds(&layout(), 9000.0).max.y, 3800.0);
    }

    #[test]
    fn test_player_wraps_and_clamps() {
        let bounds = movement_bounds(&layout(), 1500.0);
        let (position, blocked) = constrain_player(Vec2::new(-5.0, 1600.0), bounds);
        assert_eq!(position, Vec2::new(995.0, 1500.0 - PLAYER_RADIUS));
        assert!(blocked);

        let (_, blocked) = constrain_player(Vec2::new(500.0, 700.0), bounds);
        assert!(!blocked);
    }

    #[test]
    fn test_hover_enter_leave() {
        let layout = layout();
        let mut collisions = CollisionManager::new();

        let changes = collisions.update_hover(Vec2::new(150.0, 125.0), &layout.hoverables);
        assert_eq!(changes.as_slice(), &[HoverChange::Enter("cta".into())]);

        // Staying put reports nothing.
        assert!(collisions.update_hover(Vec2::new(160.0, 125.0), &layout.hoverables).is_empty());

        let changes = collisions.update_hover(Vec2::new(360.0, 125.0), &layout.hoverables);
        assert_eq!(
            changes.as_slice(),
            &[HoverChange::Leave("cta".into()), HoverChange::Enter("nav".into())]
        );

        assert_eq!(collisions.clear_hover(), vec![HoverChange::Leave("nav".into())]);
        assert!(!collisions.is_hovering("nav"));
    }
}
