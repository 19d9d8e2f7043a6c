//! Page geometry handed to the simulation by the host.
//!
//! The host measures the DOM (header, footer, section elements, hoverable elements)
//! and passes the result in as a [`PageLayout`]. Everything is in document space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Builds a rectangle from a top-left corner and a size.
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin, origin + size)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Grows the rectangle by `amount` on every side. Negative amounts shrink it.
    pub fn expand(&self, amount: f32) -> Rect {
        Rect::new(self.min - Vec2::splat(amount), self.max + Vec2::splat(amount))
    }

    /// Clamps a point to lie inside the rectangle.
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// True when a circle at `center` with `radius` touches the rectangle.
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        self.clamp(center).distance_squared(center) <= radius * radius
    }
}

/// A lockable page region, identified by its element id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRect {
    pub id: String,
    pub rect: Rect,
}

/// An interactive page element that gets highlighted while the player overlaps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hoverable {
    pub id: String,
    pub rect: Rect,
}

/// The measured page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Visible window size.
    pub viewport: Vec2,
    /// Full scrollable document height.
    pub document_height: f32,
    /// Bottom edge of the header; the playable area starts here.
    pub header_bottom: f32,
    /// Top edge of the footer; the playable area ends here.
    pub footer_top: f32,
    /// Lockable sections, in page order.
    pub sections: Vec<SectionRect>,
    /// Elements that receive hover highlights.
    #[serde(default)]
    pub hoverables: Vec<Hoverable>,
}

impl PageLayout {
    /// Checks that the layout describes a usable play area.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return Err(LayoutError::EmptyViewport(self.viewport.x, self.viewport.y));
        }
        if self.footer_top <= self.header_bottom {
            return Err(LayoutError::EmptyPlayArea {
                top: self.header_bottom,
                bottom: self.footer_top,
            });
        }
        Ok(())
    }

    /// Page width. Horizontal wrapping happens at 0 and this value.
    pub fn width(&self) -> f32 {
        self.viewport.x
    }

    /// The area entities may occupy, ignoring section locks.
    pub fn play_area(&self) -> Rect {
        Rect::new(
            Vec2::new(0.0, self.header_bottom),
            Vec2::new(self.viewport.x, self.footer_top),
        )
    }

    /// Largest valid scroll offset.
    pub fn max_scroll(&self) -> f32 {
        (self.document_height - self.viewport.y).max(0.0)
    }

    /// The visible part of the document for a given scroll offset.
    pub fn viewport_rect(&self, scroll_y: f32) -> Rect {
        Rect::from_origin_size(Vec2::new(0.0, scroll_y), self.viewport)
    }

    /// Looks up a section rectangle by element id.
    pub fn section(&self, id: &str) -> Result<&SectionRect, LayoutError> {
        self.sections
            .iter()
            .find(|section| section.id == id)
            .ok_or_else(|| LayoutError::MissingSection(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalizes_corners() {
        let rect = Rect::new(Vec2::new(10.0, 10.0), Vec2::new(0.0, 0.0));
        assert_eq!(rect.min, Vec2::ZERO);
        assert_eq!(rect.max, Vec2::splat(10.0));
    }

    #[test]
    fn test_rect_expand_and_contains() {
        let rect = Rect::from_origin_size(Vec2::ZERO, Vec2::splat(10.0));
        assert!(!rect.contains(Vec2::new(-3.0, 5.0)));
        assert!(rect.expand(5.0).contains(Vec2::new(-3.0, 5.0)));
    }

    #[test]
    fn test_rect_intersects_circle() {
        let rect = Rect::from_origin_size(Vec2::ZERO, Vec2::splat(10.0));
        assert!(rect.intersects_circle(Vec2::new(12.0, 5.0), 3.0));
        assert!(!rect.intersects_circle(Vec2::new(14.0, 5.0), 3.0));
    }

    #[test]
    fn test_validate_rejects_inverted_play_area() {
        let layout = PageLayout {
            viewport: Vec2::new(800.0, 600.0),
            document_height: 2000.0,
            header_bottom: 500.0,
            footer_top: 400.0,
            sections: vec![],
            hoverables: vec![],
        };
        assert!(matches!(layout.validate(), Err(LayoutError::EmptyPlayArea { .. })));
    }
}
