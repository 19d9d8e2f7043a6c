//! Section progression.
//!
//! The page is split into three sections that open one after another. A section moves
//! `Locked -> ThresholdReached -> Unlocked` and never backwards: reaching its dots-only
//! score threshold spawns a key, and collecting the key unlocks it.

use glam::Vec2;
use serde::Serialize;
use tracing::{debug, info};

use crate::collision::within;
use crate::config::SectionConfig;
use crate::constants::collider::KEY_RADIUS;
use crate::constants::section::UNLOCK_TRANSITION;
use crate::error::LayoutError;
use crate::layout::{PageLayout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionState {
    Locked,
    /// Threshold met; waiting for the key to be collected.
    ThresholdReached,
    Unlocked,
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    pub threshold: u32,
    pub state: SectionState,
    pub rect: Rect,
    /// Lock overlay opacity, 1.0 while locked, fading to 0.0 after unlocking.
    pub overlay: f32,
}

#[derive(Debug, Clone)]
pub struct SectionManager {
    sections: Vec<Section>,
    current: usize,
    key: Option<Vec2>,
}

impl SectionManager {
    /// Pairs each configured section with its rectangle on the page.
    pub fn new(config: &[SectionConfig], layout: &PageLayout) -> Result<Self, LayoutError> {
        let sections = config
            .iter()
            .map(|section| {
                let rect = layout.section(&section.id)?.rect;
                Ok(Section {
                    id: section.id.clone(),
                    name: section.name.clone(),
                    threshold: section.threshold,
                    state: SectionState::Locked,
                    rect,
                    overlay: 1.0,
                })
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;

        Ok(Self {
            sections,
            current: 0,
            key: None,
        })
    }

    /// Locks everything again.
    pub fn reset(&mut self) {
        for section in &mut self.sections {
            section.state = SectionState::Locked;
            section.overlay = 1.0;
        }
        self.current = 0;
        self.key = None;
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Index of the section currently being worked towards. Equals the section count once
    /// everything is unlocked.
    pub fn current_section(&self) -> usize {
        self.current
    }

    pub fn key(&self) -> Option<Vec2> {
        self.key
    }

    pub fn all_unlocked(&self) -> bool {
        self.current >= self.sections.len()
    }

    /// Checks the dots-only score against the current section's threshold.
    ///
    /// On the transition to `ThresholdReached` a key is placed at `spawn_hint` (the
    /// viewport center), pulled inside `bounds` so it is never behind the lock. Returns
    /// the key position when that happens.
    pub fn check_threshold(&mut self, dots_score: u32, spawn_hint: Vec2, bounds: Rect) -> Option<Vec2> {
        let section = self.sections.get_mut(self.current)?;
        if section.state != SectionState::Locked || dots_score < section.threshold {
            return None;
        }

        section.state = SectionState::ThresholdReached;
        let key = bounds.expand(-KEY_RADIUS).clamp(spawn_hint);
        self.key = Some(key);
        info!(section = %section.id, dots_score, ?key, "Section threshold reached");
        Some(key)
    }

    /// Collects the key if the player is close enough. Returns the unlocked section index.
    pub fn try_collect_key(&mut self, player: Vec2) -> Option<usize> {
        let key = self.key?;
        if !within(key, player, KEY_RADIUS) {
            return None;
        }

        let index = self.current;
        let section = self.sections.get_mut(index)?;
        if section.state != SectionState::ThresholdReached {
            return None;
        }

        section.state = SectionState::Unlocked;
        self.key = None;
        self.current += 1;
        info!(section = %section.id, next = self.current, "Section unlocked");
        Some(index)
    }

    /// Rectangles of every section not yet unlocked.
    pub fn locked_zones(&self) -> Vec<Rect> {
        self.sections
            .iter()
            .filter(|section| section.state != SectionState::Unlocked)
            .map(|section| section.rect)
            .collect()
    }

    /// The lowest y anything may reach: the top of the first locked section, or `footer_top`.
    pub fn boundary_y(&self, footer_top: f32) -> f32 {
        self.sections
            .iter()
            .filter(|section| section.state != SectionState::Unlocked)
            .map(|section| section.rect.min.y)
            .fold(footer_top, f32::min)
    }

    /// Dots-only points still needed to reach the current threshold.
    ///
    /// `None` once every section is unlocked; `Some(0)` while a key waits to be collected.
    pub fn points_to_next_unlock(&self, dots_score: u32) -> Option<u32> {
        self.sections
            .get(self.current)
            .map(|section| section.threshold.saturating_sub(dots_score))
    }

    /// The section being worked towards.
    pub fn current(&self) -> Option<&Section> {
        self.sections.get(self.current)
    }

    /// Fades unlock overlays.
    pub fn update(&mut self, dt: f32) {
        for section in self.sections.iter_mut().filter(|section| section.state == SectionState::Unlocked) {
            if section.overlay > 0.0 {
                section.overlay = (section.overlay - dt / UNLOCK_TRANSITION).max(0.0);
                if section.overlay == 0.0 {
                    debug!(section = %section.id, "Unlock transition finished");
                }
            }
        }
    }
}
