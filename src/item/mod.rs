//! Dots, power pellets and powerups.
//!
//! Dots sit on a fixed grid over the playable area. A dot that has been eaten is
//! remembered by its grid position for the rest of the session, so regenerating the
//! grid after a section unlock never brings it back.

pub mod powerup;

use std::collections::HashSet;

use glam::{IVec2, Vec2};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::collision::within;
use crate::constants::collider::{DOT_RADIUS, ITEM_RADIUS, PELLET_RADIUS};
use crate::constants::items::{
    DOT_POINTS, LOCKED_ZONE_BUFFER, PELLETS_PER_SLICE, PELLET_MIN_SEPARATION, PELLET_POINTS, PLACEMENT_ATTEMPTS,
    POWERUP_COUNT, POWERUP_EDGE_MARGIN, POWERUP_MIN_SEPARATION,
};
use crate::layout::Rect;

pub use powerup::PowerupKind;

/// A dot or power pellet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dot {
    pub id: u32,
    pub position: Vec2,
    pub pellet: bool,
    pub points: u32,
}

/// A powerup waiting to be picked up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Powerup {
    pub id: u32,
    pub position: Vec2,
    pub kind: PowerupKind,
}

/// Where generation may place things.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    /// Header to footer, full width.
    pub area: Rect,
    /// Sections still locked; nothing is placed in or near them.
    pub locked: &'a [Rect],
    /// Height of one pellet slice (the viewport height).
    pub slice_height: f32,
}

impl Placement<'_> {
    fn is_blocked(&self, position: Vec2) -> bool {
        self.locked
            .iter()
            .any(|zone| zone.expand(LOCKED_ZONE_BUFFER).contains(position))
    }
}

/// What the player picked up this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pickups {
    pub dots: SmallVec<[Dot; 2]>,
    pub powerups: SmallVec<[Powerup; 1]>,
}

impl Pickups {
    pub fn is_empty(&self) -> bool {
        self.dots.is_empty() && self.powerups.is_empty()
    }

    pub fn pellet_eaten(&self) -> bool {
        self.dots.iter().any(|dot| dot.pellet)
    }
}

#[derive(Debug, Clone)]
pub struct ItemManager {
    dots: Vec<Dot>,
    powerups: Vec<Powerup>,
    collected: HashSet<IVec2>,
    spacing: f32,
    phase_total: usize,
    next_id: u32,
}

impl ItemManager {
    pub fn new(spacing: f32) -> Self {
        Self {
            dots: Vec::new(),
            powerups: Vec::new(),
            collected: HashSet::new(),
            spacing,
            phase_total: 0,
            next_id: 0,
        }
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn powerups(&self) -> &[Powerup] {
        &self.powerups
    }

    /// Forgets everything, including which dots were eaten. Used on (re)start.
    pub fn reset(&mut self) {
        self.dots.clear();
        self.powerups.clear();
        self.collected.clear();
        self.phase_total = 0;
    }

    /// Rebuilds the dot grid for the current phase.
    ///
    /// Skips positions in or near locked sections and positions eaten earlier in the
    /// session, then promotes a few dots per slice to power pellets.
    pub fn generate_dots(&mut self, placement: &Placement<'_>, rng: &mut impl Rng) {
        self.dots.clear();

        let spacing = self.spacing.max(1.0);
        let area = placement.area;
        let mut y = area.min.y + spacing * 0.5;
        while y < area.max.y {
            let mut x = spacing * 0.5;
            while x < area.max.x {
                let position = Vec2::new(x, y);
                if !placement.is_blocked(position) && !self.collected.contains(&grid_key(position)) {
                    let id = self.allocate_id();
                    self.dots.push(Dot {
                        id,
                        position,
                        pellet: false,
                        points: DOT_POINTS,
                    });
                }
                x += spacing;
            }
            y += spacing;
        }

        let pellets = self.promote_pellets(placement, rng);
        self.phase_total = self.dots.len();
        debug!(dots = self.dots.len(), pellets, collected = self.collected.len(), "Dots generated");
    }

    fn promote_pellets(&mut self, placement: &Placement<'_>, rng: &mut impl Rng) -> usize {
        let slice_height = placement.slice_height.max(self.spacing);
        let mut chosen: Vec<Vec2> = Vec::new();

        let mut slice_top = placement.area.min.y;
        while slice_top < placement.area.max.y {
            let slice_bottom = slice_top + slice_height;
            let mut candidates: Vec<usize> = self
                .dots
                .iter()
                .enumerate()
                .filter(|(_, dot)| dot.position.y >= slice_top && dot.position.y < slice_bottom)
                .map(|(index, _)| index)
                .collect();
            candidates.shuffle(rng);

            let mut placed = 0;
            for index in candidates {
                if placed == PELLETS_PER_SLICE {
                    break;
                }
                let position = self.dots[index].position;
                if chosen.iter().all(|other| other.distance(position) >= PELLET_MIN_SEPARATION) {
                    let dot = &mut self.dots[index];
                    dot.pellet = true;
                    dot.points = PELLET_POINTS;
                    chosen.push(position);
                    placed += 1;
                }
            }

            slice_top = slice_bottom;
        }

        chosen.len()
    }

    /// Scatters 3 to 5 random powerups, away from locked sections and each other.
    pub fn spawn_powerups(&mut self, placement: &Placement<'_>, rng: &mut impl Rng) {
        self.powerups.clear();

        let (min, max) = POWERUP_COUNT;
        let count = rng.random_range(min..=max);
        let inner = placement.area.expand(-POWERUP_EDGE_MARGIN);
        if inner.width() <= 0.0 || inner.height() <= 0.0 {
            debug!("Play area too small for powerups");
            return;
        }

        for _ in 0..count {
            let kind = PowerupKind::random(rng);
            let spot = (0..PLACEMENT_ATTEMPTS).find_map(|_| {
                let candidate = Vec2::new(
                    rng.random_range(inner.min.x..=inner.max.x),
                    rng.random_range(inner.min.y..=inner.max.y),
                );
                let clear = !placement.is_blocked(candidate)
                    && self
                        .powerups
                        .iter()
                        .all(|other| other.position.distance(candidate) >= POWERUP_MIN_SEPARATION);
                clear.then_some(candidate)
            });

            match spot {
                Some(position) => {
                    let id = self.allocate_id();
                    trace!(?kind, ?position, "Powerup placed");
                    self.powerups.push(Powerup { id, position, kind });
                }
                None => debug!(?kind, "No room for powerup"),
            }
        }
        debug!(count = self.powerups.len(), "Powerups spawned");
    }

    /// Collects everything within reach of `player`.
    pub fn collect(&mut self, player: Vec2) -> Pickups {
        let mut pickups = Pickups::default();

        let collected = &mut self.collected;
        self.dots.retain(|dot| {
            let radius = if dot.pellet { PELLET_RADIUS } else { DOT_RADIUS };
            if within(dot.position, player, radius) {
                collected.insert(grid_key(dot.position));
                pickups.dots.push(*dot);
                false
            } else {
                true
            }
        });

        self.powerups.retain(|powerup| {
            if within(powerup.position, player, ITEM_RADIUS) {
                pickups.powerups.push(*powerup);
                false
            } else {
                true
            }
        });

        pickups
    }

    /// Drops every live dot without marking it eaten; regeneration will bring them back.
    pub fn clear_live_dots(&mut self) {
        debug!(cleared = self.dots.len(), "Live dots cleared");
        self.dots.clear();
    }

    pub fn all_dots_collected(&self) -> bool {
        self.dots.is_empty()
    }

    /// Fraction of this phase's dots still on the page.
    pub fn remaining_fraction(&self) -> f32 {
        if self.phase_total == 0 {
            1.0
        } else {
            self.dots.len() as f32 / self.phase_total as f32
        }
    }

    /// Whether a dot at `position` has been eaten this session.
    pub fn was_collected(&self, position: Vec2) -> bool {
        self.collected.contains(&grid_key(position))
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

/// Dots always land on the same grid, so a whole-pixel key is stable.
fn grid_key(position: Vec2) -> IVec2 {
    position.round().as_ivec2()
}
