//! The four ghost personalities and their target selection.
//!
//! Each personality turns the same inputs (player position, velocity and facing, plus
//! the Aggressor's position) into a different steering target, which is what keeps the
//! four ghosts visibly distinct on screen.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

use crate::constants::ghost::{
    AGGRESSOR_LOOKAHEAD, AMBUSHER_FLANK_OFFSET, AMBUSHER_LOOKAHEAD, FLANKER_PIVOT_DISTANCE, OPPORTUNIST_ORBIT_RADIUS,
    OPPORTUNIST_ORBIT_SPEED, OPPORTUNIST_PROXIMITY,
};
use crate::direction::Direction;
use crate::layout::Rect;

/// Inset from the viewport corners used for scatter targets.
const SCATTER_CORNER_INSET: f32 = 40.0;

/// The four ghost personalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum Personality {
    /// Chases the player directly.
    Aggressor,
    /// Cuts the player off from ahead.
    Ambusher,
    /// Pincers the player together with the Aggressor.
    Flanker,
    /// Chases from afar, keeps its distance up close.
    Opportunist,
}

impl Personality {
    /// Position in the ghost table.
    pub const fn index(self) -> usize {
        match self {
            Personality::Aggressor => 0,
            Personality::Ambusher => 1,
            Personality::Flanker => 2,
            Personality::Opportunist => 3,
        }
    }

    /// Returns the file stem used by this ghost's sprites.
    pub const fn asset_stem(self) -> &'static str {
        match self {
            Personality::Aggressor => "blinky",
            Personality::Ambusher => "pinky",
            Personality::Flanker => "inky",
            Personality::Opportunist => "clyde",
        }
    }

    /// The Aggressor never takes a scatter break.
    pub const fn scatters(self) -> bool {
        !matches!(self, Personality::Aggressor)
    }

    /// The corner of the visible, reachable area this ghost retreats to while scattering.
    pub fn scatter_corner(self, area: Rect) -> Vec2 {
        let inner = area.expand(-SCATTER_CORNER_INSET);
        let area = if inner.width() > 0.0 && inner.height() > 0.0 { inner } else { area };
        match self {
            Personality::Aggressor => Vec2::new(area.max.x, area.min.y),
            Personality::Ambusher => area.min,
            Personality::Flanker => area.max,
            Personality::Opportunist => Vec2::new(area.min.x, area.max.y),
        }
    }
}

/// What the chasing ghosts know about the player.
#[derive(Debug, Clone, Copy)]
pub struct Quarry {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Direction,
}

/// Opportunist bookkeeping that must survive a pause.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrbitState {
    /// Current angle around the player, in radians.
    pub angle: f32,
    /// Whether the ghost is currently orbiting rather than chasing.
    pub orbiting: bool,
}

/// Computes the chase target for a personality.
///
/// `aggressor` is the Aggressor's current position, used by the Flanker. `bounds` is the
/// area the ghost may currently occupy; targets are clamped to it, and the Opportunist
/// uses it to detect when it has the player cornered.
pub fn chase_target(
    personality: Personality,
    quarry: &Quarry,
    ghost_position: Vec2,
    aggressor: Vec2,
    orbit: &mut OrbitState,
    bounds: Rect,
    dt: f32,
) -> Vec2 {
    let facing = quarry.facing.as_vec2();

    let target = match personality {
        Personality::Aggressor => quarry.position + quarry.velocity * AGGRESSOR_LOOKAHEAD,
        Personality::Ambusher => {
            quarry.position + facing * AMBUSHER_LOOKAHEAD + quarry.facing.clockwise().as_vec2() * AMBUSHER_FLANK_OFFSET
        }
        Personality::Flanker => {
            let pivot = quarry.position + facing * FLANKER_PIVOT_DISTANCE;
            pivot + (pivot - aggressor)
        }
        Personality::Opportunist => opportunist_target(quarry.position, ghost_position, orbit, bounds, dt),
    };

    bounds.clamp(target)
}

fn opportunist_target(player: Vec2, ghost_position: Vec2, orbit: &mut OrbitState, bounds: Rect, dt: f32) -> Vec2 {
    if ghost_position.distance(player) > OPPORTUNIST_PROXIMITY {
        orbit.orbiting = false;
        return player;
    }

    if !orbit.orbiting {
        // Pick up the orbit where the ghost already is, so the switch doesn't snap.
        let offset = ghost_position - player;
        orbit.angle = offset.y.atan2(offset.x);
        orbit.orbiting = true;
    }

    orbit.angle = (orbit.angle + OPPORTUNIST_ORBIT_SPEED * dt).rem_euclid(std::f32::consts::TAU);
    let orbit_point = player + Vec2::new(orbit.angle.cos(), orbit.angle.sin()) * OPPORTUNIST_ORBIT_RADIUS;

    if bounds.contains(orbit_point) {
        orbit_point
    } else {
        // Cornered: nowhere to circle, so go in.
        player
    }
}
