//! Ghost AI: the four pursuers, their modes, steering and collisions.
//!
//! Ghosts move freely in page space. Each tick a ghost picks a target (home when eaten,
//! away from the player when frightened, otherwise its personality's chase or scatter
//! target) and steers toward it with exponential smoothing, so turns are curved and the
//! motion does not depend on the frame rate.

pub mod indicator;
pub mod personality;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::IntoEnumIterator;
use tracing::{debug, trace};

use crate::asset::SpriteKey;
use crate::constants::animation::GHOST_FRAME_DURATION;
use crate::constants::collider::GHOST_RADIUS;
use crate::constants::ghost::{
    BASE_SPEED_FRACTION, EATEN_RESPAWN_DELAY, EATEN_SPEED_MULTIPLIER, EAT_BASE_POINTS, EAT_MAX_POINTS, FLEE_DISTANCE,
    FRIGHTENED_SPEED_MULTIPLIER, HOME_ARRIVAL_RADIUS, HOME_SPACING, HURRY_UP_MULTIPLIER, HURRY_UP_THRESHOLDS,
    MAX_SPEED_FRACTION, MODE_CYCLE, SCATTER_DURATION, STEERING_RATE,
};
use crate::direction::Direction;
use crate::layout::Rect;

pub use indicator::GhostIndicator;
pub use personality::{OrbitState, Personality, Quarry};

/// A single pursuer.
///
/// The whole struct is serde-serializable; a serialized ghost restores with its
/// steering state (velocity, orbit angle, mode timer) intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ghost {
    pub personality: Personality,
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Direction,
    pub frame: u8,
    frame_timer: f32,
    pub frightened: bool,
    pub eaten: bool,
    pub frozen: bool,
    /// Personality scratch state (only the Opportunist uses it).
    pub orbit: OrbitState,
    /// Seconds into the current scatter/chase cycle.
    pub mode_timer: f32,
    eaten_timer: f32,
    home: Vec2,
}

impl Ghost {
    fn new(personality: Personality, home: Vec2) -> Self {
        Self {
            personality,
            position: home,
            velocity: Vec2::ZERO,
            facing: Direction::Up,
            frame: 0,
            frame_timer: 0.0,
            frightened: false,
            eaten: false,
            frozen: false,
            orbit: OrbitState::default(),
            mode_timer: 0.0,
            eaten_timer: 0.0,
            home,
        }
    }

    /// This ghost's resting point.
    pub fn home(&self) -> Vec2 {
        self.home
    }

    /// Whether the ghost is in the scatter part of its mode cycle.
    pub fn is_scattering(&self) -> bool {
        self.personality.scatters() && self.mode_timer % MODE_CYCLE < SCATTER_DURATION
    }

    /// The sprite to draw for this ghost.
    pub fn sprite(&self, power_ending: bool) -> SpriteKey {
        if self.eaten {
            SpriteKey::Eyes { direction: self.facing }
        } else if self.frightened {
            SpriteKey::Frightened {
                frame: self.frame,
                flashing: power_ending && self.frame == 1,
            }
        } else {
            SpriteKey::Ghost {
                personality: self.personality,
                direction: self.facing,
                frame: self.frame,
            }
        }
    }

    fn eat(&mut self) {
        self.frightened = false;
        self.eaten = true;
        self.eaten_timer = 0.0;
        self.orbit = OrbitState::default();
    }

    fn return_home(&mut self) {
        self.eaten = false;
        self.eaten_timer = 0.0;
        self.velocity = Vec2::ZERO;
    }

    fn animate(&mut self, dt: f32) {
        self.frame_timer += dt;
        while self.frame_timer >= GHOST_FRAME_DURATION {
            self.frame_timer -= GHOST_FRAME_DURATION;
            self.frame = (self.frame + 1) % 2;
        }
    }
}

/// Serializable state of every ghost, as captured by [`GhostAi::snapshot`].
pub type GhostSnapshot = Vec<Ghost>;

/// Everything the ghosts need to know about the world for one tick.
#[derive(Debug, Clone, Copy)]
pub struct GhostContext {
    pub quarry: Quarry,
    /// The player's unmodified base speed; ghost speeds derive from it.
    pub player_base_speed: f32,
    /// Fraction of the current dot phase still uncollected.
    pub remaining_dot_fraction: f32,
    /// Where ghosts may be: full page width, header down to the first locked section.
    pub bounds: Rect,
    /// The visible area, used for scatter corners.
    pub viewport: Rect,
}

/// How the player is protected when a ghost touches it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Protection {
    pub shield: bool,
    pub invincible: bool,
}

/// The result of a ghost collision pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GhostCollisions {
    /// Ghosts eaten this tick, with the points awarded for each.
    pub eaten: SmallVec<[(Personality, u32); 4]>,
    /// A dangerous ghost touched an unprotected player.
    pub player_hit: bool,
    /// A dangerous ghost touched a shielded player.
    pub shield_absorbed: bool,
}

/// Owns the four ghosts and the power-mode combo.
#[derive(Debug, Clone)]
pub struct GhostAi {
    ghosts: Vec<Ghost>,
    combo: u32,
}

impl GhostAi {
    /// Creates the four ghosts side by side around `home`.
    pub fn new(home: Vec2) -> Self {
        let mut ai = Self {
            ghosts: Vec::with_capacity(4),
            combo: 0,
        };
        ai.reset(home);
        ai
    }

    /// Puts every ghost back at home in its initial state.
    pub fn reset(&mut self, home: Vec2) {
        self.ghosts = Personality::iter()
            .map(|personality| Ghost::new(personality, home_slot(home, personality)))
            .collect();
        self.combo = 0;
        debug!(?home, "Ghosts reset");
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn ghost(&self, personality: Personality) -> &Ghost {
        &self.ghosts[personality.index()]
    }

    /// Mutable access for hosts and tests that need to place a ghost.
    pub fn ghost_mut(&mut self, personality: Personality) -> &mut Ghost {
        &mut self.ghosts[personality.index()]
    }

    /// Number of ghosts eaten in the current power-mode window.
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Advances every ghost by `dt`.
    pub fn update(&mut self, context: &GhostContext, dt: f32) {
        let aggressor = self.ghosts[Personality::Aggressor.index()].position;

        for ghost in &mut self.ghosts {
            ghost.animate(dt);
            // Eaten ghosts keep heading home through a freeze.
            if ghost.frozen && !ghost.eaten {
                continue;
            }
            ghost.mode_timer = (ghost.mode_timer + dt) % MODE_CYCLE;

            if ghost.eaten {
                ghost.eaten_timer += dt;
                if ghost.position.distance(ghost.home) <= HOME_ARRIVAL_RADIUS {
                    trace!(personality = ?ghost.personality, "Ghost reached home");
                    ghost.return_home();
                    continue;
                }
                if ghost.eaten_timer >= EATEN_RESPAWN_DELAY {
                    debug!(personality = ?ghost.personality, "Eaten ghost placed at home after timeout");
                    ghost.position = ghost.home;
                    ghost.return_home();
                    continue;
                }
            }

            let target = select_target(ghost, context, aggressor, dt);
            let speed = ghost_speed(ghost, context);
            steer(ghost, target, speed, dt);
            constrain(ghost, context.bounds);
        }
    }

    /// Frightens every ghost that isn't already eaten and starts a new combo.
    pub fn frighten_all(&mut self) {
        self.combo = 0;
        let mut count = 0;
        for ghost in self.ghosts.iter_mut().filter(|ghost| !ghost.eaten) {
            ghost.frightened = true;
            // Turning around is the classic tell that power mode started.
            ghost.velocity = -ghost.velocity;
            count += 1;
        }
        debug!(count, "Ghosts frightened");
    }

    /// Ends power mode for any ghost still frightened.
    pub fn calm_all(&mut self) {
        for ghost in &mut self.ghosts {
            ghost.frightened = false;
        }
    }

    pub fn set_frozen(&mut self, frozen: bool) {
        for ghost in &mut self.ghosts {
            ghost.frozen = frozen;
        }
        debug!(frozen, "Ghost freeze changed");
    }

    /// Resolves contact between the player and every ghost.
    ///
    /// Frightened ghosts are eaten for `200 * 2^combo` points, capped at 1600. Eaten and
    /// frozen ghosts are harmless.
    pub fn check_ghost_collisions(&mut self, player: Vec2, protection: Protection) -> GhostCollisions {
        let mut outcome = GhostCollisions::default();

        for ghost in &mut self.ghosts {
            if ghost.eaten || ghost.position.distance(player) > GHOST_RADIUS {
                continue;
            }

            if ghost.frightened {
                let points = EAT_BASE_POINTS.saturating_mul(1u32 << self.combo.min(16)).min(EAT_MAX_POINTS);
                self.combo += 1;
                ghost.eat();
                debug!(personality = ?ghost.personality, points, combo = self.combo, "Ghost eaten");
                outcome.eaten.push((ghost.personality, points));
            } else if ghost.frozen || protection.invincible {
                continue;
            } else if protection.shield {
                outcome.shield_absorbed = true;
            } else {
                outcome.player_hit = true;
            }
        }

        outcome
    }

    /// Edge indicators for every ghost outside `viewport`.
    pub fn indicators(&self, viewport: Rect) -> SmallVec<[GhostIndicator; 4]> {
        self.ghosts
            .iter()
            .filter_map(|ghost| indicator::indicator_for(ghost.personality, ghost.position, ghost.frightened, viewport))
            .collect()
    }

    /// Captures every ghost's state.
    pub fn snapshot(&self) -> GhostSnapshot {
        self.ghosts.clone()
    }

    /// Restores ghosts captured by [`GhostAi::snapshot`]. Ghosts missing from the snapshot keep their current state.
    pub fn restore(&mut self, snapshot: GhostSnapshot) {
        for ghost in snapshot {
            let index = ghost.personality.index();
            self.ghosts[index] = ghost;
        }
    }
}

fn home_slot(home: Vec2, personality: Personality) -> Vec2 {
    let offset = personality.index() as f32 - 1.5;
    home + Vec2::new(offset * HOME_SPACING, 0.0)
}

fn select_target(ghost: &mut Ghost, context: &GhostContext, aggressor: Vec2, dt: f32) -> Vec2 {
    if ghost.eaten {
        return ghost.home;
    }

    if ghost.frightened {
        let away = (ghost.position - context.quarry.position).normalize_or_zero();
        return context.bounds.clamp(ghost.position + away * FLEE_DISTANCE);
    }

    if ghost.is_scattering() {
        let visible = Rect::new(
            context.viewport.min.max(context.bounds.min),
            context.viewport.max.min(context.bounds.max),
        );
        return context.bounds.clamp(ghost.personality.scatter_corner(visible));
    }

    personality::chase_target(
        ghost.personality,
        &context.quarry,
        ghost.position,
        aggressor,
        &mut ghost.orbit,
        context.bounds,
        dt,
    )
}

fn ghost_speed(ghost: &Ghost, context: &GhostContext) -> f32 {
    let base = context.player_base_speed * BASE_SPEED_FRACTION;
    if ghost.eaten {
        return base * EATEN_SPEED_MULTIPLIER;
    }

    let mut speed = base;
    if ghost.personality == Personality::Aggressor {
        for threshold in HURRY_UP_THRESHOLDS {
            if context.remaining_dot_fraction < threshold {
                speed *= HURRY_UP_MULTIPLIER;
            }
        }
    }
    speed = speed.min(context.player_base_speed * MAX_SPEED_FRACTION);

    if ghost.frightened {
        speed *= FRIGHTENED_SPEED_MULTIPLIER;
    }
    speed
}

fn steer(ghost: &mut Ghost, target: Vec2, speed: f32, dt: f32) {
    let desired = (target - ghost.position).normalize_or_zero() * speed;
    let blend = 1.0 - (-STEERING_RATE * dt).exp();
    ghost.velocity = ghost.velocity.lerp(desired, blend).clamp_length_max(speed);
    ghost.position += ghost.velocity * dt;

    if let Some(facing) = Direction::from_dominant_axis(ghost.velocity) {
        ghost.facing = facing;
    }
}

/// Wraps horizontally and bounces off the vertical limits.
fn constrain(ghost: &mut Ghost, bounds: Rect) {
    let width = bounds.width();
    if width > 0.0 {
        if ghost.position.x < bounds.min.x {
            ghost.position.x += width;
        } else if ghost.position.x > bounds.max.x {
            ghost.position.x -= width;
        }
    }

    if ghost.position.y < bounds.min.y {
        ghost.position.y = bounds.min.y;
        ghost.velocity.y = ghost.velocity.y.abs();
    } else if ghost.position.y > bounds.max.y {
        ghost.position.y = bounds.max.y;
        ghost.velocity.y = -ghost.velocity.y.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(player: Vec2) -> GhostContext {
        GhostContext {
            quarry: Quarry {
                position: player,
                velocity: Vec2::ZERO,
                facing: Direction::Right,
            },
            player_base_speed: 200.0,
            remaining_dot_fraction: 1.0,
            bounds: Rect::new(Vec2::new(0.0, 100.0), Vec2::new(1000.0, 3000.0)),
            viewport: Rect::new(Vec2::new(0.0, 0.0), Vec2::new(1000.0, 800.0)),
        }
    }

    #[test]
    fn test_ghosts_start_at_distinct_home_slots() {
        let ai = GhostAi::new(Vec2::new(500.0, 200.0));
        assert_eq!(ai.ghosts().len(), 4);
        assert_eq!(ai.ghost(Personality::Aggressor).position, Vec2::new(428.0, 200.0));
        assert_eq!(ai.ghost(Personality::Opportunist).position, Vec2::new(572.0, 200.0));
    }

    #[test]
    fn test_combo_scoring_caps() {
        let mut ai = GhostAi::new(Vec2::new(500.0, 200.0));
        ai.frighten_all();
        let mut awarded = Vec::new();
        for personality in Personality::iter() {
            let position = ai.ghost(personality).position;
            let outcome = ai.check_ghost_collisions(position, Protection::default());
            awarded.extend(outcome.eaten.iter().map(|(_, points)| *points));
        }
        assert_eq!(awarded, vec![200, 400, 800, 1600]);
    }

    #[test]
    fn test_combo_resets_on_new_power_mode() {
        let mut ai = GhostAi::new(Vec2::new(500.0, 200.0));
        ai.frighten_all();
        let position = ai.ghost(Personality::Ambusher).position;
        ai.check_ghost_collisions(position, Protection::default());
        assert_eq!(ai.combo(), 1);
        ai.frighten_all();
        assert_eq!(ai.combo(), 0);
        // The eaten ghost stays eaten.
        assert!(ai.ghost(Personality::Ambusher).eaten);
        assert!(!ai.ghost(Personality::Ambusher).frightened);
    }

    #[test]
    fn test_eaten_and_frozen_ghosts_are_harmless() {
        let mut ai = GhostAi::new(Vec2::new(500.0, 200.0));
        let position = ai.ghost(Personality::Aggressor).position;
        ai.ghost_mut(Personality::Aggressor).eaten = true;
        assert!(!ai.check_ghost_collisions(position, Protection::default()).player_hit);

        ai.ghost_mut(Personality::Aggressor).eaten = false;
        ai.set_frozen(true);
        assert!(!ai.check_ghost_collisions(position, Protection::default()).player_hit);

        ai.set_frozen(false);
        assert!(ai.check_ghost_collisions(position, Protection::default()).player_hit);
    }

    #[test]
    fn test_shield_absorbs() {
        let mut ai = GhostAi::new(Vec2::new(500.0, 200.0));
        let position = ai.ghost(Personality::Aggressor).position;
        let outcome = ai.check_ghost_collisions(
            position,
            Protection {
                shield: true,
                invincible: false,
            },
        );
        assert!(!outcome.player_hit);
        assert!(outcome.shield_absorbed);
    }

    #[test]
    fn test_hurry_up_is_cumulative_and_capped() {
        let ghost = Ghost::new(Personality::Aggressor, Vec2::ZERO);
        let mut context = context(Vec2::ZERO);
        assert!((ghost_speed(&ghost, &context) - 144.0).abs() < 1e-3);
        context.remaining_dot_fraction = 0.4;
        assert!((ghost_speed(&ghost, &context) - 158.4).abs() < 1e-3);
        context.remaining_dot_fraction = 0.2;
        assert!((ghost_speed(&ghost, &context) - 174.24).abs() < 1e-3);
        assert!(ghost_speed(&ghost, &context) <= 180.0);

        let other = Ghost::new(Personality::Flanker, Vec2::ZERO);
        assert!((ghost_speed(&other, &context) - 144.0).abs() < 1e-3);
    }

    #[test]
    fn test_frightened_ghost_flees() {
        let mut ai = GhostAi::new(Vec2::new(500.0, 1000.0));
        let player = Vec2::new(500.0, 1100.0);
        ai.frighten_all();
        let before = ai.ghost(Personality::Aggressor).position.distance(player);
        for _ in 0..60 {
            ai.update(&context(player), 1.0 / 60.0);
        }
        let after = ai.ghost(Personality::Aggressor).position.distance(player);
        assert!(after > before, "{before} -> {after}");
    }

    #[test]
    fn test_eaten_ghost_returns_home() {
        let mut ai = GhostAi::new(Vec2::new(500.0, 1000.0));
        ai.frighten_all();
        let ghost = ai.ghost_mut(Personality::Ambusher);
        ghost.position = Vec2::new(500.0, 1400.0);
        ai.check_ghost_collisions(Vec2::new(500.0, 1400.0), Protection::default());
        assert!(ai.ghost(Personality::Ambusher).eaten);

        for _ in 0..(60 * 5) {
            ai.update(&context(Vec2::new(900.0, 2000.0)), 1.0 / 60.0);
            if !ai.ghost(Personality::Ambusher).eaten {
                break;
            }
        }
        let ghost = ai.ghost(Personality::Ambusher);
        assert!(!ghost.eaten);
        assert!(ghost.position.distance(ghost.home()) <= HOME_ARRIVAL_RADIUS + 1.0);
    }

    #[test]
    fn test_eaten_ghost_returns_home_through_freeze() {
        let mut ai = GhostAi::new(Vec2::new(500.0, 1000.0));
        ai.frighten_all();
        ai.ghost_mut(Personality::Flanker).position = Vec2::new(300.0, 1300.0);
        ai.check_ghost_collisions(Vec2::new(300.0, 1300.0), Protection::default());
        ai.set_frozen(true);

        for _ in 0..(60 * 7) {
            ai.update(&context(Vec2::new(900.0, 2000.0)), 1.0 / 60.0);
        }
        let flanker = ai.ghost(Personality::Flanker);
        assert!(!flanker.eaten);
        assert!(flanker.position.distance(flanker.home()) <= HOME_ARRIVAL_RADIUS + 1.0);
        // The others never moved.
        assert_eq!(ai.ghost(Personality::Aggressor).position, ai.ghost(Personality::Aggressor).home());
    }

    #[test]
    fn test_vertical_bounce() {
        let mut ghost = Ghost::new(Personality::Aggressor, Vec2::new(100.0, 90.0));
        ghost.velocity = Vec2::new(0.0, -50.0);
        constrain(&mut ghost, Rect::new(Vec2::new(0.0, 100.0), Vec2::new(1000.0, 500.0)));
        assert_eq!(ghost.position.y, 100.0);
        assert_eq!(ghost.velocity.y, 50.0);
    }

    #[test]
    fn test_horizontal_wrap() {
        let mut ghost = Ghost::new(Personality::Aggressor, Vec2::new(1010.0, 200.0));
        constrain(&mut ghost, Rect::new(Vec2::new(0.0, 100.0), Vec2::new(1000.0, 500.0)));
        assert_eq!(ghost.position.x, 10.0);
    }

    #[test]
    fn test_steering_is_smoothed() {
        let mut ghost = Ghost::new(Personality::Aggressor, Vec2::ZERO);
        ghost.velocity = Vec2::new(100.0, 0.0);
        steer(&mut ghost, Vec2::new(0.0, 1000.0), 100.0, 1.0 / 60.0);
        // Still mostly heading right after one frame.
        assert!(ghost.velocity.x > ghost.velocity.y);
        assert!(ghost.velocity.y > 0.0);
    }
}
