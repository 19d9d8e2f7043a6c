use glam::Vec2;
use serde::Serialize;

use crate::direction::Direction;

/// The player-controlled character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Direction,
    /// Speed before effect multipliers.
    pub base_speed: f32,
    /// Current product of effect multipliers.
    pub speed_multiplier: f32,
    pub invincible: bool,
    pub dying: bool,
    spawn: Vec2,
}

impl Player {
    pub fn new(spawn: Vec2, base_speed: f32) -> Self {
        Self {
            position: spawn,
            velocity: Vec2::ZERO,
            facing: Direction::Right,
            base_speed,
            speed_multiplier: 1.0,
            invincible: false,
            dying: false,
            spawn,
        }
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn
    }

    pub fn speed(&self) -> f32 {
        self.base_speed * self.speed_multiplier
    }

    pub fn is_moving(&self) -> bool {
        self.velocity != Vec2::ZERO
    }

    /// Turns to `direction` and moves at full speed.
    pub fn steer(&mut self, direction: Direction) {
        self.facing = direction;
        self.velocity = direction.as_vec2() * self.speed();
    }

    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    /// Applies a new effect multiplier, keeping the current heading.
    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier;
        if self.is_moving() {
            self.velocity = self.velocity.normalize_or_zero() * self.speed();
        }
    }

    /// Moves by velocity × `dt`.
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    /// Back to the spawn point, standing still and facing right.
    pub fn respawn(&mut self) {
        self.position = self.spawn;
        self.velocity = Vec2::ZERO;
        self.facing = Direction::Right;
        self.dying = false;
    }
}
