//! Player animation, scroll following and the death sequence.
//!
//! The page scrolls with the player: every tick the scroll offset is set so the player
//! sits in the vertical middle of the viewport. Scripted moves (session start, respawn,
//! restart) instead run a short eased tween, during which following is suspended.

use glam::Vec2;
use serde::Serialize;
use tracing::trace;

use crate::constants::animation::{
    DEATH_SPIN_PER_STEP, DEATH_STEPS, DEATH_STEP_DURATION, MOUTH_FRAMES, MOUTH_FRAME_DURATION, SCRIPTED_SCROLL_DURATION,
};
use crate::direction::Direction;
use crate::layout::PageLayout;

/// Cubic ease-in-out over `t` in 0..=1.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// The scroll offset that centers `player_y`, clamped to the document.
pub fn centered_scroll(player_y: f32, layout: &PageLayout) -> f32 {
    (player_y - layout.viewport.y * 0.5).clamp(0.0, layout.max_scroll())
}

/// A time-boxed eased scroll between two offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTween {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl ScrollTween {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(f32::EPSILON),
        }
    }

    /// Advances the tween, returning the current offset.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }

    pub fn value(&self) -> f32 {
        let t = ease_in_out_cubic(self.elapsed / self.duration);
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Shrink-and-spin played when the player is caught.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeathAnimation {
    step: u32,
    timer: f32,
}

impl DeathAnimation {
    /// Advances the animation; returns `true` once every step has played.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.timer += dt;
        while self.timer >= DEATH_STEP_DURATION && self.step < DEATH_STEPS {
            self.timer -= DEATH_STEP_DURATION;
            self.step += 1;
        }
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.step >= DEATH_STEPS
    }

    /// Sprite scale, from 1.0 down to 0.0.
    pub fn scale(&self) -> f32 {
        1.0 - self.step as f32 / DEATH_STEPS as f32
    }

    /// Extra sprite rotation in degrees.
    pub fn spin_degrees(&self) -> f32 {
        self.step as f32 * DEATH_SPIN_PER_STEP
    }
}

/// How the host should draw the player this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerPose {
    pub frame: u8,
    pub rotation_degrees: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Default)]
pub struct AnimationManager {
    mouth_index: usize,
    mouth_timer: f32,
    scroll_y: f32,
    tween: Option<ScrollTween>,
    death: Option<DeathAnimation>,
}

impl AnimationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every running animation and returns to the top of the page.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advances the mouth cycle. The mouth holds its frame while the player stands still.
    pub fn update_player(&mut self, dt: f32, moving: bool) {
        if !moving {
            return;
        }
        self.mouth_timer += dt;
        while self.mouth_timer >= MOUTH_FRAME_DURATION {
            self.mouth_timer -= MOUTH_FRAME_DURATION;
            self.mouth_index = (self.mouth_index + 1) % MOUTH_FRAMES.len();
        }
    }

    pub fn player_pose(&self, facing: Direction) -> PlayerPose {
        let (scale, spin) = match &self.death {
            Some(death) => (death.scale(), death.spin_degrees()),
            None => (1.0, 0.0),
        };
        PlayerPose {
            frame: MOUTH_FRAMES[self.mouth_index],
            rotation_degrees: (facing.rotation_degrees() + spin) % 360.0,
            scale,
        }
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// Translation to apply to the world container.
    pub fn world_translation(&self) -> Vec2 {
        Vec2::new(0.0, -self.scroll_y)
    }

    /// Keeps the player vertically centered. Does nothing while a scripted scroll runs.
    pub fn sync_scroll(&mut self, player_y: f32, layout: &PageLayout) {
        if self.tween.is_none() {
            self.scroll_y = centered_scroll(player_y, layout);
        }
    }

    /// Starts an eased scroll that brings `player_y` to the middle of the viewport.
    pub fn scroll_to_player(&mut self, player_y: f32, layout: &PageLayout) {
        let target = centered_scroll(player_y, layout);
        trace!(from = self.scroll_y, to = target, "Scripted scroll started");
        self.tween = Some(ScrollTween::new(self.scroll_y, target, SCRIPTED_SCROLL_DURATION));
    }

    pub fn is_scrolling(&self) -> bool {
        self.tween.is_some()
    }

    /// Advances a scripted scroll. Returns `true` on the tick it completes.
    pub fn update_scroll(&mut self, dt: f32) -> bool {
        let Some(tween) = self.tween.as_mut() else {
            return false;
        };
        self.scroll_y = tween.advance(dt);
        if tween.is_finished() {
            self.tween = None;
            true
        } else {
            false
        }
    }

    /// Jumps straight to an offset, abandoning any scripted scroll.
    pub fn set_scroll(&mut self, scroll_y: f32) {
        self.tween = None;
        self.scroll_y = scroll_y;
    }

    pub fn start_death(&mut self) {
        self.death = Some(DeathAnimation::default());
    }

    /// Advances the death animation. Returns `true` on the tick it completes.
    pub fn update_death(&mut self, dt: f32) -> bool {
        match self.death.as_mut() {
            Some(death) if !death.is_finished() => death.advance(dt),
            _ => false,
        }
    }

    pub fn clear_death(&mut self) {
        self.death = None;
    }
}
