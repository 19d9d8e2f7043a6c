//! Timed powerup effects.
//!
//! Each active effect is paired with the [`TimerId`] that will end it. Picking up the
//! same kind again refreshes it: the old timer is handed back so the caller can cancel
//! it, which leaves exactly one pending expiry per active kind.

use bitflags::bitflags;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::debug;

use crate::item::PowerupKind;
use crate::timer::{TimerId, Timers};

bitflags! {
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
    pub struct EffectFlags: u8 {
        const SPEED_BOOST = 1 << 0;
        const SLOW_DOWN = 1 << 1;
        const SHIELD = 1 << 2;
        const GHOST_FREEZE = 1 << 3;
        const DOUBLE_POINTS = 1 << 4;
    }
}

impl EffectFlags {
    /// The flag for a timed kind; instant kinds have none.
    pub fn of(kind: PowerupKind) -> EffectFlags {
        match kind {
            PowerupKind::SpeedBoost => EffectFlags::SPEED_BOOST,
            PowerupKind::SlowDown => EffectFlags::SLOW_DOWN,
            PowerupKind::Shield => EffectFlags::SHIELD,
            PowerupKind::GhostFreeze => EffectFlags::GHOST_FREEZE,
            PowerupKind::DoublePoints => EffectFlags::DOUBLE_POINTS,
            PowerupKind::ExtraLife => EffectFlags::empty(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveEffect {
    kind: PowerupKind,
    timer: TimerId,
}

/// A HUD cooldown bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectBar {
    pub kind: PowerupKind,
    pub emoji: &'static str,
    pub color: &'static str,
    /// Shrinks from 1.0 to 0.0 as the effect runs out.
    pub fraction: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Effects {
    active: SmallVec<[ActiveEffect; 5]>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `kind` as active until `timer` fires.
    ///
    /// Returns the timer of an earlier effect of the same kind, which the caller must cancel.
    pub fn insert(&mut self, kind: PowerupKind, timer: TimerId) -> Option<TimerId> {
        let replaced = match self.active.iter_mut().find(|effect| effect.kind == kind) {
            Some(effect) => Some(std::mem::replace(&mut effect.timer, timer)),
            None => {
                self.active.push(ActiveEffect { kind, timer });
                None
            }
        };
        debug!(?kind, refreshed = replaced.is_some(), "Effect active");
        replaced
    }

    /// Ends `kind`. Returns `false` if it was not active.
    pub fn expire(&mut self, kind: PowerupKind) -> bool {
        let before = self.active.len();
        self.active.retain(|effect| effect.kind != kind);
        let expired = self.active.len() != before;
        if expired {
            debug!(?kind, "Effect expired");
        }
        expired
    }

    /// Drops every effect, returning their timers for cancellation.
    pub fn clear(&mut self) -> SmallVec<[TimerId; 5]> {
        self.active.drain(..).map(|effect| effect.timer).collect()
    }

    pub fn flags(&self) -> EffectFlags {
        self.active
            .iter()
            .fold(EffectFlags::empty(), |flags, effect| flags | EffectFlags::of(effect.kind))
    }

    pub fn has(&self, kind: PowerupKind) -> bool {
        self.active.iter().any(|effect| effect.kind == kind)
    }

    /// Product of every active speed modifier.
    pub fn speed_multiplier(&self) -> f32 {
        self.active
            .iter()
            .filter_map(|effect| effect.kind.speed_multiplier())
            .product()
    }

    /// 2 while double points is active, 1 otherwise.
    pub fn score_multiplier(&self) -> u32 {
        if self.has(PowerupKind::DoublePoints) {
            2
        } else {
            1
        }
    }

    /// Cooldown bars in pickup order.
    pub fn bars<E: Clone + std::fmt::Debug>(&self, timers: &Timers<E>) -> Vec<EffectBar> {
        self.active
            .iter()
            .map(|effect| EffectBar {
                kind: effect.kind,
                emoji: effect.kind.emoji(),
                color: effect.kind.color(),
                fraction: timers.remaining_fraction(effect.timer).unwrap_or(0.0),
            })
            .collect()
    }
}
