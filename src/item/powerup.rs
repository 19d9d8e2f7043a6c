//! Powerup kinds and their tuning.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

/// The transient pickups scattered around the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum PowerupKind {
    SpeedBoost,
    SlowDown,
    Shield,
    GhostFreeze,
    DoublePoints,
    ExtraLife,
}

impl PowerupKind {
    pub const fn emoji(self) -> &'static str {
        match self {
            PowerupKind::SpeedBoost => "⚡",
            PowerupKind::SlowDown => "🐌",
            PowerupKind::Shield => "🛡️",
            PowerupKind::GhostFreeze => "❄️",
            PowerupKind::DoublePoints => "✨",
            PowerupKind::ExtraLife => "❤️",
        }
    }

    /// CSS color for the item glow and the HUD effect bar.
    pub const fn color(self) -> &'static str {
        match self {
            PowerupKind::SpeedBoost => "#facc15",
            PowerupKind::SlowDown => "#a16207",
            PowerupKind::Shield => "#38bdf8",
            PowerupKind::GhostFreeze => "#a5f3fc",
            PowerupKind::DoublePoints => "#c084fc",
            PowerupKind::ExtraLife => "#f87171",
        }
    }

    /// Effect duration in seconds; `None` for instant pickups.
    pub const fn duration(self) -> Option<f32> {
        match self {
            PowerupKind::SpeedBoost => Some(8.0),
            PowerupKind::SlowDown => Some(6.0),
            PowerupKind::Shield => Some(10.0),
            PowerupKind::GhostFreeze => Some(5.0),
            PowerupKind::DoublePoints => Some(10.0),
            PowerupKind::ExtraLife => None,
        }
    }

    /// Points awarded on pickup. Negative items cost points.
    pub const fn points(self) -> i32 {
        match self {
            PowerupKind::SpeedBoost => 50,
            PowerupKind::SlowDown => -25,
            PowerupKind::Shield => 50,
            PowerupKind::GhostFreeze => 75,
            PowerupKind::DoublePoints => 50,
            PowerupKind::ExtraLife => 100,
        }
    }

    /// Whether the item helps the player.
    pub const fn is_positive(self) -> bool {
        !matches!(self, PowerupKind::SlowDown)
    }

    /// Player speed multiplier while the effect is active.
    pub const fn speed_multiplier(self) -> Option<f32> {
        match self {
            PowerupKind::SpeedBoost => Some(1.5),
            PowerupKind::SlowDown => Some(0.6),
            _ => None,
        }
    }

    /// Relative spawn weight.
    pub const fn weight(self) -> u32 {
        match self {
            PowerupKind::SpeedBoost => 25,
            PowerupKind::SlowDown => 15,
            PowerupKind::Shield => 20,
            PowerupKind::GhostFreeze => 15,
            PowerupKind::DoublePoints => 15,
            PowerupKind::ExtraLife => 10,
        }
    }

    /// Picks a kind at random according to [`PowerupKind::weight`].
    pub fn random(rng: &mut impl Rng) -> PowerupKind {
        let kinds: Vec<PowerupKind> = PowerupKind::iter().collect();
        kinds
            .choose_weighted(rng, |kind| kind.weight())
            .copied()
            .unwrap_or(PowerupKind::SpeedBoost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_only_extra_life_is_instant() {
        for kind in PowerupKind::iter() {
            assert_eq!(kind.duration().is_none(), kind == PowerupKind::ExtraLife, "{kind:?}");
        }
    }

    #[test]
    fn test_sign_matches_points() {
        for kind in PowerupKind::iter() {
            assert_eq!(kind.is_positive(), kind.points() > 0, "{kind:?}");
        }
    }

    #[test]
    fn test_random_covers_every_kind() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.insert(PowerupKind::random(&mut rng));
        }
        assert_eq!(seen.len(), PowerupKind::iter().count());
    }
}
