//! This module contains all the constants used in the game.
//!
//! Distances are page pixels, durations are seconds, speeds are pixels per second.

/// The largest frame delta the simulation will integrate in one tick.
///
/// Anything longer (a suspended tab, a debugger pause) is clamped to this.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// The nominal frame rate used by the headless runner.
pub const TARGET_FPS: f32 = 60.0;

/// Player movement and lifecycle tuning.
pub mod player {
    /// Base movement speed before powerup multipliers.
    pub const BASE_SPEED: f32 = 200.0;
    /// Lives granted at the start of a session.
    pub const STARTING_LIVES: u8 = 3;
    /// Lives can never exceed this, even with extra-life pickups.
    pub const MAX_LIVES: u8 = 5;
    /// Length of the invincibility window granted after a respawn.
    pub const RESPAWN_INVINCIBILITY: f32 = 2.0;
    /// Number of one-second countdown steps shown before play resumes.
    pub const RESPAWN_COUNTDOWN_STEPS: u8 = 3;
    /// Fraction of the viewport height, from the top, where the player first appears.
    pub const SPAWN_VIEWPORT_FRACTION: f32 = 0.5;
}

/// Proximity radii used by every collision test.
pub mod collider {
    /// Player body radius, used for boundary clamping.
    pub const PLAYER_RADIUS: f32 = 16.0;
    /// Player-ghost overlap distance.
    pub const GHOST_RADIUS: f32 = 26.0;
    /// Player-dot pickup distance.
    pub const DOT_RADIUS: f32 = 18.0;
    /// Player-pellet pickup distance.
    pub const PELLET_RADIUS: f32 = 22.0;
    /// Player-powerup pickup distance.
    pub const ITEM_RADIUS: f32 = 28.0;
    /// Player-key pickup distance.
    pub const KEY_RADIUS: f32 = 30.0;
}

/// Ghost AI tuning. These are feel values, not arcade-accurate ones.
pub mod ghost {
    /// Ghost base speed as a fraction of the player's base speed.
    pub const BASE_SPEED_FRACTION: f32 = 0.72;
    /// Hard cap on chasing ghost speed as a fraction of the player's base speed.
    pub const MAX_SPEED_FRACTION: f32 = 0.9;
    /// Speed multiplier while frightened.
    pub const FRIGHTENED_SPEED_MULTIPLIER: f32 = 0.5;
    /// Speed multiplier while returning home as eyes. Not subject to the cap.
    pub const EATEN_SPEED_MULTIPLIER: f32 = 1.8;
    /// Aggressor hurry-up multiplier applied for each remaining-dot threshold crossed.
    pub const HURRY_UP_MULTIPLIER: f32 = 1.1;
    /// Remaining-dot fractions below which the Aggressor hurries up.
    pub const HURRY_UP_THRESHOLDS: [f32; 2] = [0.5, 0.3];

    /// Full scatter/chase cycle length.
    pub const MODE_CYCLE: f32 = 30.0;
    /// Scatter segment at the start of each cycle.
    pub const SCATTER_DURATION: f32 = 5.0;

    /// Exponential steering rate; higher values turn faster.
    pub const STEERING_RATE: f32 = 6.0;

    /// Aggressor extrapolation along player velocity.
    pub const AGGRESSOR_LOOKAHEAD: f32 = 0.15;
    /// Ambusher extrapolation distance ahead of the player.
    pub const AMBUSHER_LOOKAHEAD: f32 = 160.0;
    /// Ambusher sideways offset from the player's path.
    pub const AMBUSHER_FLANK_OFFSET: f32 = 60.0;
    /// Flanker pivot distance ahead of the player.
    pub const FLANKER_PIVOT_DISTANCE: f32 = 80.0;
    /// Distance under which the Opportunist stops chasing and starts orbiting.
    pub const OPPORTUNIST_PROXIMITY: f32 = 250.0;
    /// Radius the Opportunist orbits at.
    pub const OPPORTUNIST_ORBIT_RADIUS: f32 = 200.0;
    /// Angular speed of the Opportunist's orbit, radians per second.
    pub const OPPORTUNIST_ORBIT_SPEED: f32 = 1.2;
    /// How far away from the player a frightened ghost aims.
    pub const FLEE_DISTANCE: f32 = 300.0;

    /// Distance from home at which an eaten ghost counts as arrived.
    pub const HOME_ARRIVAL_RADIUS: f32 = 12.0;
    /// Eaten ghosts that have not reached home by now are placed there.
    pub const EATEN_RESPAWN_DELAY: f32 = 6.0;
    /// Horizontal spacing between ghosts at their home point.
    pub const HOME_SPACING: f32 = 48.0;
    /// Distance below the header of the ghosts' home point.
    pub const HOME_HEADER_OFFSET: f32 = 60.0;

    /// Points for the first ghost eaten in a power-mode window.
    pub const EAT_BASE_POINTS: u32 = 200;
    /// Upper bound on a single ghost award.
    pub const EAT_MAX_POINTS: u32 = 1600;

    /// Inset from the viewport edge for off-screen indicators.
    pub const INDICATOR_MARGIN: f32 = 20.0;
}

/// Power pellet tuning.
pub mod power {
    /// Total frightened duration after eating a pellet.
    pub const FRIGHTENED_DURATION: f32 = 8.0;
    /// Trailing part of the frightened duration where ghosts flash.
    pub const FRIGHTENED_ENDING_LEAD: f32 = 2.0;
}

/// Dot, pellet and powerup generation.
pub mod items {
    /// Grid spacing between dots.
    pub const DOT_SPACING: f32 = 60.0;
    /// Points per dot.
    pub const DOT_POINTS: u32 = 10;
    /// Points per power pellet.
    pub const PELLET_POINTS: u32 = 50;
    /// Power pellets placed per viewport-height slice of the page.
    pub const PELLETS_PER_SLICE: usize = 2;
    /// Minimum distance between two power pellets.
    pub const PELLET_MIN_SEPARATION: f32 = 200.0;
    /// Locked sections are expanded by this much when excluding positions.
    pub const LOCKED_ZONE_BUFFER: f32 = 40.0;
    /// Inclusive range of powerups spawned per session.
    pub const POWERUP_COUNT: (usize, usize) = (3, 5);
    /// Minimum distance between two powerups.
    pub const POWERUP_MIN_SEPARATION: f32 = 150.0;
    /// Margin from the playable area edges when placing powerups.
    pub const POWERUP_EDGE_MARGIN: f32 = 40.0;
    /// Rejection-sampling attempts per placement.
    pub const PLACEMENT_ATTEMPTS: usize = 50;
}

/// Section progression.
pub mod section {
    /// Overlay fade after a section unlocks.
    pub const UNLOCK_TRANSITION: f32 = 0.6;
    /// Delay between unlocking and regenerating dots.
    pub const REGENERATION_DELAY: f32 = 0.5;
    /// Default unlock thresholds (dots-only score).
    pub const DEFAULT_THRESHOLDS: [u32; 3] = [300, 700, 1200];
    /// Number of sections the page is divided into.
    pub const SECTION_COUNT: usize = 3;
}

/// Animation and scroll tuning.
pub mod animation {
    /// Time each mouth frame is shown while the player moves.
    pub const MOUTH_FRAME_DURATION: f32 = 0.08;
    /// The mouth cycle, as sprite frame indices.
    pub const MOUTH_FRAMES: [u8; 4] = [0, 1, 2, 1];
    /// Time each ghost frame is shown.
    pub const GHOST_FRAME_DURATION: f32 = 0.2;
    /// Death animation step count.
    pub const DEATH_STEPS: u32 = 12;
    /// Time per death animation step.
    pub const DEATH_STEP_DURATION: f32 = 0.1;
    /// Degrees of spin added per death animation step.
    pub const DEATH_SPIN_PER_STEP: f32 = 30.0;
    /// Duration of eased, programmatic scrolls.
    pub const SCRIPTED_SCROLL_DURATION: f32 = 0.8;
}

/// Session lifecycle tuning.
pub mod session {
    /// Fallback for the intro sound's "ended" notification.
    pub const INTRO_TIMEOUT: f32 = 5.0;
    /// Length of one respawn countdown step.
    pub const COUNTDOWN_STEP: f32 = 1.0;
}

/// Touch joystick tuning.
pub mod input {
    /// Joystick vectors shorter than this (normalized units) are ignored.
    pub const JOYSTICK_DEAD_ZONE: f32 = 0.25;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghosts_cannot_outrun_player() {
        assert!(ghost::MAX_SPEED_FRACTION < 1.0);
        assert!(ghost::BASE_SPEED_FRACTION <= ghost::MAX_SPEED_FRACTION);
    }

    #[test]
    fn test_scatter_fits_in_cycle() {
        assert!(ghost::SCATTER_DURATION < ghost::MODE_CYCLE);
    }

    #[test]
    fn test_frightened_ending_lead() {
        assert!(power::FRIGHTENED_ENDING_LEAD < power::FRIGHTENED_DURATION);
    }

    #[test]
    fn test_default_thresholds_strictly_increase() {
        let thresholds = section::DEFAULT_THRESHOLDS;
        assert_eq!(thresholds.len(), section::SECTION_COUNT);
        assert!(thresholds.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_threshold_reachable_with_dots() {
        // Every threshold must be a whole number of dots.
        for threshold in section::DEFAULT_THRESHOLDS {
            assert_eq!(threshold % items::DOT_POINTS, 0);
        }
    }

    #[test]
    fn test_powerup_count_range() {
        let (min, max) = items::POWERUP_COUNT;
        assert!(min <= max);
        assert!(min > 0);
    }

    #[test]
    fn test_mouth_frames_loop() {
        assert_eq!(animation::MOUTH_FRAMES.first(), Some(&0));
    }
}
