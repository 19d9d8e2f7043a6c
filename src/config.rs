//! Game configuration.
//!
//! Values come from built-in defaults, optionally overridden by `PAGE_ARCADE_*`
//! environment variables or by a JSON document the host passes in (for example from a
//! `data-` attribute on the game container).

use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{self, section::SECTION_COUNT};
use crate::error::ConfigError;

/// One lockable page region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Element id of the section on the page.
    pub id: String,
    /// Name shown in the HUD unlock text.
    pub name: String,
    /// Cumulative dots-only score needed to reveal this section's key.
    pub threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Player base speed in pixels per second.
    pub player_speed: f32,
    /// Lives at the start of a session.
    pub lives: u8,
    /// Upper bound on a single tick's delta, in seconds.
    pub max_delta: f32,
    /// Seconds to wait for the intro sound before starting anyway.
    pub intro_timeout: f32,
    /// Distance between grid dots.
    pub dot_spacing: f32,
    /// The three sections, in page order.
    pub sections: Vec<SectionConfig>,
    /// Asset URL prefix used when no production manifest is available.
    pub dev_prefix: String,
    /// Initial audio volume, 0.0..=1.0.
    pub volume: f32,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let names = [("about", "About"), ("projects", "Projects"), ("contact", "Contact")];
        let sections = names
            .iter()
            .zip(constants::section::DEFAULT_THRESHOLDS)
            .map(|((id, name), threshold)| SectionConfig {
                id: id.to_string(),
                name: name.to_string(),
                threshold,
            })
            .collect();

        Self {
            player_speed: constants::player::BASE_SPEED,
            lives: constants::player::STARTING_LIVES,
            max_delta: constants::MAX_FRAME_DELTA,
            intro_timeout: constants::session::INTRO_TIMEOUT,
            dot_spacing: constants::items::DOT_SPACING,
            sections,
            dev_prefix: "/static/game".to_string(),
            volume: 0.5,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Loads defaults overridden by `PAGE_ARCADE_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config: GameConfig = Figment::from(Serialized::defaults(GameConfig::default()))
            .merge(Env::prefixed("PAGE_ARCADE_"))
            .extract()?;
        config.validate()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Layers a JSON document over the defaults. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = Figment::from(Serialized::defaults(GameConfig::default()))
            .merge(Json::string(json))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the session relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sections.len() != SECTION_COUNT {
            return Err(ConfigError::SectionCount {
                expected: SECTION_COUNT,
                found: self.sections.len(),
            });
        }

        let mut previous = 0;
        for section in &self.sections {
            if section.threshold <= previous {
                return Err(ConfigError::ThresholdOrder(section.id.clone()));
            }
            previous = section.threshold;
        }

        positive("player_speed", self.player_speed)?;
        positive("max_delta", self.max_delta)?;
        positive("intro_timeout", self.intro_timeout)?;
        positive("dot_spacing", self.dot_spacing)?;

        if self.lives == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lives",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ConfigError::InvalidValue {
                field: "volume",
                reason: format!("{} is outside 0.0..=1.0", self.volume),
            });
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("{value} must be a positive number"),
        })
    }
}
