//! Centralized error types for the arcade core.
//!
//! Nothing in this crate is allowed to take the surrounding page down with it, so most
//! of these errors are logged and swallowed at the point they occur. The ones that do
//! propagate come out of construction (bad config, bad layout) or out of the score client.

use crate::audio::Sound;

/// Main error type for the arcade core.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Score error: {0}")]
    Score(#[from] ScoreError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Errors raised while loading or validating [`crate::config::GameConfig`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Expected {expected} sections, found {found}")]
    SectionCount { expected: usize, found: usize },

    #[error("Section thresholds must be positive and strictly increasing (section '{0}')")]
    ThresholdOrder(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::Load(Box::new(error))
    }
}

/// Errors in the page geometry handed to the session.
#[derive(thiserror::Error, Debug)]
pub enum LayoutError {
    #[error("Section element not found in layout: {0}")]
    MissingSection(String),

    #[error("Playable area is empty (header bottom {top}, footer top {bottom})")]
    EmptyPlayArea { top: f32, bottom: f32 },

    #[error("Viewport has no area: {0}x{1}")]
    EmptyViewport(f32, f32),
}

/// Errors related to asset manifests and preloading.
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("Failed to parse asset manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Failed to preload {url}: {reason}")]
    Preload { url: String, reason: String },
}

/// Errors reported by an [`crate::audio::AudioBackend`].
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("Sound {0:?} is not loaded")]
    NotLoaded(Sound),

    #[error("Playback of {0:?} was rejected by the browser (autoplay policy)")]
    AutoplayRejected(Sound),

    #[error("Failed to load {sound:?} from {url}: {reason}")]
    Load { sound: Sound, url: String, reason: String },

    #[error("Playback failed for {sound:?}: {reason}")]
    Playback { sound: Sound, reason: String },
}

/// Errors from the score API or from the name-entry prompt.
#[derive(thiserror::Error, Debug)]
pub enum ScoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid player name: {0}")]
    InvalidName(String),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
