//! This module handles the audio playback for the game.
//!
//! Playback itself belongs to the host (an `HTMLAudioElement` pool, Web Audio, a desktop
//! mixer); the core only talks to an [`AudioBackend`]. Loading or playback failures
//! are logged and swallowed: a sound that failed to load is marked unavailable and the
//! game continues without it.

use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};
use tracing::{debug, trace, warn};

use crate::asset::AssetResolver;
use crate::error::AudioError;

const DEFAULT_VOLUME: f32 = 0.5;

/// Every sound effect the game can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Sound {
    Intro,
    Chomp,
    PowerPellet,
    EatGhost,
    Death,
    ExtraLife,
    Powerup,
    KeySpawn,
    Unlock,
    Victory,
    GameOver,
}

impl Sound {
    /// The logical asset key for this sound.
    pub fn asset_key(self) -> String {
        let name: &'static str = self.into();
        format!("sounds/{name}.mp3")
    }
}

/// The playback device, implemented by the host.
pub trait AudioBackend {
    /// Starts loading a sound from `url`.
    fn load(&mut self, sound: Sound, url: &str) -> Result<(), AudioError>;
    /// Plays a sound from the start at the given volume (0.0..=1.0).
    fn play(&mut self, sound: Sound, volume: f32) -> Result<(), AudioError>;
    /// Stops a sound if it is playing.
    fn stop(&mut self, sound: Sound);
    /// Stops everything.
    fn stop_all(&mut self);
}

/// A backend that plays nothing. Used by the headless runner.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn load(&mut self, _sound: Sound, _url: &str) -> Result<(), AudioError> {
        Ok(())
    }

    fn play(&mut self, _sound: Sound, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&mut self, _sound: Sound) {}

    fn stop_all(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Availability {
    Ready,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AudioState {
    Enabled { volume: f32 },
    Muted { previous_volume: f32 },
}

/// Named sound effects with mute and volume control.
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    sounds: micromap::Map<Sound, Availability, { Sound::COUNT }>,
    state: AudioState,
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager").field("state", &self.state).finish_non_exhaustive()
    }
}

impl AudioManager {
    /// Creates the manager and preloads every sound through `resolver`.
    pub fn new(mut backend: Box<dyn AudioBackend>, resolver: &AssetResolver, volume: f32) -> Self {
        let mut sounds = micromap::Map::new();

        for sound in Sound::iter() {
            let url = resolver.resolve(&sound.asset_key());
            let availability = match backend.load(sound, &url) {
                Ok(()) => {
                    trace!(?sound, url, "Sound queued for loading");
                    Availability::Ready
                }
                Err(error) => {
                    warn!(%error, "Sound failed to load; it will be skipped");
                    Availability::Unavailable
                }
            };
            sounds.insert(sound, availability);
        }

        Self {
            backend,
            sounds,
            state: AudioState::Enabled {
                volume: sanitize_volume(volume),
            },
        }
    }

    /// Plays a sound, unless muted or unavailable. Never fails.
    pub fn play(&mut self, sound: Sound) {
        let volume = match self.state {
            AudioState::Enabled { volume } => volume,
            AudioState::Muted { .. } => {
                trace!(?sound, "Skipping sound while muted");
                return;
            }
        };

        if self.sounds.get(&sound) != Some(&Availability::Ready) {
            trace!(?sound, "Skipping unavailable sound");
            return;
        }

        match self.backend.play(sound, volume) {
            Ok(()) => trace!(?sound, volume, "Playing sound"),
            Err(error @ AudioError::AutoplayRejected(_)) => {
                // Browsers reject playback until the first user gesture; later calls may succeed.
                debug!(%error, "Playback rejected");
            }
            Err(error) => {
                warn!(%error, "Playback failed; disabling sound");
                if let Some(slot) = self.sounds.get_mut(&sound) {
                    *slot = Availability::Unavailable;
                }
            }
        }
    }

    pub fn stop(&mut self, sound: Sound) {
        self.backend.stop(sound);
    }

    pub fn stop_all(&mut self) {
        debug!("Stopping all audio");
        self.backend.stop_all();
    }

    /// Instantly mute or unmute. Muting also stops whatever is playing.
    pub fn set_mute(&mut self, mute: bool) {
        match (self.state, mute) {
            (AudioState::Enabled { volume }, true) => {
                self.backend.stop_all();
                self.state = AudioState::Muted { previous_volume: volume };
            }
            (AudioState::Muted { previous_volume }, false) => {
                self.state = AudioState::Enabled { volume: previous_volume };
            }
            _ => {}
        }
        debug!(muted = mute, "Audio mute state changed");
    }

    pub fn toggle_mute(&mut self) {
        self.set_mute(!self.is_muted());
    }

    /// Returns `true` if the audio is muted.
    pub fn is_muted(&self) -> bool {
        matches!(self.state, AudioState::Muted { .. })
    }

    /// Sets the volume (clamped to 0.0..=1.0). While muted, this sets the volume restored on unmute.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = sanitize_volume(volume);
        self.state = match self.state {
            AudioState::Enabled { .. } => AudioState::Enabled { volume },
            AudioState::Muted { .. } => AudioState::Muted { previous_volume: volume },
        };
    }

    pub fn volume(&self) -> f32 {
        match self.state {
            AudioState::Enabled { volume } => volume,
            AudioState::Muted { previous_volume } => previous_volume,
        }
    }

    /// Whether a sound loaded successfully and has not failed since.
    pub fn is_available(&self, sound: Sound) -> bool {
        self.sounds.get(&sound) == Some(&Availability::Ready)
    }
}

fn sanitize_volume(volume: f32) -> f32 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        DEFAULT_VOLUME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_asset_key() {
        assert_eq!(Sound::PowerPellet.asset_key(), "sounds/power_pellet.mp3");
        assert_eq!(Sound::Intro.asset_key(), "sounds/intro.mp3");
    }

    #[test]
    fn test_volume_sanitized() {
        assert_eq!(sanitize_volume(2.0), 1.0);
        assert_eq!(sanitize_volume(-1.0), 0.0);
        assert_eq!(sanitize_volume(f32::NAN), DEFAULT_VOLUME);
    }

    #[test]
    fn test_mute_roundtrip_keeps_volume() {
        let mut audio = AudioManager::new(Box::new(NullAudio), &AssetResolver::development("/game"), 0.3);
        audio.set_mute(true);
        assert!(audio.is_muted());
        audio.set_volume(0.8);
        audio.set_mute(false);
        assert_eq!(audio.volume(), 0.8);
    }
}
