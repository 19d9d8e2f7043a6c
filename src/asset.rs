//! Asset URL resolution and sprite preloading.
//!
//! The host hands over a production manifest (logical key to fingerprinted URL) when
//! one exists; otherwise URLs follow the development convention `{dev_prefix}/{key}`.
//! Sprites are addressed by [`SpriteKey`], and the full table is resolved up front so
//! a lookup can never miss.

use std::collections::HashMap;

use strum::IntoEnumIterator;
use tracing::{debug, warn};

use crate::direction::Direction;
use crate::error::AssetError;
use crate::ghost::Personality;

/// Maps logical asset keys to URLs.
#[derive(Debug, Clone, Default)]
pub struct AssetResolver {
    manifest: HashMap<String, String>,
    dev_prefix: String,
}

impl AssetResolver {
    /// A resolver with no manifest; every key resolves to the development path.
    pub fn development(dev_prefix: impl Into<String>) -> Self {
        Self {
            manifest: HashMap::new(),
            dev_prefix: dev_prefix.into(),
        }
    }

    /// A resolver backed by a production manifest, falling back to development paths.
    pub fn with_manifest(manifest: HashMap<String, String>, dev_prefix: impl Into<String>) -> Self {
        Self {
            manifest,
            dev_prefix: dev_prefix.into(),
        }
    }

    /// Parses a JSON manifest object (`{"ghosts/blinky-right-1.png": "/assets/blinky-right-1-3f9a.png"}`).
    pub fn from_manifest_json(json: &str, dev_prefix: impl Into<String>) -> Result<Self, AssetError> {
        let manifest: HashMap<String, String> = serde_json::from_str(json)?;
        debug!(entries = manifest.len(), "Loaded asset manifest");
        Ok(Self::with_manifest(manifest, dev_prefix))
    }

    /// Resolves a logical key to a URL.
    pub fn resolve(&self, key: &str) -> String {
        match self.manifest.get(key) {
            Some(url) => url.clone(),
            None => {
                let prefix = self.dev_prefix.trim_end_matches('/');
                if prefix.is_empty() {
                    format!("/{key}")
                } else {
                    format!("{prefix}/{key}")
                }
            }
        }
    }

    pub fn has_manifest(&self) -> bool {
        !self.manifest.is_empty()
    }
}

const PLAYER_FRAMES: u8 = 3;
const GHOST_FRAMES: u8 = 2;

/// Every sprite the game draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// Player mouth frame (0 closed .. 2 wide open).
    Player { frame: u8 },
    Ghost {
        personality: Personality,
        direction: Direction,
        frame: u8,
    },
    Frightened { frame: u8, flashing: bool },
    Eyes { direction: Direction },
    Dot,
    Pellet,
    Key,
    /// HUD life icon.
    Life,
}

impl SpriteKey {
    const PLAYER_BASE: usize = 0;
    const GHOST_BASE: usize = Self::PLAYER_BASE + PLAYER_FRAMES as usize;
    const FRIGHTENED_BASE: usize = Self::GHOST_BASE + 4 * 4 * GHOST_FRAMES as usize;
    const EYES_BASE: usize = Self::FRIGHTENED_BASE + 2 * GHOST_FRAMES as usize;
    const STATIC_BASE: usize = Self::EYES_BASE + 4;
    /// Total number of distinct sprites.
    pub const COUNT: usize = Self::STATIC_BASE + 4;

    /// Enumerates every sprite, in table order.
    pub fn all() -> Vec<SpriteKey> {
        let mut keys = Vec::with_capacity(Self::COUNT);
        keys.extend((0..PLAYER_FRAMES).map(|frame| SpriteKey::Player { frame }));
        for personality in Personality::iter() {
            for direction in Direction::DIRECTIONS {
                keys.extend((0..GHOST_FRAMES).map(|frame| SpriteKey::Ghost {
                    personality,
                    direction,
                    frame,
                }));
            }
        }
        for flashing in [false, true] {
            keys.extend((0..GHOST_FRAMES).map(|frame| SpriteKey::Frightened { frame, flashing }));
        }
        keys.extend(Direction::DIRECTIONS.map(|direction| SpriteKey::Eyes { direction }));
        keys.extend([SpriteKey::Dot, SpriteKey::Pellet, SpriteKey::Key, SpriteKey::Life]);
        keys
    }

    /// Dense table index. Out-of-range frames wrap.
    pub fn index(self) -> usize {
        let direction_index = |direction: Direction| match direction {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        };

        match self {
            SpriteKey::Player { frame } => Self::PLAYER_BASE + (frame % PLAYER_FRAMES) as usize,
            SpriteKey::Ghost {
                personality,
                direction,
                frame,
            } => {
                Self::GHOST_BASE
                    + personality.index() * 4 * GHOST_FRAMES as usize
                    + direction_index(direction) * GHOST_FRAMES as usize
                    + (frame % GHOST_FRAMES) as usize
            }
            SpriteKey::Frightened { frame, flashing } => {
                Self::FRIGHTENED_BASE + usize::from(flashing) * GHOST_FRAMES as usize + (frame % GHOST_FRAMES) as usize
            }
            SpriteKey::Eyes { direction } => Self::EYES_BASE + direction_index(direction),
            SpriteKey::Dot => Self::STATIC_BASE,
            SpriteKey::Pellet => Self::STATIC_BASE + 1,
            SpriteKey::Key => Self::STATIC_BASE + 2,
            SpriteKey::Life => Self::STATIC_BASE + 3,
        }
    }

    /// The logical asset key, as it appears in the manifest.
    pub fn logical_path(self) -> String {
        match self {
            SpriteKey::Player { frame } => format!("pacman/pacman-{}.png", frame % PLAYER_FRAMES),
            SpriteKey::Ghost {
                personality,
                direction,
                frame,
            } => format!(
                "ghosts/{}-{}-{}.png",
                personality.asset_stem(),
                direction.as_ref(),
                frame % GHOST_FRAMES + 1
            ),
            SpriteKey::Frightened { frame, flashing } => format!(
                "ghosts/frightened-{}-{}.png",
                if flashing { "white" } else { "blue" },
                frame % GHOST_FRAMES + 1
            ),
            SpriteKey::Eyes { direction } => format!("ghosts/eyes-{}.png", direction.as_ref()),
            SpriteKey::Dot => "items/dot.png".to_string(),
            SpriteKey::Pellet => "items/pellet.png".to_string(),
            SpriteKey::Key => "items/key.png".to_string(),
            SpriteKey::Life => "hud/life.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PreloadState {
    Pending,
    Loaded,
    Failed,
}

/// Progress of the image preload pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreloadProgress {
    pub pending: usize,
    pub loaded: usize,
    pub failed: usize,
}

impl PreloadProgress {
    /// True once every image has either loaded or failed.
    pub fn is_settled(&self) -> bool {
        self.pending == 0
    }
}

/// Resolved sprite URLs plus their preload state.
#[derive(Debug, Clone)]
pub struct SpriteManager {
    urls: Vec<String>,
    states: Vec<PreloadState>,
}

impl SpriteManager {
    /// Resolves every [`SpriteKey`] through `resolver`.
    pub fn new(resolver: &AssetResolver) -> Self {
        let urls: Vec<String> = SpriteKey::all()
            .into_iter()
            .map(|key| resolver.resolve(&key.logical_path()))
            .collect();
        debug!(count = urls.len(), manifest = resolver.has_manifest(), "Sprite table resolved");

        Self {
            states: vec![PreloadState::Pending; urls.len()],
            urls,
        }
    }

    /// The URL for a sprite.
    pub fn url(&self, key: SpriteKey) -> &str {
        &self.urls[key.index()]
    }

    /// URLs the host should start loading.
    pub fn preload_urls(&self) -> impl Iterator<Item = &str> {
        self.urls
            .iter()
            .zip(&self.states)
            .filter(|(_, state)| **state == PreloadState::Pending)
            .map(|(url, _)| url.as_str())
    }

    /// Records a finished image load.
    pub fn mark_loaded(&mut self, url: &str) {
        self.set_state(url, PreloadState::Loaded);
    }

    /// Records a failed image load. The game keeps running; the sprite simply won't draw.
    pub fn mark_failed(&mut self, url: &str, reason: &str) {
        let error = AssetError::Preload {
            url: url.to_string(),
            reason: reason.to_string(),
        };
        warn!(%error, "Sprite preload failed");
        self.set_state(url, PreloadState::Failed);
    }

    pub fn progress(&self) -> PreloadProgress {
        self.states.iter().fold(PreloadProgress::default(), |mut progress, state| {
            match state {
                PreloadState::Pending => progress.pending += 1,
                PreloadState::Loaded => progress.loaded += 1,
                PreloadState::Failed => progress.failed += 1,
            }
            progress
        })
    }

    fn set_state(&mut self, url: &str, state: PreloadState) {
        // A URL can back several keys when a manifest maps them to the same file.
        for (candidate, slot) in self.urls.iter().zip(self.states.iter_mut()) {
            if candidate == url {
                *slot = state;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_indices_are_dense() {
        let keys = SpriteKey::all();
        assert_eq!(keys.len(), SpriteKey::COUNT);
        for (expected, key) in keys.iter().enumerate() {
            assert_eq!(key.index(), expected, "{key:?}");
        }
    }

    #[test]
    fn test_dev_path_fallback() {
        let resolver = AssetResolver::development("/static/game/");
        assert_eq!(resolver.resolve("items/dot.png"), "/static/game/items/dot.png");
    }

    #[test]
    fn test_ghost_logical_path() {
        let key = SpriteKey::Ghost {
            personality: Personality::Aggressor,
            direction: Direction::Right,
            frame: 0,
        };
        assert_eq!(key.logical_path(), "ghosts/blinky-right-1.png");
    }
}
