#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use page_arcade::audio::{AudioBackend, NullAudio, Sound};
use page_arcade::config::GameConfig;
use page_arcade::error::AudioError;
use page_arcade::game::state::GameStage;
use page_arcade::ghost::Personality;
use page_arcade::input::GameCommand;
use page_arcade::layout::{Hoverable, PageLayout, Rect, SectionRect};
use page_arcade::direction::Direction;
use page_arcade::Session;
use strum::IntoEnumIterator;

pub const TICK: f32 = 0.1;

/// A 1000x800 viewport over a 4000px page: header ends at 80, sections start at
/// 1000, 1900 and 2800 (800px tall each), footer starts at 3800.
pub fn test_layout() -> PageLayout {
    let rect = |top: f32| Rect::new(Vec2::new(0.0, top), Vec2::new(1000.0, top + 800.0));
    PageLayout {
        viewport: Vec2::new(1000.0, 800.0),
        document_height: 4000.0,
        header_bottom: 80.0,
        footer_top: 3800.0,
        sections: vec![
            SectionRect {
                id: "about".into(),
                rect: rect(1000.0),
            },
            SectionRect {
                id: "projects".into(),
                rect: rect(1900.0),
            },
            SectionRect {
                id: "contact".into(),
                rect: rect(2800.0),
            },
        ],
        hoverables: vec![Hoverable {
            id: "hero-cta".into(),
            rect: Rect::new(Vec2::new(100.0, 200.0), Vec2::new(200.0, 240.0)),
        }],
    }
}

pub fn seeded_config(seed: u64) -> GameConfig {
    GameConfig {
        seed: Some(seed),
        ..GameConfig::default()
    }
}

/// A session that has finished its intro and is `Playing`, with the player standing still.
pub fn playing_session(config: GameConfig) -> Session {
    playing_session_with(config, Box::new(NullAudio))
}

pub fn playing_session_with(config: GameConfig, audio: Box<dyn AudioBackend>) -> Session {
    let mut session = Session::new(config, test_layout(), audio).expect("valid session");
    session.command(GameCommand::Move(Direction::Right));
    session.on_sound_ended(Sound::Intro);
    assert_eq!(session.stage(), GameStage::Playing);
    session.player_mut().stop();
    session
}

/// Ticks in fixed steps for `seconds`.
pub fn advance(session: &mut Session, seconds: f32) {
    let steps = (seconds / TICK).round() as usize;
    for _ in 0..steps {
        session.tick(TICK);
    }
}

/// Freezes every ghost far off the page so it can neither move nor touch the player.
pub fn park_ghosts(session: &mut Session) {
    for (index, personality) in Personality::iter().enumerate() {
        let ghost = session.ghosts_mut().ghost_mut(personality);
        ghost.frozen = true;
        ghost.frightened = false;
        ghost.position = Vec2::new(-500.0 - index as f32 * 100.0, -500.0);
        ghost.velocity = Vec2::ZERO;
    }
}

/// Moves the player onto `position` and runs a zero-length tick.
pub fn teleport(session: &mut Session, position: Vec2) {
    let player = session.player_mut();
    player.position = position;
    player.stop();
    session.tick(0.0);
}

/// Eats one plain dot that has no powerup nearby. Returns `false` when none is left.
pub fn collect_plain_dot(session: &mut Session) -> bool {
    let powerups: Vec<Vec2> = session.items().powerups().iter().map(|item| item.position).collect();
    let dot = session
        .items()
        .dots()
        .iter()
        .find(|dot| !dot.pellet && powerups.iter().all(|item| item.distance(dot.position) > 60.0))
        .copied();

    match dot {
        Some(dot) => {
            teleport(session, dot.position);
            true
        }
        None => false,
    }
}

/// Picks up the key if one is on the page.
pub fn collect_key(session: &mut Session) -> bool {
    match session.sections().key() {
        Some(key) => {
            teleport(session, key);
            true
        }
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    Load(Sound),
    Play(Sound),
    Stop(Sound),
    StopAll,
}

/// An audio backend that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    calls: Rc<RefCell<Vec<AudioCall>>>,
    /// Sounds whose playback is rejected, as a browser's autoplay policy would.
    rejected: Vec<Sound>,
}

impl RecordingAudio {
    pub fn new() -> (Self, Rc<RefCell<Vec<AudioCall>>>) {
        let audio = Self::default();
        let calls = audio.calls.clone();
        (audio, calls)
    }

    pub fn rejecting(sounds: &[Sound]) -> (Self, Rc<RefCell<Vec<AudioCall>>>) {
        let (mut audio, calls) = Self::new();
        audio.rejected = sounds.to_vec();
        (audio, calls)
    }
}

impl AudioBackend for RecordingAudio {
    fn load(&mut self, sound: Sound, _url: &str) -> Result<(), AudioError> {
        self.calls.borrow_mut().push(AudioCall::Load(sound));
        Ok(())
    }

    fn play(&mut self, sound: Sound, _volume: f32) -> Result<(), AudioError> {
        if self.rejected.contains(&sound) {
            return Err(AudioError::AutoplayRejected(sound));
        }
        self.calls.borrow_mut().push(AudioCall::Play(sound));
        Ok(())
    }

    fn stop(&mut self, sound: Sound) {
        self.calls.borrow_mut().push(AudioCall::Stop(sound));
    }

    fn stop_all(&mut self) {
        self.calls.borrow_mut().push(AudioCall::StopAll);
    }
}

pub fn play_count(calls: &Rc<RefCell<Vec<AudioCall>>>, sound: Sound) -> usize {
    calls
        .borrow()
        .iter()
        .filter(|call| **call == AudioCall::Play(sound))
        .count()
}
