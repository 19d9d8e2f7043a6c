use glam::Vec2;
use page_arcade::audio::Sound;
use page_arcade::config::GameConfig;
use page_arcade::events::SessionEvent;
use page_arcade::game::state::{DyingSequence, GameStage, Resumable};
use page_arcade::ghost::Personality;
use page_arcade::item::PowerupKind;
use page_arcade::section::SectionState;
use page_arcade::Session;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;
use common::*;

fn catch_player(session: &mut Session) {
    let position = session.player().position;
    let aggressor = session.ghosts_mut().ghost_mut(Personality::Aggressor);
    aggressor.frozen = false;
    aggressor.frightened = false;
    aggressor.position = position;
    session.tick(0.0);
}

#[test]
fn test_first_movement_starts_session() {
    let mut session = Session::new(seeded_config(1), test_layout(), Box::new(page_arcade::audio::NullAudio)).unwrap();
    assert_eq!(session.stage(), GameStage::Idle);
    assert_that(&session.key_down("F5")).is_false();

    assert_that(&session.key_down("d")).is_true();
    assert_eq!(session.stage(), GameStage::Starting);
    assert_that(&session.items().dots().len()).is_greater_than(0);
    assert_that(&session.items().powerups().len()).is_greater_than_or_equal_to(3);
    // Nobody moves during the intro.
    assert_that(&session.player().is_moving()).is_false();

    // A second start attempt while starting is a no-op.
    session.key_down("ArrowDown");
    assert_eq!(session.stage(), GameStage::Starting);

    session.on_sound_ended(Sound::Intro);
    assert_eq!(session.stage(), GameStage::Playing);
    assert_that(&session.player().velocity.y).is_greater_than(0.0);
}

#[test]
fn test_intro_timeout_forces_play() {
    let mut session = Session::new(seeded_config(2), test_layout(), Box::new(page_arcade::audio::NullAudio)).unwrap();
    session.key_down("ArrowUp");
    advance(&mut session, 4.9);
    assert_eq!(session.stage(), GameStage::Starting);
    advance(&mut session, 0.2);
    assert_eq!(session.stage(), GameStage::Playing);
}

#[test]
fn test_pause_mid_starting_replays_intro() {
    let (audio, calls) = RecordingAudio::new();
    let mut session = Session::new(seeded_config(3), test_layout(), Box::new(audio)).unwrap();

    session.key_down("ArrowLeft");
    advance(&mut session, 2.0);
    session.key_down("Escape");
    assert_eq!(session.stage(), GameStage::Paused(Resumable::Starting));

    // Paused time does not count towards the intro timeout.
    advance(&mut session, 10.0);
    assert_eq!(session.stage(), GameStage::Paused(Resumable::Starting));

    session.key_down("Escape");
    assert_eq!(session.stage(), GameStage::Starting);
    assert_eq!(play_count(&calls, Sound::Intro), 2);

    // A fresh timeout: the two seconds before the pause were discarded.
    advance(&mut session, 4.8);
    assert_eq!(session.stage(), GameStage::Starting);
    advance(&mut session, 0.4);
    assert_eq!(session.stage(), GameStage::Playing);
    assert_that(&session.player().velocity.x).is_less_than(0.0);
}

#[test]
fn test_pause_restores_exact_stage() {
    let mut session = playing_session(seeded_config(4));
    catch_player(&mut session);
    assert_eq!(session.stage(), GameStage::Dying(DyingSequence::Animating));

    session.key_down("p");
    assert_eq!(
        session.stage(),
        GameStage::Paused(Resumable::Dying(DyingSequence::Animating))
    );
    advance(&mut session, 30.0);
    session.key_down("p");
    assert_eq!(session.stage(), GameStage::Dying(DyingSequence::Animating));
}

#[test]
fn test_last_life_ends_in_game_over() {
    let config = GameConfig {
        lives: 1,
        ..seeded_config(5)
    };
    let mut session = playing_session(config);
    park_ghosts(&mut session);
    session.drain_events();

    catch_player(&mut session);
    assert_eq!(session.state().lives, 0);
    advance(&mut session, 3.0);

    assert_eq!(session.stage(), GameStage::GameOver);
    let events = session.drain_events();
    assert_that(&events.contains(&SessionEvent::StageChanged {
        from: GameStage::Dying(DyingSequence::Animating),
        to: GameStage::GameOver,
    }))
    .is_true();
    assert_that(&events.iter().any(|event| {
        matches!(
            event,
            SessionEvent::StageChanged {
                to: GameStage::Playing,
                ..
            }
        )
    }))
    .is_false();

    let report = session.end_report().unwrap();
    assert_that(&report.is_win).is_false();
    assert_eq!(session.pending_timers(), 0);
    assert_that(&session.frame(100.0)).is_false();
}

#[test]
fn test_respawn_countdown_and_invincibility() {
    let mut session = playing_session(seeded_config(6));
    park_ghosts(&mut session);
    catch_player(&mut session);
    assert_eq!(session.state().lives, 2);
    session.drain_events();

    // Death animation, scroll back, then 3, 2, 1.
    let mut countdown = Vec::new();
    for _ in 0..100 {
        session.tick(TICK);
        for event in session.drain_events() {
            if let SessionEvent::CountdownTick(value) = event {
                countdown.push(value);
            }
        }
        if session.stage() == GameStage::Playing {
            break;
        }
    }
    assert_eq!(session.stage(), GameStage::Playing);
    assert_eq!(countdown, vec![3, 2, 1]);
    assert_eq!(session.player().position, session.player().spawn_point());
    assert_that(&session.player().invincible).is_true();

    park_ghosts(&mut session);
    catch_player(&mut session);
    assert_eq!(session.state().lives, 2);
    assert_eq!(session.stage(), GameStage::Playing);

    park_ghosts(&mut session);
    advance(&mut session, 2.1);
    assert_that(&session.player().invincible).is_false();
    catch_player(&mut session);
    assert_eq!(session.state().lives, 1);
}

#[test]
fn test_shield_absorbs_hit() {
    // Find a seed that places a reachable shield above the first section.
    let (mut session, shield) = (0..200)
        .find_map(|seed| {
            let session = playing_session(seeded_config(seed));
            let shield = session
                .items()
                .powerups()
                .iter()
                .find(|item| item.kind == PowerupKind::Shield && item.position.y < 900.0)
                .copied()?;
            Some((session, shield))
        })
        .expect("some seed spawns a shield");
    park_ghosts(&mut session);

    teleport(&mut session, shield.position);
    assert_that(&session.effects().has(PowerupKind::Shield)).is_true();
    catch_player(&mut session);
    assert_eq!(session.state().lives, 3);
    assert_eq!(session.stage(), GameStage::Playing);
}

#[test]
fn test_frame_delta_is_clamped() {
    let mut session = playing_session(seeded_config(8));
    park_ghosts(&mut session);
    let start = session.player().position;
    session.key_down("ArrowRight");

    session.frame(0.0);
    // A suspended tab: ten seconds pass between frames.
    session.frame(10.0);

    let moved = session.player().position.x - start.x;
    assert_that(&(moved - 20.0).abs()).is_less_than(1e-3);
}

#[test]
fn test_hover_enter_and_leave() {
    let mut session = playing_session(seeded_config(9));
    park_ghosts(&mut session);
    session.drain_events();

    teleport(&mut session, Vec2::new(150.0, 220.0));
    let events = session.drain_events();
    assert_that(&events.contains(&SessionEvent::HoverEnter("hero-cta".into()))).is_true();

    session.key_down("Escape");
    session.command(page_arcade::input::GameCommand::Quit);
    let events = session.drain_events();
    assert_that(&events.contains(&SessionEvent::HoverLeave("hero-cta".into()))).is_true();
    assert_eq!(session.stage(), GameStage::Idle);
    assert_eq!(session.pending_timers(), 0);
}

#[test]
fn test_restart_after_game_over_resets_progress() {
    let config = GameConfig {
        lives: 1,
        ..seeded_config(10)
    };
    let mut session = playing_session(config);
    park_ghosts(&mut session);
    for _ in 0..5 {
        collect_plain_dot(&mut session);
    }
    catch_player(&mut session);
    advance(&mut session, 3.0);
    assert_eq!(session.stage(), GameStage::GameOver);

    // Movement does not restart a finished game; the restart command does.
    session.key_down("ArrowUp");
    assert_eq!(session.stage(), GameStage::GameOver);
    session.key_down("r");
    assert_eq!(session.stage(), GameStage::Starting);
    assert_eq!(session.state().score, 0);
    assert_eq!(session.state().lives, 1);
    assert!(session
        .sections()
        .sections()
        .iter()
        .all(|section| section.state == SectionState::Locked));
}

#[test]
fn test_mute_toggle() {
    let (audio, calls) = RecordingAudio::new();
    let mut session = playing_session_with(seeded_config(11), Box::new(audio));
    session.key_down("m");
    assert_that(&session.hud().muted).is_true();
    assert_that(&calls.borrow().contains(&AudioCall::StopAll)).is_true();

    let chomps = play_count(&calls, Sound::Chomp);
    park_ghosts(&mut session);
    collect_plain_dot(&mut session);
    assert_eq!(play_count(&calls, Sound::Chomp), chomps);

    session.key_down("M");
    assert_that(&session.hud().muted).is_false();
}

#[test]
fn test_rejected_playback_is_swallowed() {
    let (audio, _calls) = RecordingAudio::rejecting(&[Sound::Intro]);
    let mut session = Session::new(seeded_config(12), test_layout(), Box::new(audio)).unwrap();
    session.key_down("ArrowRight");
    assert_eq!(session.stage(), GameStage::Starting);
    // Autoplay rejections leave the sound available for later attempts.
    assert_that(&session.audio().is_available(Sound::Intro)).is_true();
    advance(&mut session, 5.3);
    assert_eq!(session.stage(), GameStage::Playing);
}
