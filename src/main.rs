//! Headless runner: plays a session on a synthetic page with a simple autopilot.
//!
//! Usage: `page-arcade [seconds]` (simulated seconds, default 300).

use std::time::Instant;

use anyhow::Context;
use glam::Vec2;
use tracing::{debug, info, warn};

use page_arcade::audio::{NullAudio, Sound};
use page_arcade::config::GameConfig;
use page_arcade::constants::TARGET_FPS;
use page_arcade::direction::Direction;
use page_arcade::events::SessionEvent;
use page_arcade::game::state::GameStage;
use page_arcade::input::GameCommand;
use page_arcade::layout::{Hoverable, PageLayout, Rect, SectionRect};
use page_arcade::logging::setup_logging;
use page_arcade::profiling::FrameStats;
use page_arcade::Session;

/// Ghosts closer than this make the autopilot run.
const DANGER_RADIUS: f32 = 120.0;
const DEFAULT_SECONDS: f64 = 300.0;
/// How often the profiling summary is logged, in ticks.
const REPORT_PERIOD: u64 = 60 * 30;

fn main() -> anyhow::Result<()> {
    setup_logging();

    let seconds = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<f64>()
            .with_context(|| format!("Invalid duration in seconds: {arg}"))?,
        None => DEFAULT_SECONDS,
    };

    let config = GameConfig::load().context("Failed to load configuration")?;
    let mut session =
        Session::new(config, synthetic_layout(), Box::new(NullAudio)).context("Failed to create session")?;

    let step = 1.0 / TARGET_FPS as f64;
    let mut now = 0.0;
    let mut stats = FrameStats::new();

    session.command(GameCommand::Move(Direction::Right));
    info!(seconds, "Starting headless run");

    while now < seconds {
        let start = Instant::now();
        let keep_going = session.frame(now);
        stats.record(start.elapsed());

        for event in session.drain_events() {
            match event {
                SessionEvent::StageChanged {
                    to: GameStage::Starting, ..
                } => {
                    // There is no audio device; the intro "finishes" immediately.
                    session.on_sound_ended(Sound::Intro);
                }
                SessionEvent::SectionUnlocked { id, .. } => info!(section = %id, "Autopilot unlocked a section"),
                SessionEvent::LifeLost { remaining } => debug!(remaining, "Autopilot was caught"),
                _ => {}
            }
        }

        if !keep_going {
            break;
        }

        if session.stage() == GameStage::Playing {
            if let Some(direction) = autopilot(&session) {
                if direction != session.player().facing || !session.player().is_moving() {
                    session.command(GameCommand::Move(direction));
                }
            }
        }

        if stats.total_ticks() % REPORT_PERIOD == 0 {
            info!(timing = %stats.summary(), score = session.state().score, "Still running");
        }
        now += step;
    }

    let hud = session.hud();
    match session.end_report() {
        Some(report) => info!(
            score = %report.score_text,
            won = report.is_win,
            sections = report.sections_unlocked,
            "Session finished"
        ),
        None => warn!(score = %hud.score_text, stage = ?hud.stage, "Time limit reached before the session ended"),
    }
    info!(timing = %stats.summary(), "Tick timing");

    println!("score: {} | lives: {} | {}", hud.score_text, hud.lives, hud.unlock_text);
    Ok(())
}

/// Heads for the key, or else the nearest dot, and turns away from close dangerous ghosts.
fn autopilot(session: &Session) -> Option<Direction> {
    let player = session.player().position;

    let threat = session
        .ghosts()
        .ghosts()
        .iter()
        .filter(|ghost| !ghost.frightened && !ghost.eaten && !ghost.frozen)
        .map(|ghost| ghost.position)
        .filter(|position| position.distance(player) < DANGER_RADIUS)
        .min_by(|a, b| a.distance_squared(player).total_cmp(&b.distance_squared(player)));
    if let Some(ghost) = threat {
        return Direction::from_dominant_axis(player - ghost);
    }

    let target = session.sections().key().or_else(|| {
        session
            .items()
            .dots()
            .iter()
            .map(|dot| dot.position)
            .min_by(|a, b| a.distance_squared(player).total_cmp(&b.distance_squared(player)))
    })?;
    Direction::from_dominant_axis(target - player)
}

/// A 1280x720 page with a header, three stacked sections and a few buttons.
fn synthetic_layout() -> PageLayout {
    let width = 1280.0;
    let section = |id: &str, top: f32| SectionRect {
        id: id.to_string(),
        rect: Rect::from_origin_size(Vec2::new(0.0, top), Vec2::new(width, 900.0)),
    };
    let button = |id: &str, center: Vec2| Hoverable {
        id: id.to_string(),
        rect: Rect::new(center - Vec2::new(80.0, 24.0), center + Vec2::new(80.0, 24.0)),
    };

    PageLayout {
        viewport: Vec2::new(width, 720.0),
        document_height: 4200.0,
        header_bottom: 96.0,
        footer_top: 4000.0,
        sections: vec![section("about", 1100.0), section("projects", 2050.0), section("contact", 3000.0)],
        hoverables: vec![
            button("hero-cta", Vec2::new(640.0, 600.0)),
            button("projects-link", Vec2::new(320.0, 2400.0)),
            button("contact-submit", Vec2::new(960.0, 3500.0)),
        ],
    }
}
