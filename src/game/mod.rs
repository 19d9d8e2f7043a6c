//! This module contains the main game logic and state.
//!
//! A [`Session`] owns one instance of every manager and is the only writer of score,
//! lives and section progress. The host drives it with [`Session::frame`] from its
//! animation callback, forwards input through [`Session::key_down`] and
//! [`Session::joystick`], and reads [`Session::hud`] and [`Session::render_state`] back.

pub mod state;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, trace, warn};

use crate::animation::AnimationManager;
use crate::asset::{AssetResolver, SpriteKey, SpriteManager};
use crate::audio::{AudioBackend, AudioManager, Sound};
use crate::collision::{constrain_player, movement_bounds, CollisionManager, HoverChange};
use crate::config::GameConfig;
use crate::constants::{self, ghost::HOME_HEADER_OFFSET, input::JOYSTICK_DEAD_ZONE};
use crate::direction::Direction;
use crate::effects::{EffectFlags, Effects};
use crate::error::GameResult;
use crate::events::SessionEvent;
use crate::formatter;
use crate::ghost::{GhostAi, GhostContext, Protection, Quarry};
use crate::hud::{self, GhostView, Hud, PlayerView, RenderState, SectionOverlay};
use crate::input::{joystick_direction, Bindings, GameCommand};
use crate::item::{ItemManager, Placement, Powerup, PowerupKind};
use crate::layout::{PageLayout, Rect};
use crate::player::Player;
use crate::scores::EndGameReport;
use crate::section::{SectionManager, SectionState};
use crate::timer::{TimerId, Timers};

use self::state::{DyingSequence, GameStage, PowerMode, SessionState, TimedEvent};

/// Timers that a later event may need to cancel or replace.
#[derive(Debug, Default)]
struct TimerSlots {
    intro: Option<TimerId>,
    invincibility: Option<TimerId>,
    power_ending: Option<TimerId>,
    power_end: Option<TimerId>,
    countdown: Option<TimerId>,
    regeneration: Option<TimerId>,
}

/// One embedded game, from the first key press to teardown.
pub struct Session {
    config: GameConfig,
    layout: PageLayout,
    state: SessionState,
    player: Player,
    ghosts: GhostAi,
    ghost_home: Vec2,
    items: ItemManager,
    sections: SectionManager,
    animation: AnimationManager,
    collisions: CollisionManager,
    audio: AudioManager,
    sprites: SpriteManager,
    effects: Effects,
    timers: Timers<TimedEvent>,
    slots: TimerSlots,
    bindings: Bindings,
    rng: SmallRng,
    events: Vec<SessionEvent>,
    last_frame: Option<f64>,
    /// Direction pressed while the intro played; applied when play begins.
    pending_direction: Option<Direction>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("player", &self.player)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates an idle session that resolves assets by development paths.
    pub fn new(config: GameConfig, layout: PageLayout, audio: Box<dyn AudioBackend>) -> GameResult<Self> {
        let resolver = AssetResolver::development(config.dev_prefix.clone());
        Self::with_assets(config, layout, &resolver, audio)
    }

    /// Creates an idle session with an explicit asset resolver.
    pub fn with_assets(
        config: GameConfig,
        layout: PageLayout,
        resolver: &AssetResolver,
        audio: Box<dyn AudioBackend>,
    ) -> GameResult<Self> {
        config.validate()?;
        layout.validate()?;

        let sections = SectionManager::new(&config.sections, &layout)?;
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let bounds = movement_bounds(&layout, sections.boundary_y(layout.footer_top));
        let spawn_hint = Vec2::new(
            layout.width() * 0.5,
            layout.header_bottom + layout.viewport.y * constants::player::SPAWN_VIEWPORT_FRACTION,
        );
        let (spawn, _) = constrain_player(spawn_hint, bounds);
        let ghost_home = Vec2::new(layout.width() * 0.5, layout.header_bottom + HOME_HEADER_OFFSET);

        let session = Self {
            player: Player::new(spawn, config.player_speed),
            ghosts: GhostAi::new(ghost_home),
            ghost_home,
            items: ItemManager::new(config.dot_spacing),
            sections,
            animation: AnimationManager::new(),
            collisions: CollisionManager::new(),
            audio: AudioManager::new(audio, resolver, config.volume),
            sprites: SpriteManager::new(resolver),
            effects: Effects::new(),
            timers: Timers::new(),
            slots: TimerSlots::default(),
            bindings: Bindings::default(),
            rng,
            events: Vec::new(),
            last_frame: None,
            pending_direction: None,
            state: SessionState {
                lives: config.lives,
                ..SessionState::default()
            },
            config,
            layout,
        };

        info!(?spawn, ?ghost_home, sections = session.sections.sections().len(), "Session created");
        Ok(session)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stage(&self) -> GameStage {
        self.state.stage
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Direct access for hosts that reposition the player (and for tests).
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn ghosts(&self) -> &GhostAi {
        &self.ghosts
    }

    pub fn ghosts_mut(&mut self) -> &mut GhostAi {
        &mut self.ghosts
    }

    pub fn items(&self) -> &ItemManager {
        &self.items
    }

    pub fn sections(&self) -> &SectionManager {
        &self.sections
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    pub fn sprites(&self) -> &SpriteManager {
        &self.sprites
    }

    /// For reporting preload results.
    pub fn sprites_mut(&mut self) -> &mut SpriteManager {
        &mut self.sprites
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    /// Number of deferred events still scheduled.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Takes every event raised since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Handles a DOM `KeyboardEvent.key`. Returns `false` for unbound keys.
    pub fn key_down(&mut self, key: &str) -> bool {
        match self.bindings.command_for(key) {
            Some(command) => {
                self.command(command);
                true
            }
            None => false,
        }
    }

    /// Handles the touch joystick vector.
    pub fn joystick(&mut self, vector: Vec2) {
        if let Some(direction) = joystick_direction(vector, JOYSTICK_DEAD_ZONE) {
            self.command(GameCommand::Move(direction));
        }
    }

    pub fn command(&mut self, command: GameCommand) {
        match command {
            GameCommand::Move(direction) => self.steer(direction),
            GameCommand::TogglePause => self.toggle_pause(),
            GameCommand::ToggleMute => self.audio.toggle_mute(),
            GameCommand::Restart => self.restart(),
            GameCommand::Quit => self.teardown(),
        }
    }

    fn steer(&mut self, direction: Direction) {
        match self.state.stage {
            GameStage::Idle => self.begin_session(Some(direction)),
            GameStage::Starting => {
                self.player.facing = direction;
                self.pending_direction = Some(direction);
            }
            GameStage::Playing => self.player.steer(direction),
            stage => trace!(?stage, ?direction, "Movement swallowed"),
        }
    }

    /// Pauses any active stage, or resumes exactly the stage that was paused.
    pub fn toggle_pause(&mut self) {
        match self.state.stage {
            GameStage::Paused(resumable) => {
                let stage = GameStage::from(resumable);
                self.last_frame = None;
                self.set_stage(stage);
                if stage == GameStage::Starting {
                    // The wait starts over: the intro plays again with a fresh timeout.
                    self.start_intro_wait();
                }
            }
            stage => {
                let Some(resumable) = stage.resumable() else {
                    trace!(?stage, "Nothing to pause");
                    return;
                };
                if stage == GameStage::Starting {
                    self.timers.cancel_slot(&mut self.slots.intro);
                    self.audio.stop(Sound::Intro);
                }
                self.set_stage(GameStage::Paused(resumable));
            }
        }
    }

    /// Starts over from a finished or paused session. Does nothing otherwise.
    pub fn restart(&mut self) {
        match self.state.stage {
            GameStage::GameOver | GameStage::Won | GameStage::Paused(_) => {
                info!(score = self.state.score, "Restarting session");
                self.begin_session(None);
            }
            stage => debug!(?stage, "Restart ignored"),
        }
    }

    /// Stops everything and returns to `Idle`. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.slots = TimerSlots::default();
        self.effects.clear();
        self.audio.stop_all();
        self.clear_hover();
        self.items.reset();
        self.player.stop();
        self.player.dying = false;
        self.player.invincible = false;
        self.animation.clear_death();
        self.pending_direction = None;
        self.last_frame = None;
        self.state.countdown = None;
        self.state.power = PowerMode::Off;
        self.set_stage(GameStage::Idle);
    }

    /// Called by the host when a sound finishes playing.
    pub fn on_sound_ended(&mut self, sound: Sound) {
        if sound == Sound::Intro && self.state.stage == GameStage::Starting {
            debug!("Intro finished");
            self.start_playing();
        }
    }

    /// Runs one frame. `now` is a monotonic clock in seconds.
    ///
    /// The delta since the previous frame is clamped to the configured maximum. Returns
    /// whether the host should schedule another frame.
    pub fn frame(&mut self, now: f64) -> bool {
        let dt = match self.last_frame {
            Some(last) => ((now - last).max(0.0) as f32).min(self.config.max_delta),
            None => 0.0,
        };
        self.last_frame = Some(now);
        self.tick(dt);
        self.state.stage.wants_frames()
    }

    /// Advances the simulation by `dt` seconds, unclamped.
    pub fn tick(&mut self, dt: f32) {
        formatter::advance_tick();

        match self.state.stage {
            GameStage::Idle | GameStage::Paused(_) | GameStage::GameOver | GameStage::Won => return,
            _ => {}
        }

        for event in self.timers.advance(dt) {
            self.handle_timer(event);
        }

        if self.animation.update_scroll(dt) {
            self.on_scroll_finished();
        }
        self.sections.update(dt);

        match self.state.stage {
            GameStage::Playing => self.tick_playing(dt),
            GameStage::Dying(DyingSequence::Animating) => {
                if self.animation.update_death(dt) {
                    self.on_death_animation_finished();
                }
            }
            _ => {}
        }
    }

    fn tick_playing(&mut self, dt: f32) {
        // Movement and constraints.
        self.player.integrate(dt);
        let bounds = self.movement_bounds();
        let (position, _) = constrain_player(self.player.position, bounds);
        self.player.position = position;
        self.animation.update_player(dt, self.player.is_moving());

        self.animation.sync_scroll(self.player.position.y, &self.layout);

        // Ghosts.
        let context = GhostContext {
            quarry: Quarry {
                position: self.player.position,
                velocity: self.player.velocity,
                facing: self.player.facing,
            },
            player_base_speed: self.config.player_speed,
            remaining_dot_fraction: self.items.remaining_fraction(),
            bounds,
            viewport: self.viewport(),
        };
        self.ghosts.update(&context, dt);
        if self.resolve_ghost_collisions() {
            return;
        }

        // Items, keys and hover.
        self.resolve_pickups();
        self.resolve_sections(bounds);
        self.update_hover();

        if self.sections.all_unlocked() && self.items.all_dots_collected() && !self.state.regeneration_pending {
            self.win();
        }
    }

    /// Returns `true` when the player was caught.
    fn resolve_ghost_collisions(&mut self) -> bool {
        let protection = Protection {
            shield: self.effects.has(PowerupKind::Shield),
            invincible: self.player.invincible,
        };
        let outcome = self.ghosts.check_ghost_collisions(self.player.position, protection);

        let multiplier = self.effects.score_multiplier();
        for (personality, points) in outcome.eaten {
            let awarded = points.saturating_mul(multiplier);
            self.state.score = self.state.score.saturating_add(awarded);
            self.audio.play(Sound::EatGhost);
            self.events.push(SessionEvent::GhostEaten {
                personality,
                position: self.ghosts.ghost(personality).position,
                points: awarded,
            });
        }

        if outcome.shield_absorbed {
            debug!("Shield absorbed a ghost hit");
        }
        if outcome.player_hit {
            self.lose_life();
            return true;
        }
        false
    }

    fn resolve_pickups(&mut self) {
        let pickups = self.items.collect(self.player.position);
        if pickups.is_empty() {
            return;
        }

        let multiplier = self.effects.score_multiplier();
        for dot in &pickups.dots {
            self.state.score = self.state.score.saturating_add(dot.points.saturating_mul(multiplier));
            self.state.dots_score = self.state.dots_score.saturating_add(dot.points);
            self.events.push(SessionEvent::DotCollected {
                id: dot.id,
                position: dot.position,
                pellet: dot.pellet,
                points: dot.points,
            });
        }

        if pickups.pellet_eaten() {
            self.audio.play(Sound::PowerPellet);
            self.activate_power_mode();
        } else if !pickups.dots.is_empty() {
            self.audio.play(Sound::Chomp);
        }

        for powerup in pickups.powerups {
            self.apply_powerup(powerup);
        }
    }

    fn activate_power_mode(&mut self) {
        use crate::constants::power::{FRIGHTENED_DURATION, FRIGHTENED_ENDING_LEAD};

        self.timers.cancel_slot(&mut self.slots.power_ending);
        self.timers.cancel_slot(&mut self.slots.power_end);
        self.ghosts.frighten_all();
        self.state.power = PowerMode::Active;
        self.slots.power_ending = Some(
            self.timers
                .schedule(FRIGHTENED_DURATION - FRIGHTENED_ENDING_LEAD, TimedEvent::PowerEnding),
        );
        self.slots.power_end = Some(self.timers.schedule(FRIGHTENED_DURATION, TimedEvent::PowerEnd));
        debug!("Power mode started");
        self.events.push(SessionEvent::PowerModeStarted);
    }

    fn end_power_mode(&mut self) {
        self.timers.cancel_slot(&mut self.slots.power_ending);
        self.timers.cancel_slot(&mut self.slots.power_end);
        self.ghosts.calm_all();
        if self.state.power.is_on() {
            self.state.power = PowerMode::Off;
            debug!("Power mode ended");
            self.events.push(SessionEvent::PowerModeEnded);
        }
    }

    fn apply_powerup(&mut self, powerup: Powerup) {
        let kind = powerup.kind;
        self.state.score = self.state.score.saturating_add_signed(kind.points());

        if kind == PowerupKind::ExtraLife {
            self.state.lives = (self.state.lives + 1).min(constants::player::MAX_LIVES);
            self.audio.play(Sound::ExtraLife);
        } else {
            self.audio.play(Sound::Powerup);
        }

        if let Some(duration) = kind.duration() {
            let timer = self.timers.schedule(duration, TimedEvent::EffectExpired(kind));
            if let Some(replaced) = self.effects.insert(kind, timer) {
                self.timers.cancel(replaced);
            }
            self.apply_effect_state();
        }

        info!(?kind, points = kind.points(), score = self.state.score, "Powerup collected");
        self.events.push(SessionEvent::PowerupCollected {
            kind,
            position: powerup.position,
            points: kind.points(),
        });
    }

    /// Pushes the active effects out to the player and the ghosts.
    fn apply_effect_state(&mut self) {
        self.player.set_speed_multiplier(self.effects.speed_multiplier());
        let freeze = self.effects.flags().contains(EffectFlags::GHOST_FREEZE);
        if self.ghosts.ghosts().iter().any(|ghost| ghost.frozen != freeze) {
            self.ghosts.set_frozen(freeze);
        }
    }

    fn resolve_sections(&mut self, bounds: Rect) {
        let spawn_hint = self.viewport().center();
        if let Some(position) = self.sections.check_threshold(self.state.dots_score, spawn_hint, bounds) {
            self.items.clear_live_dots();
            self.audio.play(Sound::KeySpawn);
            self.events.push(SessionEvent::KeySpawned {
                section: self.sections.current_section(),
                position,
            });
        }

        if let Some(index) = self.sections.try_collect_key(self.player.position) {
            self.audio.play(Sound::Unlock);
            let id = self.sections.sections()[index].id.clone();
            self.events.push(SessionEvent::SectionUnlocked { section: index, id });

            self.state.regeneration_pending = true;
            self.timers.cancel_slot(&mut self.slots.regeneration);
            self.slots.regeneration = Some(
                self.timers
                    .schedule(constants::section::REGENERATION_DELAY, TimedEvent::RegenerateDots),
            );
        }
    }

    fn update_hover(&mut self) {
        let changes = self.collisions.update_hover(self.player.position, &self.layout.hoverables);
        self.events.extend(changes.into_iter().map(hover_event));
    }

    fn clear_hover(&mut self) {
        let changes = self.collisions.clear_hover();
        self.events.extend(changes.into_iter().map(hover_event));
    }

    fn lose_life(&mut self) {
        if self.player.dying {
            return;
        }
        self.player.dying = true;
        self.player.stop();
        self.state.lives = self.state.lives.saturating_sub(1);
        info!(remaining = self.state.lives, score = self.state.score, "Life lost");
        self.events.push(SessionEvent::LifeLost {
            remaining: self.state.lives,
        });

        self.audio.play(Sound::Death);
        self.end_power_mode();
        for timer in self.effects.clear() {
            self.timers.cancel(timer);
        }
        self.apply_effect_state();
        self.animation.start_death();
        self.set_stage(GameStage::Dying(DyingSequence::Animating));
    }

    fn on_death_animation_finished(&mut self) {
        if self.state.lives == 0 {
            self.game_over();
            return;
        }

        self.player.respawn();
        self.ghosts.reset(self.ghost_home);
        self.animation.clear_death();
        self.animation.scroll_to_player(self.player.position.y, &self.layout);
        self.set_stage(GameStage::Dying(DyingSequence::Scrolling));
    }

    fn on_scroll_finished(&mut self) {
        if self.state.stage != GameStage::Dying(DyingSequence::Scrolling) {
            return;
        }
        let remaining = constants::player::RESPAWN_COUNTDOWN_STEPS;
        self.show_countdown(remaining);
    }

    fn show_countdown(&mut self, remaining: u8) {
        self.state.countdown = Some(remaining);
        self.set_stage(GameStage::Dying(DyingSequence::Countdown { remaining }));
        self.events.push(SessionEvent::CountdownTick(remaining));
        self.slots.countdown = Some(
            self.timers
                .schedule(constants::session::COUNTDOWN_STEP, TimedEvent::CountdownStep),
        );
    }

    fn finish_respawn(&mut self) {
        self.state.countdown = None;
        self.player.invincible = true;
        self.timers.cancel_slot(&mut self.slots.invincibility);
        self.slots.invincibility = Some(self.timers.schedule(
            constants::player::RESPAWN_INVINCIBILITY,
            TimedEvent::InvincibilityEnd,
        ));
        self.set_stage(GameStage::Playing);
    }

    fn handle_timer(&mut self, event: TimedEvent) {
        trace!(?event, "Timer fired");
        match event {
            TimedEvent::IntroTimeout => {
                self.slots.intro = None;
                if self.state.stage == GameStage::Starting {
                    warn!(timeout = self.config.intro_timeout, "Intro never reported finishing; starting anyway");
                    self.start_playing();
                }
            }
            TimedEvent::CountdownStep => {
                self.slots.countdown = None;
                if let GameStage::Dying(DyingSequence::Countdown { remaining }) = self.state.stage {
                    match remaining.saturating_sub(1) {
                        0 => self.finish_respawn(),
                        next => self.show_countdown(next),
                    }
                }
            }
            TimedEvent::InvincibilityEnd => {
                self.slots.invincibility = None;
                self.player.invincible = false;
                debug!("Invincibility ended");
            }
            TimedEvent::PowerEnding => {
                self.slots.power_ending = None;
                if self.state.power == PowerMode::Active {
                    self.state.power = PowerMode::Ending;
                    self.events.push(SessionEvent::PowerModeEnding);
                }
            }
            TimedEvent::PowerEnd => {
                self.slots.power_end = None;
                self.end_power_mode();
            }
            TimedEvent::EffectExpired(kind) => {
                if self.effects.expire(kind) {
                    self.apply_effect_state();
                    self.events.push(SessionEvent::EffectExpired(kind));
                }
            }
            TimedEvent::RegenerateDots => {
                self.slots.regeneration = None;
                self.end_power_mode();
                self.ghosts.reset(self.ghost_home);
                self.apply_effect_state();
                self.regenerate_dots();
            }
        }
    }

    fn regenerate_dots(&mut self) {
        self.state.regeneration_pending = false;
        // The next section already crossed its threshold; its key unlock regenerates instead.
        let waiting = self.sections.current().filter(|section| section.state == SectionState::ThresholdReached);
        if let Some(section) = waiting {
            debug!(section = %section.name, "Key pending; dots stay cleared");
            return;
        }

        let locked = self.sections.locked_zones();
        let placement = Placement {
            area: self.layout.play_area(),
            locked: &locked,
            slice_height: self.layout.viewport.y,
        };
        self.items.generate_dots(&placement, &mut self.rng);

        let count = self.items.dots().len();
        info!(count, section = self.sections.current_section(), "Dots regenerated");
        self.events.push(SessionEvent::DotsRegenerated { count });
    }

    /// Full reset into `Starting`. Used for the first start and every restart.
    fn begin_session(&mut self, direction: Option<Direction>) {
        self.timers.cancel_all();
        self.slots = TimerSlots::default();
        self.effects.clear();
        self.clear_hover();

        self.state = SessionState {
            lives: self.config.lives,
            stage: self.state.stage,
            ..SessionState::default()
        };

        self.player.respawn();
        self.player.invincible = false;
        self.apply_effect_state();
        self.ghosts.reset(self.ghost_home);
        self.sections.reset();
        self.items.reset();

        let scroll = self.animation.scroll_y();
        self.animation.reset();
        self.animation.set_scroll(scroll);
        self.animation.scroll_to_player(self.player.position.y, &self.layout);

        self.regenerate_dots();
        let locked = self.sections.locked_zones();
        let placement = Placement {
            area: self.layout.play_area(),
            locked: &locked,
            slice_height: self.layout.viewport.y,
        };
        self.items.spawn_powerups(&placement, &mut self.rng);

        if let Some(direction) = direction {
            self.player.facing = direction;
        }
        self.pending_direction = direction;
        self.last_frame = None;

        info!(lives = self.state.lives, dots = self.items.dots().len(), "Session started");
        self.set_stage(GameStage::Starting);
        self.start_intro_wait();
    }

    /// Plays the intro and arms its timeout; whichever finishes first starts play.
    fn start_intro_wait(&mut self) {
        self.audio.stop(Sound::Intro);
        self.audio.play(Sound::Intro);
        self.timers.cancel_slot(&mut self.slots.intro);
        self.slots.intro = Some(self.timers.schedule(self.config.intro_timeout, TimedEvent::IntroTimeout));
    }

    fn start_playing(&mut self) {
        self.timers.cancel_slot(&mut self.slots.intro);
        self.set_stage(GameStage::Playing);
        if let Some(direction) = self.pending_direction.take() {
            self.player.steer(direction);
        }
    }

    fn win(&mut self) {
        self.player.stop();
        self.timers.cancel_all();
        self.slots = TimerSlots::default();
        self.effects.clear();
        self.end_power_mode();
        self.audio.stop_all();
        self.audio.play(Sound::Victory);
        info!(score = self.state.score, "All sections unlocked and every dot eaten");
        self.events.push(SessionEvent::Won { score: self.state.score });
        self.set_stage(GameStage::Won);
    }

    fn game_over(&mut self) {
        self.timers.cancel_all();
        self.slots = TimerSlots::default();
        self.audio.stop_all();
        self.audio.play(Sound::GameOver);
        info!(score = self.state.score, "Game over");
        self.events.push(SessionEvent::GameOver { score: self.state.score });
        self.set_stage(GameStage::GameOver);
    }

    fn set_stage(&mut self, stage: GameStage) {
        let from = self.state.stage;
        if from == stage {
            return;
        }
        debug!(?from, to = ?stage, "Stage changed");
        self.state.stage = stage;
        self.events.push(SessionEvent::StageChanged { from, to: stage });
    }

    fn movement_bounds(&self) -> Rect {
        movement_bounds(&self.layout, self.sections.boundary_y(self.layout.footer_top))
    }

    fn viewport(&self) -> Rect {
        self.layout.viewport_rect(self.animation.scroll_y())
    }

    /// The scoreboard overlay.
    pub fn hud(&self) -> Hud {
        Hud {
            score: self.state.score,
            score_text: hud::format_score(self.state.score),
            dots_score: self.state.dots_score,
            lives: self.state.lives,
            unlock_text: hud::unlock_text(&self.sections, self.state.dots_score),
            effects: self.effects.flags(),
            effect_bars: self.effects.bars(&self.timers),
            countdown: self.state.countdown,
            power_mode: self.state.power.is_on(),
            power_ending: self.state.power == PowerMode::Ending,
            muted: self.audio.is_muted(),
            stage: self.state.stage,
        }
    }

    /// A snapshot of everything the host draws.
    pub fn render_state(&self) -> RenderState {
        let pose = self.animation.player_pose(self.player.facing);
        let power_ending = self.state.power == PowerMode::Ending;

        RenderState {
            scroll_y: self.animation.scroll_y(),
            world_translation: self.animation.world_translation(),
            player: PlayerView {
                position: self.player.position,
                pose,
                sprite: self.sprites.url(SpriteKey::Player { frame: pose.frame }).to_string(),
                invincible: self.player.invincible,
            },
            ghosts: self
                .ghosts
                .ghosts()
                .iter()
                .map(|ghost| GhostView {
                    personality: ghost.personality,
                    position: ghost.position,
                    sprite: self.sprites.url(ghost.sprite(power_ending)).to_string(),
                })
                .collect(),
            dots: self.items.dots().to_vec(),
            powerups: self.items.powerups().to_vec(),
            key: self.sections.key(),
            indicators: self.ghosts.indicators(self.viewport()).into_vec(),
            sections: self
                .sections
                .sections()
                .iter()
                .map(|section| SectionOverlay {
                    id: section.id.clone(),
                    state: section.state,
                    opacity: section.overlay,
                })
                .collect(),
        }
    }

    /// The win/loss modal contents, once the session has finished.
    pub fn end_report(&self) -> Option<EndGameReport> {
        if !self.state.stage.is_finished() {
            return None;
        }
        let unlocked = self
            .sections
            .sections()
            .iter()
            .filter(|section| section.state == SectionState::Unlocked)
            .count();
        Some(EndGameReport::new(
            self.state.score,
            self.state.stage == GameStage::Won,
            unlocked,
            self.state.lives,
        ))
    }
}

fn hover_event(change: HoverChange) -> SessionEvent {
    match change {
        HoverChange::Enter(id) => SessionEvent::HoverEnter(id),
        HoverChange::Leave(id) => SessionEvent::HoverLeave(id),
    }
}
