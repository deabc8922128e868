//! Session controller
//!
//! Owns the simulation plus every collaborator and drives them from the
//! host's frame callback: one `frame` call runs one tick, fans the tick's
//! events out to audio/HUD/persistence and hands a snapshot to the renderer.

use crate::audio::{AudioBackend, AudioManager, SoundEffect};
use crate::highscores::HighScores;
use crate::persistence::Storage;
use crate::platform::{Clock, FrameScheduler};
use crate::renderer::{FrameSnapshot, Renderer};
use crate::settings::{self, Settings};
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::{Tuning, TuningError};
use crate::ui::{Hud, Overlay};

/// A running game with its collaborators
pub struct Session {
    state: GameState,
    clock: Box<dyn Clock>,
    scheduler: Box<dyn FrameScheduler>,
    storage: Box<dyn Storage>,
    audio: AudioManager,
    high_scores: HighScores,
    renderer: Option<Box<dyn Renderer>>,
    hud: Option<Box<dyn Hud>>,
    running: bool,
    /// Score saved when the last round ended
    final_score: Option<u64>,
}

impl Session {
    /// Validate the tuning and assemble a stopped session.
    /// Audio defaults to the logging backend.
    pub fn new(
        tuning: Tuning,
        seed: u64,
        clock: Box<dyn Clock>,
        scheduler: Box<dyn FrameScheduler>,
        storage: Box<dyn Storage>,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;

        let settings = Settings::load(storage.as_ref());
        let volume = settings.volume.unwrap_or(tuning.sound_volume);
        let audio = AudioManager::new(Box::new(crate::audio::LogBackend), volume, settings.muted);
        let high_scores = HighScores::load(storage.as_ref());
        let state = GameState::new(tuning, seed, clock.now_ms());

        Ok(Self {
            state,
            clock,
            scheduler,
            storage,
            audio,
            high_scores,
            renderer: None,
            hud: None,
            running: false,
            final_score: None,
        })
    }

    /// Swap the audio backend, keeping volume and mute state
    pub fn with_audio_backend(mut self, backend: Box<dyn AudioBackend>) -> Self {
        self.audio = AudioManager::new(backend, self.audio.volume(), self.audio.is_muted());
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_hud(mut self, hud: Box<dyn Hud>) -> Self {
        self.hud = Some(hud);
        self
    }

    // === Lifecycle ===

    /// Begin a fresh round and request the first tick. No-op while running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.audio.init();
        self.begin_round();
        self.running = true;
        self.scheduler.schedule_next();
    }

    /// Full reset into a new round
    pub fn restart(&mut self) {
        if !self.running {
            self.start();
            return;
        }
        self.begin_round();
    }

    /// Stop requesting ticks and tear the audio service down
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.scheduler.cancel();
        self.audio.shutdown();
        log::info!("Session stopped");
    }

    fn begin_round(&mut self) {
        let now = self.clock.now_ms();
        self.state.reset(now);
        self.final_score = None;
        self.audio.start_bgm();
        if let Some(hud) = self.hud.as_mut() {
            hud.hide_overlay();
            hud.show_score(0);
            hud.show_high_scores(self.high_scores.scores());
        }
        log::info!(
            "Round started with {} enemies and {} lives",
            self.state.enemies.len(),
            self.state.player.lives
        );
    }

    // === Pause ===

    /// Freeze the simulation. Only a playing round can be paused.
    pub fn pause(&mut self) {
        if self.state.phase != GamePhase::Playing {
            return;
        }
        self.state.phase = GamePhase::Paused;
        if let Some(hud) = self.hud.as_mut() {
            hud.show_overlay(&Overlay::paused());
        }
        log::info!("Paused");
    }

    /// Unfreeze a paused round
    pub fn resume(&mut self) {
        if self.state.phase != GamePhase::Paused {
            return;
        }
        self.state.phase = GamePhase::Playing;
        if let Some(hud) = self.hud.as_mut() {
            hud.hide_overlay();
        }
        log::info!("Resumed");
    }

    /// Pause key: pause when playing, resume when paused
    pub fn toggle_pause(&mut self) {
        match self.state.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    // === Audio ===

    /// Flip mute and persist the choice; returns the new state
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.audio.toggle_mute();
        settings::save_mute_state(self.storage.as_mut(), muted);
        muted
    }

    /// Change master volume and persist it
    pub fn set_volume(&mut self, volume: f32) {
        self.audio.set_volume(volume);
        let mut settings = Settings::load(self.storage.as_ref());
        settings.volume = Some(self.audio.volume());
        settings.save(self.storage.as_mut());
    }

    // === Tick handler ===

    /// One host frame: update, dispatch events, render, request the next frame
    pub fn frame(&mut self, input: &TickInput) {
        if !self.running {
            return;
        }

        let now = self.clock.now_ms();
        tick(&mut self.state, input, now);

        for event in self.state.drain_events() {
            self.dispatch(event);
        }

        if let Some(renderer) = self.renderer.as_mut() {
            renderer.draw(&FrameSnapshot::of(&self.state, now));
        }

        if self.running {
            self.scheduler.schedule_next();
        }
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::PlayerShot { .. } => self.audio.play(SoundEffect::Shoot),
            GameEvent::EnemyDestroyed { .. } => self.audio.play(SoundEffect::Hit),
            GameEvent::PlayerDamaged { lives } => {
                log::debug!("Player hit, {} lives left", lives);
                self.audio.play(SoundEffect::Damage);
            }
            GameEvent::ScoreChanged { score } => {
                if let Some(hud) = self.hud.as_mut() {
                    hud.show_score(score);
                }
            }
            GameEvent::GameOver { final_score } => {
                self.audio.play(SoundEffect::GameOver);
                self.finish_round(final_score, Overlay::game_over(final_score));
            }
            GameEvent::GameClear { final_score, bonus } => {
                self.audio.play(SoundEffect::GameClear);
                if let Some(hud) = self.hud.as_mut() {
                    hud.show_score(final_score);
                }
                self.finish_round(final_score, Overlay::game_clear(final_score, bonus));
            }
            GameEvent::EnemyVolley { .. } | GameEvent::BulletsCancelled => {}
        }
    }

    /// Persist the final score once and show the end screen
    fn finish_round(&mut self, final_score: u64, overlay: Overlay) {
        if self.final_score.is_some() {
            return;
        }
        self.final_score = Some(final_score);
        self.audio.stop_bgm();

        if let Some(rank) = self.high_scores.rank_of(final_score) {
            log::info!("New high score #{}: {}", rank, final_score);
        }
        let scores = self
            .high_scores
            .save_score(final_score, self.storage.as_mut())
            .to_vec();

        if let Some(hud) = self.hud.as_mut() {
            hud.show_high_scores(&scores);
            hud.show_overlay(&overlay);
        }
    }

    // === Accessors ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Score recorded when the current round ended
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }
}
