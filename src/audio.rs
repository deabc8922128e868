//! Audio service
//!
//! Procedurally described sound effects handed to a pluggable backend. The
//! manager is constructed once per session and passed to whoever needs it;
//! it never blocks and never lets a backend failure reach the caller.

use thiserror::Error;

/// Backend playback failure
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio device unavailable: {0}")]
    Unavailable(String),
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Enemy destroyed
    Hit,
    /// Player took a bullet
    Damage,
    /// Lives exhausted
    GameOver,
    /// All enemies destroyed
    GameClear,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One oscillator voice with a linear frequency sweep and decaying gain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Offset from the trigger time
    pub delay_ms: u32,
    pub duration_ms: u32,
    /// Relative gain before master volume
    pub gain: f32,
}

impl Note {
    const fn sweep(
        waveform: Waveform,
        start_hz: f32,
        end_hz: f32,
        duration_ms: u32,
        gain: f32,
    ) -> Self {
        Self {
            waveform,
            start_hz,
            end_hz,
            delay_ms: 0,
            duration_ms,
            gain,
        }
    }

    const fn at(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

use Waveform::{Sawtooth, Sine, Square, Triangle};

// Short upward chirp
const SHOOT: &[Note] = &[Note::sweep(Square, 880.0, 1320.0, 60, 0.3)];

// Falling crunch
const HIT: &[Note] = &[
    Note::sweep(Sawtooth, 400.0, 80.0, 150, 0.5),
    Note::sweep(Square, 200.0, 60.0, 120, 0.3).at(20),
];

// Low thump
const DAMAGE: &[Note] = &[Note::sweep(Sine, 150.0, 50.0, 250, 0.8)];

// Sad descending
const GAME_OVER: &[Note] = &[
    Note::sweep(Sine, 400.0, 400.0, 300, 0.3),
    Note::sweep(Sine, 350.0, 350.0, 300, 0.3).at(200),
    Note::sweep(Sine, 300.0, 300.0, 300, 0.3).at(400),
    Note::sweep(Sine, 200.0, 200.0, 400, 0.3).at(600),
];

// Celebratory arpeggio
const GAME_CLEAR: &[Note] = &[
    Note::sweep(Triangle, 523.0, 523.0, 200, 0.25),
    Note::sweep(Triangle, 659.0, 659.0, 200, 0.25).at(80),
    Note::sweep(Triangle, 784.0, 784.0, 200, 0.25).at(160),
    Note::sweep(Triangle, 1047.0, 1047.0, 350, 0.25).at(240),
];

impl SoundEffect {
    /// Voices that make up this effect
    pub fn notes(self) -> &'static [Note] {
        match self {
            SoundEffect::Shoot => SHOOT,
            SoundEffect::Hit => HIT,
            SoundEffect::Damage => DAMAGE,
            SoundEffect::GameOver => GAME_OVER,
            SoundEffect::GameClear => GAME_CLEAR,
        }
    }
}

/// Device-facing half of the audio service
pub trait AudioBackend {
    /// Acquire the device
    fn init(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    /// Schedule an effect at the given effective volume; must not block
    fn play(&mut self, effect: SoundEffect, notes: &[Note], volume: f32) -> Result<(), AudioError>;

    /// Start the looping background track
    fn start_music(&mut self, volume: f32) -> Result<(), AudioError>;

    /// Stop the background track
    fn stop_music(&mut self) -> Result<(), AudioError>;

    /// Release the device
    fn shutdown(&mut self) {}
}

/// Backend that only logs what it would play
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, notes: &[Note], volume: f32) -> Result<(), AudioError> {
        log::debug!("sfx {:?} ({} voices, volume {:.2})", effect, notes.len(), volume);
        Ok(())
    }

    fn start_music(&mut self, volume: f32) -> Result<(), AudioError> {
        log::debug!("bgm start (volume {:.2})", volume);
        Ok(())
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
        log::debug!("bgm stop");
        Ok(())
    }
}

/// Background music volume relative to effects
const MUSIC_GAIN: f32 = 0.5;

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    volume: f32,
    muted: bool,
    /// Music requested by the session (survives mute toggles)
    bgm_wanted: bool,
    /// Music currently running on the backend
    bgm_playing: bool,
    ready: bool,
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("volume", &self.volume)
            .field("muted", &self.muted)
            .field("bgm_wanted", &self.bgm_wanted)
            .field("bgm_playing", &self.bgm_playing)
            .field("ready", &self.ready)
            .finish()
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>, volume: f32, muted: bool) -> Self {
        Self {
            backend,
            volume: volume.clamp(0.0, 1.0),
            muted,
            bgm_wanted: false,
            bgm_playing: false,
            ready: false,
        }
    }

    /// Bring the backend up; a failing device leaves audio disabled
    pub fn init(&mut self) {
        if self.ready {
            return;
        }
        match self.backend.init() {
            Ok(()) => self.ready = true,
            Err(e) => log::warn!("Audio disabled: {}", e),
        }
    }

    /// Stop music and release the backend
    pub fn shutdown(&mut self) {
        if !self.ready {
            return;
        }
        self.stop_bgm();
        self.backend.shutdown();
        self.ready = false;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether the background track is running on the backend
    pub fn is_bgm_playing(&self) -> bool {
        self.bgm_playing
    }

    /// Flip mute; returns the new state. Music follows the flag.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        if self.muted {
            self.halt_music();
        } else if self.bgm_wanted {
            self.resume_music();
        }
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Play a sound effect (fire-and-forget)
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if !self.ready || vol <= 0.0 {
            return;
        }
        if let Err(e) = self.backend.play(effect, effect.notes(), vol) {
            log::warn!("Failed to play {:?}: {}", effect, e);
        }
    }

    /// Request background music
    pub fn start_bgm(&mut self) {
        self.bgm_wanted = true;
        if !self.muted {
            self.resume_music();
        }
    }

    /// Cancel background music
    pub fn stop_bgm(&mut self) {
        self.bgm_wanted = false;
        self.halt_music();
    }

    fn resume_music(&mut self) {
        if !self.ready || self.bgm_playing {
            return;
        }
        match self.backend.start_music(self.volume * MUSIC_GAIN) {
            Ok(()) => self.bgm_playing = true,
            Err(e) => log::warn!("Failed to start music: {}", e),
        }
    }

    fn halt_music(&mut self) {
        if !self.bgm_playing {
            return;
        }
        if let Err(e) = self.backend.stop_music() {
            log::warn!("Failed to stop music: {}", e);
        }
        self.bgm_playing = false;
    }
}
