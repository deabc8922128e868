//! Homing Strike - a small arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (geometry, entities, per-tick update, collisions)
//! - `session`: Start/pause/restart/stop orchestration around the simulation
//! - `tuning`: Data-driven game balance
//! - `platform`: Clock, frame scheduling and input ports
//! - `renderer`: Frame snapshot consumer
//! - `persistence`: Key/value storage backing high scores and settings
//! - `audio`: Fire-and-forget sound effect service

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use audio::{AudioManager, SoundEffect};
pub use highscores::HighScores;
pub use session::Session;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration defaults
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player defaults (speeds are pixels per tick)
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_LIVES: u32 = 3;
    /// Distance of the spawn point above the bottom edge
    pub const PLAYER_SPAWN_OFFSET: f32 = 50.0;
    pub const SHOT_COOLDOWN_MS: f64 = 200.0;
    pub const PLAYER_BULLET_SPEED: f32 = 7.0;
    pub const PLAYER_BULLET_RADIUS: f32 = 5.0;

    /// Enemy defaults
    pub const ENEMY_COUNT: u32 = 5;
    pub const ENEMY_RADIUS: f32 = 20.0;
    pub const ENEMY_SPEED: f32 = 2.0;
    pub const ENEMY_SHOOT_INTERVAL_MS: f64 = 2000.0;
    pub const ENEMY_RETARGET_INTERVAL_MS: f64 = 2000.0;
    /// Horizontal jitter around the player when an enemy chases it
    pub const ENEMY_CHASE_SPREAD_X: f32 = 100.0;
    /// Enemies chasing the player aim this far above it
    pub const ENEMY_CHASE_OFFSET_Y: f32 = 200.0;
    pub const ENEMY_BULLET_SPEED: f32 = 3.0;
    pub const ENEMY_BULLET_RADIUS: f32 = 4.0;
    pub const ENEMY_BULLET_DIRECTIONS: u32 = 8;
    /// Enemy bullets survive this far outside the playfield
    pub const ENEMY_BULLET_MARGIN: f32 = 10.0;

    /// Elapsed round time after which enemies fire twice as often
    pub const DIFFICULTY_RAMP_MS: f64 = 10_000.0;

    /// Scoring
    pub const SCORE_PER_ENEMY: u64 = 100;
    pub const CLEAR_BONUS_PER_LIFE: u64 = 100;

    /// Master volume (0.0 - 1.0)
    pub const SOUND_VOLUME: f32 = 0.3;
}
