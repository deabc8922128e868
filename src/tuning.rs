//! Data-driven game balance
//!
//! Every number the simulation consults lives in [`Tuning`]. Defaults come
//! from [`crate::consts`]; a JSON document may override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a tuning document is rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("`{field}` must be a positive finite number (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("`sound_volume` must be within 0.0..=1.0 (got {0})")]
    VolumeOutOfRange(f32),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Player ===
    pub player_radius: f32,
    /// Pixels per tick
    pub player_speed: f32,
    pub player_lives: u32,
    pub player_spawn_offset: f32,
    pub shot_cooldown_ms: f64,
    pub player_bullet_speed: f32,
    pub player_bullet_radius: f32,

    // === Enemies ===
    pub enemy_count: u32,
    pub enemy_radius: f32,
    pub enemy_speed: f32,
    pub enemy_shoot_interval_ms: f64,
    pub enemy_retarget_interval_ms: f64,
    pub enemy_chase_spread_x: f32,
    pub enemy_chase_offset_y: f32,
    pub enemy_bullet_speed: f32,
    pub enemy_bullet_radius: f32,
    /// Bullets per volley, spread evenly over a full circle
    pub enemy_bullet_directions: u32,
    pub enemy_bullet_margin: f32,
    pub difficulty_ramp_ms: f64,

    // === Scoring ===
    pub score_per_enemy: u64,
    pub clear_bonus_per_life: u64,

    // === Audio ===
    pub sound_volume: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            player_lives: PLAYER_LIVES,
            player_spawn_offset: PLAYER_SPAWN_OFFSET,
            shot_cooldown_ms: SHOT_COOLDOWN_MS,
            player_bullet_speed: PLAYER_BULLET_SPEED,
            player_bullet_radius: PLAYER_BULLET_RADIUS,

            enemy_count: ENEMY_COUNT,
            enemy_radius: ENEMY_RADIUS,
            enemy_speed: ENEMY_SPEED,
            enemy_shoot_interval_ms: ENEMY_SHOOT_INTERVAL_MS,
            enemy_retarget_interval_ms: ENEMY_RETARGET_INTERVAL_MS,
            enemy_chase_spread_x: ENEMY_CHASE_SPREAD_X,
            enemy_chase_offset_y: ENEMY_CHASE_OFFSET_Y,
            enemy_bullet_speed: ENEMY_BULLET_SPEED,
            enemy_bullet_radius: ENEMY_BULLET_RADIUS,
            enemy_bullet_directions: ENEMY_BULLET_DIRECTIONS,
            enemy_bullet_margin: ENEMY_BULLET_MARGIN,
            difficulty_ramp_ms: DIFFICULTY_RAMP_MS,

            score_per_enemy: SCORE_PER_ENEMY,
            clear_bonus_per_life: CLEAR_BONUS_PER_LIFE,

            sound_volume: SOUND_VOLUME,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every quantity is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let floats = [
            ("canvas_width", self.canvas_width as f64),
            ("canvas_height", self.canvas_height as f64),
            ("player_radius", self.player_radius as f64),
            ("player_speed", self.player_speed as f64),
            ("player_spawn_offset", self.player_spawn_offset as f64),
            ("shot_cooldown_ms", self.shot_cooldown_ms),
            ("player_bullet_speed", self.player_bullet_speed as f64),
            ("player_bullet_radius", self.player_bullet_radius as f64),
            ("enemy_radius", self.enemy_radius as f64),
            ("enemy_speed", self.enemy_speed as f64),
            ("enemy_shoot_interval_ms", self.enemy_shoot_interval_ms),
            ("enemy_retarget_interval_ms", self.enemy_retarget_interval_ms),
            ("enemy_chase_spread_x", self.enemy_chase_spread_x as f64),
            ("enemy_chase_offset_y", self.enemy_chase_offset_y as f64),
            ("enemy_bullet_speed", self.enemy_bullet_speed as f64),
            ("enemy_bullet_radius", self.enemy_bullet_radius as f64),
            ("enemy_bullet_margin", self.enemy_bullet_margin as f64),
            ("difficulty_ramp_ms", self.difficulty_ramp_ms),
        ];
        for (field, value) in floats {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let counts = [
            ("player_lives", self.player_lives as u64),
            ("enemy_count", self.enemy_count as u64),
            ("enemy_bullet_directions", self.enemy_bullet_directions as u64),
            ("score_per_enemy", self.score_per_enemy),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(TuningError::NotPositive {
                    field,
                    value: value as f64,
                });
            }
        }

        if !(0.0..=1.0).contains(&self.sound_volume) {
            return Err(TuningError::VolumeOutOfRange(self.sound_volume));
        }

        Ok(())
    }

    /// Shoot interval for enemies given elapsed round time (one-time halving)
    pub fn enemy_shoot_interval_at(&self, elapsed_ms: f64) -> f64 {
        if elapsed_ms >= self.difficulty_ramp_ms {
            self.enemy_shoot_interval_ms / 2.0
        } else {
            self.enemy_shoot_interval_ms
        }
    }
}
