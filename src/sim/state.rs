//! Game state and core simulation types
//!
//! The engine owns every entity collection. Bullets refer to enemies only by
//! [`EnemyId`], never by reference.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::GameObject;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// All lives lost
    GameOver,
    /// Every enemy destroyed
    GameClear,
}

impl GamePhase {
    /// Whether the round has ended (only a restart leaves these)
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::GameClear)
    }
}

/// Stable handle to an enemy for the lifetime of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub lives: u32,
    /// Timestamp (ms) of the last shot; `None` until the first shot
    pub last_shot_ms: Option<f64>,
}

impl Player {
    /// Spawn at bottom center of the playfield
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                tuning.canvas_width / 2.0,
                tuning.canvas_height - tuning.player_spawn_offset,
            ),
            vel: Vec2::ZERO,
            radius: tuning.player_radius,
            lives: tuning.player_lives,
            last_shot_ms: None,
        }
    }

    /// Whether the shot cooldown has elapsed at `now_ms`
    pub fn can_shoot(&self, now_ms: f64, cooldown_ms: f64) -> bool {
        match self.last_shot_ms {
            Some(last) => now_ms - last >= cooldown_ms,
            None => true,
        }
    }
}

impl GameObject for Player {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn velocity(&self) -> Vec2 {
        self.vel
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// An AI-controlled enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub last_shot_ms: f64,
    pub target_change_ms: f64,
    pub target_pos: Vec2,
}

impl GameObject for Enemy {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn velocity(&self) -> Vec2 {
        self.vel
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A projectile from either side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub is_player_bullet: bool,
    /// Homing target; looked up every tick, may refer to a dead enemy
    pub target: Option<EnemyId>,
}

impl GameObject for Bullet {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn velocity(&self) -> Vec2 {
        self.vel
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Something observable happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player fired a homing shot
    PlayerShot { target: EnemyId },
    /// An enemy fired a radial volley
    EnemyVolley { enemy: EnemyId, bullets: u32 },
    /// A player bullet destroyed an enemy
    EnemyDestroyed { enemy: EnemyId },
    /// A player bullet and an enemy bullet cancelled out
    BulletsCancelled,
    /// Player took a hit
    PlayerDamaged { lives: u32 },
    /// Score changed
    ScoreChanged { score: u64 },
    /// Lives exhausted
    GameOver { final_score: u64 },
    /// All enemies destroyed; `final_score` already includes `bonus`
    GameClear { final_score: u64, bonus: u64 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance parameters for this run
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    pub player: Player,
    /// Active enemies (ascending id order)
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub score: u64,
    /// Timestamp (ms) of the current round start
    pub round_start_ms: f64,
    /// Simulation tick counter for the current round
    pub time_ticks: u64,
    /// Events recorded since the last drain
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new round at `now_ms` with the given seed
    pub fn new(tuning: Tuning, seed: u64, now_ms: f64) -> Self {
        let player = Player::new(&tuning);
        let mut state = Self {
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            player,
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            score: 0,
            round_start_ms: now_ms,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        };
        state.spawn_enemies(now_ms);
        state
    }

    /// Full reset for a new round. The RNG stream continues.
    pub fn reset(&mut self, now_ms: f64) {
        self.player = Player::new(&self.tuning);
        self.enemies.clear();
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.score = 0;
        self.round_start_ms = now_ms;
        self.time_ticks = 0;
        self.events.clear();
        self.phase = GamePhase::Playing;
        self.spawn_enemies(now_ms);
    }

    /// Allocate a new enemy ID
    pub fn next_enemy_id(&mut self) -> EnemyId {
        let id = self.next_id;
        self.next_id += 1;
        EnemyId(id)
    }

    /// Uniform sample in `[lo, hi]`; collapses to `lo` for empty ranges
    pub fn random_between(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        lo + self.rng.random::<f32>() * (hi - lo)
    }

    /// Fair coin flip
    pub fn coin_flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    /// Spawn the configured number of enemies at random spots in the top half
    fn spawn_enemies(&mut self, now_ms: f64) {
        let count = self.tuning.enemy_count;
        let radius = self.tuning.enemy_radius;
        let max_x = self.tuning.canvas_width - radius;
        let max_y = self.tuning.canvas_height / 2.0;
        for _ in 0..count {
            let id = self.next_enemy_id();
            let pos = Vec2::new(
                self.random_between(radius, max_x),
                self.random_between(radius, max_y),
            );
            self.enemies.push(Enemy {
                id,
                pos,
                vel: Vec2::ZERO,
                radius,
                last_shot_ms: now_ms,
                target_change_ms: now_ms,
                target_pos: pos,
            });
        }
        log::debug!("Spawned {} enemies", count);
    }

    /// Place an enemy at a fixed position (test and scripting helper)
    pub fn spawn_enemy_at(&mut self, pos: Vec2, now_ms: f64) -> EnemyId {
        let id = self.next_enemy_id();
        self.enemies.push(Enemy {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: self.tuning.enemy_radius,
            last_shot_ms: now_ms,
            target_change_ms: now_ms,
            target_pos: pos,
        });
        id
    }

    /// Look up a live enemy
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Milliseconds since the round started
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.round_start_ms).max(0.0)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events recorded since the previous call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
