//! Rendering port
//!
//! The session hands a [`FrameSnapshot`] to a [`Renderer`] once per tick. How
//! the frame is drawn is entirely up to the implementation.

pub mod text;

pub use text::TextRenderer;

use crate::sim::{Bullet, Enemy, GamePhase, GameState, Player};

/// Read-only view of everything drawn in one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub width: f32,
    pub height: f32,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub player_bullets: &'a [Bullet],
    pub enemy_bullets: &'a [Bullet],
    pub lives: u32,
    pub score: u64,
    /// Milliseconds since the round started
    pub elapsed_ms: f64,
    pub phase: GamePhase,
}

impl<'a> FrameSnapshot<'a> {
    pub fn of(state: &'a GameState, now_ms: f64) -> Self {
        Self {
            width: state.tuning.canvas_width,
            height: state.tuning.canvas_height,
            player: &state.player,
            enemies: &state.enemies,
            player_bullets: &state.player_bullets,
            enemy_bullets: &state.enemy_bullets,
            lives: state.player.lives,
            score: state.score,
            elapsed_ms: state.elapsed_ms(now_ms),
            phase: state.phase,
        }
    }
}

/// Frame consumer
pub trait Renderer {
    fn draw(&mut self, frame: &FrameSnapshot<'_>);
}
