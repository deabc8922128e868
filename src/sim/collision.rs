//! Collision resolution
//!
//! Runs after movement each tick. The passes run in a fixed order because
//! earlier passes remove entities later passes would otherwise see:
//! 1. player bullet vs enemy
//! 2. player bullet vs enemy bullet
//! 3. enemy bullet vs player
//! 4. round-clear check

use super::geometry::collides;
use super::state::{GameEvent, GamePhase, GameState};

/// Apply every collision pass and resulting phase transitions
pub fn resolve_collisions(state: &mut GameState) {
    player_bullets_vs_enemies(state);
    player_bullets_vs_enemy_bullets(state);
    enemy_bullets_vs_player(state);
    check_round_clear(state);
}

/// Each player bullet destroys at most one enemy
fn player_bullets_vs_enemies(state: &mut GameState) {
    let mut i = 0;
    while i < state.player_bullets.len() {
        let bullet = &state.player_bullets[i];
        let Some(j) = state.enemies.iter().position(|e| collides(bullet, e)) else {
            i += 1;
            continue;
        };

        state.player_bullets.remove(i);
        let enemy = state.enemies.remove(j);
        state.score += state.tuning.score_per_enemy;
        log::debug!("Enemy {} destroyed, score {}", enemy.id.0, state.score);
        state.push_event(GameEvent::EnemyDestroyed { enemy: enemy.id });
        state.push_event(GameEvent::ScoreChanged { score: state.score });
    }
}

/// Player and enemy bullets cancel each other, one pair per player bullet
fn player_bullets_vs_enemy_bullets(state: &mut GameState) {
    let mut i = 0;
    while i < state.player_bullets.len() {
        let bullet = &state.player_bullets[i];
        let Some(j) = state.enemy_bullets.iter().position(|b| collides(bullet, b)) else {
            i += 1;
            continue;
        };

        state.player_bullets.remove(i);
        state.enemy_bullets.remove(j);
        state.push_event(GameEvent::BulletsCancelled);
    }
}

/// Every enemy bullet touching the player costs a life. Keeps going after
/// the last life so the tick ends in one consistent state.
fn enemy_bullets_vs_player(state: &mut GameState) {
    let mut i = 0;
    while i < state.enemy_bullets.len() {
        if !collides(&state.enemy_bullets[i], &state.player) {
            i += 1;
            continue;
        }

        state.enemy_bullets.remove(i);
        state.player.lives = state.player.lives.saturating_sub(1);
        state.push_event(GameEvent::PlayerDamaged {
            lives: state.player.lives,
        });

        if state.player.lives == 0 && state.phase == GamePhase::Playing {
            state.phase = GamePhase::GameOver;
            log::info!("Game over with score {}", state.score);
            state.push_event(GameEvent::GameOver {
                final_score: state.score,
            });
        }
    }
}

/// Award the life bonus once when the last enemy falls
fn check_round_clear(state: &mut GameState) {
    if !state.enemies.is_empty() || state.phase != GamePhase::Playing {
        return;
    }

    let bonus = state.player.lives as u64 * state.tuning.clear_bonus_per_life;
    state.score += bonus;
    state.phase = GamePhase::GameClear;
    log::info!("Round clear: score {} (life bonus {})", state.score, bonus);
    state.push_event(GameEvent::GameClear {
        final_score: state.score,
        bonus,
    });
}
