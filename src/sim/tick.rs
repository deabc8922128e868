//! Per-frame simulation tick
//!
//! Order within a tick: player, enemies, bullets, collisions, round-clear
//! check. Timing uses absolute millisecond timestamps supplied by the caller,
//! movement is in pixels per tick.

use glam::Vec2;

use super::collision::resolve_collisions;
use super::geometry::{clamp, direction, distance, normalize};
use super::state::{Bullet, EnemyId, GameEvent, GamePhase, GameState};

/// Input held during a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire held
    pub fire: bool,
}

impl TickInput {
    /// Raw direction from held keys, each axis in {-1, 0, 1}
    pub fn axis(&self) -> Vec2 {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        Vec2::new(x, y)
    }
}

/// Advance the game state by one tick at wall-clock time `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    // Paused and finished rounds are frozen
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    update_player(state, input, now_ms);
    update_enemies(state, now_ms);
    update_bullets(state);
    resolve_collisions(state);
}

/// Move the player and handle the fire button
pub fn update_player(state: &mut GameState, input: &TickInput, now_ms: f64) {
    let tuning = &state.tuning;
    let player = &mut state.player;

    let axis = input.axis();
    player.vel = if axis != Vec2::ZERO {
        normalize(axis) * tuning.player_speed
    } else {
        Vec2::ZERO
    };
    player.pos += player.vel;
    player.pos.x = clamp(player.pos.x, player.radius, tuning.canvas_width - player.radius);
    player.pos.y = clamp(player.pos.y, player.radius, tuning.canvas_height - player.radius);

    if !input.fire || !player.can_shoot(now_ms, tuning.shot_cooldown_ms) {
        return;
    }

    // No target, no shot, no cooldown consumed
    let Some(target) = nearest_enemy(state, state.player.pos) else {
        return;
    };
    let Some(target_pos) = state.enemy(target).map(|e| e.pos) else {
        return;
    };

    let origin = state.player.pos;
    state.player_bullets.push(Bullet {
        pos: origin,
        vel: direction(origin, target_pos) * state.tuning.player_bullet_speed,
        radius: state.tuning.player_bullet_radius,
        is_player_bullet: true,
        target: Some(target),
    });
    state.player.last_shot_ms = Some(now_ms);
    state.push_event(GameEvent::PlayerShot { target });
}

/// Closest enemy to `from`; on equal distance the earliest in iteration
/// order (lowest id) wins.
pub fn nearest_enemy(state: &GameState, from: Vec2) -> Option<EnemyId> {
    let mut best: Option<(EnemyId, f32)> = None;
    for enemy in &state.enemies {
        let d = distance(from, enemy.pos);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((enemy.id, d)),
        }
    }
    best.map(|(id, _)| id)
}

/// Re-target, move and fire for every enemy
pub fn update_enemies(state: &mut GameState, now_ms: f64) {
    let shoot_interval = state
        .tuning
        .enemy_shoot_interval_at(state.elapsed_ms(now_ms));

    for idx in 0..state.enemies.len() {
        // Re-target
        if now_ms - state.enemies[idx].target_change_ms >= state.tuning.enemy_retarget_interval_ms {
            let target = pick_enemy_target(state);
            let enemy = &mut state.enemies[idx];
            enemy.target_pos = target;
            enemy.target_change_ms = now_ms;
        }

        let tuning = &state.tuning;
        let enemy = &mut state.enemies[idx];

        // Move toward target, confined to the upper half
        enemy.vel = direction(enemy.pos, enemy.target_pos) * tuning.enemy_speed;
        enemy.pos += enemy.vel;
        enemy.pos.x = clamp(enemy.pos.x, enemy.radius, tuning.canvas_width - enemy.radius);
        enemy.pos.y = clamp(enemy.pos.y, enemy.radius, tuning.canvas_height / 2.0);

        if now_ms - enemy.last_shot_ms >= shoot_interval {
            enemy.last_shot_ms = now_ms;
            let origin = enemy.pos;
            let id = enemy.id;
            let bullets = tuning.enemy_bullet_directions;
            fire_volley(state, origin);
            log::debug!("Enemy {} fired a {}-bullet volley", id.0, bullets);
            state.push_event(GameEvent::EnemyVolley { enemy: id, bullets });
        }
    }
}

/// Either a random point in the top half, or a point just above the player
fn pick_enemy_target(state: &mut GameState) -> Vec2 {
    let width = state.tuning.canvas_width;
    let half_height = state.tuning.canvas_height / 2.0;
    if state.coin_flip() {
        Vec2::new(
            state.random_between(0.0, width),
            state.random_between(0.0, half_height),
        )
    } else {
        let spread = state.tuning.enemy_chase_spread_x;
        let jitter = state.random_between(-spread, spread);
        let player = state.player.pos;
        Vec2::new(player.x + jitter, player.y - state.tuning.enemy_chase_offset_y)
    }
}

/// Emit N bullets evenly spaced over a full circle from `origin`
pub fn fire_volley(state: &mut GameState, origin: Vec2) {
    let count = state.tuning.enemy_bullet_directions.max(1);
    let speed = state.tuning.enemy_bullet_speed;
    let radius = state.tuning.enemy_bullet_radius;
    let step = std::f32::consts::TAU / count as f32;
    for i in 0..count {
        let angle = i as f32 * step;
        state.enemy_bullets.push(Bullet {
            pos: origin,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            radius,
            is_player_bullet: false,
            target: None,
        });
    }
}

/// Steer homing shots, integrate every bullet, then cull off-field ones
pub fn update_bullets(state: &mut GameState) {
    let speed = state.tuning.player_bullet_speed;
    let width = state.tuning.canvas_width;
    let height = state.tuning.canvas_height;
    let margin = state.tuning.enemy_bullet_margin;

    for bullet in &mut state.player_bullets {
        // Straight flight once the target is gone
        let target_pos = bullet
            .target
            .and_then(|id| state.enemies.iter().find(|e| e.id == id))
            .map(|e| e.pos);
        if let Some(target_pos) = target_pos {
            bullet.vel = direction(bullet.pos, target_pos) * speed;
        }
        bullet.pos += bullet.vel;
    }
    state
        .player_bullets
        .retain(|b| b.pos.x >= 0.0 && b.pos.x <= width && b.pos.y >= 0.0 && b.pos.y <= height);

    for bullet in &mut state.enemy_bullets {
        bullet.pos += bullet.vel;
    }
    state.enemy_bullets.retain(|b| {
        b.pos.x >= -margin && b.pos.x <= width + margin && b.pos.y >= -margin && b.pos.y <= height + margin
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Enemy;
    use crate::tuning::Tuning;

    const FAR_FUTURE: f64 = 1.0e12;

    /// Tuning where enemies sit still and never fire
    fn quiet_tuning() -> Tuning {
        Tuning {
            enemy_count: 1,
            enemy_shoot_interval_ms: FAR_FUTURE,
            enemy_retarget_interval_ms: FAR_FUTURE,
            ..Default::default()
        }
    }

    /// A state with exactly the given enemies, stationary
    fn state_with_enemies(tuning: Tuning, positions: &[Vec2]) -> GameState {
        let mut state = GameState::new(tuning, 42, 0.0);
        state.enemies.clear();
        for &pos in positions {
            state.spawn_enemy_at(pos, 0.0);
        }
        state
    }

    fn fire() -> TickInput {
        TickInput {
            fire: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_diagonal_movement_is_normalized() {
        let mut state = state_with_enemies(quiet_tuning(), &[Vec2::new(400.0, 100.0)]);
        let start = state.player.pos;
        let input = TickInput {
            up: true,
            right: true,
            ..Default::default()
        };
        update_player(&mut state, &input, 0.0);
        let moved = state.player.pos - start;
        assert!((moved.length() - state.tuning.player_speed).abs() < 1e-4);
        assert!(moved.x > 0.0 && moved.y < 0.0);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut state = state_with_enemies(quiet_tuning(), &[Vec2::new(400.0, 100.0)]);
        let start = state.player.pos;
        let input = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        update_player(&mut state, &input, 0.0);
        assert_eq!(state.player.pos, start);
    }

    #[test]
    fn test_player_clamped_to_playfield() {
        let mut state = state_with_enemies(quiet_tuning(), &[Vec2::new(400.0, 100.0)]);
        let input = TickInput {
            down: true,
            left: true,
            ..Default::default()
        };
        for _ in 0..500 {
            update_player(&mut state, &input, 0.0);
        }
        let r = state.player.radius;
        assert_eq!(state.player.pos.x, r);
        assert_eq!(state.player.pos.y, state.tuning.canvas_height - r);
    }

    #[test]
    fn test_fire_targets_nearest_enemy() {
        let mut state = state_with_enemies(
            quiet_tuning(),
            &[Vec2::new(100.0, 50.0), Vec2::new(400.0, 400.0)],
        );
        let near = state.enemies[1].id;
        update_player(&mut state, &fire(), 0.0);
        assert_eq!(state.player_bullets.len(), 1);
        assert_eq!(state.player_bullets[0].target, Some(near));
        assert_eq!(state.player.last_shot_ms, Some(0.0));
        assert_eq!(state.drain_events(), vec![GameEvent::PlayerShot { target: near }]);
    }

    #[test]
    fn test_nearest_tie_goes_to_lowest_id() {
        let tuning = quiet_tuning();
        let player_x = tuning.canvas_width / 2.0;
        let state = state_with_enemies(
            tuning,
            &[Vec2::new(player_x - 100.0, 100.0), Vec2::new(player_x + 100.0, 100.0)],
        );
        let first = state.enemies[0].id;
        assert_eq!(nearest_enemy(&state, state.player.pos), Some(first));
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = state_with_enemies(quiet_tuning(), &[Vec2::new(400.0, 100.0)]);
        let cooldown = state.tuning.shot_cooldown_ms;
        update_player(&mut state, &fire(), 1_000.0);
        update_player(&mut state, &fire(), 1_000.0 + cooldown - 1.0);
        assert_eq!(state.player_bullets.len(), 1);
        update_player(&mut state, &fire(), 1_000.0 + cooldown);
        assert_eq!(state.player_bullets.len(), 2);
    }

    #[test]
    fn test_no_enemies_no_shot_no_cooldown() {
        let mut state = state_with_enemies(quiet_tuning(), &[]);
        update_player(&mut state, &fire(), 500.0);
        assert!(state.player_bullets.is_empty());
        assert_eq!(state.player.last_shot_ms, None);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_volley_is_evenly_spaced() {
        let tuning = Tuning {
            enemy_bullet_directions: 8,
            ..quiet_tuning()
        };
        let speed = tuning.enemy_bullet_speed;
        let mut state = state_with_enemies(tuning, &[]);
        fire_volley(&mut state, Vec2::new(200.0, 100.0));

        assert_eq!(state.enemy_bullets.len(), 8);
        let step = std::f32::consts::TAU / 8.0;
        for (i, bullet) in state.enemy_bullets.iter().enumerate() {
            assert!((bullet.vel.length() - speed).abs() < 1e-4);
            let angle = bullet.vel.y.atan2(bullet.vel.x).rem_euclid(std::f32::consts::TAU);
            let expected = i as f32 * step;
            let diff = (angle - expected).abs();
            assert!(diff < 1e-4 || (std::f32::consts::TAU - diff) < 1e-4);
            assert_eq!(bullet.pos, Vec2::new(200.0, 100.0));
            assert!(!bullet.is_player_bullet);
        }
    }

    #[test]
    fn test_enemy_fires_on_interval_and_ramps() {
        let tuning = Tuning {
            enemy_shoot_interval_ms: 2_000.0,
            ..quiet_tuning()
        };
        let per_volley = tuning.enemy_bullet_directions as usize;
        let mut state = state_with_enemies(tuning, &[Vec2::new(400.0, 100.0)]);

        update_enemies(&mut state, 1_999.0);
        assert!(state.enemy_bullets.is_empty());
        update_enemies(&mut state, 2_000.0);
        assert_eq!(state.enemy_bullets.len(), per_volley);

        // Past the ramp the interval halves
        state.enemies[0].last_shot_ms = 10_000.0;
        update_enemies(&mut state, 10_999.0);
        assert_eq!(state.enemy_bullets.len(), per_volley);
        update_enemies(&mut state, 11_000.0);
        assert_eq!(state.enemy_bullets.len(), per_volley * 2);
    }

    #[test]
    fn test_enemy_confined_to_upper_half() {
        let mut state = state_with_enemies(quiet_tuning(), &[Vec2::new(400.0, 100.0)]);
        state.enemies[0].target_pos = Vec2::new(400.0, 10_000.0);
        for _ in 0..1_000 {
            update_enemies(&mut state, 0.0);
        }
        let enemy: &Enemy = &state.enemies[0];
        assert_eq!(enemy.pos.y, state.tuning.canvas_height / 2.0);
    }

    #[test]
    fn test_enemy_retargets_after_interval() {
        let tuning = Tuning {
            enemy_retarget_interval_ms: 2_000.0,
            ..quiet_tuning()
        };
        let mut state = state_with_enemies(tuning, &[Vec2::new(400.0, 100.0)]);
        update_enemies(&mut state, 1_000.0);
        assert_eq!(state.enemies[0].target_change_ms, 0.0);
        update_enemies(&mut state, 2_000.0);
        assert_eq!(state.enemies[0].target_change_ms, 2_000.0);
    }

    #[test]
    fn test_enemy_targets_roam_or_chase() {
        let mut state = state_with_enemies(quiet_tuning(), &[Vec2::new(400.0, 100.0)]);
        state.player.pos = Vec2::new(250.0, 550.0);
        let width = state.tuning.canvas_width;
        let half_height = state.tuning.canvas_height / 2.0;
        let spread = state.tuning.enemy_chase_spread_x;
        let chase_y = state.player.pos.y - state.tuning.enemy_chase_offset_y;
        let player_x = state.player.pos.x;

        let (mut roaming, mut chasing) = (0, 0);
        for _ in 0..2_000 {
            let target = pick_enemy_target(&mut state);
            if target.y == chase_y && (target.x - player_x).abs() <= spread + 1e-3 {
                chasing += 1;
            } else {
                assert!(
                    (0.0..=width).contains(&target.x) && (0.0..=half_height).contains(&target.y),
                    "target {target} is neither above the player nor in the top half"
                );
                roaming += 1;
            }
        }
        assert!(roaming > 0, "never picked a random point");
        assert!(chasing > 0, "never chased the player");
    }

    #[test]
    fn test_homing_bullet_converges() {
        let mut state = state_with_enemies(quiet_tuning(), &[Vec2::new(150.0, 80.0)]);
        let target = state.enemies[0].id;
        let target_pos = state.enemies[0].pos;
        state.player_bullets.push(Bullet {
            pos: Vec2::new(600.0, 500.0),
            vel: Vec2::new(0.0, 7.0), // heading away initially
            radius: state.tuning.player_bullet_radius,
            is_player_bullet: true,
            target: Some(target),
        });

        let mut last = distance(state.player_bullets[0].pos, target_pos);
        let idle = TickInput::default();
        for step in 0..1_000u32 {
            tick(&mut state, &idle, step as f64);
            if state.enemies.is_empty() {
                return; // reached and destroyed the target
            }
            let now = distance(state.player_bullets[0].pos, target_pos);
            assert!(now < last, "distance grew at step {step}");
            last = now;
        }
        panic!("homing bullet never reached its target");
    }

    #[test]
    fn test_orphaned_bullet_flies_straight() {
        let mut state = state_with_enemies(quiet_tuning(), &[]);
        state.player_bullets.push(Bullet {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::new(3.0, -2.0),
            radius: 5.0,
            is_player_bullet: true,
            target: Some(EnemyId(999)),
        });
        update_bullets(&mut state);
        update_bullets(&mut state);
        assert_eq!(state.player_bullets[0].vel, Vec2::new(3.0, -2.0));
        assert_eq!(state.player_bullets[0].pos, Vec2::new(106.0, 96.0));
    }

    #[test]
    fn test_culling_margins_differ() {
        let mut state = state_with_enemies(quiet_tuning(), &[]);
        let stray = |is_player_bullet| Bullet {
            pos: Vec2::new(1.0, 300.0),
            vel: Vec2::new(-5.0, 0.0),
            radius: 4.0,
            is_player_bullet,
            target: None,
        };
        state.player_bullets.push(stray(true));
        state.enemy_bullets.push(stray(false));

        // x = -4: player bullet gone, enemy bullet still within the margin
        update_bullets(&mut state);
        assert!(state.player_bullets.is_empty());
        assert_eq!(state.enemy_bullets.len(), 1);

        // x = -9, then x = -14
        update_bullets(&mut state);
        assert_eq!(state.enemy_bullets.len(), 1);
        update_bullets(&mut state);
        assert!(state.enemy_bullets.is_empty());
    }

    #[test]
    fn test_paused_tick_is_frozen() {
        let mut state = state_with_enemies(quiet_tuning(), &[Vec2::new(400.0, 100.0)]);
        state.phase = GamePhase::Paused;
        let start = state.player.pos;
        let input = TickInput {
            left: true,
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, 100.0);
        assert_eq!(state.player.pos, start);
        assert!(state.player_bullets.is_empty());
        assert_eq!(state.time_ticks, 0);
    }
}
