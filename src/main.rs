//! Homing Strike entry point
//!
//! Runs a headless, deterministic round with a scripted pilot and prints the
//! final frame. Usage: `homing-strike [seed] [max_ticks]`.

use std::cell::RefCell;
use std::rc::Rc;

use homing_strike::persistence::FileStorage;
use homing_strike::platform::{FixedStepDriver, ManualClock, ManualScheduler};
use homing_strike::renderer::{FrameSnapshot, Renderer, TextRenderer};
use homing_strike::sim::{GameState, TickInput, distance};
use homing_strike::ui::LogHud;
use homing_strike::{Session, Tuning};

const TUNING_FILE: &str = "homing-strike.json";
const STORAGE_DIR: &str = ".homing-strike";
const DEFAULT_SEED: u64 = 0x5EED;
/// One minute at 60 Hz
const DEFAULT_MAX_TICKS: u64 = 60 * 60;

/// Holds fire, sidesteps the closest incoming enemy bullet and otherwise
/// sweeps left and right across the bottom of the field
struct Autopilot {
    ticks: u64,
}

impl Autopilot {
    /// Enemy bullets closer than this are dodged
    const DODGE_RADIUS: f32 = 120.0;

    fn steer(&mut self, state: &GameState) -> TickInput {
        self.ticks += 1;
        let player = &state.player;

        let threat = state
            .enemy_bullets
            .iter()
            .map(|b| (distance(b.pos, player.pos), b.pos))
            .filter(|(d, _)| *d < Self::DODGE_RADIUS)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, pos)| pos);

        let mut going_left = match threat {
            Some(pos) => pos.x >= player.pos.x,
            None => (self.ticks / 90) % 2 == 0,
        };
        // Pinned against a wall: break out the other way
        if player.pos.x <= player.radius {
            going_left = false;
        } else if player.pos.x >= state.tuning.canvas_width - player.radius {
            going_left = true;
        }

        TickInput {
            left: going_left,
            right: !going_left,
            down: threat.is_none() && self.ticks % 240 < 30,
            fire: true,
            ..Default::default()
        }
    }
}

/// Lets `main` read the last frame after the session took ownership
struct SharedRenderer(Rc<RefCell<TextRenderer>>);

impl Renderer for SharedRenderer {
    fn draw(&mut self, frame: &FrameSnapshot<'_>) {
        self.0.borrow_mut().draw(frame);
    }
}

fn load_tuning() -> Tuning {
    match std::fs::read_to_string(TUNING_FILE) {
        Ok(json) => match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", TUNING_FILE);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", TUNING_FILE, e);
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    }
}

fn main() {
    env_logger::init();
    log::info!("Homing Strike (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    let max_ticks = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_TICKS);

    let clock = ManualClock::new(0.0);
    let scheduler = ManualScheduler::new();
    let screen = Rc::new(RefCell::new(TextRenderer::default()));

    let session = Session::new(
        load_tuning(),
        seed,
        Box::new(clock.clone()),
        Box::new(scheduler.clone()),
        Box::new(FileStorage::new(STORAGE_DIR)),
    );
    let mut session = match session {
        Ok(session) => session
            .with_renderer(Box::new(SharedRenderer(Rc::clone(&screen))))
            .with_hud(Box::new(LogHud)),
        Err(e) => {
            eprintln!("Invalid tuning: {e}");
            std::process::exit(1);
        }
    };

    let driver = FixedStepDriver::new(clock, scheduler, FixedStepDriver::DEFAULT_STEP_MS);
    let mut pilot = Autopilot { ticks: 0 };

    session.start();
    let mut ran = 0;
    while ran < max_ticks && !session.phase().is_terminal() {
        let mut input = pilot.steer(session.state());
        let step = driver.run(&mut session, &mut input, 1);
        if step == 0 {
            break;
        }
        ran += step;
    }
    session.stop();

    println!("{}", screen.borrow().last_frame());
    println!();
    println!("Seed {seed}: {:?} after {ran} frames", session.phase());
    match session.final_score() {
        Some(score) => println!("Final score: {score}"),
        None => println!("Round unfinished, score {}", session.score()),
    }
    println!("Best: {}", session.high_scores().best());
    let scores = session.high_scores().scores();
    for (rank, score) in scores.iter().enumerate() {
        println!("  #{} {}", rank + 1, score);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use homing_strike::sim::Bullet;

    use super::*;

    fn state_with_bullet_at(offset: Vec2) -> GameState {
        let mut state = GameState::new(Tuning::default(), 3, 0.0);
        let origin = state.player.pos + offset;
        state.enemy_bullets.push(Bullet {
            pos: origin,
            vel: Vec2::new(0.0, 3.0),
            radius: 4.0,
            is_player_bullet: false,
            target: None,
        });
        state
    }

    #[test]
    fn test_dodges_away_from_nearby_bullet() {
        let mut pilot = Autopilot { ticks: 0 };

        let input = pilot.steer(&state_with_bullet_at(Vec2::new(30.0, -40.0)));
        assert!(input.left && !input.right && input.fire);

        let input = pilot.steer(&state_with_bullet_at(Vec2::new(-30.0, -40.0)));
        assert!(input.right && !input.left);
    }

    #[test]
    fn test_ignores_distant_bullets() {
        let mut pilot = Autopilot { ticks: 100 };
        // Tick 101 sweeps right; a bullet far to the left must not change that
        let input = pilot.steer(&state_with_bullet_at(Vec2::new(-300.0, -300.0)));
        assert!(input.right && !input.down);
    }

    #[test]
    fn test_breaks_away_from_wall() {
        let mut pilot = Autopilot { ticks: 0 };
        let mut state = state_with_bullet_at(Vec2::new(500.0, -500.0));
        state.player.pos.x = state.player.radius;
        assert!(pilot.steer(&state).right);
    }
}
