//! Simulation module
//!
//! All gameplay logic lives here:
//! - Timing comes from caller-supplied millisecond timestamps
//! - Seeded RNG only
//! - Stable iteration order (enemies by ascending ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod geometry;
pub mod state;
pub mod tick;

pub use collision::resolve_collisions;
pub use geometry::{GameObject, clamp, collides, direction, distance, normalize};
pub use state::{Bullet, Enemy, EnemyId, GameEvent, GamePhase, GameState, Player};
pub use tick::{TickInput, fire_volley, nearest_enemy, tick};
