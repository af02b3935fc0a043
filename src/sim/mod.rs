//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` is one fixed simulation step
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod map;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use map::{LAYOUTS, Map, MapLayout};
pub use rect::Rect;
pub use spawn::{SpawnError, generate_room};
pub use state::{Ability, Bullet, GameEvent, GamePhase, GameState, Monster, Player};
pub use tick::{TickInput, tick};
