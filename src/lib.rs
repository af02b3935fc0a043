//! Rogue Arena - a top-down arena roguelike
//!
//! Core modules:
//! - `sim`: Deterministic simulation (map, entities, progression, tick driver)
//!
//! Everything gameplay lives in `sim` and is presentation-free: the embedder
//! forwards input intents through [`sim::TickInput`] and session commands,
//! calls [`sim::tick`] on a fixed cadence, and drains [`sim::GameEvent`]s to
//! update whatever it renders. The binary in `main.rs` is a headless
//! stand-in for that presentation layer.

pub mod sim;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// World bounds (pixels)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Tick cadence used by the demo driver. The core itself is per-call:
    /// one `tick` invocation is one simulation step.
    pub const TICK_MS: u64 = 50;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 400.0;
    pub const PLAYER_START_Y: f32 = 300.0;
    pub const PLAYER_RADIUS: f32 = 10.0;
    pub const PLAYER_START_HEALTH: i32 = 100;
    pub const PLAYER_START_ATTACK: i32 = 5;
    /// Movement step per held axis per tick
    pub const PLAYER_STEP: f32 = 10.0;
    /// Ticks between shots
    pub const RELOAD_TICKS: u32 = 20;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const BULLET_SPEED: f32 = 10.0;

    /// Monster defaults
    pub const MONSTER_RADIUS: f32 = 10.0;
    pub const MONSTER_HEALTH: i32 = 20;
    pub const MONSTER_SPEED: f32 = 2.0;
    /// Damage dealt to the player per tick of contact
    pub const MONSTER_CONTACT_DAMAGE: i32 = 5;

    /// Progression
    pub const KILL_EXPERIENCE: u32 = 10;
    pub const LEVEL_THRESHOLD: u32 = 100;

    /// Room generation
    pub const ROOM_MONSTERS: usize = 10;
    pub const SPAWN_X_MIN: f32 = 50.0;
    pub const SPAWN_X_MAX: f32 = 750.0;
    pub const SPAWN_Y_MIN: f32 = 50.0;
    pub const SPAWN_Y_MAX: f32 = 550.0;
    /// Minimum pairwise distance between freshly placed monsters
    pub const SPAWN_SEPARATION: f32 = 40.0;
    /// Retry cap per placement; exhausting it is a configuration error
    pub const SPAWN_MAX_RETRIES: u32 = 1000;
}

/// Check whether a point lies inside the world bounds (inclusive edges)
#[inline]
pub fn in_world_bounds(pos: Vec2) -> bool {
    pos.x >= 0.0 && pos.x <= consts::WORLD_WIDTH && pos.y >= 0.0 && pos.y <= consts::WORLD_HEIGHT
}
