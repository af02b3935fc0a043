//! Map geometry: the fixed layout catalog and walkability queries
//!
//! A map is a set of room rectangles (walkable interiors) plus obstacle
//! rectangles (impassable). Geometry is replaced wholesale whenever a new
//! room spawns, picked uniformly at random from the catalog below.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// One entry in the fixed layout catalog
#[derive(Debug, Clone, Copy)]
pub struct MapLayout {
    pub rooms: &'static [Rect],
    pub obstacles: &'static [Rect],
}

const fn r(x0: f32, y0: f32, x1: f32, y1: f32) -> Rect {
    Rect::from_coords(x0, y0, x1, y1)
}

/// Fixed layout catalog.
///
/// Every layout keeps the player spawn (400, 300) walkable at full footprint,
/// and adjacent rooms overlap enough that a radius-10 footprint can cross
/// between them without ever leaving room containment.
pub const LAYOUTS: &[MapLayout] = &[
    // Open hall with scattered pillars
    MapLayout {
        rooms: &[r(50.0, 50.0, 750.0, 550.0)],
        obstacles: &[
            r(200.0, 200.0, 250.0, 250.0),
            r(600.0, 400.0, 650.0, 450.0),
            r(380.0, 120.0, 430.0, 170.0),
        ],
    },
    // Two wide halls joined by a central corridor
    MapLayout {
        rooms: &[
            r(50.0, 50.0, 750.0, 250.0),
            r(50.0, 350.0, 750.0, 550.0),
            r(340.0, 150.0, 460.0, 450.0),
        ],
        obstacles: &[r(600.0, 100.0, 650.0, 150.0), r(150.0, 400.0, 200.0, 450.0)],
    },
    // Cross of corridors
    MapLayout {
        rooms: &[r(50.0, 230.0, 750.0, 370.0), r(330.0, 50.0, 470.0, 550.0)],
        obstacles: &[r(550.0, 270.0, 600.0, 330.0), r(200.0, 270.0, 250.0, 330.0)],
    },
];

/// Current level geometry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Map {
    pub rooms: Vec<Rect>,
    pub obstacles: Vec<Rect>,
}

impl Map {
    /// Replace all geometry with a layout picked uniformly at random
    pub fn regenerate(&mut self, rng: &mut Pcg32) {
        let layout = &LAYOUTS[rng.random_range(0..LAYOUTS.len())];
        self.rooms = layout.rooms.to_vec();
        self.obstacles = layout.obstacles.to_vec();
    }

    /// Whether a circular footprint is a legal place to stand: fully inside
    /// at least one room and clear of every obstacle.
    ///
    /// World bounds are deliberately not checked here; that clamp belongs to
    /// the mover (see `Player::try_move`).
    pub fn is_walkable(&self, pos: Vec2, radius: f32) -> bool {
        let in_room = self.rooms.iter().any(|room| room.contains_circle(pos, radius));
        let blocked = self
            .obstacles
            .iter()
            .any(|obstacle| obstacle.overlaps_circle(pos, radius));
        in_room && !blocked
    }
}
