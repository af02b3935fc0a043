//! Axis-aligned rectangle geometry for rooms and obstacles
//!
//! Rectangles carry named min/max corners instead of positional coordinate
//! tuples, so there is no ambiguity about coordinate order at call sites.
//! Entity footprints are circles; the two queries that matter are "does the
//! whole footprint fit inside this rect" (room containment) and "does the
//! footprint touch this rect at all" (obstacle intersection).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with inclusive edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Build from corner coordinates (x0, y0) .. (x1, y1)
    pub const fn from_coords(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            min: Vec2::new(x0, y0),
            max: Vec2::new(x1, y1),
        }
    }

    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Whether a circular footprint lies fully inside the rect
    pub fn contains_circle(&self, center: Vec2, radius: f32) -> bool {
        center.x - radius >= self.min.x
            && center.x + radius <= self.max.x
            && center.y - radius >= self.min.y
            && center.y + radius <= self.max.y
    }

    /// Whether a circular footprint intersects the rect at all
    ///
    /// Closest-point test: clamp the circle center into the rect and compare
    /// the remaining distance against the radius.
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        center.distance_squared(closest) < radius * radius
    }
}
