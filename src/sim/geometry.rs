//! Axis-aligned box geometry and overlap tests
//!
//! Screen space: x grows to the right, y grows downward, so a box's
//! `bottom()` is where its feet are.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True if the horizontal extents overlap (touching edges excluded)
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }

    /// Horizontal gap to another box (0 when the extents overlap)
    pub fn gap_x(&self, other: &Rect) -> f32 {
        (other.x - self.right()).max(self.x - other.right()).max(0.0)
    }

    /// Shrink by `fraction` of width/height, keeping the center fixed
    pub fn shrunk(&self, fraction: f32) -> Rect {
        let fraction = fraction.clamp(0.0, 1.0);
        let dw = self.width * fraction;
        let dh = self.height * fraction;
        Rect::new(
            self.x + dw / 2.0,
            self.y + dh / 2.0,
            self.width - dw,
            self.height - dh,
        )
    }
}

/// True iff the two boxes overlap; touching edges do not count
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Like [`intersects`], but `b` is first shrunk by `padding` of its size
///
/// Used for obstacles so a hit only registers when the player clearly
/// overlaps the solid part of the sprite.
#[inline]
pub fn intersects_with_padding(a: &Rect, b: &Rect, padding: f32) -> bool {
    if padding <= 0.0 {
        return intersects(a, b);
    }
    intersects(a, &b.shrunk(padding))
}
