//! Collision primitives
//!
//! Two precisions on purpose:
//! - pixel-exact mask overlap for the track boundary and the finish line
//! - axis-aligned rectangles for collectibles and AI waypoints

use glam::{IVec2, Vec2};

use super::car::Car;
use super::mask::Mask;

/// Axis-aligned rectangle (half-open: `min <= p < min + size`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    /// Square of half-width `radius` around `center`
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self::from_center(center, Vec2::splat(radius * 2.0))
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x < max.x && point.y >= self.min.y && point.y < max.y
    }

    /// True if the interiors overlap; touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

/// Pixel-exact overlap between a car and a placed mask.
///
/// The car's sprite mask is rotated to its current heading about the sprite
/// centre, then offset by the (truncated) distance from `mask_origin` to the
/// rotated sprite's top-left. Returns the first overlapping pixel in the
/// target mask's local space.
pub fn test_overlap(car: &Car, sprite: &Mask, target: &Mask, mask_origin: IVec2) -> Option<IVec2> {
    let (oriented, shift) = sprite.rotated(car.angle);
    let top_left = car.pos + shift.as_vec2();
    let offset = IVec2::new(
        (top_left.x - mask_origin.x as f32) as i32,
        (top_left.y - mask_origin.y as f32) as i32,
    );
    target.overlap(&oriented, offset)
}

/// How a car met the finish line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishContact {
    /// No overlap
    Clear,
    /// Touched the leading row of the band: entered against the race direction
    WrongWay,
    /// Valid crossing
    Crossed,
}

impl FinishContact {
    pub fn from_poi(poi: Option<IVec2>) -> Self {
        match poi {
            None => FinishContact::Clear,
            Some(p) if p.y == 0 => FinishContact::WrongWay,
            Some(_) => FinishContact::Crossed,
        }
    }
}

/// Classify a car's contact with the finish band
pub fn finish_contact(car: &Car, sprite: &Mask, finish: &Mask, finish_origin: IVec2) -> FinishContact {
    FinishContact::from_poi(test_overlap(car, sprite, finish, finish_origin))
}
