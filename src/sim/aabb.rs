//! Axis-aligned boxes for combat queries
//!
//! Sprite art carries large transparent margins, so combat never tests the
//! full visual bounds: it tests an "effective hitbox", a ratio-scaled
//! sub-rectangle centered within the sprite box.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box from a top-left corner and a size
    pub fn from_top_left(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Box from a center point and a size
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Overlap test, inclusive of touching edges
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Sub-rectangle scaled by `ratio` per axis, centered within this box
    pub fn shrunk(&self, ratio: Vec2) -> Aabb {
        Aabb::from_center(self.center(), self.size() * ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_overlap_and_miss() {
        let a = Aabb::from_top_left(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Aabb::from_top_left(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        let c = Aabb::from_top_left(Vec2::new(20.0, 0.0), Vec2::new(5.0, 5.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_touching_edges_count() {
        let a = Aabb::from_top_left(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Aabb::from_top_left(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_shrunk_is_centered() {
        let a = Aabb::from_top_left(Vec2::ZERO, Vec2::new(100.0, 200.0));
        let hit = a.shrunk(Vec2::new(0.30, 0.45));
        assert_eq!(hit.center(), a.center());
        assert!((hit.size().x - 30.0).abs() < 1e-5);
        assert!((hit.size().y - 90.0).abs() < 1e-5);
    }

    #[test]
    fn test_contains() {
        let a = Aabb::from_center(Vec2::new(50.0, 50.0), Vec2::new(20.0, 20.0));
        assert!(a.contains(Vec2::new(50.0, 50.0)));
        assert!(a.contains(Vec2::new(40.0, 60.0)));
        assert!(!a.contains(Vec2::new(39.0, 50.0)));
    }
}
