//! Circle regions and the swept hit predicate
//!
//! Everything in a stage is a circle: pads, the player, opponents. The engine
//! answers one question for all of them: does a circle moving in a straight
//! line toward a destination touch a static circle on the way?

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A circular region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Same radius, different center
    #[inline]
    pub fn moved_to(&self, center: Vec2) -> Self {
        Self {
            center,
            radius: self.radius,
        }
    }

    /// Check if two circles overlap (touching counts)
    #[inline]
    pub fn overlaps(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach
    }
}

/// Closest point to `point` on the segment `start..end`
pub fn closest_point_on_segment(point: Vec2, start: Vec2, end: Vec2) -> Vec2 {
    let line_vec = end - start;
    let line_len_sq = line_vec.length_squared();

    if line_len_sq < 1e-12 {
        return start; // Degenerate segment
    }

    let t = ((point - start).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    start + line_vec * t
}

/// Check whether `moving`, swept in a straight line from its center to
/// `destination`, touches `region`.
///
/// Continuous test: the minimum distance between `region.center` and the
/// swept segment is compared against the sum of radii. A zero-length sweep
/// degrades to a plain overlap test.
pub fn is_hit(region: &Circle, moving: &Circle, destination: Vec2) -> bool {
    let closest = closest_point_on_segment(region.center, moving.center, destination);
    let reach = region.radius + moving.radius;
    region.center.distance_squared(closest) <= reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_at_destination() {
        let pad = Circle::new(Vec2::new(10.0, 0.0), 2.0);
        let chara = Circle::new(Vec2::ZERO, 1.0);

        assert!(is_hit(&pad, &chara, Vec2::new(8.0, 0.0)));
        assert!(!is_hit(&pad, &chara, Vec2::new(6.0, 0.0)));
    }

    #[test]
    fn test_hit_is_swept_not_endpoint_only() {
        // Passes straight through the pad and comes out the far side
        let pad = Circle::new(Vec2::new(10.0, 0.0), 2.0);
        let chara = Circle::new(Vec2::ZERO, 1.0);

        assert!(is_hit(&pad, &chara, Vec2::new(20.0, 0.0)));
    }

    #[test]
    fn test_near_miss_sideways() {
        let pad = Circle::new(Vec2::new(10.0, 5.0), 2.0);
        let chara = Circle::new(Vec2::ZERO, 1.0);

        // Closest approach is 5.0 > 3.0
        assert!(!is_hit(&pad, &chara, Vec2::new(20.0, 0.0)));
    }

    #[test]
    fn test_zero_length_sweep_is_overlap() {
        let pad = Circle::new(Vec2::new(2.5, 0.0), 2.0);
        let chara = Circle::new(Vec2::ZERO, 1.0);

        assert!(is_hit(&pad, &chara, Vec2::ZERO));
        assert!(chara.overlaps(&pad));

        let far = Circle::new(Vec2::new(3.5, 0.0), 2.0);
        assert!(!is_hit(&far, &chara, Vec2::ZERO));
    }

    #[test]
    fn test_closest_point_clamps_to_segment() {
        let start = Vec2::ZERO;
        let end = Vec2::new(10.0, 0.0);

        assert_eq!(closest_point_on_segment(Vec2::new(-5.0, 3.0), start, end), start);
        assert_eq!(closest_point_on_segment(Vec2::new(15.0, 3.0), start, end), end);
        assert_eq!(
            closest_point_on_segment(Vec2::new(4.0, 3.0), start, end),
            Vec2::new(4.0, 0.0)
        );
    }
}
