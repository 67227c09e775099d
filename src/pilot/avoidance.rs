//! Contact veto against other charas
//!
//! Other charas are extrapolated one tick along their current velocity (plus
//! drift); no acceleration is assumed for them. The veto only ever turns a
//! burst into a wait, it never steers around anyone.

use glam::Vec2;

use super::kinematics::advance;
use crate::sim::{Circle, OtherChara, is_hit};

/// Where `other` will be next tick if it does nothing
pub fn predicted_region(other: &OtherChara, flow: Vec2) -> Circle {
    other.region().moved_to(advance(other.pos, other.vel, flow))
}

/// Would sweeping `player` to `destination` touch any extrapolated chara?
pub fn vetoes(player: &Circle, destination: Vec2, others: &[OtherChara], flow: Vec2) -> bool {
    others
        .iter()
        .any(|other| is_hit(&predicted_region(other, flow), player, destination))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn other(x: f32, y: f32, vx: f32, vy: f32) -> OtherChara {
        OtherChara {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
            radius: 1.0,
        }
    }

    #[test]
    fn test_crossing_path_is_vetoed() {
        let player = Circle::new(Vec2::ZERO, 1.0);
        // Will be at (1.5, 0.0) next tick, right on the burst line
        let crossing = other(1.5, 3.0, 0.0, -3.0);

        assert!(vetoes(&player, Vec2::new(2.0, 0.0), &[crossing], Vec2::ZERO));
    }

    #[test]
    fn test_current_position_alone_does_not_veto() {
        let player = Circle::new(Vec2::ZERO, 1.0);
        // In the way now, but moving clear of the line
        let leaving = other(1.5, 0.0, 0.0, 5.0);

        assert!(!vetoes(&player, Vec2::new(2.0, 0.0), &[leaving], Vec2::ZERO));
    }

    #[test]
    fn test_flow_moves_others_too() {
        let player = Circle::new(Vec2::ZERO, 1.0);
        let parked = other(2.0, 4.0, 0.0, 0.0);

        assert!(!vetoes(&player, Vec2::new(2.0, 0.0), &[parked], Vec2::ZERO));
        assert!(vetoes(&player, Vec2::new(2.0, 0.0), &[parked], Vec2::new(0.0, -2.5)));
    }

    #[test]
    fn test_no_others_never_vetoes() {
        let player = Circle::new(Vec2::ZERO, 1.0);
        assert!(!vetoes(&player, Vec2::new(2.0, 0.0), &[], Vec2::ZERO));
    }

    proptest! {
        #[test]
        fn adding_a_chara_never_lifts_a_veto(
            others in prop::collection::vec(
                (-10.0f32..10.0, -10.0f32..10.0, -3.0f32..3.0, -3.0f32..3.0), 0..5),
            extra in (-10.0f32..10.0, -10.0f32..10.0, -3.0f32..3.0, -3.0f32..3.0),
        ) {
            let player = Circle::new(Vec2::ZERO, 1.0);
            let destination = Vec2::new(2.0, 0.0);
            let mut field: Vec<OtherChara> =
                others.iter().map(|&(x, y, vx, vy)| other(x, y, vx, vy)).collect();

            let before = vetoes(&player, destination, &field, Vec2::ZERO);
            field.push(other(extra.0, extra.1, extra.2, extra.3));
            let after = vetoes(&player, destination, &field, Vec2::ZERO);

            prop_assert!(!before || after);
        }
    }
}
