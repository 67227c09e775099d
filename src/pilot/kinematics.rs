//! One tick of motion: drag, burst direction, integration

use glam::Vec2;

/// Velocity after one tick of passive drag.
///
/// Magnitude drops by `decel`, clamped at zero; direction never flips.
#[inline]
pub fn decay(vel: Vec2, decel: f32) -> Vec2 {
    let speed = vel.length();
    if speed <= decel {
        return Vec2::ZERO;
    }
    vel * ((speed - decel) / speed)
}

/// Burst velocity from `pos` toward `target` at magnitude `speed`.
///
/// `None` when the two points coincide (no direction).
#[inline]
pub fn toward_target(pos: Vec2, target: Vec2, speed: f32) -> Option<Vec2> {
    (target - pos).try_normalize().map(|dir| dir * speed)
}

/// Position after one tick with an already-decided velocity
#[inline]
pub fn advance(pos: Vec2, vel: Vec2, flow: Vec2) -> Vec2 {
    pos + vel + flow
}
