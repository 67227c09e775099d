//! Forward prediction under the decay + drift model
//!
//! All loops here are bounded: coasting by `speed / decel`, burst patterns by
//! an explicit horizon, drift probes by a tick count.

use glam::Vec2;

use super::kinematics::{advance, decay, toward_target};
use crate::sim::{Circle, Physics, is_hit};

/// End state of a coast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coast {
    pub position: Vec2,
    /// Zero unless `decel` was not positive
    pub velocity: Vec2,
    pub ticks: u32,
}

/// Bursts spent `interval` ticks apart, first one on tick 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstPattern {
    pub count: u32,
    pub interval: u32,
}

/// Coast without input until the velocity is exactly zero.
///
/// Takes at most `ceil(|vel| / decel) + 1` steps. A non-positive `decel`
/// would never stop, so the state is returned untouched.
pub fn coast_to_rest(pos: Vec2, vel: Vec2, flow: Vec2, decel: f32) -> Coast {
    if decel <= 0.0 {
        return Coast {
            position: pos,
            velocity: vel,
            ticks: 0,
        };
    }

    let bound = (vel.length() / decel).ceil() as u32 + 1;
    let mut pos = pos;
    let mut vel = vel;
    let mut ticks = 0;
    while vel != Vec2::ZERO && ticks < bound {
        vel = decay(vel, decel);
        pos = advance(pos, vel, flow);
        ticks += 1;
    }

    Coast {
        position: pos,
        velocity: vel,
        ticks,
    }
}

/// Would coasting from here touch `region` at any point before stopping?
pub fn coast_enters(body: &Circle, vel: Vec2, flow: Vec2, decel: f32, region: &Circle) -> bool {
    if vel == Vec2::ZERO || decel <= 0.0 {
        return region.overlaps(body);
    }

    let bound = (vel.length() / decel).ceil() as u32 + 1;
    let mut pos = body.center;
    let mut vel = vel;
    for _ in 0..bound {
        vel = decay(vel, decel);
        let next = advance(pos, vel, flow);
        if is_hit(region, &body.moved_to(pos), next) {
            return true;
        }
        pos = next;
        if vel == Vec2::ZERO {
            break;
        }
    }
    false
}

/// First tick on which `region` is touched when spending `pattern` toward
/// `steer`, re-aiming from the predicted position at every burst.
pub fn intercept_ticks(
    body: &Circle,
    vel: Vec2,
    flow: Vec2,
    physics: &Physics,
    steer: Vec2,
    region: &Circle,
    pattern: BurstPattern,
    horizon: u32,
) -> Option<u32> {
    let interval = pattern.interval.max(1);
    let mut bursts_left = pattern.count;
    let mut pos = body.center;
    let mut vel = vel;

    for t in 0..horizon {
        let burst = if bursts_left > 0 && t % interval == 0 {
            toward_target(pos, steer, physics.accel_speed)
        } else {
            None
        };
        vel = match burst {
            Some(burst) => {
                bursts_left -= 1;
                burst
            }
            None => decay(vel, physics.decel_speed),
        };

        let next = advance(pos, vel, flow);
        if is_hit(region, &body.moved_to(pos), next) {
            return Some(t + 1);
        }
        pos = next;

        if bursts_left == 0 && vel == Vec2::ZERO && flow == Vec2::ZERO {
            break;
        }
    }
    None
}

/// Does one burst toward `aim` followed by coasting touch `region` within
/// `frames` ticks?
pub fn will_reach_under_accel(
    aim: Vec2,
    frames: u32,
    body: &Circle,
    vel: Vec2,
    flow: Vec2,
    physics: &Physics,
    region: &Circle,
) -> bool {
    let single = BurstPattern {
        count: 1,
        interval: frames.max(1),
    };
    intercept_ticks(body, vel, flow, physics, aim, region, single, frames).is_some()
}

/// Is passive motion closing on `target` fast enough?
///
/// Moving: the distance gained over one coasting tick, per unit of current
/// speed, must exceed `threshold`. Standing still: drifting alone must touch
/// `region` within `probe_ticks`.
pub fn is_getting_closer(
    body: &Circle,
    vel: Vec2,
    flow: Vec2,
    decel: f32,
    target: Vec2,
    region: &Circle,
    threshold: f32,
    probe_ticks: u32,
) -> bool {
    let speed = vel.length();

    if speed == 0.0 {
        let mut pos = body.center;
        for _ in 0..probe_ticks {
            let next = pos + flow;
            if is_hit(region, &body.moved_to(pos), next) {
                return true;
            }
            pos = next;
        }
        return false;
    }

    let now = body.center.distance(target);
    let later = advance(body.center, decay(vel, decel), flow).distance(target);
    (now - later) / speed > threshold
}
