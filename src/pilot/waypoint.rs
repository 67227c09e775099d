//! Aim-point table for the pad loop
//!
//! Pads are not aimed at through their centers. Each pad gets an aim point on
//! the inside of its corner, so the line through consecutive aim points cuts
//! the loop's curvature. Seeded from pad centers, then relaxed against the
//! neighbors' aim points for a fixed number of sweeps.

use glam::Vec2;

use super::kinematics::{advance, toward_target};
use crate::sim::{Circle, Pad, is_hit};
use crate::{cartesian_to_polar, polar_to_cartesian};

/// One aim point per pad, indexed by pad index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaypointTable {
    aims: Vec<Vec2>,
}

impl WaypointTable {
    /// Precompute aim points for a stage
    pub fn build(pads: &[Pad], chara_radius: f32, corner_factor: f32, relax_iterations: u32) -> Self {
        let n = pads.len();
        if n == 0 {
            return Self::default();
        }

        let offset = |pad: &Pad| pad.radius() + chara_radius * corner_factor;

        // Seed from raw pad centers
        let mut aims: Vec<Vec2> = (0..n)
            .map(|i| {
                let prev = pads[(i + n - 1) % n].pos();
                let next = pads[(i + 1) % n].pos();
                corner_aim(pads[i].pos(), offset(&pads[i]), prev, next)
            })
            .collect();

        // Gauss-Seidel sweeps: the previous neighbor is already updated
        for _ in 0..relax_iterations {
            for i in 0..n {
                let prev = aims[(i + n - 1) % n];
                let next = aims[(i + 1) % n];
                aims[i] = corner_aim(pads[i].pos(), offset(&pads[i]), prev, next);
            }
        }

        log::debug!("Built {} aim points ({} relax sweeps)", n, relax_iterations);
        Self { aims }
    }

    pub fn len(&self) -> usize {
        self.aims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aims.is_empty()
    }

    /// Aim point for a pad index, wrapping around the loop
    pub fn get(&self, index: usize) -> Option<Vec2> {
        if self.aims.is_empty() {
            return None;
        }
        Some(self.aims[index % self.aims.len()])
    }

    pub fn aims(&self) -> &[Vec2] {
        &self.aims
    }

    /// Aim point to steer at this tick.
    ///
    /// If a burst toward the *next* pad's aim point would already touch the
    /// current target pad, aim there instead so the corner is cut without
    /// detouring through the current pad's aim point.
    pub fn aim_for(
        &self,
        pads: &[Pad],
        target_index: usize,
        body: &Circle,
        accel_speed: f32,
        flow: Vec2,
    ) -> Option<Vec2> {
        let n = self.aims.len();
        if n == 0 || target_index >= n || pads.len() != n {
            return None;
        }

        let current = self.aims[target_index];
        if n > 1 {
            let next = self.aims[(target_index + 1) % n];
            if let Some(vel) = toward_target(body.center, next, accel_speed) {
                let destination = advance(body.center, vel, flow);
                if is_hit(&pads[target_index].region, body, destination) {
                    return Some(next);
                }
            }
        }
        Some(current)
    }
}

/// Point at `offset` from `center` along the bisector of the directions to
/// `prev` and `next`. A degenerate bisector resolves to angle zero.
fn corner_aim(center: Vec2, offset: f32, prev: Vec2, next: Vec2) -> Vec2 {
    let bisector = (prev - center).normalize_or_zero() + (next - center).normalize_or_zero();

    let angle = if bisector.length_squared() > 1e-8 {
        let (_, theta) = cartesian_to_polar(bisector);
        if theta.is_finite() { theta } else { 0.0 }
    } else {
        0.0
    };

    center + polar_to_cartesian(offset, angle)
}
