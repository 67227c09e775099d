//! Baseline pilot
//!
//! The simplest policy that finishes stages: burst straight at the pad center
//! (against the drift) whenever a short straight-line look-ahead misses the
//! pad and the chara has slowed to under half the burst speed. Kept as the
//! reference the drift pilot is benchmarked against.

use super::{Action, Agent};
use crate::sim::{StageSnapshot, is_hit};

/// Straight-at-the-pad pilot
#[derive(Debug, Clone)]
pub struct GreedyPilot {
    /// Ticks of straight-line extrapolation
    pub lookahead: u32,
    /// Burst again below this fraction of the burst speed
    pub slow_ratio: f32,
}

impl Default for GreedyPilot {
    fn default() -> Self {
        Self {
            lookahead: 5,
            slow_ratio: 0.5,
        }
    }
}

impl GreedyPilot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Agent for GreedyPilot {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn init(&mut self, stage: &StageSnapshot) {
        log::debug!("Greedy pilot: {} pads", stage.pads.len());
    }

    fn next_action(&mut self, stage: &StageSnapshot) -> Action {
        let Some(pad) = stage.target_pad() else {
            return Action::Wait;
        };
        let player = &stage.player;

        let ahead = player.pos + player.vel * self.lookahead as f32;
        let on_course = is_hit(&pad.region, &player.region(), ahead);
        let slow = player.vel.length() / stage.physics.accel_speed < self.slow_ratio;

        if player.accel_count > 0 && !on_course && slow {
            Action::Accel(pad.pos() - stage.flow)
        } else {
            Action::Wait
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Circle, Stage};
    use glam::Vec2;

    fn stage() -> Stage {
        Stage::new(
            0,
            &[Circle::new(Vec2::new(30.0, 0.0), 3.0)],
            Vec2::new(0.0, 0.1),
            &[Vec2::ZERO],
        )
    }

    #[test]
    fn test_bursts_at_pad_against_flow() {
        let stage = stage();
        let mut pilot = GreedyPilot::new();
        pilot.init(&stage.snapshot_for(0));

        let action = pilot.next_action(&stage.snapshot_for(0));
        assert_eq!(action, Action::Accel(Vec2::new(30.0, -0.1)));
    }

    #[test]
    fn test_waits_while_fast() {
        let mut stage = stage();
        stage.charas[0].vel = Vec2::new(0.0, 1.5);
        let mut pilot = GreedyPilot::new();

        assert_eq!(pilot.next_action(&stage.snapshot_for(0)), Action::Wait);
    }

    #[test]
    fn test_waits_without_charges() {
        let mut stage = stage();
        stage.charas[0].accel_count = 0;
        let mut pilot = GreedyPilot::new();

        assert_eq!(pilot.next_action(&stage.snapshot_for(0)), Action::Wait);
    }
}
