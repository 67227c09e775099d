//! Drift Pilot - decision core for a drifting checkpoint racer
//!
//! Core modules:
//! - `pilot`: The agent itself (prediction, waypoints, accel timing, avoidance)
//! - `sim`: Reference stage engine the pilot is driven by (state, collision, tick)
//! - `runner`: Stage runner and multi-stage benchmark
//! - `report`: Per-stage turn records and run comparison
//! - `settings`: Data-driven pilot tuning

pub mod pilot;
pub mod report;
pub mod runner;
pub mod settings;
pub mod sim;

pub use pilot::{Action, Agent, GreedyPilot, Pilot};
pub use report::{Comparison, RunReport, StageRecord};
pub use settings::{PilotSettings, Preset};

use glam::Vec2;

/// Engine and stage configuration constants
pub mod consts {
    /// Speed set by one acceleration burst
    pub const CHARA_ACCEL_SPEED: f32 = 2.0;
    /// Speed lost every tick while coasting
    pub const CHARA_DECEL_SPEED: f32 = 0.04;
    /// Collision radius of every chara
    pub const CHARA_RADIUS: f32 = 1.0;

    /// Square field the generator places pads in
    pub const FIELD_SIZE: f32 = 200.0;
    /// Pad radius range
    pub const PAD_RADIUS_MIN: f32 = 2.0;
    pub const PAD_RADIUS_MAX: f32 = 6.0;
    /// Minimum spacing between generated pad centers
    pub const PAD_MIN_SPACING: f32 = 30.0;
    /// Pad count range per generated stage
    pub const PAD_COUNT_MIN: usize = 3;
    pub const PAD_COUNT_MAX: usize = 8;
    /// Upper bound on drift magnitude per tick
    pub const FLOW_MAX_SPEED: f32 = 0.2;
    /// Opponents per generated stage
    pub const OPPONENT_COUNT_MAX: usize = 3;

    /// Laps the player must complete to finish a stage
    pub const LAP_COUNT: u32 = 3;
    /// Multiplier on the straight-line burst count a stage grants
    pub const ACCEL_BUDGET_MARGIN: f32 = 2.0;
    /// Extra charges per pad per lap for corrections at corners
    pub const ACCEL_PER_PAD_LAP: u32 = 1;
    /// Turn limit before a stage is abandoned
    pub const TURN_LIMIT: u32 = 10_000;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
