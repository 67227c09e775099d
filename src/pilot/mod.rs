//! The pilot: one decision per tick
//!
//! Leaf-first:
//! - `kinematics`: one tick of drag, burst and drift
//! - `trajectory`: coasting and burst-pattern prediction
//! - `waypoint`: per-stage aim-point table
//! - `scheduler`: when to spend a burst
//! - `avoidance`: veto bursts that run into other charas
//!
//! `Pilot` composes them. All state is per stage and owned by the pilot, so
//! any number of pilots can run side by side.

pub mod avoidance;
pub mod baseline;
pub mod kinematics;
pub mod scheduler;
pub mod trajectory;
pub mod waypoint;

pub use baseline::GreedyPilot;
pub use scheduler::{BurstPlan, Phase, SchedulerState};
pub use waypoint::WaypointTable;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::PilotSettings;
use crate::sim::StageSnapshot;
use kinematics::{advance, toward_target};
use scheduler::Situation;

/// What a chara does on one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Coast
    Wait,
    /// Spend one charge, bursting toward this world position
    Accel(Vec2),
}

impl Action {
    pub fn is_accel(&self) -> bool {
        matches!(self, Action::Accel(_))
    }
}

/// Anything the engine can ask for actions
pub trait Agent {
    fn name(&self) -> &'static str;
    /// Called once at stage start
    fn init(&mut self, stage: &StageSnapshot);
    /// Called once per tick; exactly one action
    fn next_action(&mut self, stage: &StageSnapshot) -> Action;
}

/// Drift pilot: waypoints + burst scheduling + contact veto
#[derive(Debug, Clone)]
pub struct Pilot {
    settings: PilotSettings,
    waypoints: WaypointTable,
    scheduler: SchedulerState,
    /// Charges this pilot believes it has; `None` before `init`
    charges: Option<u32>,
}

impl Default for Pilot {
    fn default() -> Self {
        Self::new(PilotSettings::default())
    }
}

impl Pilot {
    pub fn new(settings: PilotSettings) -> Self {
        Self {
            settings,
            waypoints: WaypointTable::default(),
            scheduler: SchedulerState::new(),
            charges: None,
        }
    }

    pub fn settings(&self) -> &PilotSettings {
        &self.settings
    }

    pub fn waypoints(&self) -> &WaypointTable {
        &self.waypoints
    }

    pub fn scheduler(&self) -> &SchedulerState {
        &self.scheduler
    }

    /// Tracked charge budget (0 before `init`)
    pub fn charges(&self) -> u32 {
        self.charges.unwrap_or(0)
    }

    /// Point bursts are aimed at for a given aim point
    fn steer_point(&self, aim: Vec2, flow: Vec2) -> Vec2 {
        if self.settings.compensate_flow {
            aim - flow
        } else {
            aim
        }
    }
}

impl Agent for Pilot {
    fn name(&self) -> &'static str {
        "drift"
    }

    fn init(&mut self, stage: &StageSnapshot) {
        self.waypoints = WaypointTable::build(
            stage.pads,
            stage.player.radius,
            self.settings.corner_factor,
            self.settings.relax_iterations,
        );
        self.scheduler.reset();
        self.charges = Some(stage.player.accel_count);

        log::info!(
            "Pilot init: {} pads, {} charges, {} preset",
            stage.pads.len(),
            stage.player.accel_count,
            self.settings.preset.as_str()
        );
    }

    fn next_action(&mut self, stage: &StageSnapshot) -> Action {
        if self.charges.is_none() || self.waypoints.len() != stage.pads.len() {
            log::warn!("Pilot not initialised for this stage, initialising now");
            self.init(stage);
        }

        let player = &stage.player;
        let physics = &stage.physics;

        // Never more than the engine reports, never incremented
        let charges = match self.charges {
            Some(tracked) => tracked.min(player.accel_count),
            None => player.accel_count,
        };
        self.charges = Some(charges);

        self.scheduler.observe(player.target_index);

        let Some(pad) = stage.target_pad() else {
            log::warn!(
                "Target pad {} out of range ({} pads)",
                player.target_index,
                stage.pads.len()
            );
            return Action::Wait;
        };

        let body = player.region();
        let Some(aim) = self.waypoints.aim_for(
            stage.pads,
            player.target_index,
            &body,
            physics.accel_speed,
            stage.flow,
        ) else {
            return Action::Wait;
        };
        let steer = self.steer_point(aim, stage.flow);

        let situation = Situation {
            body,
            vel: player.vel,
            flow: stage.flow,
            physics,
            region: pad.region,
            steer,
            charges,
        };
        if !self.scheduler.wants_accel(&situation, &self.settings) {
            return Action::Wait;
        }

        let Some(burst) = toward_target(player.pos, steer, physics.accel_speed) else {
            log::debug!("Turn {}: already on the steer point", stage.turn);
            return Action::Wait;
        };

        if self.settings.avoidance {
            let destination = advance(player.pos, burst, stage.flow);
            if avoidance::vetoes(&body, destination, &stage.others, stage.flow) {
                log::debug!("Turn {}: burst vetoed, chara in the way", stage.turn);
                return Action::Wait;
            }
        }

        if charges == 0 {
            return Action::Wait;
        }

        self.charges = Some(charges - 1);
        self.scheduler.commit_accel();
        log::debug!(
            "Turn {}: burst toward pad {} ({} charges left)",
            stage.turn,
            player.target_index,
            charges - 1
        );
        Action::Accel(steer)
    }
}
