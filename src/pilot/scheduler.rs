//! Acceleration timing
//!
//! Two phases. `JustSwitched` is the first tick on a new target pad: a fresh
//! burst plan is estimated and a burst is spent right away unless drifting
//! already closes in well. `Coasting` is every other tick: spend a burst only
//! when coasting would miss the pad and either the planned interval has
//! elapsed or the chara has all but stopped.

use glam::Vec2;

use super::trajectory::{BurstPattern, coast_enters, intercept_ticks, is_getting_closer};
use crate::settings::PilotSettings;
use crate::sim::{Circle, Physics};

/// Scheduler phase for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Target pad changed since the previous tick (or first tick of a stage)
    JustSwitched,
    Coasting,
}

/// How the remaining approach to the current pad is meant to be flown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstPlan {
    /// Ticks between bursts
    pub interval: u32,
    /// Bursts left in this plan
    pub remaining: u32,
    /// Predicted ticks to reach the pad when the plan was made
    pub eta: Option<u32>,
}

impl BurstPlan {
    /// Plain policy: one burst at a time, re-burst after a full decay
    fn fallback(physics: &Physics) -> Self {
        Self {
            interval: physics.full_decay_ticks(),
            remaining: 1,
            eta: None,
        }
    }
}

/// Inputs to one scheduling decision
#[derive(Debug, Clone, Copy)]
pub struct Situation<'a> {
    pub body: Circle,
    pub vel: Vec2,
    pub flow: Vec2,
    pub physics: &'a Physics,
    /// Target pad region
    pub region: Circle,
    /// Point bursts are aimed at
    pub steer: Vec2,
    /// Charges the pilot may still spend
    pub charges: u32,
}

/// Per-stage scheduler state
#[derive(Debug, Clone)]
pub struct SchedulerState {
    last_target: Option<usize>,
    phase: Phase,
    plan: BurstPlan,
    ticks_since_accel: u32,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            last_target: None,
            phase: Phase::JustSwitched,
            plan: BurstPlan {
                interval: 1,
                remaining: 0,
                eta: None,
            },
            ticks_since_accel: 0,
        }
    }
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything (stage start)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn plan(&self) -> BurstPlan {
        self.plan
    }

    pub fn ticks_since_accel(&self) -> u32 {
        self.ticks_since_accel
    }

    /// Start a tick: pick the phase from the reported target index
    pub fn observe(&mut self, target_index: usize) -> Phase {
        let switched = self.last_target != Some(target_index);
        self.last_target = Some(target_index);
        self.ticks_since_accel = self.ticks_since_accel.saturating_add(1);
        self.phase = if switched {
            Phase::JustSwitched
        } else {
            Phase::Coasting
        };
        self.phase
    }

    /// Should a burst be spent this tick?
    pub fn wants_accel(&mut self, situation: &Situation, settings: &PilotSettings) -> bool {
        let physics = situation.physics;

        match self.phase {
            Phase::JustSwitched => {
                self.plan = estimate_plan(situation, settings.switch_reserve, settings.max_bursts);

                let closer = is_getting_closer(
                    &situation.body,
                    situation.vel,
                    situation.flow,
                    physics.decel_speed,
                    situation.steer,
                    &situation.region,
                    settings.closing_rate_threshold,
                    settings.drift_probe_ticks,
                );
                log::debug!(
                    "Switched target: closer={}, plan={:?}, charges={}",
                    closer,
                    self.plan,
                    situation.charges
                );

                !closer && situation.charges > settings.switch_reserve
            }
            Phase::Coasting => {
                if situation.charges <= settings.coast_reserve {
                    return false;
                }
                if coast_enters(
                    &situation.body,
                    situation.vel,
                    situation.flow,
                    physics.decel_speed,
                    &situation.region,
                ) {
                    return false;
                }

                let stalled = situation.vel.length() < physics.decel_speed;
                let due = self.ticks_since_accel >= self.plan.interval;
                if !(due || stalled) {
                    return false;
                }

                if self.plan.remaining == 0 {
                    self.plan = estimate_plan(situation, settings.coast_reserve, settings.max_bursts);
                    log::debug!("Plan spent, re-planned: {:?}", self.plan);
                }
                true
            }
        }
    }

    /// A burst was actually emitted this tick
    pub fn commit_accel(&mut self) {
        self.ticks_since_accel = 0;
        self.plan.remaining = self.plan.remaining.saturating_sub(1);
    }
}

/// Fewest bursts, spaced as widely as possible, that still reach the pad
fn estimate_plan(situation: &Situation, reserve: u32, max_bursts: u32) -> BurstPlan {
    let physics = situation.physics;
    let full = physics.full_decay_ticks();
    let budget = situation.charges.saturating_sub(reserve).min(max_bursts);

    for count in 1..=budget {
        // A single burst has no spacing to search
        let shortest = if count == 1 { full } else { 1 };
        for interval in (shortest..=full).rev() {
            let pattern = BurstPattern { count, interval };
            let horizon = count * interval + full;
            if let Some(eta) = intercept_ticks(
                &situation.body,
                situation.vel,
                situation.flow,
                physics,
                situation.steer,
                &situation.region,
                pattern,
                horizon,
            ) {
                return BurstPlan {
                    interval,
                    remaining: count,
                    eta: Some(eta),
                };
            }
        }
    }

    log::debug!("No pattern of up to {} bursts reaches the pad, using fallback", budget);
    BurstPlan::fallback(physics)
}
