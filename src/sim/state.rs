//! Stage state and the per-agent snapshot handed to pilots
//!
//! The engine owns a `Stage`. Each tick it hands every chara a read-only
//! `StageSnapshot` seen from that chara's point of view.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use crate::consts::*;
use crate::polar_to_cartesian;

/// Engine movement parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    /// Speed set by one acceleration burst (A)
    pub accel_speed: f32,
    /// Speed lost per coasting tick (D)
    pub decel_speed: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            accel_speed: CHARA_ACCEL_SPEED,
            decel_speed: CHARA_DECEL_SPEED,
        }
    }
}

impl Physics {
    /// Ticks for one burst to decay to a standstill, at least 1
    pub fn full_decay_ticks(&self) -> u32 {
        if self.decel_speed <= 0.0 {
            return 1;
        }
        ((self.accel_speed / self.decel_speed).ceil() as u32).max(1)
    }

    /// Distance one burst from rest covers before it decays to a standstill
    pub fn coast_distance(&self) -> f32 {
        let mut speed = self.accel_speed;
        let mut distance = 0.0;
        for _ in 0..self.full_decay_ticks() {
            distance += speed;
            speed = (speed - self.decel_speed).max(0.0);
        }
        distance
    }
}

/// A checkpoint pad
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    /// Position in the loop, 0..N-1
    pub index: usize,
    pub region: Circle,
}

impl Pad {
    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.region.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.region.radius
    }
}

/// A racing chara (the player, or an opponent from the engine's view)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chara {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Index of the pad currently being targeted
    pub target_index: usize,
    /// Completed laps
    pub laps: u32,
    /// Remaining acceleration charges
    pub accel_count: u32,
}

impl Chara {
    pub fn new(pos: Vec2, accel_count: u32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: CHARA_RADIUS,
            target_index: 0,
            laps: 0,
            accel_count,
        }
    }

    #[inline]
    pub fn region(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }
}

/// Another chara as seen by a pilot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OtherChara {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl OtherChara {
    #[inline]
    pub fn region(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }
}

impl From<&Chara> for OtherChara {
    fn from(chara: &Chara) -> Self {
        Self {
            pos: chara.pos,
            vel: chara.vel,
            radius: chara.radius,
        }
    }
}

/// Everything a pilot may read on one tick
#[derive(Debug, Clone)]
pub struct StageSnapshot<'a> {
    pub turn: u32,
    pub pads: &'a [Pad],
    pub player: Chara,
    pub others: Vec<OtherChara>,
    /// Drift added to every position each tick
    pub flow: Vec2,
    pub physics: Physics,
}

impl StageSnapshot<'_> {
    /// The pad the player is currently heading for, if the index is valid
    pub fn target_pad(&self) -> Option<&Pad> {
        self.pads.get(self.player.target_index)
    }
}

/// Where a stage is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagePhase {
    Running,
    /// The player completed all laps
    Finished,
    /// Turn limit reached first
    TimedOut,
}

/// Complete engine-side stage state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    /// Generator seed (0 for hand-built stages)
    pub seed: u64,
    pub turn: u32,
    pub pads: Vec<Pad>,
    /// Chara 0 is the player, the rest are opponents
    pub charas: Vec<Chara>,
    pub flow: Vec2,
    pub physics: Physics,
    pub laps_required: u32,
    pub turn_limit: u32,
    pub phase: StagePhase,
}

impl Stage {
    /// Build a stage from pad regions (loop order) and chara start positions.
    /// The first start is the player; with no starts the stage is over at once.
    pub fn new(seed: u64, regions: &[Circle], flow: Vec2, starts: &[Vec2]) -> Self {
        let pads: Vec<Pad> = regions
            .iter()
            .enumerate()
            .map(|(index, region)| Pad {
                index,
                region: *region,
            })
            .collect();
        let physics = Physics::default();
        let accel_count = accel_budget(&pads, &physics, LAP_COUNT);
        let charas: Vec<Chara> = starts
            .iter()
            .map(|&pos| Chara::new(pos, accel_count))
            .collect();
        if charas.is_empty() {
            log::warn!("Stage {} has no charas, nothing to run", seed);
        }

        Self {
            seed,
            turn: 0,
            pads,
            charas,
            flow,
            physics,
            laps_required: LAP_COUNT,
            turn_limit: TURN_LIMIT,
            phase: StagePhase::Running,
        }
    }

    /// Generate a reproducible stage from a seed
    pub fn generate(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let pad_count = rng.random_range(PAD_COUNT_MIN..=PAD_COUNT_MAX);
        let margin = PAD_RADIUS_MAX * 2.0;
        let mut regions: Vec<Circle> = Vec::with_capacity(pad_count);
        for _ in 0..pad_count {
            let radius = rng.random_range(PAD_RADIUS_MIN..=PAD_RADIUS_MAX);
            // Bounded retries; a crowded last candidate is kept as-is
            let mut center = Vec2::ZERO;
            for _ in 0..32 {
                center = Vec2::new(
                    rng.random_range(margin..FIELD_SIZE - margin),
                    rng.random_range(margin..FIELD_SIZE - margin),
                );
                if regions
                    .iter()
                    .all(|r| r.center.distance(center) >= PAD_MIN_SPACING)
                {
                    break;
                }
            }
            regions.push(Circle::new(center, radius));
        }

        let flow_angle = rng.random_range(0.0..std::f32::consts::TAU);
        let flow_speed = rng.random_range(0.0..=FLOW_MAX_SPEED);
        let flow = polar_to_cartesian(flow_speed, flow_angle);

        // Line up behind the last pad, facing pad 0
        let first = regions[0];
        let last = regions[pad_count - 1];
        let away = (last.center - first.center).try_normalize().unwrap_or(Vec2::X);
        let side = away.perp();
        let origin = last.center + away * (last.radius + CHARA_RADIUS * 4.0);

        let chara_count = 1 + rng.random_range(0..=OPPONENT_COUNT_MAX);
        let starts: Vec<Vec2> = (0..chara_count)
            .map(|i| origin + side * (i as f32 * CHARA_RADIUS * 3.0))
            .collect();

        log::info!(
            "Stage {}: pads={}, flow=({:.3}, {:.3}), charas={}",
            seed,
            pad_count,
            flow.x,
            flow.y,
            chara_count
        );

        Self::new(seed, &regions, flow, &starts)
    }

    /// The controlled chara, `None` for a stage built without charas
    pub fn player(&self) -> Option<&Chara> {
        self.charas.first()
    }

    /// Snapshot of the stage as seen by chara `index` (`index < charas.len()`)
    pub fn snapshot_for(&self, index: usize) -> StageSnapshot<'_> {
        let others = self
            .charas
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, c)| OtherChara::from(c))
            .collect();

        StageSnapshot {
            turn: self.turn,
            pads: &self.pads,
            player: self.charas[index],
            others,
            flow: self.flow,
            physics: self.physics,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase != StagePhase::Running || self.charas.is_empty()
    }
}

/// Charges granted to every chara of a stage: the straight-line burst count
/// for all laps times a margin, plus corrections at every pad
pub fn accel_budget(pads: &[Pad], physics: &Physics, laps: u32) -> u32 {
    let lap_length: f32 = pads
        .iter()
        .zip(pads.iter().cycle().skip(1))
        .map(|(a, b)| a.pos().distance(b.pos()))
        .sum();
    let reach = physics.coast_distance().max(f32::EPSILON);
    let legs = (laps as f32 * lap_length / reach).ceil();

    (legs * ACCEL_BUDGET_MARGIN).ceil() as u32 + pads.len() as u32 * laps * ACCEL_PER_PAD_LAP
}
