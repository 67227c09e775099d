//! Drive pilots through stages
//!
//! Chara 0 is flown by the pilot under test; opponents are flown by baseline
//! pilots. Stages are independent, so a benchmark runs them in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::pilot::{Agent, GreedyPilot, Pilot};
use crate::report::{RunReport, StageRecord};
use crate::settings::PilotSettings;
use crate::sim::{Stage, StagePhase, tick};

/// Pilots available to the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PilotKind {
    Drift,
    Greedy,
}

impl PilotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PilotKind::Drift => "drift",
            PilotKind::Greedy => "greedy",
        }
    }

    /// Fresh pilot of this kind
    pub fn create(&self, settings: &PilotSettings) -> Box<dyn Agent> {
        match self {
            PilotKind::Drift => Box::new(Pilot::new(settings.clone())),
            PilotKind::Greedy => Box::new(GreedyPilot::new()),
        }
    }
}

/// Play one stage to the end (finish or turn limit)
pub fn run_stage(player: &mut dyn Agent, mut stage: Stage) -> StageRecord {
    let Some(start_charges) = stage.player().map(|p| p.accel_count) else {
        log::warn!("Stage {} has no player, skipped", stage.seed);
        return StageRecord {
            seed: stage.seed,
            turns: 0,
            finished: false,
            laps: 0,
            accel_used: 0,
        };
    };
    let mut opponents: Vec<GreedyPilot> = (1..stage.charas.len()).map(|_| GreedyPilot::new()).collect();

    player.init(&stage.snapshot_for(0));
    for (i, opponent) in opponents.iter_mut().enumerate() {
        opponent.init(&stage.snapshot_for(i + 1));
    }

    let mut actions = Vec::with_capacity(stage.charas.len());
    while !stage.is_over() {
        actions.clear();
        actions.push(player.next_action(&stage.snapshot_for(0)));
        for (i, opponent) in opponents.iter_mut().enumerate() {
            actions.push(opponent.next_action(&stage.snapshot_for(i + 1)));
        }
        tick(&mut stage, &actions);
    }

    let player_state = stage.charas[0];
    StageRecord {
        seed: stage.seed,
        turns: stage.turn,
        finished: stage.phase == StagePhase::Finished,
        laps: player_state.laps,
        accel_used: start_charges - player_state.accel_count,
    }
}

/// Run one pilot kind over generated stages, one per seed
pub fn run_benchmark(kind: PilotKind, settings: &PilotSettings, seeds: &[u64], turn_limit: u32) -> RunReport {
    let stages: Vec<StageRecord> = seeds
        .par_iter()
        .map(|&seed| {
            let mut stage = Stage::generate(seed);
            stage.turn_limit = turn_limit;
            let mut pilot = kind.create(settings);
            run_stage(pilot.as_mut(), stage)
        })
        .collect();

    let report = RunReport::new(kind.as_str(), stages);
    log::info!(
        "{}: {}/{} stages finished, {} turns total",
        kind.as_str(),
        report.finished_count(),
        report.stages.len(),
        report.total_turns()
    );
    report
}
