//! Reference engine tick
//!
//! Advances a stage by one turn with exactly the movement model the pilot
//! predicts: accel sets the velocity, coasting decays it, drift is added to
//! every position.

use super::collision::is_hit;
use super::state::{Chara, Stage, StagePhase};
use crate::pilot::Action;
use crate::pilot::kinematics::{advance, decay, toward_target};

/// Advance the stage by one turn. `actions[i]` drives chara `i`; missing
/// entries are treated as `Wait`.
pub fn tick(stage: &mut Stage, actions: &[Action]) {
    if stage.is_over() {
        return;
    }

    stage.turn += 1;
    let physics = stage.physics;
    let flow = stage.flow;
    let pad_count = stage.pads.len();

    for (i, chara) in stage.charas.iter_mut().enumerate() {
        let action = actions.get(i).copied().unwrap_or(Action::Wait);

        let burst = match action {
            Action::Accel(target) if chara.accel_count > 0 => {
                toward_target(chara.pos, target, physics.accel_speed)
            }
            _ => None,
        };
        chara.vel = match burst {
            Some(vel) => {
                chara.accel_count -= 1;
                vel
            }
            None => decay(chara.vel, physics.decel_speed),
        };

        let destination = advance(chara.pos, chara.vel, flow);

        if pad_count > 0 {
            let pad = &stage.pads[chara.target_index % pad_count];
            if is_hit(&pad.region, &chara.region(), destination) {
                chara.target_index = (chara.target_index + 1) % pad_count;
                if chara.target_index == 0 {
                    chara.laps += 1;
                }
            }
        }

        chara.pos = destination;
    }

    resolve_contacts(&mut stage.charas);

    let Some(&player) = stage.charas.first() else {
        return;
    };
    if player.laps >= stage.laps_required {
        stage.phase = StagePhase::Finished;
        log::info!("Stage {} finished in {} turns", stage.seed, stage.turn);
    } else if stage.turn >= stage.turn_limit {
        stage.phase = StagePhase::TimedOut;
        log::info!(
            "Stage {} timed out at turn {} (lap {}, pad {})",
            stage.seed,
            stage.turn,
            player.laps,
            player.target_index
        );
    }
}

/// Touching charas that are still closing exchange velocities
fn resolve_contacts(charas: &mut [Chara]) {
    for i in 0..charas.len() {
        for j in (i + 1)..charas.len() {
            let (a, b) = (charas[i], charas[j]);
            if !a.region().overlaps(&b.region()) {
                continue;
            }
            if (a.vel - b.vel).dot(b.pos - a.pos) > 0.0 {
                charas[i].vel = b.vel;
                charas[j].vel = a.vel;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Circle;
    use glam::Vec2;

    fn line_stage() -> Stage {
        Stage::new(
            0,
            &[
                Circle::new(Vec2::new(10.0, 0.0), 2.0),
                Circle::new(Vec2::new(40.0, 0.0), 2.0),
            ],
            Vec2::ZERO,
            &[Vec2::ZERO],
        )
    }

    #[test]
    fn test_accel_consumes_charge_and_sets_speed() {
        let mut stage = line_stage();
        let before = stage.player().unwrap().accel_count;

        tick(&mut stage, &[Action::Accel(Vec2::new(10.0, 0.0))]);

        assert_eq!(stage.player().unwrap().accel_count, before - 1);
        assert!((stage.player().unwrap().vel.length() - stage.physics.accel_speed).abs() < 1e-5);
        assert!((stage.player().unwrap().pos.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_accel_without_charges_coasts() {
        let mut stage = line_stage();
        stage.charas[0].accel_count = 0;
        stage.charas[0].vel = Vec2::new(1.0, 0.0);

        tick(&mut stage, &[Action::Accel(Vec2::new(0.0, 50.0))]);

        assert_eq!(stage.player().unwrap().accel_count, 0);
        assert!((stage.player().unwrap().vel.x - 0.96).abs() < 1e-5);
        assert_eq!(stage.player().unwrap().vel.y, 0.0);
    }

    #[test]
    fn test_pad_arrival_advances_target_and_counts_laps() {
        let mut stage = line_stage();
        stage.laps_required = 10;

        // Teleport next to pad 0 and step onto it
        stage.charas[0].pos = Vec2::new(6.5, 0.0);
        tick(&mut stage, &[Action::Accel(Vec2::new(10.0, 0.0))]);
        assert_eq!(stage.player().unwrap().target_index, 1);
        assert_eq!(stage.player().unwrap().laps, 0);

        stage.charas[0].pos = Vec2::new(36.5, 0.0);
        stage.charas[0].vel = Vec2::ZERO;
        tick(&mut stage, &[Action::Accel(Vec2::new(40.0, 0.0))]);
        assert_eq!(stage.player().unwrap().target_index, 0);
        assert_eq!(stage.player().unwrap().laps, 1);
    }

    #[test]
    fn test_stage_finishes_after_required_laps() {
        let mut stage = line_stage();
        stage.laps_required = 1;
        stage.charas[0].target_index = 1;
        stage.charas[0].pos = Vec2::new(37.0, 0.0);

        tick(&mut stage, &[Action::Wait]);

        assert_eq!(stage.phase, StagePhase::Finished);
        let turn = stage.turn;
        tick(&mut stage, &[Action::Wait]);
        assert_eq!(stage.turn, turn);
    }

    #[test]
    fn test_turn_limit_times_out() {
        let mut stage = line_stage();
        stage.turn_limit = 3;

        for _ in 0..5 {
            tick(&mut stage, &[]);
        }

        assert_eq!(stage.phase, StagePhase::TimedOut);
        assert_eq!(stage.turn, 3);
    }

    #[test]
    fn test_stage_without_charas_does_not_advance() {
        let mut stage = Stage::new(0, &[Circle::new(Vec2::new(10.0, 0.0), 2.0)], Vec2::ZERO, &[]);

        tick(&mut stage, &[Action::Accel(Vec2::new(10.0, 0.0))]);

        assert_eq!(stage.turn, 0);
        assert!(stage.charas.is_empty());
    }

    #[test]
    fn test_closing_contact_exchanges_velocities() {
        let mut charas = [
            Chara::new(Vec2::ZERO, 0),
            Chara::new(Vec2::new(1.5, 0.0), 0),
        ];
        charas[0].vel = Vec2::new(1.0, 0.0);
        charas[1].vel = Vec2::new(-0.5, 0.0);

        resolve_contacts(&mut charas);

        assert_eq!(charas[0].vel, Vec2::new(-0.5, 0.0));
        assert_eq!(charas[1].vel, Vec2::new(1.0, 0.0));

        // Now separating: no further exchange
        resolve_contacts(&mut charas);
        assert_eq!(charas[0].vel, Vec2::new(-0.5, 0.0));
    }
}
