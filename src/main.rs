//! Drift Pilot entry point
//!
//! Runs pilots over generated stages, compares saved runs, writes settings.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};

use drift_pilot::consts::TURN_LIMIT;
use drift_pilot::runner::{PilotKind, run_benchmark};
use drift_pilot::{Comparison, PilotSettings, Preset, RunReport};

#[derive(Parser, Debug)]
#[command(name = "drift-pilot")]
#[command(about = "Checkpoint racing pilot: stage runs, benchmarks and run comparison")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fly a pilot through generated stages and report turns per stage
    Run {
        #[arg(long, value_enum, default_value_t = CliPilot::Drift)]
        pilot: CliPilot,
        /// First stage seed
        #[arg(long, default_value_t = 1)]
        seed_start: u64,
        /// Number of stages (consecutive seeds)
        #[arg(long, default_value_t = 20)]
        stages: u64,
        #[arg(long, default_value_t = TURN_LIMIT)]
        turn_limit: u32,
        /// Settings JSON (defaults when omitted)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Preset applied on top of the settings
        #[arg(long)]
        preset: Option<String>,
        /// Write the run report here
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compare two saved run reports stage by stage
    Compare {
        baseline: PathBuf,
        candidate: PathBuf,
    },
    /// Write a settings file for a preset
    Settings {
        #[arg(long, default_value = "balanced")]
        preset: String,
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliPilot {
    Drift,
    Greedy,
}

impl From<CliPilot> for PilotKind {
    fn from(value: CliPilot) -> Self {
        match value {
            CliPilot::Drift => PilotKind::Drift,
            CliPilot::Greedy => PilotKind::Greedy,
        }
    }
}

fn parse_preset(name: &str) -> Result<Preset> {
    Preset::from_str(name).ok_or_else(|| anyhow!("unknown preset '{name}'"))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            pilot,
            seed_start,
            stages,
            turn_limit,
            settings,
            preset,
            output,
        } => {
            let mut pilot_settings = match settings {
                Some(path) => PilotSettings::load(&path)?,
                None => PilotSettings::default(),
            };
            if let Some(name) = preset {
                pilot_settings.apply_preset(parse_preset(&name)?);
            }

            let seeds: Vec<u64> = (seed_start..seed_start + stages).collect();
            let report = run_benchmark(pilot.into(), &pilot_settings, &seeds, turn_limit);

            for stage in &report.stages {
                println!(
                    "{:>12} {:>8} {:>5} laps={} accel={}",
                    stage.seed,
                    stage.turns,
                    if stage.finished { "ok" } else { "TIME" },
                    stage.laps,
                    stage.accel_used
                );
            }
            println!(
                "{}: {}/{} finished, {} turns",
                report.pilot,
                report.finished_count(),
                report.stages.len(),
                report.total_turns()
            );

            if let Some(path) = output {
                report.save(&path)?;
            }
        }
        Commands::Compare {
            baseline,
            candidate,
        } => {
            let baseline = RunReport::load(&baseline)?;
            let candidate = RunReport::load(&candidate)?;
            let comparison = Comparison::new(&baseline, &candidate);
            println!("{comparison}");
            println!("regressions: {}", comparison.regressions());
        }
        Commands::Settings { preset, output } => {
            let settings = PilotSettings::from_preset(parse_preset(&preset)?);
            settings.save(&output)?;
        }
    }

    Ok(())
}
