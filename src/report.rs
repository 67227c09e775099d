//! Run reports and stage-by-stage comparison
//!
//! A run is a list of per-stage results for one pilot. Two runs over the same
//! seeds line up row by row; fewer turns is better.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Result of one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    /// Stage generator seed
    pub seed: u64,
    /// Turns taken (the turn limit when not finished)
    pub turns: u32,
    /// All laps completed before the turn limit
    pub finished: bool,
    /// Laps completed
    pub laps: u32,
    /// Charges spent
    pub accel_used: u32,
}

/// All stage results of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Pilot that produced the run
    pub pilot: String,
    pub stages: Vec<StageRecord>,
}

impl RunReport {
    pub fn new(pilot: &str, stages: Vec<StageRecord>) -> Self {
        Self {
            pilot: pilot.to_string(),
            stages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Sum of turns over all stages
    pub fn total_turns(&self) -> u64 {
        self.stages.iter().map(|s| s.turns as u64).sum()
    }

    pub fn finished_count(&self) -> usize {
        self.stages.iter().filter(|s| s.finished).count()
    }

    /// Load a report from JSON
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read report {}", path.display()))?;
        let report: Self = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse report {}", path.display()))?;
        log::info!(
            "Loaded {} stage results for '{}' from {}",
            report.stages.len(),
            report.pilot,
            path.display()
        );
        Ok(report)
    }

    /// Save a report as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        log::info!("Report saved to {}", path.display());
        Ok(())
    }
}

/// One stage of a comparison
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub seed: u64,
    pub baseline: u32,
    pub candidate: u32,
}

impl ComparisonRow {
    /// Turns saved by the candidate (negative when it was slower)
    pub fn delta(&self) -> i64 {
        self.baseline as i64 - self.candidate as i64
    }

    pub fn regressed(&self) -> bool {
        self.delta() < 0
    }
}

/// Two runs side by side
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub baseline_name: String,
    pub candidate_name: String,
    pub rows: Vec<ComparisonRow>,
    pub baseline_total: u64,
    pub candidate_total: u64,
}

impl Comparison {
    /// Pair stages in order; extra stages on either side are ignored
    pub fn new(baseline: &RunReport, candidate: &RunReport) -> Self {
        let rows: Vec<ComparisonRow> = baseline
            .stages
            .iter()
            .zip(&candidate.stages)
            .map(|(b, c)| {
                if b.seed != c.seed {
                    log::warn!("Comparing different stages: seed {} vs {}", b.seed, c.seed);
                }
                ComparisonRow {
                    seed: b.seed,
                    baseline: b.turns,
                    candidate: c.turns,
                }
            })
            .collect();

        Self {
            baseline_name: baseline.pilot.clone(),
            candidate_name: candidate.pilot.clone(),
            baseline_total: rows.iter().map(|r| r.baseline as u64).sum(),
            candidate_total: rows.iter().map(|r| r.candidate as u64).sum(),
            rows,
        }
    }

    pub fn regressions(&self) -> usize {
        self.rows.iter().filter(|r| r.regressed()).count()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>4} {:>12} {:>8} {:>8} {:>9}",
            "#", "seed", &self.baseline_name, &self.candidate_name, "saved"
        )?;
        for (i, row) in self.rows.iter().enumerate() {
            write!(
                f,
                "{:>4} {:>12} {:>8} {:>8} {:>9}",
                i,
                row.seed,
                row.baseline,
                row.candidate,
                row.delta()
            )?;
            if row.regressed() {
                write!(f, "  ###")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "{:>4} {:>12} {:>8} {:>8} {:>9}",
            "sum",
            "",
            self.baseline_total,
            self.candidate_total,
            self.baseline_total as i64 - self.candidate_total as i64
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(seed: u64, turns: u32) -> StageRecord {
        StageRecord {
            seed,
            turns,
            finished: true,
            laps: 3,
            accel_used: 10,
        }
    }

    #[test]
    fn test_totals() {
        let mut report = RunReport::new("drift", vec![record(1, 300), record(2, 450)]);
        report.stages[1].finished = false;

        assert_eq!(report.total_turns(), 750);
        assert_eq!(report.finished_count(), 1);
        assert!(!report.is_empty());
        assert!(RunReport::default().is_empty());
    }

    #[test]
    fn test_comparison_marks_regressions() {
        let baseline = RunReport::new("greedy", vec![record(1, 500), record(2, 400), record(3, 600)]);
        let candidate = RunReport::new("drift", vec![record(1, 420), record(2, 410)]);

        let comparison = Comparison::new(&baseline, &candidate);

        assert_eq!(comparison.rows.len(), 2);
        assert_eq!(comparison.rows[0].delta(), 80);
        assert!(!comparison.rows[0].regressed());
        assert_eq!(comparison.rows[1].delta(), -10);
        assert!(comparison.rows[1].regressed());
        assert_eq!(comparison.regressions(), 1);
        assert_eq!(comparison.baseline_total, 900);
        assert_eq!(comparison.candidate_total, 830);

        let text = comparison.to_string();
        assert_eq!(text.lines().count(), 4);
        assert_eq!(text.matches("###").count(), 1);
        assert!(text.lines().last().unwrap().trim_end().ends_with("70"));
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("report.json");
        let report = RunReport::new("drift", vec![record(7, 321)]);

        report.save(&path)?;
        let loaded = RunReport::load(&path)?;

        assert_eq!(loaded, report);
        Ok(())
    }

    #[test]
    fn test_load_missing_report_errors() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        assert!(RunReport::load(&tmp.path().join("missing.json")).is_err());
        Ok(())
    }
}
