//! Pilot tuning and presets
//!
//! Every empirically tuned constant of the pilot lives here so one strategy
//! can be reshaped without touching the decision code. Persisted as JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tuning preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    Cautious,
    #[default]
    Balanced,
    Aggressive,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Cautious => "Cautious",
            Preset::Balanced => "Balanced",
            Preset::Aggressive => "Aggressive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cautious" | "safe" => Some(Preset::Cautious),
            "balanced" | "default" => Some(Preset::Balanced),
            "aggressive" => Some(Preset::Aggressive),
            _ => None,
        }
    }

    /// How deep into a pad the corner aim point sits, in chara radii
    pub fn corner_factor(&self) -> f32 {
        match self {
            Preset::Cautious => 0.5,
            Preset::Balanced => 0.6,
            Preset::Aggressive => 0.8,
        }
    }

    /// Charges held back from every spending decision
    pub fn reserve(&self) -> u32 {
        match self {
            Preset::Cautious => 2,
            Preset::Balanced => 1,
            Preset::Aggressive => 1,
        }
    }

    /// Upper bound of the burst-count search
    pub fn max_bursts(&self) -> u32 {
        match self {
            Preset::Cautious => 3,
            Preset::Balanced => 4,
            Preset::Aggressive => 6,
        }
    }
}

/// Pilot settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotSettings {
    /// Preset the values below were derived from
    pub preset: Preset,

    // === Waypoints ===
    /// Relaxation sweeps over the aim-point table
    pub relax_iterations: u32,
    /// Aim offset from pad center is `pad radius + chara radius * corner_factor`
    pub corner_factor: f32,

    // === Accel timing ===
    /// Closing rate (per unit of speed) above which drifting is good enough
    pub closing_rate_threshold: f32,
    /// Drift-only probe length for a standing chara
    pub drift_probe_ticks: u32,
    /// Charges never spent right after switching pads.
    /// With both reserves above 0 the final charge is never spent; set one of
    /// them to 0 to allow it.
    pub switch_reserve: u32,
    /// Charges never spent while coasting
    pub coast_reserve: u32,
    /// Largest burst count the interval search tries
    pub max_bursts: u32,

    // === Steering ===
    /// Aim against the drift (`aim - flow`)
    pub compensate_flow: bool,
    /// Veto bursts that would run into another chara
    pub avoidance: bool,
}

impl Default for PilotSettings {
    fn default() -> Self {
        Self {
            preset: Preset::Balanced,

            relax_iterations: 10,
            corner_factor: 0.6,

            closing_rate_threshold: 0.7,
            drift_probe_ticks: 5,
            switch_reserve: 1,
            coast_reserve: 1,
            max_bursts: 4,

            compensate_flow: true,
            avoidance: true,
        }
    }
}

impl PilotSettings {
    /// Create settings from a preset (applies preset values)
    pub fn from_preset(preset: Preset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a preset (updates preset-dependent values)
    pub fn apply_preset(&mut self, preset: Preset) {
        self.preset = preset;
        self.corner_factor = preset.corner_factor();
        self.switch_reserve = preset.reserve();
        self.coast_reserve = preset.reserve();
        self.max_bursts = preset.max_bursts();
    }

    /// Load settings from a JSON file; missing fields take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?;
        let settings: Self = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse settings {}", path.display()))?;
        log::info!("Loaded {} settings from {}", settings.preset.as_str(), path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write settings {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
