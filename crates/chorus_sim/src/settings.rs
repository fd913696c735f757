use chorus_core::{AutomatonConfig, FitnessConfig, HarmonicConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{Result, SimError};

/// Everything a simulation run reads from its TOML file.
///
/// Every section and field is optional; missing ones take the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub automaton: AutomatonConfig,
    #[serde(default)]
    pub harmonic: HarmonicConfig,
    #[serde(default)]
    pub fitness: FitnessConfig,
    #[serde(default)]
    pub run: RunSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Seed for network states and random genomes
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Steps for inference runs and traces
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Genomes drawn by `population::random_population`
    #[serde(default = "default_population")]
    pub population: usize,
    /// Worker threads for population evaluation
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Notes per sliding entropy window
    #[serde(default = "default_window")]
    pub window: usize,
}

fn default_seed() -> u64 {
    1
}

fn default_steps() -> usize {
    300_000
}

fn default_population() -> usize {
    100
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_window() -> usize {
    64
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            steps: default_steps(),
            population: default_population(),
            threads: default_threads(),
            window: default_window(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySettings {
    /// Emit JSON lines instead of human readable logs
    #[serde(default)]
    pub json: bool,
    /// Maximum level: "error", "warn", "info", "debug" or "trace"
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            json: false,
            level: default_level(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        fs::write(path, toml)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.automaton.validate()?;
        self.harmonic.validate()?;
        self.fitness.validate()?;
        if self.run.threads == 0 {
            return Err(SimError::InvalidSetting("run.threads must be at least 1".into()));
        }
        if self.run.window == 0 {
            return Err(SimError::InvalidSetting("run.window must be at least 1".into()));
        }
        Ok(())
    }
}
