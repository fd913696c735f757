use alloc::format;
use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::fixed_point::Q16;
use crate::NOTES;

/// Cellular automaton network parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomatonConfig {
    /// Elementary CA rule number (110 is the classic complex one)
    pub rule: u8,
    /// State length in 64-bit words
    pub words: usize,
    /// Smoothing factor for the activity and complexity filters
    pub alpha: f64,
    /// A node fires when `spike > threshold / spike_factor`
    pub spike_factor: f64,
    /// Threshold given to nodes that no genome overrides
    pub spike_threshold: f64,
    /// Number of nodes
    pub size: usize,
    /// Steps per evaluation run
    pub iterations: usize,
    /// Note attached to node `i`; nodes past the end are silent
    pub notes: Vec<u8>,
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        Self {
            rule: 110,
            words: 8,
            alpha: 0.08,
            spike_factor: 2.0,
            spike_threshold: 0.66,
            size: 7,
            iterations: 40_000,
            notes: NOTES.to_vec(),
        }
    }
}

impl AutomatonConfig {
    /// Total number of cells per node.
    pub fn cells(&self) -> usize {
        self.words * 64
    }

    pub fn validate(&self) -> Result<()> {
        if self.words == 0 {
            return Err(CoreError::InvalidConfig(format!(
                "automaton needs at least one state word, got {}",
                self.words
            )));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(CoreError::InvalidConfig(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if self.spike_factor <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "spike_factor must be positive, got {}",
                self.spike_factor
            )));
        }
        // genomes store thresholds in Q16.16
        Q16::from_f64(self.spike_threshold)?;
        Ok(())
    }
}

/// What a firing harmonic node puts on its outgoing channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FireValue {
    /// A constant magnitude carrying the sign of the node state
    Signed(f64),
    /// The node state itself
    Raw,
}

/// Which firing nodes contribute a note on a network step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteSelection {
    /// Every firing node, in index order
    All,
    /// Only the firing node with the largest amplitude
    Loudest,
}

/// Harmonic network parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonicConfig {
    /// Number of nodes
    pub size: usize,
    /// Steps per evaluation run
    pub iterations: usize,
    /// Delay value meaning "no edge" in the delay matrix
    pub no_edge: u8,
    /// Value sent on every channel when a node fires
    pub fire_value: FireValue,
    pub note_selection: NoteSelection,
    /// Magnitude bound for randomly drawn states and weights
    pub init_range: f64,
    /// Note attached to node `i`; nodes past the end are silent
    pub notes: Vec<u8>,
}

impl Default for HarmonicConfig {
    fn default() -> Self {
        Self {
            size: 7,
            iterations: 10_000,
            no_edge: 255,
            fire_value: FireValue::Signed(8.0),
            note_selection: NoteSelection::All,
            init_range: 8.0,
            notes: NOTES.to_vec(),
        }
    }
}

impl HarmonicConfig {
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(CoreError::InvalidConfig("harmonic network is empty".into()));
        }
        if !(self.init_range > 0.0 && self.init_range < 32_768.0) {
            return Err(CoreError::InvalidConfig(format!(
                "init_range must be in (0, 32768), got {}",
                self.init_range
            )));
        }
        Ok(())
    }
}

/// How raw statistics turn into a fitness to minimize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    /// Normalized Markov entropy the CA search aims for
    pub automaton_target: f64,
    /// Normalized Markov entropy the harmonic search aims for
    pub harmonic_target: f64,
    /// Network seeds averaged by a CA evaluation
    pub seeds: Vec<u64>,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            automaton_target: 0.8,
            harmonic_target: 0.4,
            seeds: vec![1, 2],
        }
    }
}

impl FitnessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.seeds.is_empty() {
            return Err(CoreError::InvalidConfig(
                "fitness needs at least one network seed".into(),
            ));
        }
        Ok(())
    }
}
