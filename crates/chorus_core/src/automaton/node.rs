use alloc::vec::Vec;
use rand::Rng;

use super::bits::{Bits, Rule};
use crate::config::AutomatonConfig;
use crate::error::{CoreError, Result};

/// One cellular automaton acting as a spiking oscillator.
#[derive(Debug, Clone)]
pub struct CaNode {
    rule: Rule,
    state: Bits,
    connections: Vec<usize>,
    alpha: f64,
    spike_factor: f64,
    /// Live cells after the last step
    on: u64,
    low: f64,
    complexity: f64,
    spike: f64,
    /// Spike level (before dividing by the spike factor) needed to fire
    pub threshold: f64,
    /// Note emitted when this node fires, 0 for none
    pub note: u8,
}

impl CaNode {
    /// Creates a node with a random state and no connections.
    pub fn new<R: Rng + ?Sized>(config: &AutomatonConfig, rng: &mut R) -> Self {
        Self::with_state(config, Bits::random(config.words, rng))
    }

    pub fn with_state(config: &AutomatonConfig, state: Bits) -> Self {
        CaNode {
            rule: Rule(config.rule),
            low: (state.len() / 2) as f64,
            state,
            connections: Vec::with_capacity(8),
            alpha: config.alpha,
            spike_factor: config.spike_factor,
            on: 0,
            complexity: 0.0,
            spike: 0.0,
            threshold: config.spike_threshold,
            note: 0,
        }
    }

    /// Adds an outgoing connection. Duplicates are allowed and harmless.
    pub fn add_connection(&mut self, node: usize) {
        self.connections.push(node);
    }

    pub fn connections(&self) -> &[usize] {
        &self.connections
    }

    pub fn state(&self) -> &Bits {
        &self.state
    }

    /// Replaces the state; the length must not change.
    pub fn set_state(&mut self, state: Bits) -> Result<()> {
        if state.len() != self.state.len() {
            return Err(CoreError::ShapeMismatch {
                field: "automaton state",
                expected: self.state.len(),
                actual: state.len(),
            });
        }
        self.state = state;
        Ok(())
    }

    pub(crate) fn state_mut(&mut self) -> &mut Bits {
        &mut self.state
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn on(&self) -> u64 {
        self.on
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn complexity(&self) -> f64 {
        self.complexity
    }

    pub fn spike(&self) -> f64 {
        self.spike
    }

    /// Whether the node is calm enough to fire.
    pub fn test(&self) -> bool {
        self.spike > self.threshold / self.spike_factor
    }

    /// Advances the automaton one generation.
    ///
    /// The next state is written into `scratch`, which then becomes the
    /// node state; the previous state is handed back through `scratch`.
    pub fn step(&mut self, scratch: &mut Bits) {
        debug_assert_eq!(scratch.len(), self.state.len());
        let mut on = 0u64;
        for k in 0..self.state.words().len() {
            let (left, center, right) = self.state.word_neighbors(k);
            let next = self.rule.apply(left, center, right);
            on += next.count_ones() as u64;
            scratch.set_word(k, next);
        }
        core::mem::swap(&mut self.state, scratch);
        self.on = on;

        let on = on as f64;
        self.low += self.alpha * (on - self.low);
        self.complexity += self.alpha * ((on - self.low).abs() - self.complexity);
        self.spike = libm::exp(-self.complexity);
    }
}
