use alloc::vec::Vec;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::genes::{cross_points, permute, ByteGenes, FixedGenes};
use super::{distance, markov_score, Genome};
use crate::config::{FitnessConfig, HarmonicConfig};
use crate::error::{expect_len, Result};
use crate::fixed_point::{Fixed, Q16};
use crate::harmonic::{HarmonicLayout, HarmonicNetwork};

/// Delays, initial states, weights and thresholds of a harmonic network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarmonicGenome {
    /// Row-major `size × size` edge delays; `no_edge` disables an edge
    pub delays: ByteGenes,
    /// `s0, s1` per node
    pub states: FixedGenes,
    /// `w0, w1, w2` per node
    pub weights: FixedGenes,
    /// Firing threshold `w3` per node
    pub thresholds: FixedGenes,
}

/// Uniform raw value in `(-range, range)`: magnitude first, then sign.
fn signed<R: Rng + ?Sized>(range: i32, rng: &mut R) -> Fixed {
    let magnitude = Fixed::from_bits(rng.gen_range(0..range));
    if rng.gen_bool(0.5) {
        -magnitude
    } else {
        magnitude
    }
}

impl HarmonicGenome {
    pub fn layout(&self) -> HarmonicLayout<'_> {
        HarmonicLayout {
            delays: &self.delays,
            states: &self.states,
            weights: &self.weights,
            thresholds: &self.thresholds,
        }
    }

    /// Builds the network; no randomness is involved.
    pub fn build_network(&self, config: &HarmonicConfig) -> Result<HarmonicNetwork> {
        HarmonicNetwork::new(config, self.layout())
    }

    /// Notes emitted over `config.iterations` steps.
    pub fn play(&self, config: &HarmonicConfig) -> Result<Vec<u8>> {
        let mut network = self.build_network(config)?;
        Ok(network.run(config.iterations))
    }
}

impl Genome for HarmonicGenome {
    type Config = HarmonicConfig;

    fn random<R: Rng + ?Sized>(config: &HarmonicConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let n = config.size;
        let range = Q16::from_f64(config.init_range)?.to_bits().max(1);

        let delays = (0..n * n)
            .map(|_| {
                if rng.gen_bool(0.5) {
                    return config.no_edge;
                }
                // uniform over every delay except `no_edge`
                let d = rng.gen_range(0..u8::MAX);
                if d >= config.no_edge {
                    d + 1
                } else {
                    d
                }
            })
            .collect();
        let states = (0..2 * n).map(|_| signed(range, rng)).collect();
        let weights = (0..3 * n).map(|_| signed(range, rng)).collect();
        let thresholds = (0..n)
            .map(|_| Fixed::from_bits(rng.gen_range(0..range)))
            .collect();

        Ok(HarmonicGenome {
            delays: ByteGenes(delays),
            states: FixedGenes(states),
            weights: FixedGenes(weights),
            thresholds: FixedGenes(thresholds),
        })
    }

    fn evaluate(&self, config: &HarmonicConfig, fitness: &FitnessConfig) -> Result<f64> {
        let notes = self.play(config)?;
        let raw = markov_score(&notes, config.notes.len());
        let score = distance(raw, fitness.harmonic_target);
        log::debug!(
            "harmonic genome: {} notes, raw={:.4} fitness={:.6}",
            notes.len(),
            raw,
            score
        );
        Ok(score)
    }

    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        permute(&mut self.delays, 1, rng);
        permute(&mut self.states, 1, rng);
        permute(&mut self.weights, 1, rng);
        permute(&mut self.thresholds, 1, rng);
    }

    fn crossover<R: Rng + ?Sized>(&mut self, other: &mut Self, rng: &mut R) -> Result<()> {
        expect_len("harmonic delays", self.delays.len(), other.delays.len())?;
        expect_len("harmonic states", self.states.len(), other.states.len())?;
        expect_len("harmonic weights", self.weights.len(), other.weights.len())?;
        expect_len(
            "harmonic thresholds",
            self.thresholds.len(),
            other.thresholds.len(),
        )?;
        cross_points(&mut self.delays, &mut other.delays, 1, rng)?;
        cross_points(&mut self.states, &mut other.states, 1, rng)?;
        cross_points(&mut self.weights, &mut other.weights, 1, rng)?;
        cross_points(&mut self.thresholds, &mut other.thresholds, 1, rng)
    }
}
