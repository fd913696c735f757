use alloc::vec::Vec;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::genes::{cross_points, permute, BoolGenes, FixedGenes};
use super::{distance, markov_score, Genome};
use crate::automaton::CaNetwork;
use crate::config::{AutomatonConfig, FitnessConfig};
use crate::error::{expect_len, Result};
use crate::fixed_point::{Fixed, Q16};

/// Connection matrix and firing thresholds of a CA network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaGenome {
    /// Row-major `size × size`: `i * size + j` connects node `i` to `j`.
    /// The diagonal is ignored.
    pub connections: BoolGenes,
    /// Per-node spike threshold
    pub thresholds: FixedGenes,
}

impl CaGenome {
    /// A genome with no connections, so nothing can ever fire.
    ///
    /// Every threshold is `config.spike_threshold` rounded to Q16.16; fails
    /// with [`crate::CoreError::FixedOverflow`] when it does not fit.
    pub fn disconnected(config: &AutomatonConfig) -> Result<Self> {
        let n = config.size;
        let threshold = Fixed::from_f64(config.spike_threshold)?;
        Ok(CaGenome {
            connections: BoolGenes(alloc::vec![false; n * n]),
            thresholds: FixedGenes(alloc::vec![threshold; n]),
        })
    }

    /// Ring connectivity `i -> i ± 1 (mod size)` with the default threshold.
    ///
    /// The threshold goes through Q16.16, so a built network matches
    /// [`CaNetwork::connect_ring`] only when `spike_threshold` is exact in
    /// fixed point (0.5 is, the default 0.66 becomes 0.6600037).
    pub fn ring(config: &AutomatonConfig) -> Result<Self> {
        let n = config.size;
        let mut genome = Self::disconnected(config)?;
        for i in 0..n {
            genome.connections.0[i * n + (i + n - 1) % n] = true;
            genome.connections.0[i * n + (i + 1) % n] = true;
        }
        Ok(genome)
    }

    /// Builds the network this genome describes, seeding its states with `seed`.
    pub fn build_network(&self, seed: u64, config: &AutomatonConfig) -> Result<CaNetwork> {
        let n = config.size;
        expect_len("automaton connections", n * n, self.connections.0.len())?;
        expect_len("automaton thresholds", n, self.thresholds.0.len())?;

        let mut network = CaNetwork::new(seed, config)?;
        for i in 0..n {
            for j in 0..n {
                if i != j && self.connections.0[i * n + j] {
                    network.connect(i, j)?;
                }
            }
            network.node_mut(i).threshold = self.thresholds.0[i].to_f64();
        }
        network.attach_notes(&config.notes);
        Ok(network)
    }

    /// Notes emitted over `config.iterations` steps from `seed`.
    pub fn play(&self, seed: u64, config: &AutomatonConfig) -> Result<Vec<u8>> {
        let mut network = self.build_network(seed, config)?;
        Ok(network.run(config.iterations))
    }
}

impl Genome for CaGenome {
    type Config = AutomatonConfig;

    fn random<R: Rng + ?Sized>(config: &AutomatonConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let n = config.size;
        let connections = (0..n * n).map(|_| rng.gen_bool(0.5)).collect();
        let thresholds = (0..n)
            .map(|_| Fixed::from_bits(rng.gen_range(0..Q16::ONE.to_bits())))
            .collect();
        Ok(CaGenome {
            connections: BoolGenes(connections),
            thresholds: FixedGenes(thresholds),
        })
    }

    fn evaluate(&self, config: &AutomatonConfig, fitness: &FitnessConfig) -> Result<f64> {
        fitness.validate()?;
        let mut sum = 0.0;
        for &seed in &fitness.seeds {
            let notes = self.play(seed, config)?;
            sum += markov_score(&notes, config.notes.len());
        }
        let raw = sum / fitness.seeds.len() as f64;
        let score = distance(raw, fitness.automaton_target);
        log::debug!("automaton genome: raw={:.4} fitness={:.6}", raw, score);
        Ok(score)
    }

    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        permute(&mut self.connections, 1, rng);
        permute(&mut self.thresholds, 1, rng);
    }

    fn crossover<R: Rng + ?Sized>(&mut self, other: &mut Self, rng: &mut R) -> Result<()> {
        expect_len(
            "automaton connections",
            self.connections.len(),
            other.connections.len(),
        )?;
        expect_len(
            "automaton thresholds",
            self.thresholds.len(),
            other.thresholds.len(),
        )?;
        cross_points(&mut self.connections, &mut other.connections, 1, rng)?;
        cross_points(&mut self.thresholds, &mut other.thresholds, 1, rng)
    }
}
