//! The boundary between the simulations and an external search procedure.
//!
//! A genome is a handful of flat gene arrays. It knows how to turn itself
//! into a live network, run it and reduce the emitted notes to a fitness
//! the search minimizes. Selection and population management live outside
//! this crate.

use rand::Rng;

use crate::config::FitnessConfig;
use crate::error::Result;
use crate::stats::{max_markov, Markov};

pub mod automaton;
pub mod genes;
pub mod harmonic;

pub use automaton::CaGenome;
pub use genes::{cross_points, permute, BoolGenes, ByteGenes, FixedGenes, Genes};
pub use harmonic::HarmonicGenome;

/// Candidate network configuration under evolutionary search.
///
/// `evaluate` takes `&self` and touches no shared state, so distinct
/// genomes can be scored on different threads at the same time.
pub trait Genome: Clone + Send + Sync + Sized {
    /// Network parameters the genome is sized against
    type Config;

    /// Draws a genome with every array at the length `config` implies.
    ///
    /// Fails when `config` is invalid or one of its values does not fit
    /// the fixed-point genes.
    fn random<R: Rng + ?Sized>(config: &Self::Config, rng: &mut R) -> Result<Self>;

    /// Runs the network and scores it.
    ///
    /// # Arguments
    /// * `config` - Network parameters, including the iteration budget
    /// * `fitness` - Target score and network seeds
    ///
    /// # Returns
    /// `(raw - target)²`, where `raw` is the normalized Markov entropy of the
    /// emitted notes; lower is better
    fn evaluate(&self, config: &Self::Config, fitness: &FitnessConfig) -> Result<f64>;

    /// Permutes every gene array once.
    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R);

    /// Single-point crossover of every gene array, in place on both parents.
    ///
    /// Fails with [`crate::CoreError::ShapeMismatch`] when the parents disagree on
    /// an array length. Every length is checked before any gene moves, so on
    /// failure both parents are unchanged.
    fn crossover<R: Rng + ?Sized>(&mut self, other: &mut Self, rng: &mut R) -> Result<()>;
}

/// Markov entropy of `notes` scaled into `[0, 1]` for an alphabet of `alphabet`.
pub fn markov_score(notes: &[u8], alphabet: usize) -> f64 {
    let max = max_markov(alphabet);
    if max <= 0.0 {
        return 0.0;
    }
    let mut markov = Markov::new();
    markov.extend(notes.iter().copied());
    markov.entropy() / max
}

/// Squared distance to the target, which the search minimizes.
pub fn distance(raw: f64, target: f64) -> f64 {
    let d = raw - target;
    d * d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markov_score_is_normalized() {
        assert_eq!(markov_score(&[], 7), 0.0);
        assert_eq!(markov_score(&[60; 50], 7), 0.0);
        assert_eq!(markov_score(&[60, 62, 60], 1), 0.0);
        // four equally likely pairs over a two-note alphabet hit the maximum
        let notes = [60, 60, 62, 62, 60];
        assert!((markov_score(&notes, 2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_is_squared() {
        assert_eq!(distance(0.8, 0.8), 0.0);
        assert!((distance(0.5, 0.8) - 0.09).abs() < 1e-12);
        assert_eq!(distance(1.0, 0.0), distance(-1.0, 0.0));
    }
}
