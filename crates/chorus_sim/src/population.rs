//! Batches of genomes for an external search loop.

use std::time::Instant;

use chorus_core::genome::Genome;
use chorus_core::{CoreError, FitnessConfig};
use rand::Rng;
use rayon::prelude::*;
use tracing::info;

use crate::error::Result;

/// Draws `size` independent random genomes.
///
/// Fails with the first genome `config` cannot produce.
pub fn random_population<G, R>(config: &G::Config, size: usize, rng: &mut R) -> Result<Vec<G>>
where
    G: Genome,
    R: Rng + ?Sized,
{
    let genomes = (0..size)
        .map(|_| G::random(config, rng))
        .collect::<std::result::Result<Vec<G>, CoreError>>()?;
    Ok(genomes)
}

/// Scores every genome on a pool of `threads` workers.
///
/// # Arguments
/// * `genomes` - Candidates to score
/// * `config` - Network parameters shared by all candidates
/// * `fitness` - Target and seeds
/// * `threads` - Worker count; 0 lets the pool pick
///
/// # Returns
/// One score per genome, in input order. The first failing evaluation
/// aborts the batch.
pub fn evaluate_all<G>(
    genomes: &[G],
    config: &G::Config,
    fitness: &FitnessConfig,
    threads: usize,
) -> Result<Vec<f64>>
where
    G: Genome,
    G::Config: Sync,
{
    let started = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    let scores = pool.install(|| {
        genomes
            .par_iter()
            .map(|genome| genome.evaluate(config, fitness))
            .collect::<std::result::Result<Vec<f64>, CoreError>>()
    })?;
    info!(
        genomes = genomes.len(),
        threads = pool.current_num_threads(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Population evaluated"
    );
    Ok(scores)
}

/// Index and value of the lowest score; NaN scores are never chosen.
pub fn best(scores: &[f64]) -> Option<(usize, f64)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, s)| !s.is_nan())
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use chorus_core::genome::{CaGenome, HarmonicGenome};
    use chorus_core::{AutomatonConfig, HarmonicConfig};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_population_is_seeded() {
        let config = HarmonicConfig::default();
        let a: Vec<HarmonicGenome> =
            random_population(&config, 4, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        let b: Vec<HarmonicGenome> =
            random_population(&config, 4, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        assert_eq!(a.len(), 4);
        assert_eq!(a, b);
        assert_ne!(a[0], a[1]);
    }

    #[test]
    fn test_parallel_scores_keep_input_order() {
        let config = HarmonicConfig {
            iterations: 300,
            ..Default::default()
        };
        let fitness = FitnessConfig::default();
        let genomes: Vec<HarmonicGenome> =
            random_population(&config, 6, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();

        let serial: Vec<f64> = genomes
            .iter()
            .map(|g| g.evaluate(&config, &fitness).unwrap())
            .collect();
        let parallel = evaluate_all(&genomes, &config, &fitness, 3).unwrap();
        assert_eq!(parallel, serial);
    }

    #[test]
    fn test_silent_genome_scores_target_squared() {
        let config = AutomatonConfig {
            words: 1,
            iterations: 200,
            ..Default::default()
        };
        let fitness = FitnessConfig {
            seeds: vec![1],
            ..Default::default()
        };
        let genomes = vec![CaGenome::disconnected(&config).unwrap(); 2];
        let scores = evaluate_all(&genomes, &config, &fitness, 2).unwrap();
        let target = fitness.automaton_target;
        assert_eq!(scores, [target * target, target * target]);
    }

    #[test]
    fn test_unusable_config_fails_the_population() {
        let config = AutomatonConfig {
            spike_threshold: 1.0e6,
            ..Default::default()
        };
        let drawn: Result<Vec<CaGenome>> =
            random_population(&config, 3, &mut ChaCha8Rng::seed_from_u64(1));
        assert!(matches!(
            drawn,
            Err(SimError::Core(CoreError::FixedOverflow { .. }))
        ));
    }

    #[test]
    fn test_best_skips_nan() {
        assert_eq!(best(&[]), None);
        assert_eq!(best(&[0.3, f64::NAN, 0.1, 0.1]), Some((2, 0.1)));
        assert_eq!(best(&[f64::NAN]), None);
    }
}
