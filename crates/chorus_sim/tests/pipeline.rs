use chorus_core::genome::{CaGenome, Genome, HarmonicGenome};
use chorus_core::NOTES;
use chorus_sim::analysis::{spectral_entropy, spectral_score, window_entropy};
use chorus_sim::population::{best, evaluate_all, random_population};
use chorus_sim::runner::{genome_run, harmonic_trace, ring};
use chorus_sim::trace::{write_amplitudes, write_events, write_windows};
use chorus_sim::{Oscillator, Settings};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

const SETTINGS: &str = r#"
[automaton]
words = 2
iterations = 400

[harmonic]
iterations = 400

[fitness]
seeds = [1, 2]

[run]
seed = 7
steps = 4000
population = 6
threads = 2
window = 32
"#;

#[test]
fn test_settings_to_report() {
    println!("\n=== Settings -> run -> report ===\n");
    let settings = Settings::from_toml_str(SETTINGS).unwrap();
    let start = Instant::now();

    println!(">> Phase 1: ring inference run");
    let run = ring(&settings.automaton, settings.run.seed, settings.run.steps).unwrap();
    println!("notes={} firings={}", run.notes.len(), run.events.len());
    assert!(run.notes.iter().all(|n| NOTES.contains(n)));
    assert_eq!(
        run,
        ring(&settings.automaton, settings.run.seed, settings.run.steps).unwrap()
    );

    println!(">> Phase 2: sliding entropy windows");
    let windows = window_entropy(&run.notes, settings.run.window, NOTES.len());
    assert_eq!(
        windows.len(),
        run.notes.len().saturating_sub(settings.run.window - 1)
    );
    for w in &windows {
        assert!((0.0..=1.0 + 1e-12).contains(&w.histogram));
        assert!((0.0..=1.0 + 1e-12).contains(&w.markov));
    }

    println!(">> Phase 3: CSV export");
    let mut events_csv = Vec::new();
    write_events(&run.events, &mut events_csv).unwrap();
    assert_eq!(
        String::from_utf8(events_csv).unwrap().lines().count(),
        run.events.len() + 1
    );
    let mut windows_csv = Vec::new();
    write_windows(&windows, &mut windows_csv).unwrap();
    assert_eq!(
        String::from_utf8(windows_csv).unwrap().lines().count(),
        windows.len() + 1
    );

    println!(">> Phase 4: population evaluation");
    let mut rng = ChaCha8Rng::seed_from_u64(settings.run.seed);
    let genomes: Vec<CaGenome> =
        random_population(&settings.automaton, settings.run.population, &mut rng).unwrap();
    let scores = evaluate_all(
        &genomes,
        &settings.automaton,
        &settings.fitness,
        settings.run.threads,
    )
    .unwrap();
    assert_eq!(scores.len(), settings.run.population);
    assert!(scores.iter().all(|s| *s >= 0.0 && *s <= 1.0));
    let (index, score) = best(&scores).unwrap();
    println!("best genome #{} score={:.4}", index, score);
    assert_eq!(
        score,
        genomes[index]
            .evaluate(&settings.automaton, &settings.fitness)
            .unwrap()
    );

    let evolved = genome_run(
        &genomes[index],
        &settings.automaton,
        settings.run.seed,
        500,
    )
    .unwrap();
    assert!(evolved.events.iter().all(|e| e.node != e.partner));

    println!("Elapsed: {:?}", start.elapsed());
}

#[test]
fn test_harmonic_trace_report() {
    println!(">> Harmonic trace and spectral report");
    let settings = Settings::from_toml_str(SETTINGS).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let genome = HarmonicGenome::random(&settings.harmonic, &mut rng).unwrap();
    let trace = harmonic_trace(&genome, &settings.harmonic, 1024).unwrap();

    let mut csv = Vec::new();
    write_amplitudes(&trace, &mut csv).unwrap();
    assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 1025);

    for series in &trace.amplitudes {
        let e = spectral_entropy(series);
        assert!((0.0..=1.0 + 1e-9).contains(&e), "entropy {}", e);
    }
    let score = spectral_score(&trace, 0.5);
    assert!((0.0..=0.25 + 1e-9).contains(&score));
}

#[test]
fn test_oscillator_is_a_pure_tone() {
    let osc = Oscillator {
        sample_rate: 1_024.0,
        frequency: 8.0,
        position: 1.0,
        velocity: 0.0,
    };
    let positions = osc.run(1_024).unwrap();
    let e = spectral_entropy(&positions);
    println!("oscillator spectral entropy={:.4}", e);
    assert!(e < 0.5);
}
