//! Network stepping and entropy scoring throughput.

use chorus_core::automaton::{Bits, CaNetwork, CaNode};
use chorus_core::genome::{Genome, HarmonicGenome};
use chorus_core::stats::Markov;
use chorus_core::{AutomatonConfig, HarmonicConfig, NOTES};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_ca_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("ca_node_step");
    for words in [1usize, 8, 64] {
        let config = AutomatonConfig {
            words,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut node = CaNode::new(&config, &mut rng);
        let mut scratch = Bits::zeros(words);
        group.bench_with_input(BenchmarkId::from_parameter(words * 64), &words, |b, _| {
            b.iter(|| node.step(black_box(&mut scratch)))
        });
    }
    group.finish();
}

fn bench_ring_tick(c: &mut Criterion) {
    let config = AutomatonConfig::default();
    let mut network = CaNetwork::new(1, &config).unwrap();
    network.connect_ring();
    network.attach_notes(&NOTES);
    c.bench_function("ca_ring_tick", |b| {
        b.iter(|| network.tick(|firing| {
            black_box(firing);
        }))
    });
}

fn bench_harmonic_step(c: &mut Criterion) {
    let config = HarmonicConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let genome = HarmonicGenome::random(&config, &mut rng).unwrap();
    let mut network = genome.build_network(&config).unwrap();
    let mut notes = Vec::with_capacity(1 << 16);
    c.bench_function("harmonic_step", |b| {
        b.iter(|| {
            notes.clear();
            network.step(black_box(&mut notes));
        })
    });
}

fn bench_markov(c: &mut Criterion) {
    let notes: Vec<u8> = (0..40_000u32).map(|i| NOTES[(i * 7 + i / 3) as usize % 7]).collect();
    c.bench_function("markov_entropy_40k", |b| {
        b.iter(|| {
            let mut markov = Markov::new();
            markov.extend(black_box(&notes).iter().copied());
            markov.entropy()
        })
    });
}

criterion_group!(
    benches,
    bench_ca_step,
    bench_ring_tick,
    bench_harmonic_step,
    bench_markov
);
criterion_main!(benches);
