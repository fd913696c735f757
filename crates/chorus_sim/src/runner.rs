//! Long inference runs and step-by-step traces of the core networks.

use std::time::Instant;

use chorus_core::automaton::{CaNetwork, Firing};
use chorus_core::genome::{CaGenome, HarmonicGenome};
use chorus_core::{AutomatonConfig, HarmonicConfig};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;

/// One firing, as written to trace files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FireEvent {
    pub step: u64,
    pub node: usize,
    pub partner: usize,
    pub spike: f64,
    pub note: u8,
}

impl From<Firing> for FireEvent {
    fn from(firing: Firing) -> Self {
        FireEvent {
            step: firing.tick,
            node: firing.node,
            partner: firing.partner,
            spike: firing.spike,
            note: firing.note,
        }
    }
}

/// Output of a CA network run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaRun {
    /// Non-zero notes, in emission order
    pub notes: Vec<u8>,
    pub events: Vec<FireEvent>,
}

fn drive(mut network: CaNetwork, steps: usize) -> CaRun {
    let started = Instant::now();
    let mut run = CaRun::default();
    for _ in 0..steps {
        network.tick(|firing| {
            if firing.note > 0 {
                run.notes.push(firing.note);
            }
            run.events.push(firing.into());
        });
    }
    info!(
        steps,
        nodes = network.len(),
        firings = run.events.len(),
        notes = run.notes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "CA run complete"
    );
    run
}

/// Runs a CA network with ring connectivity `i -> i ± 1`.
pub fn ring(config: &AutomatonConfig, seed: u64, steps: usize) -> Result<CaRun> {
    let mut network = CaNetwork::new(seed, config)?;
    network.connect_ring();
    network.attach_notes(&config.notes);
    Ok(drive(network, steps))
}

/// Runs the CA network an evolved genome describes.
pub fn genome_run(
    genome: &CaGenome,
    config: &AutomatonConfig,
    seed: u64,
    steps: usize,
) -> Result<CaRun> {
    let network = genome.build_network(seed, config)?;
    Ok(drive(network, steps))
}

/// Spike levels of two swap-coupled nodes over time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairTrace {
    /// `[spike of node 0, spike of node 1]` after every step
    pub spikes: Vec<[f64; 2]>,
    pub events: Vec<FireEvent>,
}

/// Two CA nodes that swap state whenever one of them fires.
///
/// Node 0 is tested first; when it fires node 1 is not tested on that step.
pub fn pair_trace(config: &AutomatonConfig, seed: u64, steps: usize) -> Result<PairTrace> {
    let config = AutomatonConfig {
        size: 2,
        ..config.clone()
    };
    let mut network = CaNetwork::new(seed, &config)?;
    let mut trace = PairTrace {
        spikes: Vec::with_capacity(steps),
        events: Vec::new(),
    };

    for step in 0..steps as u64 {
        let firing = (0..2).find(|&n| network.node(n).test());
        if let Some(node) = firing {
            network.swap(0, 1);
            let spike = network.node(node).spike();
            debug!(step, node, spike, "fire");
            trace.events.push(FireEvent {
                step,
                node,
                partner: 1 - node,
                spike,
                note: 0,
            });
        }
        network.step();
        trace
            .spikes
            .push([network.node(0).spike(), network.node(1).spike()]);
    }
    Ok(trace)
}

/// Per-node amplitudes of a harmonic network over time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarmonicTrace {
    /// `amplitudes[node][step]`
    pub amplitudes: Vec<Vec<f64>>,
    pub notes: Vec<u8>,
}

impl HarmonicTrace {
    pub fn steps(&self) -> usize {
        self.amplitudes.first().map_or(0, Vec::len)
    }
}

/// Runs a harmonic genome, recording every node's amplitude after each step.
pub fn harmonic_trace(
    genome: &HarmonicGenome,
    config: &HarmonicConfig,
    steps: usize,
) -> Result<HarmonicTrace> {
    let mut network = genome.build_network(config)?;
    let mut trace = HarmonicTrace {
        amplitudes: vec![Vec::with_capacity(steps); network.len()],
        notes: Vec::new(),
    };
    for _ in 0..steps {
        network.step(&mut trace.notes);
        for (series, amplitude) in trace.amplitudes.iter_mut().zip(network.amplitudes()) {
            series.push(amplitude.to_f64());
        }
    }
    info!(
        steps,
        nodes = network.len(),
        channels = network.channels(),
        notes = trace.notes.len(),
        "Harmonic trace complete"
    );
    Ok(trace)
}
