//! chorus_sim: runs, traces and reports around `chorus_core`.
//!
//! The core crate only steps networks and scores genomes. This crate adds the
//! std-side tooling: TOML settings, `tracing` output, long inference runs,
//! per-step traces with CSV export, spectral analysis and batched genome
//! evaluation for an external search loop.

pub mod analysis;
pub mod error;
pub mod oscillator;
pub mod population;
pub mod runner;
pub mod settings;
pub mod telemetry;
pub mod trace;

pub use error::{Result, SimError};
pub use oscillator::Oscillator;
pub use runner::{CaRun, FireEvent, HarmonicTrace, PairTrace};
pub use settings::Settings;
