//! chorus_core: deterministic engine for coupled oscillator networks.
//!
//! Small networks of discrete-time oscillators are stepped in lockstep and
//! the note symbols they emit are scored with entropy statistics, so that an
//! external search procedure can look for networks whose output resembles an
//! interesting melody.
//!
//! Design constraints:
//! - No std by default in the hot path: everything builds on `core` + `alloc`
//! - Fixed-point math: `Fixed` (Q16.16 by default) for bit-exact dynamics
//! - Explicitly seeded randomness: every RNG is owned or passed in, never global
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`fixed_point`] | `Fixed<F>` with rounding multiply |
//! | [`automaton`] | packed elementary CA nodes and the swap-coupled network |
//! | [`harmonic`] | delayed-channel recurrence nodes and their mesh |
//! | [`stats`] | histogram and order-1 Markov entropy |
//! | [`genome`] | evolvable gene arrays and the fitness contract |
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod automaton;
pub mod config;
pub mod error;
pub mod fixed_point;
pub mod genome;
pub mod harmonic;
pub mod stats;

pub use config::{AutomatonConfig, FitnessConfig, HarmonicConfig};
pub use error::{CoreError, Result};
pub use fixed_point::Fixed;
pub use genome::{CaGenome, Genome, HarmonicGenome};

/// Note identifiers assigned to nodes `0..7` (C major scale, MIDI numbers).
pub const NOTES: [u8; 7] = [60, 62, 64, 65, 67, 69, 71];
