//! Reporting statistics over finished runs.
//!
//! Nothing here feeds back into genome fitness.

use chorus_core::stats::{max_entropy, max_markov, Histogram, Markov};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use serde::Serialize;

use crate::runner::HarmonicTrace;

/// Normalized entropies of one window of notes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowEntropy {
    /// Index of the first note in the window
    pub start: usize,
    pub histogram: f64,
    pub markov: f64,
}

fn normalized(raw: f64, max: f64) -> f64 {
    if max > 0.0 {
        raw / max
    } else {
        0.0
    }
}

/// Histogram and Markov entropy of every `window`-note slice of `notes`.
///
/// Values are scaled by the maxima for an `alphabet`-symbol alphabet.
/// Fewer than `window` notes yield no windows.
pub fn window_entropy(notes: &[u8], window: usize, alphabet: usize) -> Vec<WindowEntropy> {
    if window == 0 {
        return Vec::new();
    }
    notes
        .windows(window)
        .enumerate()
        .map(|(start, slice)| {
            let mut histogram = Histogram::new();
            let mut markov = Markov::new();
            histogram.extend(slice.iter().copied());
            markov.extend(slice.iter().copied());
            WindowEntropy {
                start,
                histogram: normalized(histogram.entropy(), max_entropy(alphabet)),
                markov: normalized(markov.entropy(), max_markov(alphabet)),
            }
        })
        .collect()
}

/// Forward FFT of a real signal.
pub fn spectrum(values: &[f64]) -> Vec<Complex<f64>> {
    let mut buffer: Vec<Complex<f64>> = values.iter().map(|&v| Complex::new(v, 0.0)).collect();
    if buffer.is_empty() {
        return buffer;
    }
    let fft = FftPlanner::<f64>::new().plan_fft_forward(buffer.len());
    fft.process(&mut buffer);
    buffer
}

/// Shannon entropy (nats) of the power spectrum, scaled by `ln(len)`.
///
/// White noise scores near 1, a pure tone near 0. Silent or single-sample
/// signals score 0.
pub fn spectral_entropy(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let power: Vec<f64> = spectrum(values).iter().map(|c| c.norm_sqr() / n).collect();
    let total: f64 = power.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let entropy: f64 = power
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| {
            let p = p / total;
            -p * p.ln()
        })
        .sum();
    entropy / n.ln()
}

/// Mean over nodes of `(spectral entropy - target)²`.
pub fn spectral_score(trace: &HarmonicTrace, target: f64) -> f64 {
    if trace.amplitudes.is_empty() {
        return 0.0;
    }
    let sum: f64 = trace
        .amplitudes
        .iter()
        .map(|series| {
            let d = spectral_entropy(series) - target;
            d * d
        })
        .sum();
    sum / trace.amplitudes.len() as f64
}
