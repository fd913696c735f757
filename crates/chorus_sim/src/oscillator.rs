//! Fixed-point simple harmonic oscillator.
//!
//! Leapfrog integration of `x'' = -ω0² x` reduces to the two-tap recurrence
//! `x[n+1] = c·x[n] - x[n-1]` with `c = 2 - (T·ω0)²`, the same shape the
//! harmonic nodes run. It stays bounded only while `T < 2 / ω0`.

use std::f64::consts::PI;

use chorus_core::fixed_point::Q16;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Oscillator {
    /// Samples per second
    pub sample_rate: f64,
    /// Natural frequency in Hz
    pub frequency: f64,
    /// Initial displacement
    pub position: f64,
    /// Initial velocity
    pub velocity: f64,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            frequency: 20.0,
            position: 3.0,
            velocity: 0.6,
        }
    }
}

impl Oscillator {
    pub fn omega(&self) -> f64 {
        2.0 * PI * self.frequency
    }

    pub fn period(&self) -> f64 {
        1.0 / self.sample_rate
    }

    /// The recurrence coefficient `2 - (T·ω0)²`.
    ///
    /// Fails with [`SimError::Unstable`] when the sampling period is too
    /// coarse for the frequency.
    pub fn coefficient(&self) -> Result<f64> {
        let (t, w) = (self.period(), self.omega());
        let limit = 2.0 / w;
        if t.is_nan() || t >= limit {
            return Err(SimError::Unstable { period: t, limit });
        }
        Ok(2.0 - (t * t) * (w * w))
    }

    /// Runs `steps` samples in Q16.16 and returns the positions.
    pub fn run(&self, steps: usize) -> Result<Vec<f64>> {
        let c = Q16::from_f64(self.coefficient()?)?;
        let mut previous = Q16::from_f64(self.position)?;
        let mut current = Q16::from_f64(self.position + self.period() * self.velocity)?;

        let mut positions = Vec::with_capacity(steps);
        for _ in 0..steps {
            let next = c.mul(current) - previous;
            previous = current;
            current = next;
            positions.push(current.to_f64());
        }
        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coarse_sampling_is_unstable() {
        let osc = Oscillator {
            sample_rate: 10.0,
            frequency: 20.0,
            ..Default::default()
        };
        assert!(matches!(osc.coefficient(), Err(SimError::Unstable { .. })));
        assert!(osc.run(10).is_err());
    }

    #[test]
    fn test_amplitude_stays_bounded() {
        let osc = Oscillator {
            sample_rate: 1_000.0,
            frequency: 5.0,
            position: 2.0,
            velocity: 0.0,
        };
        let positions = osc.run(2_000).unwrap();
        assert_eq!(positions.len(), 2_000);
        let peak = positions.iter().fold(0.0f64, |m, x| m.max(x.abs()));
        assert!(peak > 1.9 && peak < 2.2, "peak {}", peak);
        // ten full periods of a 5 Hz wave at 1 kHz: it must cross zero
        assert!(positions.iter().any(|x| *x < 0.0));
    }

    #[test]
    fn test_overflowing_start_is_reported() {
        let osc = Oscillator {
            position: 1e9,
            ..Default::default()
        };
        assert!(matches!(osc.run(1), Err(SimError::Core(_))));
    }
}
