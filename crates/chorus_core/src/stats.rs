//! Entropy statistics over emitted note streams.
//!
//! Both estimators report Shannon entropy in bits. [`Markov::entropy`] is
//! the entropy of the joint pair table, not the conditional entropy of the
//! chain: it measures disorder of consecutive pairs and is what fitness is
//! normalized with ([`max_markov`]).

use alloc::boxed::Box;
use alloc::vec;
use serde::{Deserialize, Serialize};

const SYMBOLS: usize = 256;

/// Shannon entropy in bits of a table of counts; zero counts are skipped.
pub fn entropy_of<'a, I>(counts: I) -> f64
where
    I: IntoIterator<Item = &'a u64> + Clone,
{
    let total: u64 = counts.clone().into_iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let mut entropy = 0.0;
    for &count in counts {
        if count == 0 {
            continue;
        }
        let p = count as f64 / total;
        entropy -= p * libm::log2(p);
    }
    entropy
}

/// Largest histogram entropy over `alphabet` symbols.
pub fn max_entropy(alphabet: usize) -> f64 {
    libm::log2(alphabet as f64)
}

/// Largest joint pair entropy over `alphabet` symbols.
pub fn max_markov(alphabet: usize) -> f64 {
    2.0 * max_entropy(alphabet)
}

/// Symbol frequency counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    counts: Box<[u64]>,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    pub fn new() -> Self {
        Histogram {
            counts: vec![0; SYMBOLS].into_boxed_slice(),
        }
    }

    pub fn add(&mut self, symbol: u8) {
        self.counts[symbol as usize] += 1;
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn entropy(&self) -> f64 {
        entropy_of(self.counts.iter())
    }
}

impl Extend<u8> for Histogram {
    fn extend<T: IntoIterator<Item = u8>>(&mut self, iter: T) {
        for symbol in iter {
            self.add(symbol);
        }
    }
}

/// Order-1 transition counts between consecutive symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markov {
    /// Row-major `[previous][next]`
    model: Box<[u64]>,
    state: Option<u8>,
}

impl Default for Markov {
    fn default() -> Self {
        Self::new()
    }
}

impl Markov {
    pub fn new() -> Self {
        Markov {
            model: vec![0; SYMBOLS * SYMBOLS].into_boxed_slice(),
            state: None,
        }
    }

    /// Records a symbol; the first one only sets the current state.
    pub fn add(&mut self, symbol: u8) {
        if let Some(previous) = self.state {
            self.model[previous as usize * SYMBOLS + symbol as usize] += 1;
        }
        self.state = Some(symbol);
    }

    pub fn transition(&self, from: u8, to: u8) -> u64 {
        self.model[from as usize * SYMBOLS + to as usize]
    }

    /// Number of recorded pairs.
    pub fn transitions(&self) -> u64 {
        self.model.iter().sum()
    }

    pub fn state(&self) -> Option<u8> {
        self.state
    }

    /// Joint entropy of the pair table in bits.
    pub fn entropy(&self) -> f64 {
        entropy_of(self.model.iter())
    }
}

impl Extend<u8> for Markov {
    fn extend<T: IntoIterator<Item = u8>>(&mut self, iter: T) {
        for symbol in iter {
            self.add(symbol);
        }
    }
}
