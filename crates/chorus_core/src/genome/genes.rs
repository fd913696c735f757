//! Flat, typed gene arrays and the operators that act on them.

use alloc::vec::Vec;
use core::fmt;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::fixed_point::Fixed;

/// An evolvable flat array of one element type.
pub trait Genes: Clone {
    type Item: Copy;

    /// Name used in shape errors.
    const KIND: &'static str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, i: usize) -> Self::Item;

    fn set(&mut self, i: usize, value: Self::Item);

    fn swap(&mut self, i: usize, j: usize);

    /// Splits into `[..k]` and `[k..]`.
    fn split(&self, k: usize) -> (Self, Self);

    /// Appends `other`.
    fn merge(&mut self, other: Self);
}

macro_rules! gene_array {
    ($(#[$meta:meta])* $name:ident, $item:ty, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Vec<$item>);

        impl Genes for $name {
            type Item = $item;
            const KIND: &'static str = $kind;

            fn len(&self) -> usize {
                self.0.len()
            }

            fn get(&self, i: usize) -> $item {
                self.0[i]
            }

            fn set(&mut self, i: usize, value: $item) {
                self.0[i] = value;
            }

            fn swap(&mut self, i: usize, j: usize) {
                self.0.swap(i, j);
            }

            fn split(&self, k: usize) -> (Self, Self) {
                let (a, b) = self.0.split_at(k);
                ($name(a.to_vec()), $name(b.to_vec()))
            }

            fn merge(&mut self, other: Self) {
                self.0.extend(other.0);
            }
        }

        impl From<Vec<$item>> for $name {
            fn from(values: Vec<$item>) -> Self {
                $name(values)
            }
        }

        impl core::ops::Deref for $name {
            type Target = [$item];

            fn deref(&self) -> &[$item] {
                &self.0
            }
        }
    };
}

gene_array!(
    /// Edge switches of a connection matrix.
    BoolGenes,
    bool,
    "bool genes"
);
gene_array!(
    /// Small integers, e.g. channel delays.
    ByteGenes,
    u8,
    "byte genes"
);
gene_array!(
    /// Q16.16 parameters.
    FixedGenes,
    Fixed,
    "fixed genes"
);

impl fmt::Display for BoolGenes {
    /// 1-based positions of the set genes, space separated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for (i, &on) in self.0.iter().enumerate() {
            if on {
                write!(f, "{}{}", sep, i + 1)?;
                sep = " ";
            }
        }
        Ok(())
    }
}

/// Swaps two random positions, `n` times.
pub fn permute<G: Genes, R: Rng + ?Sized>(genes: &mut G, n: usize, rng: &mut R) {
    let len = genes.len();
    if len < 2 {
        return;
    }
    for _ in 0..n {
        let i = rng.gen_range(0..len);
        let j = rng.gen_range(0..len);
        genes.swap(i, j);
    }
}

/// N-point crossover: exchanges every other segment between `a` and `b`.
///
/// Up to `n` distinct cut points are drawn from `1..len`; the first segment
/// stays, the second is exchanged, and so on.
pub fn cross_points<G: Genes, R: Rng + ?Sized>(
    a: &mut G,
    b: &mut G,
    n: usize,
    rng: &mut R,
) -> Result<()> {
    if a.len() != b.len() {
        return Err(CoreError::ShapeMismatch {
            field: G::KIND,
            expected: a.len(),
            actual: b.len(),
        });
    }
    let len = a.len();
    if len < 2 || n == 0 {
        return Ok(());
    }
    let mut cuts: Vec<usize> = index::sample(rng, len - 1, n.min(len - 1))
        .into_iter()
        .map(|c| c + 1)
        .collect();
    cuts.sort_unstable();
    cuts.push(len);

    let mut start = 0;
    for (segment, &end) in cuts.iter().enumerate() {
        if segment % 2 == 1 {
            for i in start..end {
                let x = a.get(i);
                a.set(i, b.get(i));
                b.set(i, x);
            }
        }
        start = end;
    }
    Ok(())
}
