use alloc::vec;
use alloc::vec::Vec;
use rand::Rng;

/// Fixed-length circular bit-vector packed into 64-bit words.
///
/// Cell `p` lives in bit `p % 64` of word `p / 64`. The left neighbor of
/// cell 0 is the last cell and the right neighbor of the last cell is cell
/// 0; all wraparound goes through [`Bits::word_neighbors`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bits {
    words: Vec<u64>,
}

impl Bits {
    pub const WORD_BITS: usize = 64;

    pub fn zeros(words: usize) -> Self {
        Bits {
            words: vec![0; words],
        }
    }

    pub fn random<R: Rng + ?Sized>(words: usize, rng: &mut R) -> Self {
        Bits {
            words: (0..words).map(|_| rng.next_u64()).collect(),
        }
    }

    pub fn from_words(words: Vec<u64>) -> Self {
        Bits { words }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.words.len() * Self::WORD_BITS
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    pub fn word(&self, k: usize) -> u64 {
        self.words[k]
    }

    pub fn set_word(&mut self, k: usize, value: u64) {
        self.words[k] = value;
    }

    pub fn get(&self, p: usize) -> bool {
        (self.words[p / Self::WORD_BITS] >> (p % Self::WORD_BITS)) & 1 == 1
    }

    pub fn set(&mut self, p: usize, on: bool) {
        let mask = 1u64 << (p % Self::WORD_BITS);
        if on {
            self.words[p / Self::WORD_BITS] |= mask;
        } else {
            self.words[p / Self::WORD_BITS] &= !mask;
        }
    }

    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }

    /// Left, center and right neighbor planes for word `k`.
    ///
    /// Bit `j` of the left plane is the cell just below cell `64k + j`,
    /// bit `j` of the right plane the cell just above it, wrapping around the
    /// whole vector (and across word boundaries).
    #[inline]
    pub fn word_neighbors(&self, k: usize) -> (u64, u64, u64) {
        let n = self.words.len();
        let center = self.words[k];
        let below = self.words[(k + n - 1) % n];
        let above = self.words[(k + 1) % n];
        let left = (center << 1) | (below >> 63);
        let right = (center >> 1) | (above << 63);
        (left, center, right)
    }

    /// 3-bit neighborhood index of cell `p`: `left << 2 | self << 1 | right`.
    pub fn neighborhood(&self, p: usize) -> u8 {
        let (left, center, right) = self.word_neighbors(p / Self::WORD_BITS);
        let j = p % Self::WORD_BITS;
        ((((left >> j) & 1) << 2) | (((center >> j) & 1) << 1) | ((right >> j) & 1)) as u8
    }
}

/// Elementary CA rule: bit `i` of the rule number is the next value of a
/// cell whose neighborhood index is `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rule(pub u8);

impl Rule {
    #[inline]
    pub fn next(self, neighborhood: u8) -> bool {
        (self.0 >> (neighborhood & 0x7)) & 1 == 1
    }

    /// Applies the rule to 64 cells at once from their neighbor planes.
    #[inline]
    pub fn apply(self, left: u64, center: u64, right: u64) -> u64 {
        let mut next = 0;
        for pattern in 0..8u8 {
            if !self.next(pattern) {
                continue;
            }
            let l = if pattern & 0b100 != 0 { left } else { !left };
            let c = if pattern & 0b010 != 0 { center } else { !center };
            let r = if pattern & 0b001 != 0 { right } else { !right };
            next |= l & c & r;
        }
        next
    }
}
