//! Deterministic 32-bit fixed-point numbers.
//!
//! `Fixed<F>` stores a raw `i32` with an implicit binary point `F` bits from
//! the right (`F` is one of the `fixed` crate's `U6`..`U16` markers, default
//! `U16`, i.e. Q16.16). Multiplication widens to `i64`, adds half a unit at
//! the dropped bit and shifts back. The oscillator dynamics are chaotic, so
//! this rounding has to be reproduced bit for bit: any other policy
//! diverges trajectories within a few hundred steps.
//!
//! In-loop arithmetic saturates at the `i32` bounds instead of wrapping.
//! Float conversion exists for construction and reporting only.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use fixed::types::extra::{LeEqU32, U16};
use fixed::FixedI32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, Result};

/// Signed fixed-point number with `F` fractional bits.
pub struct Fixed<F = U16> {
    bits: i32,
    frac: PhantomData<F>,
}

/// Q16.16, the format every network uses.
pub type Q16 = Fixed<U16>;

impl<F> Fixed<F> {
    /// Wraps raw bits without any scaling.
    pub const fn from_bits(bits: i32) -> Self {
        Fixed {
            bits,
            frac: PhantomData,
        }
    }

    pub const fn to_bits(self) -> i32 {
        self.bits
    }

    pub const fn is_negative(self) -> bool {
        self.bits < 0
    }
}

impl<F: LeEqU32> Fixed<F> {
    pub const FRAC_BITS: u32 = FixedI32::<F>::FRAC_NBITS;
    const ROUND: i64 = 1 << (Self::FRAC_BITS - 1);

    pub const ZERO: Self = Self::from_bits(0);
    pub const ONE: Self = Self::from_bits(1 << Self::FRAC_BITS);
    pub const HALF: Self = Self::from_bits(1 << (Self::FRAC_BITS - 1));
    pub const MAX: Self = Self::from_bits(i32::MAX);
    pub const MIN: Self = Self::from_bits(i32::MIN);

    /// Converts a float, rounding to nearest with ties away from zero.
    ///
    /// Fails when the scaled value leaves the `i32` range (NaN included).
    pub fn from_f64(value: f64) -> Result<Self> {
        let round = if value < 0.0 { -0.5 } else { 0.5 };
        let scaled = value * (1u64 << Self::FRAC_BITS) as f64 + round;
        if scaled.is_nan() || scaled > i32::MAX as f64 || scaled < i32::MIN as f64 {
            return Err(CoreError::FixedOverflow {
                value,
                frac_bits: Self::FRAC_BITS,
            });
        }
        Ok(Self::from_bits(scaled as i32))
    }

    /// Single-precision variant of [`Fixed::from_f64`]; the scaling happens in `f32`.
    pub fn from_f32(value: f32) -> Result<Self> {
        let round = if value < 0.0 { -0.5f32 } else { 0.5f32 };
        let scaled = value * (1u64 << Self::FRAC_BITS) as f32 + round;
        // 2^31 is exactly representable in f32, i32::MAX is not
        if scaled.is_nan() || scaled >= 2_147_483_648.0 || scaled < i32::MIN as f32 {
            return Err(CoreError::FixedOverflow {
                value: value as f64,
                frac_bits: Self::FRAC_BITS,
            });
        }
        Ok(Self::from_bits(scaled as i32))
    }

    pub fn to_f64(self) -> f64 {
        self.to_fixed().to_num::<f64>()
    }

    pub fn to_f32(self) -> f32 {
        self.to_fixed().to_num::<f32>()
    }

    /// The same bits viewed as a `fixed` crate number.
    pub fn to_fixed(self) -> FixedI32<F> {
        FixedI32::<F>::from_bits(self.bits)
    }

    /// `(a * b + half) >> F` in 64-bit, saturated back into 32 bits.
    #[inline]
    pub fn mul(self, rhs: Self) -> Self {
        let product = self.bits as i64 * rhs.bits as i64 + Self::ROUND;
        Self::saturate(product >> Self::FRAC_BITS)
    }

    #[inline]
    pub fn abs(self) -> Self {
        if self.bits < 0 {
            Self::from_bits(self.bits.saturating_neg())
        } else {
            self
        }
    }

    #[inline]
    pub fn saturating_add(self, rhs: Self) -> Self {
        Self::from_bits(self.bits.saturating_add(rhs.bits))
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self::from_bits(self.bits.saturating_sub(rhs.bits))
    }

    /// Divides the raw value by a count, truncating toward zero.
    ///
    /// This is how channel inputs are averaged; it is not a fixed-point
    /// division.
    #[inline]
    pub fn div_int(self, count: usize) -> Self {
        let divisor = i32::try_from(count).unwrap_or(i32::MAX).max(1);
        Self::from_bits(self.bits / divisor)
    }

    /// `magnitude` carrying the sign of `sign` (zero counts as positive).
    #[inline]
    pub fn with_sign_of(magnitude: Self, sign: Self) -> Self {
        if sign.bits < 0 {
            -magnitude
        } else {
            magnitude
        }
    }

    #[inline]
    fn saturate(wide: i64) -> Self {
        Self::from_bits(wide.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }
}

impl<F: LeEqU32> Add for Fixed<F> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl<F: LeEqU32> AddAssign for Fixed<F> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = self.saturating_add(rhs);
    }
}

impl<F: LeEqU32> Sub for Fixed<F> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

impl<F: LeEqU32> SubAssign for Fixed<F> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.saturating_sub(rhs);
    }
}

impl<F: LeEqU32> Mul for Fixed<F> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Fixed::mul(self, rhs)
    }
}

impl<F: LeEqU32> Neg for Fixed<F> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::from_bits(self.bits.saturating_neg())
    }
}

impl<F: LeEqU32> From<FixedI32<F>> for Fixed<F> {
    fn from(value: FixedI32<F>) -> Self {
        Self::from_bits(value.to_bits())
    }
}

// The marker type only selects the binary point, so none of these impls
// should require anything from it.

impl<F> Clone for Fixed<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for Fixed<F> {}

impl<F> Default for Fixed<F> {
    fn default() -> Self {
        Self::from_bits(0)
    }
}

impl<F> PartialEq for Fixed<F> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<F> Eq for Fixed<F> {}

impl<F> PartialOrd for Fixed<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F> Ord for Fixed<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bits.cmp(&other.bits)
    }
}

impl<F> Hash for Fixed<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<F: LeEqU32> fmt::Debug for Fixed<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({})", self.to_fixed())
    }
}

impl<F: LeEqU32> fmt::Display for Fixed<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_fixed(), f)
    }
}

// Serialized as the raw bits so a stored genome reloads bit-exact.
impl<F> Serialize for Fixed<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.bits)
    }
}

impl<'de, F> Deserialize<'de> for Fixed<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        i32::deserialize(deserializer).map(Self::from_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixed::types::extra::{U12, U6, U8};
    use fixed::types::I16F16;

    const VECTORS: [f64; 8] = [4.0, -4.0, 2.0, -2.0, 0.5, -0.5, 0.25, -0.25];

    #[test]
    fn test_roundtrip_f64() {
        for v in VECTORS {
            let a = Q16::from_f64(v).unwrap();
            assert_eq!(a.to_f64(), v, "{} did not survive the round trip", v);
        }
    }

    #[test]
    fn test_roundtrip_f32() {
        for v in VECTORS {
            let v = v as f32;
            let a = Q16::from_f32(v).unwrap();
            assert_eq!(a.to_f32(), v);
        }
    }

    #[test]
    fn test_roundtrip_at_resolution() {
        // Off-grid values come back within half a unit
        let unit = 1.0 / 65536.0;
        for v in [0.1, -0.3, 3.14159, -7.77, 1000.001] {
            let back = Q16::from_f64(v).unwrap().to_f64();
            assert!((back - v).abs() <= unit / 2.0, "{} -> {}", v, back);
        }
    }

    fn half_squared<F: LeEqU32>() -> f64 {
        let half = Fixed::<F>::from_f64(0.5).unwrap();
        half.mul(half).to_f64()
    }

    #[test]
    fn test_mul_half_every_format() {
        assert_eq!(half_squared::<U6>(), 0.25);
        assert_eq!(half_squared::<U8>(), 0.25);
        assert_eq!(half_squared::<U12>(), 0.25);
        assert_eq!(half_squared::<U16>(), 0.25);
        assert_eq!((Q16::HALF * Q16::HALF).to_f64(), 0.25);
    }

    #[test]
    fn test_mul_rounds_half_up_at_dropped_bit() {
        let lsb = Q16::from_bits(1);
        // 2^-16 * 0.5 = 2^-17: the tie rounds up to one unit
        assert_eq!(lsb.mul(Q16::HALF).to_bits(), 1);
        // and the negative tie rounds toward +inf, back to zero
        assert_eq!((-lsb).mul(Q16::HALF).to_bits(), 0);
        // three quarters of a unit rounds to one, a quarter rounds to zero
        assert_eq!(Q16::from_bits(3).mul(Q16::from_f64(0.25).unwrap()).to_bits(), 1);
        assert_eq!(lsb.mul(Q16::from_f64(0.25).unwrap()).to_bits(), 0);
    }

    #[test]
    fn test_mul_matches_reference_formula() {
        let pairs = [(1.5, -2.25), (-0.001, 3.0), (7.9, 7.9), (-123.456, -0.5)];
        for (a, b) in pairs {
            let (x, y) = (Q16::from_f64(a).unwrap(), Q16::from_f64(b).unwrap());
            let expected = ((x.to_bits() as i64 * y.to_bits() as i64 + 32768) >> 16) as i32;
            assert_eq!(x.mul(y).to_bits(), expected);
        }
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert!(matches!(
            Q16::from_f64(40000.0),
            Err(CoreError::FixedOverflow { frac_bits: 16, .. })
        ));
        assert!(Q16::from_f64(-40000.0).is_err());
        assert!(Q16::from_f64(f64::NAN).is_err());
        assert!(Q16::from_f32(1.0e6).is_err());
        // the same magnitude fits with fewer fractional bits
        assert!(Fixed::<U8>::from_f64(40000.0).is_ok());
    }

    #[test]
    fn test_arithmetic_saturates() {
        assert_eq!(Q16::MAX + Q16::ONE, Q16::MAX);
        assert_eq!(Q16::MIN - Q16::ONE, Q16::MIN);
        assert_eq!(Q16::MAX.mul(Q16::from_f64(2.0).unwrap()), Q16::MAX);
        assert_eq!(Q16::MIN.abs(), Q16::MAX);
        assert_eq!(-Q16::MIN, Q16::MAX);
    }

    #[test]
    fn test_abs_and_sign() {
        let a = Q16::from_f64(-1.25).unwrap();
        assert_eq!(a.abs().to_f64(), 1.25);
        assert_eq!(Q16::ONE.abs(), Q16::ONE);
        let eight = Q16::from_f64(8.0).unwrap();
        assert_eq!(Q16::with_sign_of(eight, a).to_f64(), -8.0);
        assert_eq!(Q16::with_sign_of(eight, Q16::ZERO).to_f64(), 8.0);
    }

    #[test]
    fn test_div_int_truncates_toward_zero() {
        let sum = Q16::from_bits(-7);
        assert_eq!(sum.div_int(2).to_bits(), -3);
        assert_eq!(Q16::from_f64(3.0).unwrap().div_int(3), Q16::ONE);
        assert_eq!(Q16::ONE.div_int(0), Q16::ONE);
    }

    #[test]
    fn test_interop_with_fixed_crate() {
        let a = Q16::from_f64(2.5).unwrap();
        assert_eq!(a.to_fixed(), I16F16::from_num(2.5));
        assert_eq!(Q16::from(I16F16::from_num(-0.75)).to_f64(), -0.75);
        assert_eq!(alloc::format!("{}", a), "2.5");
    }

    #[test]
    fn test_serde_keeps_raw_bits() {
        let a = Q16::from_bits(-123_457);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "-123457");
        let back: Q16 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }
}
