use alloc::string::String;
use core::fmt;

/// Fatal construction-time failures.
///
/// Full channel buffers and empty inboxes are normal steady-state behavior
/// and never show up here.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A float does not fit the fixed-point backing integer once scaled.
    FixedOverflow { value: f64, frac_bits: u32 },
    /// Two gene arrays (or a gene array and a network) disagree on length.
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A configuration value is outside its usable range.
    InvalidConfig(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::FixedOverflow { value, frac_bits } => write!(
                f,
                "{} does not fit a 32-bit fixed-point number with {} fractional bits",
                value, frac_bits
            ),
            CoreError::ShapeMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "shape mismatch in {}: expected {} genes, got {}",
                field, expected, actual
            ),
            CoreError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CoreError {}

pub type Result<T> = core::result::Result<T, CoreError>;

/// Fails with [`CoreError::ShapeMismatch`] unless the lengths agree.
pub(crate) fn expect_len(field: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(CoreError::ShapeMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}
