//! Table-driven exponentials
//!
//! `2^x` is split as `2^s * 2^f` with `s = floor(x)` and `f` in `[0, 1)`.
//! `2^f` comes from a 256-entry table indexed by the top 8 bits of `f`,
//! `2^s` is a bit shift. Fast, but only as accurate as the 8-bit index.

use crate::config::EXP2_TABLE_BITS;
use crate::error::FpmResult;
use crate::types::QFormat;

use super::log2::log2_frac_raw;

/// `2^x` on sign-extended raw values, result not yet clipped to the container.
///
/// Returns exactly zero once the integer part reaches `-FRAC_BITS`. Large
/// positive integer parts return `Q::MAX`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn exp2_frac_raw<Q: QFormat>(x: i64) -> i64 {
    let frac_bits = i64::from(Q::FRAC_BITS);
    let b = x >> Q::FRAC_BITS;
    let f = x & ((1i64 << Q::FRAC_BITS) - 1);

    if b <= -frac_bits {
        return 0;
    }
    if b > i64::from(Q::INT_BITS) {
        return Q::MAX.to_raw();
    }

    let index = ((f >> (Q::FRAC_BITS - EXP2_TABLE_BITS)) & 0xff) as usize;
    let y: i64 = Q::tables().exp2_frac[index].into();

    if b > 0 {
        y << b
    } else {
        y >> -b
    }
}

/// Multiply two raw values in `Q` scaling without clipping.
fn mul_raw<Q: QFormat>(a: i64, b: i64) -> i64 {
    (a * b) >> Q::FRAC_BITS
}

/// Computes `2^x` using the fractional lookup table.
///
/// `exp2_frac(0)` is exactly one. Results below the smallest step flush to
/// zero and results above the range saturate at `Q::MAX`.
#[must_use]
pub fn exp2_frac<Q: QFormat>(x: Q) -> Q {
    Q::from_raw_saturating(exp2_frac_raw::<Q>(x.to_raw()))
}

/// Computes `e^x` as `2^(x * log2(e))`.
#[must_use]
pub fn exp_frac<Q: QFormat>(x: Q) -> Q {
    let log2_e: i64 = Q::tables().log2_e.into();
    Q::from_raw_saturating(exp2_frac_raw::<Q>(mul_raw::<Q>(x.to_raw(), log2_e)))
}

/// Computes `e^x - 1`.
#[must_use]
pub fn expm1_frac<Q: QFormat>(x: Q) -> Q {
    Q::from_raw_saturating(exp_frac(x).to_raw() - Q::ONE.to_raw())
}

/// Computes `10^x` as `2^(x * log2(10))`.
#[must_use]
pub fn exp10_frac<Q: QFormat>(x: Q) -> Q {
    let log2_10: i64 = Q::tables().log2_10.into();
    Q::from_raw_saturating(exp2_frac_raw::<Q>(mul_raw::<Q>(x.to_raw(), log2_10)))
}

/// Computes `b^x` as `2^(x * log2(b))`.
///
/// # Errors
///
/// Returns [`FpmError::InvalidDomain`](crate::FpmError::InvalidDomain) when `b <= 0`.
pub fn pow_frac<Q: QFormat>(b: Q, x: Q) -> FpmResult<Q> {
    let log2_b = log2_frac_raw::<Q>(b.to_raw(), "pow_frac")?;
    Ok(Q::from_raw_saturating(exp2_frac_raw::<Q>(mul_raw::<Q>(x.to_raw(), log2_b))))
}
