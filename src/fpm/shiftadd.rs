//! Shift/add logarithm and exponential
//!
//! Both directions run on a Q30 mantissa and use only shifts, adds and the
//! `log2(1 + 2^-k)` table. `precision` is the number of table entries
//! consulted (capped at 30); more iterations trade time for accuracy.

use crate::config::SHIFTADD_FRAC_BITS;
use crate::error::{FpmError, FpmResult};
use crate::tables::SHIFTADD_AK;
use crate::types::QFormat;

/// Effective iteration count for a requested precision
fn iterations(precision: u32) -> usize {
    precision.min(SHIFTADD_FRAC_BITS) as usize
}

/// Shift a Q30 mantissa to `Q` scaling, rounding to nearest.
fn q30_to_raw<Q: QFormat>(v: i64) -> i64 {
    let shift = SHIFTADD_FRAC_BITS - Q::FRAC_BITS;
    (v + (1i64 << (shift - 1))) >> shift
}

/// `log2(x)` on a sign-extended raw value, not clipped.
pub(crate) fn log2_shiftadd_raw<Q: QFormat>(
    x: i64,
    precision: u32,
    op: &'static str,
) -> FpmResult<i64> {
    if x <= 0 {
        fpm_warn!("{}_{}(): x must be > 0", Q::NAME, op);
        return Err(FpmError::invalid_domain(op, "x must be > 0"));
    }

    let msb = i64::from(63 - x.leading_zeros());
    let int = msb - i64::from(Q::FRAC_BITS);
    let q = i64::from(SHIFTADD_FRAC_BITS);

    // mantissa in [1, 2)
    let mut m = if msb >= q { x >> (msb - q) } else { x << (q - msb) };

    // Drive m towards 2 by factors (1 + 2^-k); the logs of the applied
    // factors sum to 1 - log2(m).
    let two = 2i64 << SHIFTADD_FRAC_BITS;
    let mut t = 0i64;
    for (k, ak) in SHIFTADD_AK.iter().enumerate().take(iterations(precision)) {
        let next = m + (m >> (k + 1));
        if next < two {
            m = next;
            t += ak;
        }
    }

    let frac = (1i64 << SHIFTADD_FRAC_BITS) - t;
    Ok((int << Q::FRAC_BITS) + q30_to_raw::<Q>(frac))
}

/// `2^x` on a sign-extended raw value, not clipped.
pub(crate) fn exp2_shiftadd_raw<Q: QFormat>(x: i64, precision: u32) -> i64 {
    let b = x >> Q::FRAC_BITS;
    let f = x & ((1i64 << Q::FRAC_BITS) - 1);

    if b <= -i64::from(Q::FRAC_BITS) {
        return 0;
    }
    if b > i64::from(Q::INT_BITS) {
        return Q::MAX.to_raw();
    }

    // residual angle in Q30, product in Q30
    let mut r = f << (SHIFTADD_FRAC_BITS - Q::FRAC_BITS);
    let mut y = 1i64 << SHIFTADD_FRAC_BITS;
    for (k, &ak) in SHIFTADD_AK.iter().enumerate().take(iterations(precision)) {
        if r >= ak {
            r -= ak;
            y += y >> (k + 1);
        }
    }

    if b >= 0 {
        q30_to_raw::<Q>(y << b)
    } else {
        q30_to_raw::<Q>(y >> -b)
    }
}

/// Computes `log2(x)` with `precision` shift/add iterations.
///
/// # Errors
///
/// Returns [`FpmError::InvalidDomain`] when `x <= 0`.
pub fn log2_shiftadd<Q: QFormat>(x: Q, precision: u32) -> FpmResult<Q> {
    log2_shiftadd_raw::<Q>(x.to_raw(), precision, "log2_shiftadd").map(Q::from_raw_saturating)
}

/// Computes `2^x` with `precision` shift/add iterations.
///
/// Flushes to zero and saturates exactly like [`exp2_frac`](super::exp2_frac).
#[must_use]
pub fn exp2_shiftadd<Q: QFormat>(x: Q, precision: u32) -> Q {
    Q::from_raw_saturating(exp2_shiftadd_raw::<Q>(x.to_raw(), precision))
}
