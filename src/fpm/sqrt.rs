//! Square and cube roots
//!
//! Newton iteration with a power-of-two seed, or a `2^(log2(x)/2)`
//! composition over either log/exp backend.

use crate::error::{FpmError, FpmResult};
use crate::types::QFormat;

use super::exp2::exp2_frac_raw;
use super::log2::log2_frac_raw;
use super::shiftadd::{exp2_shiftadd_raw, log2_shiftadd_raw};

/// 1-based index of the most significant set bit
fn msb_index(x: i64) -> i64 {
    i64::from(64 - x.leading_zeros())
}

/// Raw `(a << FRAC_BITS) / b` clipped to the container, `b > 0`.
fn div_raw<Q: QFormat>(a: i64, b: i64) -> i64 {
    ((a << Q::FRAC_BITS) / b).clamp(Q::MIN.to_raw(), Q::MAX.to_raw())
}

fn check_non_negative<Q: QFormat>(x: Q, op: &'static str) -> FpmResult<i64> {
    let raw = x.to_raw();
    if raw < 0 {
        fpm_warn!("{}_{}(): x must be >= 0", Q::NAME, op);
        return Err(FpmError::invalid_domain(op, "x must be >= 0"));
    }
    Ok(raw)
}

/// Computes `sqrt(x)` with at most `n` Newton iterations.
///
/// The seed is `2^((msb - F) / 2)`, the iteration `x1 = (x0 + x/x0) / 2`
/// stops early once a step changes the estimate by less than one unit.
/// `n == 0` returns the seed.
///
/// # Errors
///
/// Returns [`FpmError::InvalidDomain`] for negative input.
pub fn sqrt_newton<Q: QFormat>(x: Q, n: u32) -> FpmResult<Q> {
    let raw = check_non_negative(x, "sqrt_newton")?;
    if raw == 0 {
        return Ok(Q::ZERO);
    }

    let frac_bits = i64::from(Q::FRAC_BITS);
    let mut x0 = 1i64 << ((msb_index(raw) - frac_bits) / 2 + frac_bits);
    let mut x1 = x0;

    for _ in 0..n {
        if x0 == 0 {
            x0 = 1;
        }
        x1 = (x0 + div_raw::<Q>(raw, x0)) / 2;

        if (x1 - x0).abs() < 1 {
            break;
        }
        x0 = x1;
    }

    Ok(Q::from_raw_saturating(x1.abs()))
}

/// Computes `cbrt(x)` with at most `n` Newton iterations.
///
/// Odd-symmetric: `cbrt(-x) = -cbrt(x)`. The iteration is
/// `x1 = (2*x0 + x/x0^2) / 3` from a `2^((msb - F) / 3)` seed.
#[must_use]
pub fn cbrt_newton<Q: QFormat>(x: Q, n: u32) -> Q {
    let raw = x.to_raw();
    if raw == 0 {
        return Q::ZERO;
    }
    let mag = raw.abs();

    let frac_bits = i64::from(Q::FRAC_BITS);
    let mut x0 = 1i64 << ((msb_index(mag) - frac_bits) / 3 + frac_bits);
    let mut x1 = x0;

    for _ in 0..n {
        if x0 == 0 {
            x0 = 1;
        }
        let q = div_raw::<Q>(div_raw::<Q>(mag, x0), x0);
        x1 = (2 * x0 + q) / 3;

        if (x1 - x0).abs() < 1 {
            break;
        }
        x0 = x1;
    }

    Q::from_raw_saturating(x1.abs() * raw.signum())
}

/// Computes `sqrt(x)` as `2^(log2(x) / 2)` over the lookup tables.
///
/// # Errors
///
/// Returns [`FpmError::InvalidDomain`] for negative input.
pub fn sqrt_logexp_frac<Q: QFormat>(x: Q) -> FpmResult<Q> {
    let raw = check_non_negative(x, "sqrt_logexp_frac")?;
    if raw == 0 {
        return Ok(Q::ZERO);
    }
    let log2_x = log2_frac_raw::<Q>(raw, "sqrt_logexp_frac")?;
    Ok(Q::from_raw_saturating(exp2_frac_raw::<Q>(log2_x >> 1)))
}

/// Computes `sqrt(x)` as `2^(log2(x) / 2)` over the shift/add backend.
///
/// # Errors
///
/// Returns [`FpmError::InvalidDomain`] for negative input.
pub fn sqrt_logexp_shiftadd<Q: QFormat>(x: Q, precision: u32) -> FpmResult<Q> {
    let raw = check_non_negative(x, "sqrt_logexp_shiftadd")?;
    if raw == 0 {
        return Ok(Q::ZERO);
    }
    let log2_x = log2_shiftadd_raw::<Q>(raw, precision, "sqrt_logexp_shiftadd")?;
    Ok(Q::from_raw_saturating(exp2_shiftadd_raw::<Q>(log2_x >> 1, precision)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Q16, Q32};

    #[test]
    fn test_sqrt_newton_exact_squares() {
        assert_eq!(sqrt_newton(Q32::from_f32(4.0), 16), Ok(Q32::from_f32(2.0)));
        assert_eq!(sqrt_newton(Q16::from_f32(0.25), 16), Ok(Q16::from_f32(0.5)));
    }

    #[test]
    fn test_sqrt_newton_smallest_step() {
        // sqrt(2^-12) = 2^-6
        assert_eq!(sqrt_newton(Q16::from_bits(1), 16), Ok(Q16::from_bits(64)));
    }

    #[test]
    fn test_sqrt_newton_zero_iterations_returns_seed() {
        // msb_index(4.0 in Q32) = 23, seed = 2^((23 - 20)/2 + 20)
        assert_eq!(sqrt_newton(Q32::from_f32(4.0), 0), Ok(Q32::from_f32(2.0)));
    }

    #[test]
    fn test_negative_input_is_domain_error() {
        let err = FpmError::invalid_domain("sqrt_newton", "x must be >= 0");
        assert_eq!(sqrt_newton(Q16::from_f32(-1.0), 16), Err(err));
        assert!(sqrt_logexp_frac(Q32::from_f32(-0.5)).is_err());
        assert!(sqrt_logexp_shiftadd(Q32::from_f32(-0.5), 16).is_err());
    }

    #[test]
    fn test_cbrt_newton_sign_symmetric() {
        let pos = cbrt_newton(Q32::from_f32(27.0), 32);
        let neg = cbrt_newton(Q32::from_f32(-27.0), 32);
        assert!((pos.to_f32() - 3.0).abs() < 1e-4);
        assert_eq!(neg.to_raw(), -pos.to_raw());
    }
}
