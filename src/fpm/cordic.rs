//! Sine and cosine by CORDIC rotation
//!
//! The vector `(K, 0)` is rotated by `±atan(2^-i)` for `i = 0..n`, steering
//! the residual angle towards zero. Rotations are shifts and adds only.
//! CORDIC converges for `|θ| < Σ atan(2^-i) ≈ 1.743`, so the input is first
//! folded into `[-π/2, π/2]`.

use crate::types::{Angle, QFormat};

/// Computes `(sin θ, cos θ)` with `n` CORDIC iterations.
///
/// `theta` must lie in `[-2π, 2π]`; a single `±2π` correction is applied.
/// `n` is capped at the container width. The gain compensation matches the
/// effective iteration count, so the output magnitude is close to one for
/// every `n`; `n == 0` returns the unrotated vector `(0, ±1)`.
///
/// # Example
///
/// ```
/// use sdr_fpm::{sincos_cordic, Angle, QFormat, Q32};
///
/// let (sin, cos) = sincos_cordic(Angle::<Q32>::from_radians(0.5), 32);
/// assert!((sin.to_f32() - 0.479_425_5).abs() < 1e-3);
/// assert!((cos.to_f32() - 0.877_582_6).abs() < 1e-3);
/// ```
#[must_use]
pub fn sincos_cordic<Q: QFormat>(theta: Angle<Q>, n: u32) -> (Q, Q) {
    let pi = Angle::<Q>::pi().raw();
    let pi_by_2 = Angle::<Q>::pi_by_2().raw();
    let two_pi = Angle::<Q>::two_pi().raw();

    // constrain to [-π, π]
    let mut z = theta.raw();
    if z >= pi {
        z -= two_pi;
    } else if z <= -pi {
        z += two_pi;
    }

    // fold into [-π/2, π/2], undone by negation at the end
    let invert = if z > pi_by_2 {
        z -= pi;
        true
    } else if z < -pi_by_2 {
        z += pi;
        true
    } else {
        false
    };

    let tables = Q::tables();
    let n = n.min(Q::BITS) as usize;
    let mut x: i64 = match n.checked_sub(1) {
        Some(last) => tables.cordic_k_inv[last].into(),
        None => Q::ONE.to_raw(),
    };
    let mut y = 0i64;

    for (i, &ak) in tables.cordic_ak.iter().enumerate().take(n) {
        let ak: i64 = ak.into();
        let (dx, dy) = (y >> i, x >> i);
        if z >= 0 {
            x -= dx;
            y += dy;
            z -= ak;
        } else {
            x += dx;
            y -= dy;
            z += ak;
        }
    }

    if invert {
        x = -x;
        y = -y;
    }

    (Q::from_raw_saturating(y), Q::from_raw_saturating(x))
}

/// Computes `sin θ` with `n` CORDIC iterations.
#[must_use]
pub fn sin_cordic<Q: QFormat>(theta: Angle<Q>, n: u32) -> Q {
    sincos_cordic(theta, n).0
}

/// Computes `cos θ` with `n` CORDIC iterations.
#[must_use]
pub fn cos_cordic<Q: QFormat>(theta: Angle<Q>, n: u32) -> Q {
    sincos_cordic(theta, n).1
}

/// Quadrant `0..=3` of an angle in `[-2π, 2π)`, read from the top bits.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn quadrant_cordic<Q: QFormat>(theta: Angle<Q>) -> u32 {
    let mut t = theta.raw();
    if t < 0 {
        t += Angle::<Q>::two_pi().raw();
    }
    ((t >> (Q::BITS - 3)) & 0x3) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Q16, Q32};

    #[test]
    fn test_zero_angle() {
        let (s, c) = sincos_cordic(Angle::<Q32>::from_raw(0), 32);
        assert!(s.to_f32().abs() < 1e-5);
        assert!((c.to_f32() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_no_iterations_returns_unit_vector() {
        let (s, c) = sincos_cordic(Angle::<Q16>::from_radians(0.3), 0);
        assert_eq!(s, Q16::ZERO);
        assert_eq!(c, <Q16 as QFormat>::ONE);

        let (_, c) = sincos_cordic(Angle::<Q16>::from_radians(3.0), 0);
        assert_eq!(c, Q16::from_f32(-1.0));
    }

    #[test]
    fn test_gain_tracks_iteration_count() {
        for n in 1..=16 {
            let (s, c) = sincos_cordic(Angle::<Q32>::from_radians(0.7), n);
            let mag = (s.to_f32().powi(2) + c.to_f32().powi(2)).sqrt();
            assert!((mag - 1.0).abs() < 1e-3, "n = {n}: |v| = {mag}");
        }
    }

    #[test]
    fn test_quadrants() {
        assert_eq!(quadrant_cordic(Angle::<Q32>::from_radians(0.5)), 0);
        assert_eq!(quadrant_cordic(Angle::<Q32>::from_radians(2.0)), 1);
        assert_eq!(quadrant_cordic(Angle::<Q32>::from_radians(-2.0)), 2);
        assert_eq!(quadrant_cordic(Angle::<Q16>::from_radians(-0.5)), 3);
    }
}
