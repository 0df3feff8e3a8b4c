//! Transcendental Function Tests
//!
//! Accuracy of exp/log, CORDIC and sqrt against f64 references.
//! Run with: cargo test --features std --test fpm_tests

use sdr_fpm::config::{
    DEFAULT_CORDIC_ITERATIONS, DEFAULT_NEWTON_ITERATIONS, DEFAULT_SHIFTADD_PRECISION,
};
use sdr_fpm::{
    cbrt_newton, cos_cordic, exp10_frac, exp2_frac, exp2_shiftadd, exp_frac, expm1_frac,
    log10_frac, log2_frac, log2_shiftadd, log_frac, pow_frac, quadrant_cordic, sin_cordic,
    sincos_cordic, sqrt_logexp_frac, sqrt_logexp_shiftadd, sqrt_newton, Angle, FpmError, QFormat,
    Q16, Q32,
};

/// Accuracy target used throughout: `exp(-sqrt(fractional bits))`
fn tol<Q: QFormat>() -> f32 {
    (-(Q::FRAC_BITS as f32).sqrt()).exp()
}

/// 77 evenly spaced points in `[0, 0.99 * MAX)`
fn sweep<Q: QFormat>() -> impl Iterator<Item = f32> {
    const STEPS: usize = 77;
    let xmax = Q::MAX.to_f32() * 0.99;
    let dx = xmax / STEPS as f32;
    (0..STEPS).map(move |i| i as f32 * dx)
}

// =============================================================================
// exp2 / exp / pow Tests
// =============================================================================

#[test]
fn test_exp2_frac_zero_is_exactly_one() {
    assert_eq!(exp2_frac(Q16::ZERO), <Q16 as QFormat>::ONE);
    assert_eq!(exp2_frac(Q32::ZERO), <Q32 as QFormat>::ONE);
}

#[test]
fn test_exp2_frac_q16_accuracy() {
    let tol = tol::<Q16>();
    let mut x = -4.0f32;
    while x < 2.9 {
        let y = exp2_frac(Q16::from_f32(x)).to_f32();
        let yf = Q16::from_f32(x).to_f32().exp2();
        assert!((y - yf).abs() < tol, "exp2({x}) = {y}, expected {yf}");
        x += 0.173;
    }
}

#[test]
fn test_exp2_frac_q32_relative_accuracy() {
    let mut x = -10.0f32;
    while x < 10.0 {
        let y = f64::from(exp2_frac(Q32::from_f32(x)).to_f32());
        let yf = f64::from(x).exp2();
        assert!(
            (y - yf).abs() <= 0.005 * yf + 2e-6,
            "exp2({x}) = {y}, expected {yf}"
        );
        x += 0.37;
    }
}

#[test]
fn test_exp2_frac_underflow_and_saturation() {
    // 2^-25 is below the Q32 step
    assert_eq!(exp2_frac(Q32::from_f32(-25.0)), Q32::ZERO);
    assert_eq!(exp2_frac(Q16::from_f32(7.5)), <Q16 as QFormat>::MAX);
    assert_eq!(exp2_frac(Q32::from_f32(11.5)), <Q32 as QFormat>::MAX);
}

#[test]
fn test_exp_and_exp10() {
    for &x in &[-2.0f32, -0.5, 0.0, 0.3, 1.0, 2.5] {
        let y = exp_frac(Q32::from_f32(x)).to_f32();
        assert!((y - x.exp()).abs() <= 0.006 * x.exp(), "exp({x}) = {y}");

        let y = expm1_frac(Q32::from_f32(x)).to_f32();
        assert!((y - x.exp_m1()).abs() <= 0.006 * x.exp(), "expm1({x}) = {y}");
    }
    for &x in &[-1.0f32, 0.0, 0.5, 1.5, 3.0] {
        let y = exp10_frac(Q32::from_f32(x)).to_f32();
        let yf = 10f32.powf(x);
        assert!((y - yf).abs() <= 0.006 * yf, "exp10({x}) = {y}");
    }
}

#[test]
fn test_pow_frac() {
    for &(b, x) in &[(2.5f32, 1.7f32), (10.0, 0.5), (0.5, 3.0), (7.0, -1.0)] {
        let y = pow_frac(Q32::from_f32(b), Q32::from_f32(x)).map(QFormat::to_f32);
        let yf = b.powf(x);
        assert!(
            y.is_ok_and(|y| (y - yf).abs() <= 0.02 * yf),
            "pow({b}, {x}) = {y:?}, expected {yf}"
        );
    }
}

#[test]
fn test_pow_frac_invalid_base() {
    let err = pow_frac(Q16::from_f32(-1.0), Q16::from_f32(2.0));
    assert!(matches!(err, Err(FpmError::InvalidDomain { op: "pow_frac", .. })));
}

// =============================================================================
// log2 Tests
// =============================================================================

#[test]
fn test_log2_frac_q32_accuracy() {
    let mut x = 0.01f32;
    while x < 2000.0 {
        let y = log2_frac(Q32::from_f32(x)).map(QFormat::to_f32);
        let yf = Q32::from_f32(x).to_f32().log2();
        assert!(y.is_ok_and(|y| (y - yf).abs() < 0.01), "log2({x}) = {y:?}, expected {yf}");
        x *= 1.37;
    }
}

#[test]
fn test_log_and_log10() {
    for &x in &[0.1f32, 0.9, 1.0, 2.718, 50.0, 1000.0] {
        let ln = log_frac(Q32::from_f32(x)).map(QFormat::to_f32);
        assert!(ln.is_ok_and(|y| (y - x.ln()).abs() < 0.01), "ln({x}) = {ln:?}");

        let lg = log10_frac(Q32::from_f32(x)).map(QFormat::to_f32);
        assert!(lg.is_ok_and(|y| (y - x.log10()).abs() < 0.01), "log10({x}) = {lg:?}");
    }
}

#[test]
fn test_log2_frac_domain() {
    assert!(log2_frac(Q32::ZERO).is_err());
    assert!(log2_frac(Q16::from_f32(-0.1)).is_err());
}

// =============================================================================
// Shift/Add Tests
// =============================================================================

#[test]
fn test_shiftadd_q16_accuracy() {
    let tol = tol::<Q16>();
    for &x in &[0.05f32, 0.5, 1.0, 3.3, 7.5] {
        let y = log2_shiftadd(Q16::from_f32(x), DEFAULT_SHIFTADD_PRECISION).map(QFormat::to_f32);
        let yf = Q16::from_f32(x).to_f32().log2();
        assert!(y.is_ok_and(|y| (y - yf).abs() < tol), "log2({x}) = {y:?}");
    }
    for &x in &[-6.0f32, -1.5, 0.0, 0.6, 2.95] {
        let y = exp2_shiftadd(Q16::from_f32(x), DEFAULT_SHIFTADD_PRECISION).to_f32();
        assert!((y - x.exp2()).abs() < tol, "exp2({x}) = {y}");
    }
}

#[test]
fn test_shiftadd_precision_improves_accuracy() {
    let x = Q32::from_f32(1.9);
    let coarse = log2_shiftadd(x, 4).map(QFormat::to_f32).unwrap_or(f32::NAN);
    let fine = log2_shiftadd(x, 24).map(QFormat::to_f32).unwrap_or(f32::NAN);
    let truth = 1.9f32.log2();
    assert!((fine - truth).abs() < (coarse - truth).abs());
    assert!((fine - truth).abs() < 1e-4);
}

// =============================================================================
// CORDIC Tests
// =============================================================================

/// `(theta, cos, sin)` reference points
const NCO_PHASES: [(f32, f32, f32); 20] = [
    (-6.283185307, 1.000000000, 0.000000000),
    (-6.195739393, 0.996179042, 0.087334510),
    (-5.951041106, 0.945345356, 0.326070787),
    (-5.131745978, 0.407173250, 0.913350943),
    (-4.748043551, 0.035647016, 0.999364443),
    (-3.041191113, -0.994963998, -0.100232943),
    (-1.947799864, -0.368136099, -0.929771914),
    (-1.143752030, 0.414182352, -0.910193924),
    (-1.029377689, 0.515352252, -0.856978446),
    (-0.174356887, 0.984838307, -0.173474811),
    (-0.114520496, 0.993449692, -0.114270338),
    (0.000000000, 1.000000000, 0.000000000),
    (1.436080000, 0.134309213, 0.990939471),
    (2.016119855, -0.430749878, 0.902471353),
    (2.996498473, -0.989492293, 0.144585621),
    (3.403689755, -0.965848729, -0.259106603),
    (3.591162483, -0.900634128, -0.434578148),
    (5.111428476, 0.388533479, -0.921434607),
    (5.727585681, 0.849584319, -0.527452828),
    (6.283185307, 1.000000000, -0.000000000),
];

fn check_nco_phases<Q: QFormat>() {
    for &(theta, cos, sin) in &NCO_PHASES {
        let (s, c) = sincos_cordic(Angle::<Q>::from_radians(theta), DEFAULT_CORDIC_ITERATIONS);
        let (s, c) = (s.to_f32(), c.to_f32());
        assert!((c - cos).abs() < 0.02, "{}: cos({theta}) = {c}, expected {cos}", Q::NAME);
        assert!((s - sin).abs() < 0.02, "{}: sin({theta}) = {s}, expected {sin}", Q::NAME);
    }
}

#[test]
fn test_cordic_reference_phases_q16() {
    check_nco_phases::<Q16>();
}

#[test]
fn test_cordic_reference_phases_q32() {
    check_nco_phases::<Q32>();
}

#[test]
fn test_cordic_pi() {
    let (s, c) = sincos_cordic(Angle::<Q32>::pi(), 32);
    assert!(s.to_f32().abs() < 1e-4);
    assert!((c.to_f32() + 1.0).abs() < 1e-4);
}

#[test]
fn test_cordic_sin_cos_agree_with_sincos() {
    let theta = Angle::<Q16>::from_radians(-2.2);
    let (s, c) = sincos_cordic(theta, 12);
    assert_eq!(sin_cordic(theta, 12), s);
    assert_eq!(cos_cordic(theta, 12), c);
}

#[test]
fn test_cordic_iteration_cap() {
    let theta = Angle::<Q16>::from_radians(0.9);
    assert_eq!(sincos_cordic(theta, 16), sincos_cordic(theta, 1000));
}

#[test]
fn test_cordic_more_iterations_more_precise() {
    let theta = Angle::<Q32>::from_radians(1.1);
    let err = |n| {
        let (s, c) = sincos_cordic(theta, n);
        (s.to_f32() - 1.1f32.sin()).abs() + (c.to_f32() - 1.1f32.cos()).abs()
    };
    assert!(err(24) < err(6));
    assert!(err(24) < 1e-4);
}

#[test]
fn test_quadrant() {
    for (theta, q) in [(0.3f32, 0), (1.8, 1), (3.5, 2), (5.0, 3), (-0.3, 3), (-2.0, 2)] {
        assert_eq!(quadrant_cordic(Angle::<Q32>::from_radians(theta)), q, "theta = {theta}");
    }
}

// =============================================================================
// sqrt / cbrt Tests
// =============================================================================

#[test]
fn test_q16_sqrt_newton() {
    let tol = tol::<Q16>();
    for x in sweep::<Q16>() {
        let y = sqrt_newton(Q16::from_f32(x), DEFAULT_NEWTON_ITERATIONS).map(QFormat::to_f32);
        assert!(y.is_ok_and(|y| (y - x.sqrt()).abs() < tol), "sqrt({x}) = {y:?}");
    }

    // small raw values
    for raw in [1i16, 2, 9, 141] {
        let x = Q16::from_bits(raw);
        let y = sqrt_newton(x, DEFAULT_NEWTON_ITERATIONS).map(QFormat::to_f32);
        let yf = x.to_f32().sqrt();
        assert!(y.is_ok_and(|y| (y - yf).abs() < tol), "sqrt(raw {raw}) = {y:?}");
    }
}

#[test]
fn test_q32_sqrt_newton() {
    let tol = tol::<Q32>();
    for x in sweep::<Q32>() {
        let y = sqrt_newton(Q32::from_f32(x), DEFAULT_NEWTON_ITERATIONS).map(QFormat::to_f32);
        assert!(y.is_ok_and(|y| (y - x.sqrt()).abs() < tol), "sqrt({x}) = {y:?}");
    }
}

#[test]
fn test_q16_sqrt_logexp_frac() {
    let tol = tol::<Q16>();
    for x in sweep::<Q16>() {
        let y = sqrt_logexp_frac(Q16::from_f32(x)).map(QFormat::to_f32);
        assert!(y.is_ok_and(|y| (y - x.sqrt()).abs() < tol), "sqrt({x}) = {y:?}");
    }
}

#[test]
fn test_q32_sqrt_logexp_frac() {
    // 8-bit tables bound the error relative to the result
    for x in sweep::<Q32>() {
        let yf = x.sqrt();
        let y = sqrt_logexp_frac(Q32::from_f32(x)).map(QFormat::to_f32);
        assert!(y.is_ok_and(|y| (y - yf).abs() <= 0.01 * yf + 0.03), "sqrt({x}) = {y:?}");
    }
}

#[test]
fn test_sqrt_logexp_shiftadd() {
    let tol16 = tol::<Q16>();
    for x in sweep::<Q16>() {
        let y = sqrt_logexp_shiftadd(Q16::from_f32(x), DEFAULT_SHIFTADD_PRECISION)
            .map(QFormat::to_f32);
        assert!(y.is_ok_and(|y| (y - x.sqrt()).abs() < tol16), "sqrt({x}) = {y:?}");
    }

    let tol32 = tol::<Q32>();
    for x in sweep::<Q32>() {
        let y = sqrt_logexp_shiftadd(Q32::from_f32(x), DEFAULT_SHIFTADD_PRECISION)
            .map(QFormat::to_f32);
        assert!(y.is_ok_and(|y| (y - x.sqrt()).abs() < tol32), "sqrt({x}) = {y:?}");
    }
}

#[test]
fn test_sqrt_negative_input() {
    for result in [
        sqrt_newton(Q32::from_f32(-4.0), 16),
        sqrt_logexp_frac(Q32::from_f32(-4.0)),
        sqrt_logexp_shiftadd(Q32::from_f32(-4.0), 16),
    ] {
        assert!(matches!(result, Err(FpmError::InvalidDomain { .. })));
    }
}

#[test]
fn test_sqrt_zero() {
    assert_eq!(sqrt_newton(Q16::ZERO, 16), Ok(Q16::ZERO));
    assert_eq!(sqrt_logexp_frac(Q32::ZERO), Ok(Q32::ZERO));
    assert_eq!(sqrt_logexp_shiftadd(Q32::ZERO, 16), Ok(Q32::ZERO));
}

#[test]
fn test_cbrt_newton() {
    let tol = tol::<Q16>();
    for &x in &[0.001f32, 0.2, 1.0, 3.375, 7.9, -0.5, -6.0] {
        let y = cbrt_newton(Q16::from_f32(x), DEFAULT_NEWTON_ITERATIONS).to_f32();
        assert!((y - x.cbrt()).abs() < tol, "cbrt({x}) = {y}");
    }
    assert_eq!(cbrt_newton(Q32::ZERO, 16), Q32::ZERO);
}

#[test]
fn test_q32_cbrt_newton() {
    let tol = tol::<Q32>();
    for &x in &[1.0f32, 0.5, -0.5, 0.8, 8.0, 1331.0, 0.125, -27.0, -2000.0] {
        let y = cbrt_newton(Q32::from_f32(x), DEFAULT_NEWTON_ITERATIONS).to_f32();
        assert!((y - x.cbrt()).abs() < tol, "cbrt({x}) = {y}");
    }
}
