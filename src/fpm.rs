//! Fixed-point transcendental functions
//!
//! Stateless, generic over [`QFormat`](crate::QFormat) and backed by the
//! read-only tables generated at build time:
//!
//! - `exp2`, `exp`, `exp10`, `pow`: fractional table + shift
//! - `log2`, `ln`, `log10`: mantissa table
//! - shift/add `log2`/`exp2` with caller-selected precision
//! - sin/cos by CORDIC rotation
//! - `sqrt` by Newton iteration or log/exp composition, `cbrt` by Newton
//!
//! Invalid arguments (negative sqrt input, non-positive log input) log a
//! warning and return [`FpmError::InvalidDomain`](crate::FpmError::InvalidDomain).

mod cordic;
mod exp2;
mod log2;
mod shiftadd;
mod sqrt;

pub use cordic::{cos_cordic, quadrant_cordic, sin_cordic, sincos_cordic};
pub use exp2::{exp10_frac, exp2_frac, exp_frac, expm1_frac, pow_frac};
pub use log2::{log10_frac, log2_frac, log_frac};
pub use shiftadd::{exp2_shiftadd, log2_shiftadd};
pub use sqrt::{cbrt_newton, sqrt_logexp_frac, sqrt_logexp_shiftadd, sqrt_newton};
