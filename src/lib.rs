//! Fixed-Point DSP Kernel Library
//!
//! This library provides the numerical core used by the SDR signal chain:
//! structured dot products for filters and resamplers, and fixed-point
//! transcendental functions for AGC and NCO style consumers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  DISPATCH (compile time)                     │
//! │        SSE2 backend  │  portable scalar backend              │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   DOT-PRODUCT ENGINE                         │
//! │   rrr (real·real)  │  crc (real·complex)  │  ccc (complex)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  TRANSCENDENTAL ENGINE                       │
//! │  exp2/exp/pow  │  log2  │  shift/add  │  CORDIC  │  sqrt     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 Q-FORMAT TYPES + TABLES                      │
//! │     Q16 (i16, 12 frac)  │  Q32 (i32, 20 frac)  │  build.rs   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Bit-exact backends**: SIMD and scalar dot products agree exactly
//! - **Explicit overflow policy**: accumulators wrap, scalar helpers saturate
//! - **No unsafe outside the SIMD backend**
//! - **Explicit error handling**: domain and length violations return `Err`
//!
//! # Example
//!
//! ```
//! use sdr_fpm::{DotProd, DotProdRrrQ16, QFormat, Q16};
//!
//! let h: Vec<Q16> = [0.5, 0.25, 0.125].iter().map(|&v| Q16::from_f32(v)).collect();
//! let x: Vec<Q16> = [1.0, 2.0, 4.0].iter().map(|&v| Q16::from_f32(v)).collect();
//!
//! let dp = DotProdRrrQ16::create(&h)?;
//! assert_eq!(dp.execute(&x)?, Q16::from_f32(1.5));
//! # Ok::<(), sdr_fpm::FpmError>(())
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

extern crate alloc;

#[macro_use]
mod macros;

/// Compile-time constants
pub mod config;

/// Structured dot products
pub mod dotprod;

/// Error types
pub mod error;

/// Transcendental functions
pub mod fpm;

/// Generated lookup tables
pub mod tables;

/// Q-format types
pub mod types;

pub use dotprod::{
    run4_ccc, run4_crc, run4_rrr, run_ccc, run_crc, run_rrr, DotProd, DotProdCccQ16,
    DotProdCccQ32, DotProdCrcQ16, DotProdCrcQ32, DotProdRrrQ16, DotProdRrrQ32,
};
pub use error::{FpmError, FpmResult};
pub use fpm::{
    cbrt_newton, cos_cordic, exp10_frac, exp2_frac, exp2_shiftadd, exp_frac, expm1_frac,
    log10_frac, log2_frac, log2_shiftadd, log_frac, pow_frac, quadrant_cordic, sin_cordic,
    sincos_cordic, sqrt_logexp_frac, sqrt_logexp_shiftadd, sqrt_newton,
};
pub use types::{Accumulator, Angle, Cq, Cq16, Cq32, QFormat, Q16, Q32};
