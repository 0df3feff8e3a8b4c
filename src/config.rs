//! Compile-time configuration for the fixed-point kernels
//!
//! Format parameters, table resolution and default iteration budgets are
//! centralised here. The lookup tables in `build.rs` are generated for the
//! same values.

/// Fractional bits of the 16-bit format (1 sign + 3 integer bits)
pub const Q16_FRAC_BITS: u32 = 12;

/// Fractional bits of the 32-bit format (1 sign + 11 integer bits)
pub const Q32_FRAC_BITS: u32 = 20;

/// Index bits of the fractional exp2/log2 tables (256 entries)
pub const EXP2_TABLE_BITS: u32 = 8;

/// Fractional bits of the internal shift/add mantissa
pub const SHIFTADD_FRAC_BITS: u32 = 30;

/// Dot-product length at which the SIMD backend switches to its unrolled loop
pub const DOTPROD_UNROLL_THRESHOLD: usize = 64;

/// CORDIC iterations giving full precision for both formats
pub const DEFAULT_CORDIC_ITERATIONS: u32 = 32;

/// Newton iteration cap for `sqrt_newton` / `cbrt_newton`
pub const DEFAULT_NEWTON_ITERATIONS: u32 = 16;

/// Default iteration count for the shift/add log2 and exp2
pub const DEFAULT_SHIFTADD_PRECISION: u32 = 16;
