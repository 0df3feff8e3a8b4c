//! Read-only lookup tables shared by the transcendental functions
//!
//! The data is generated by `build.rs` and embedded as constants.

/// Per-format constant tables, raw values in the format's own scaling.
#[derive(Debug)]
pub struct Tables<R: 'static> {
    /// `2^(i/256)` for `i` in `0..256`
    pub exp2_frac: [R; 256],
    /// `log2(1 + i/256)` for `i` in `0..256`
    pub log2_frac: [R; 256],
    /// `atan(2^-i)` in angle units, one entry per container bit
    pub cordic_ak: &'static [R],
    /// CORDIC gain compensation after `n` iterations, index `n - 1`
    pub cordic_k_inv: &'static [R],
    /// `log2(e)`
    pub log2_e: R,
    /// `log2(10)`
    pub log2_10: R,
    /// `ln(2)`
    pub ln_2: R,
    /// `log10(2)`
    pub log10_2: R,
}

include!(concat!(env!("OUT_DIR"), "/tables.rs"));
