//! Structured dot products
//!
//! A dot-product object copies a coefficient vector once and is then
//! executed repeatedly against input windows of the same length. Three
//! element kinds exist for each width:
//!
//! - `rrr`: real coefficients, real input, real output
//! - `crc`: real coefficients, complex input, complex output
//! - `ccc`: complex coefficients, complex input, complex output
//!
//! Accumulation happens in [`QFormat::Acc`] (twice the container width)
//! with two's complement wrap-around, and the result is shifted down by
//! `FRAC_BITS` once at the end. Because the accumulation is modular, every
//! summation order gives the same bits: the SSE2 and scalar backends are
//! exactly equal, not merely close.
//!
//! The backend behind the `DotProd*Q16` aliases is chosen at build time:
//! SSE2 on x86 targets with the feature enabled, the portable scalar code
//! everywhere else or when the `portable` cargo feature is on.

use alloc::vec::Vec;
use core::fmt;

use crate::error::{FpmError, FpmResult};
use crate::types::{Cq, QFormat, Q32};

pub mod portable;

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"))]
pub mod sse2;

pub use portable::{run4_ccc, run4_crc, run4_rrr, run_ccc, run_crc, run_rrr};

/// Common contract of every dot-product object
///
/// Dropping the object releases its coefficient storage; `Display` prints
/// the logical coefficients.
pub trait DotProd: Sized + fmt::Display {
    /// Coefficient element
    type Coeff: Copy;
    /// Input element
    type Input: Copy;
    /// Result
    type Output: Copy;

    /// Copy `coefficients` into a new object.
    ///
    /// # Errors
    ///
    /// [`FpmError::ZeroLength`] for an empty slice, [`FpmError::Allocation`]
    /// when storage cannot be reserved.
    fn create(coefficients: &[Self::Coeff]) -> FpmResult<Self>;

    /// Replace the coefficients, resizing if the length changed. On error
    /// the object keeps its previous coefficients.
    ///
    /// # Errors
    ///
    /// Same as [`DotProd::create`].
    fn recreate(&mut self, coefficients: &[Self::Coeff]) -> FpmResult<()>;

    /// Dot product of the stored coefficients with `input`.
    ///
    /// # Errors
    ///
    /// [`FpmError::LengthMismatch`] unless `input.len() == self.len()`.
    fn execute(&self, input: &[Self::Input]) -> FpmResult<Self::Output>;

    /// Logical coefficients, independent of the backend's storage layout
    fn coefficients(&self) -> &[Self::Coeff];

    /// Number of coefficients
    fn len(&self) -> usize {
        self.coefficients().len()
    }

    /// Always false for a successfully created object
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Backend selection
// ============================================================================

#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2",
    not(feature = "portable")
))]
mod selected {
    pub const BACKEND: &str = "sse2";
    pub type DotProdRrrQ16 = super::sse2::Sse2DotProdRrrQ16;
    pub type DotProdCrcQ16 = super::sse2::Sse2DotProdCrcQ16;
    pub type DotProdCccQ16 = super::sse2::Sse2DotProdCccQ16;
}

#[cfg(not(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2",
    not(feature = "portable")
)))]
mod selected {
    use crate::types::Q16;

    pub const BACKEND: &str = "portable";
    pub type DotProdRrrQ16 = super::portable::DotProdRrr<Q16>;
    pub type DotProdCrcQ16 = super::portable::DotProdCrc<Q16>;
    pub type DotProdCccQ16 = super::portable::DotProdCcc<Q16>;
}

/// Name of the backend behind the `Q16` aliases (`"sse2"` or `"portable"`)
pub const BACKEND: &str = selected::BACKEND;

/// Real × real, 16-bit
pub type DotProdRrrQ16 = selected::DotProdRrrQ16;
/// Real × complex, 16-bit
pub type DotProdCrcQ16 = selected::DotProdCrcQ16;
/// Complex × complex, 16-bit
pub type DotProdCccQ16 = selected::DotProdCccQ16;

// SSE2 has no signed 32x32->64 multiply; the wide formats are scalar only.

/// Real × real, 32-bit
pub type DotProdRrrQ32 = portable::DotProdRrr<Q32>;
/// Real × complex, 32-bit
pub type DotProdCrcQ32 = portable::DotProdCrc<Q32>;
/// Complex × complex, 32-bit
pub type DotProdCccQ32 = portable::DotProdCcc<Q32>;

// ============================================================================
// Shared helpers
// ============================================================================

/// Reserve exactly `len` elements.
pub(crate) fn try_vec<T>(len: usize) -> FpmResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| FpmError::Allocation { len })?;
    Ok(v)
}

/// Validated copy of a coefficient slice
pub(crate) fn copy_coefficients<T: Copy>(src: &[T]) -> FpmResult<Vec<T>> {
    if src.is_empty() {
        return Err(FpmError::ZeroLength);
    }
    let mut v = try_vec(src.len())?;
    v.extend_from_slice(src);
    Ok(v)
}

pub(crate) fn check_len(expected: usize, actual: usize) -> FpmResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(FpmError::LengthMismatch { expected, actual })
    }
}

pub(crate) fn fmt_real<Q: QFormat>(f: &mut fmt::Formatter<'_>, h: &[Q]) -> fmt::Result {
    writeln!(f, "dotprod [{} elements]:", h.len())?;
    for (i, v) in h.iter().enumerate() {
        writeln!(f, "  {i:4}: {:12.8}", v.to_f32())?;
    }
    Ok(())
}

pub(crate) fn fmt_complex<Q: QFormat>(f: &mut fmt::Formatter<'_>, h: &[Cq<Q>]) -> fmt::Result {
    writeln!(f, "dotprod [{} elements]:", h.len())?;
    for (i, v) in h.iter().enumerate() {
        writeln!(f, "  {i:4}: {v}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Q16;

    #[test]
    fn test_copy_coefficients_rejects_empty() {
        assert_eq!(copy_coefficients::<Q16>(&[]), Err(FpmError::ZeroLength));
    }

    #[test]
    fn test_check_len() {
        assert!(check_len(3, 3).is_ok());
        assert_eq!(check_len(3, 2), Err(FpmError::LengthMismatch { expected: 3, actual: 2 }));
    }
}
