//! Portable scalar dot products
//!
//! Generic over both widths. `run_*` is the straightforward loop, `run4_*`
//! processes groups of four before falling back to the simple loop for the
//! remainder; objects execute the unrolled form.

use alloc::vec::Vec;
use core::fmt;

use crate::error::FpmResult;
use crate::types::{Accumulator, Cq, QFormat};

use super::{check_len, copy_coefficients, fmt_complex, fmt_real, DotProd};

// ============================================================================
// Accumulation kernels
// ============================================================================

#[inline]
fn mac_rrr<Q: QFormat>(acc: Q::Acc, h: Q, x: Q) -> Q::Acc {
    acc.wrapping_add(h.widen().wrapping_mul(x.widen()))
}

#[inline]
fn mac_crc<Q: QFormat>((re, im): (Q::Acc, Q::Acc), h: Q, x: Cq<Q>) -> (Q::Acc, Q::Acc) {
    let h = h.widen();
    (
        re.wrapping_add(h.wrapping_mul(x.real.widen())),
        im.wrapping_add(h.wrapping_mul(x.imag.widen())),
    )
}

/// `(a+jb)(c+jd) = (ac - bd) + j(ad + bc)`, each half in its own accumulator
#[inline]
fn mac_ccc<Q: QFormat>((re, im): (Q::Acc, Q::Acc), h: Cq<Q>, x: Cq<Q>) -> (Q::Acc, Q::Acc) {
    let (hr, hi) = (h.real.widen(), h.imag.widen());
    let (xr, xi) = (x.real.widen(), x.imag.widen());
    (
        re.wrapping_add(hr.wrapping_mul(xr).wrapping_sub(hi.wrapping_mul(xi))),
        im.wrapping_add(hr.wrapping_mul(xi).wrapping_add(hi.wrapping_mul(xr))),
    )
}

pub(crate) fn accumulate_rrr<Q: QFormat>(acc: Q::Acc, h: &[Q], x: &[Q]) -> Q::Acc {
    h.iter().zip(x).fold(acc, |acc, (&h, &x)| mac_rrr(acc, h, x))
}

pub(crate) fn accumulate_crc<Q: QFormat>(
    acc: (Q::Acc, Q::Acc),
    h: &[Q],
    x: &[Cq<Q>],
) -> (Q::Acc, Q::Acc) {
    h.iter().zip(x).fold(acc, |acc, (&h, &x)| mac_crc(acc, h, x))
}

pub(crate) fn accumulate_ccc<Q: QFormat>(
    acc: (Q::Acc, Q::Acc),
    h: &[Cq<Q>],
    x: &[Cq<Q>],
) -> (Q::Acc, Q::Acc) {
    h.iter().zip(x).fold(acc, |acc, (&h, &x)| mac_ccc(acc, h, x))
}

fn accumulate4_rrr<Q: QFormat>(h: &[Q], x: &[Q]) -> Q::Acc {
    let hc = h.chunks_exact(4);
    let xc = x.chunks_exact(4);
    let (h_tail, x_tail) = (hc.remainder(), xc.remainder());

    let mut acc = <Q::Acc as Accumulator>::ZERO;
    for (h4, x4) in hc.zip(xc) {
        acc = mac_rrr(acc, h4[0], x4[0]);
        acc = mac_rrr(acc, h4[1], x4[1]);
        acc = mac_rrr(acc, h4[2], x4[2]);
        acc = mac_rrr(acc, h4[3], x4[3]);
    }
    accumulate_rrr(acc, h_tail, x_tail)
}

fn accumulate4_crc<Q: QFormat>(h: &[Q], x: &[Cq<Q>]) -> (Q::Acc, Q::Acc) {
    let hc = h.chunks_exact(4);
    let xc = x.chunks_exact(4);
    let (h_tail, x_tail) = (hc.remainder(), xc.remainder());

    let zero = <Q::Acc as Accumulator>::ZERO;
    let mut acc = (zero, zero);
    for (h4, x4) in hc.zip(xc) {
        acc = mac_crc(acc, h4[0], x4[0]);
        acc = mac_crc(acc, h4[1], x4[1]);
        acc = mac_crc(acc, h4[2], x4[2]);
        acc = mac_crc(acc, h4[3], x4[3]);
    }
    accumulate_crc(acc, h_tail, x_tail)
}

fn accumulate4_ccc<Q: QFormat>(h: &[Cq<Q>], x: &[Cq<Q>]) -> (Q::Acc, Q::Acc) {
    let hc = h.chunks_exact(4);
    let xc = x.chunks_exact(4);
    let (h_tail, x_tail) = (hc.remainder(), xc.remainder());

    let zero = <Q::Acc as Accumulator>::ZERO;
    let mut acc = (zero, zero);
    for (h4, x4) in hc.zip(xc) {
        acc = mac_ccc(acc, h4[0], x4[0]);
        acc = mac_ccc(acc, h4[1], x4[1]);
        acc = mac_ccc(acc, h4[2], x4[2]);
        acc = mac_ccc(acc, h4[3], x4[3]);
    }
    accumulate_ccc(acc, h_tail, x_tail)
}

#[inline]
pub(crate) fn narrow_pair<Q: QFormat>((re, im): (Q::Acc, Q::Acc)) -> Cq<Q> {
    Cq::new(Q::narrow(re), Q::narrow(im))
}

// ============================================================================
// Free functions
// ============================================================================

/// Real dot product, simple loop.
///
/// Empty slices give zero.
///
/// # Errors
///
/// [`FpmError::LengthMismatch`](crate::FpmError::LengthMismatch) when the lengths differ.
pub fn run_rrr<Q: QFormat>(h: &[Q], x: &[Q]) -> FpmResult<Q> {
    check_len(h.len(), x.len())?;
    Ok(Q::narrow(accumulate_rrr(<Q::Acc as Accumulator>::ZERO, h, x)))
}

/// Real dot product, unrolled by four.
///
/// # Errors
///
/// [`FpmError::LengthMismatch`](crate::FpmError::LengthMismatch) when the lengths differ.
pub fn run4_rrr<Q: QFormat>(h: &[Q], x: &[Q]) -> FpmResult<Q> {
    check_len(h.len(), x.len())?;
    Ok(Q::narrow(accumulate4_rrr(h, x)))
}

/// Real × complex dot product, simple loop.
///
/// # Errors
///
/// [`FpmError::LengthMismatch`](crate::FpmError::LengthMismatch) when the lengths differ.
pub fn run_crc<Q: QFormat>(h: &[Q], x: &[Cq<Q>]) -> FpmResult<Cq<Q>> {
    check_len(h.len(), x.len())?;
    let zero = <Q::Acc as Accumulator>::ZERO;
    Ok(narrow_pair(accumulate_crc((zero, zero), h, x)))
}

/// Real × complex dot product, unrolled by four.
///
/// # Errors
///
/// [`FpmError::LengthMismatch`](crate::FpmError::LengthMismatch) when the lengths differ.
pub fn run4_crc<Q: QFormat>(h: &[Q], x: &[Cq<Q>]) -> FpmResult<Cq<Q>> {
    check_len(h.len(), x.len())?;
    Ok(narrow_pair(accumulate4_crc(h, x)))
}

/// Complex dot product, simple loop.
///
/// # Errors
///
/// [`FpmError::LengthMismatch`](crate::FpmError::LengthMismatch) when the lengths differ.
pub fn run_ccc<Q: QFormat>(h: &[Cq<Q>], x: &[Cq<Q>]) -> FpmResult<Cq<Q>> {
    check_len(h.len(), x.len())?;
    let zero = <Q::Acc as Accumulator>::ZERO;
    Ok(narrow_pair(accumulate_ccc((zero, zero), h, x)))
}

/// Complex dot product, unrolled by four.
///
/// # Errors
///
/// [`FpmError::LengthMismatch`](crate::FpmError::LengthMismatch) when the lengths differ.
pub fn run4_ccc<Q: QFormat>(h: &[Cq<Q>], x: &[Cq<Q>]) -> FpmResult<Cq<Q>> {
    check_len(h.len(), x.len())?;
    Ok(narrow_pair(accumulate4_ccc(h, x)))
}

// ============================================================================
// Objects
// ============================================================================

/// Overwrite in place when the length matches, otherwise reallocate.
fn replace<T: Copy>(storage: &mut Vec<T>, src: &[T]) -> FpmResult<()> {
    if !src.is_empty() && storage.len() == src.len() {
        storage.copy_from_slice(src);
    } else {
        *storage = copy_coefficients(src)?;
    }
    Ok(())
}

/// Portable real × real dot product
#[derive(Debug, Clone, PartialEq)]
pub struct DotProdRrr<Q> {
    h: Vec<Q>,
}

impl<Q: QFormat> DotProd for DotProdRrr<Q> {
    type Coeff = Q;
    type Input = Q;
    type Output = Q;

    fn create(coefficients: &[Q]) -> FpmResult<Self> {
        let h = copy_coefficients(coefficients)?;
        fpm_trace!("dotprod_rrr{} create: {} elements (portable)", Q::NAME, h.len());
        Ok(Self { h })
    }

    fn recreate(&mut self, coefficients: &[Q]) -> FpmResult<()> {
        replace(&mut self.h, coefficients)?;
        fpm_trace!("dotprod_rrr{} recreate: {} elements (portable)", Q::NAME, self.h.len());
        Ok(())
    }

    fn execute(&self, input: &[Q]) -> FpmResult<Q> {
        check_len(self.h.len(), input.len())?;
        Ok(Q::narrow(accumulate4_rrr(&self.h, input)))
    }

    fn coefficients(&self) -> &[Q] {
        &self.h
    }
}

impl<Q: QFormat> fmt::Display for DotProdRrr<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_real(f, &self.h)
    }
}

/// Portable real × complex dot product
#[derive(Debug, Clone, PartialEq)]
pub struct DotProdCrc<Q> {
    h: Vec<Q>,
}

impl<Q: QFormat> DotProd for DotProdCrc<Q> {
    type Coeff = Q;
    type Input = Cq<Q>;
    type Output = Cq<Q>;

    fn create(coefficients: &[Q]) -> FpmResult<Self> {
        let h = copy_coefficients(coefficients)?;
        fpm_trace!("dotprod_crc{} create: {} elements (portable)", Q::NAME, h.len());
        Ok(Self { h })
    }

    fn recreate(&mut self, coefficients: &[Q]) -> FpmResult<()> {
        replace(&mut self.h, coefficients)?;
        fpm_trace!("dotprod_crc{} recreate: {} elements (portable)", Q::NAME, self.h.len());
        Ok(())
    }

    fn execute(&self, input: &[Cq<Q>]) -> FpmResult<Cq<Q>> {
        check_len(self.h.len(), input.len())?;
        Ok(narrow_pair(accumulate4_crc(&self.h, input)))
    }

    fn coefficients(&self) -> &[Q] {
        &self.h
    }
}

impl<Q: QFormat> fmt::Display for DotProdCrc<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_real(f, &self.h)
    }
}

/// Portable complex × complex dot product
#[derive(Debug, Clone, PartialEq)]
pub struct DotProdCcc<Q> {
    h: Vec<Cq<Q>>,
}

impl<Q: QFormat> DotProd for DotProdCcc<Q> {
    type Coeff = Cq<Q>;
    type Input = Cq<Q>;
    type Output = Cq<Q>;

    fn create(coefficients: &[Cq<Q>]) -> FpmResult<Self> {
        let h = copy_coefficients(coefficients)?;
        fpm_trace!("dotprod_ccc{} create: {} elements (portable)", Q::NAME, h.len());
        Ok(Self { h })
    }

    fn recreate(&mut self, coefficients: &[Cq<Q>]) -> FpmResult<()> {
        replace(&mut self.h, coefficients)?;
        fpm_trace!("dotprod_ccc{} recreate: {} elements (portable)", Q::NAME, self.h.len());
        Ok(())
    }

    fn execute(&self, input: &[Cq<Q>]) -> FpmResult<Cq<Q>> {
        check_len(self.h.len(), input.len())?;
        Ok(narrow_pair(accumulate4_ccc(&self.h, input)))
    }

    fn coefficients(&self) -> &[Cq<Q>] {
        &self.h
    }
}

impl<Q: QFormat> fmt::Display for DotProdCcc<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_complex(f, &self.h)
    }
}
