//! SSE2 dot products for the 16-bit format
//!
//! Coefficients are copied into a layout matched to the 8 x i16 register
//! width; the logical coefficients are kept alongside for the scalar
//! cleanup loop and for printing. All lane sums wrap like the scalar
//! accumulators, so results are bit-identical to the portable backend.
//!
//! Below [`DOTPROD_UNROLL_THRESHOLD`] elements a single accumulator
//! register is used, at or above it the loop is unrolled.

#![allow(unsafe_code)]

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use alloc::vec::Vec;
use core::fmt;

use crate::config::DOTPROD_UNROLL_THRESHOLD;
use crate::error::FpmResult;
use crate::types::{Cq16, QFormat, Q16};

use super::portable::{accumulate_ccc, accumulate_crc, accumulate_rrr, narrow_pair};
use super::{check_len, copy_coefficients, fmt_complex, fmt_real, try_vec, DotProd};

/// i16 lanes per register
const LANES: usize = 8;

/// Complex samples per register
const CPLX_LANES: usize = LANES / 2;

/// `_MM_SHUFFLE(3, 1, 2, 0)`: `[a, b, c, d]` -> `[a, c, b, d]`
const SHUFFLE_3120: i32 = 0b11_01_10_00;

/// Store the four i32 lanes of a register.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn lanes_epi32(v: __m128i) -> [i32; 4] {
    let mut w = [0i32; 4];
    _mm_storeu_si128(w.as_mut_ptr().cast(), v);
    w
}

// ============================================================================
// Kernels
// ============================================================================

/// `Σ h[i] * x[i]` over `blocks * 8` lanes, wrapping.
///
/// # Safety
///
/// `h` and `x` must be readable for `blocks * 8` i16 values.
#[target_feature(enable = "sse2")]
unsafe fn rrr_sum(h: *const i16, x: *const i16, blocks: usize) -> i32 {
    let mut sum = _mm_setzero_si128();
    for b in 0..blocks {
        let off = b * LANES;
        let hv = _mm_loadu_si128(h.add(off).cast());
        let xv = _mm_loadu_si128(x.add(off).cast());
        sum = _mm_add_epi32(sum, _mm_madd_epi16(hv, xv));
    }
    lanes_epi32(sum).iter().fold(0i32, |a, &w| a.wrapping_add(w))
}

/// Four-register unrolled form of [`rrr_sum`].
///
/// # Safety
///
/// Same as [`rrr_sum`].
#[target_feature(enable = "sse2")]
unsafe fn rrr_sum4(h: *const i16, x: *const i16, blocks: usize) -> i32 {
    let mut s0 = _mm_setzero_si128();
    let mut s1 = _mm_setzero_si128();
    let mut s2 = _mm_setzero_si128();
    let mut s3 = _mm_setzero_si128();

    let mut b = 0;
    while b + 4 <= blocks {
        let off = b * LANES;
        s0 = _mm_add_epi32(
            s0,
            _mm_madd_epi16(_mm_loadu_si128(h.add(off).cast()), _mm_loadu_si128(x.add(off).cast())),
        );
        s1 = _mm_add_epi32(
            s1,
            _mm_madd_epi16(
                _mm_loadu_si128(h.add(off + LANES).cast()),
                _mm_loadu_si128(x.add(off + LANES).cast()),
            ),
        );
        s2 = _mm_add_epi32(
            s2,
            _mm_madd_epi16(
                _mm_loadu_si128(h.add(off + 2 * LANES).cast()),
                _mm_loadu_si128(x.add(off + 2 * LANES).cast()),
            ),
        );
        s3 = _mm_add_epi32(
            s3,
            _mm_madd_epi16(
                _mm_loadu_si128(h.add(off + 3 * LANES).cast()),
                _mm_loadu_si128(x.add(off + 3 * LANES).cast()),
            ),
        );
        b += 4;
    }

    let sum = _mm_add_epi32(_mm_add_epi32(s0, s1), _mm_add_epi32(s2, s3));
    let head = lanes_epi32(sum).iter().fold(0i32, |a, &w| a.wrapping_add(w));
    let tail = rrr_sum(h.add(b * LANES), x.add(b * LANES), blocks - b);
    head.wrapping_add(tail)
}

/// Real × complex block: `hp` holds `[h0,h1,h0,h1,h2,h3,h2,h3]` per block,
/// input lanes are shuffled to `[r0,r1,i0,i1,r2,r3,i2,i3]` before `madd`.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn crc_block(hp: *const i16, x: *const i16) -> __m128i {
    let v = _mm_loadu_si128(x.cast());
    let v = _mm_shufflehi_epi16::<SHUFFLE_3120>(v);
    let v = _mm_shufflelo_epi16::<SHUFFLE_3120>(v);
    _mm_madd_epi16(v, _mm_loadu_si128(hp.cast()))
}

/// Fold a crc sum register: lanes 0+2 are real, 1+3 imaginary.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn crc_fold(sum: __m128i) -> (i32, i32) {
    let w = lanes_epi32(sum);
    (w[0].wrapping_add(w[2]), w[1].wrapping_add(w[3]))
}

/// # Safety
///
/// `hp` and `x` must be readable for `blocks * 8` i16 values.
#[target_feature(enable = "sse2")]
unsafe fn crc_sum(hp: *const i16, x: *const i16, blocks: usize) -> (i32, i32) {
    let mut sum = _mm_setzero_si128();
    for b in 0..blocks {
        let off = b * LANES;
        sum = _mm_add_epi32(sum, crc_block(hp.add(off), x.add(off)));
    }
    crc_fold(sum)
}

/// # Safety
///
/// Same as [`crc_sum`].
#[target_feature(enable = "sse2")]
unsafe fn crc_sum4(hp: *const i16, x: *const i16, blocks: usize) -> (i32, i32) {
    let mut s0 = _mm_setzero_si128();
    let mut s1 = _mm_setzero_si128();
    let mut s2 = _mm_setzero_si128();
    let mut s3 = _mm_setzero_si128();

    let mut b = 0;
    while b + 4 <= blocks {
        let off = b * LANES;
        s0 = _mm_add_epi32(s0, crc_block(hp.add(off), x.add(off)));
        s1 = _mm_add_epi32(s1, crc_block(hp.add(off + LANES), x.add(off + LANES)));
        s2 = _mm_add_epi32(s2, crc_block(hp.add(off + 2 * LANES), x.add(off + 2 * LANES)));
        s3 = _mm_add_epi32(s3, crc_block(hp.add(off + 3 * LANES), x.add(off + 3 * LANES)));
        b += 4;
    }
    for b in b..blocks {
        let off = b * LANES;
        s0 = _mm_add_epi32(s0, crc_block(hp.add(off), x.add(off)));
    }

    crc_fold(_mm_add_epi32(_mm_add_epi32(s0, s1), _mm_add_epi32(s2, s3)))
}

/// Widened products of input lanes with duplicated coefficients, with the
/// low and high register halves already added:
/// `[r0*h0 + r2*h2, i0*h0 + i2*h2, r1*h1 + r3*h3, i1*h1 + i3*h3]`.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn widening_mul(v: __m128i, h: __m128i) -> __m128i {
    let lo = _mm_mullo_epi16(v, h);
    let hi = _mm_mulhi_epi16(v, h);
    _mm_add_epi32(_mm_unpacklo_epi16(lo, hi), _mm_unpackhi_epi16(lo, hi))
}

/// Complex × complex block; returns the `hr` and `hq` partial sums.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn ccc_block(hi: *const i16, hq: *const i16, x: *const i16) -> (__m128i, __m128i) {
    let v = _mm_loadu_si128(x.cast());
    (
        widening_mul(v, _mm_loadu_si128(hi.cast())),
        widening_mul(v, _mm_loadu_si128(hq.cast())),
    )
}

/// `re = Σ xr*hr - xi*hq`, `im = Σ xr*hq + xi*hr`
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn ccc_fold(w0: __m128i, w1: __m128i) -> (i32, i32) {
    let w0 = lanes_epi32(w0);
    let w1 = lanes_epi32(w1);
    let re = w0[0].wrapping_add(w0[2]).wrapping_sub(w1[1]).wrapping_sub(w1[3]);
    let im = w1[0].wrapping_add(w1[2]).wrapping_add(w0[1]).wrapping_add(w0[3]);
    (re, im)
}

/// # Safety
///
/// `hi`, `hq` and `x` must be readable for `blocks * 8` i16 values.
#[target_feature(enable = "sse2")]
unsafe fn ccc_sum(hi: *const i16, hq: *const i16, x: *const i16, blocks: usize) -> (i32, i32) {
    let mut w0 = _mm_setzero_si128();
    let mut w1 = _mm_setzero_si128();
    for b in 0..blocks {
        let off = b * LANES;
        let (s0, s1) = ccc_block(hi.add(off), hq.add(off), x.add(off));
        w0 = _mm_add_epi32(w0, s0);
        w1 = _mm_add_epi32(w1, s1);
    }
    ccc_fold(w0, w1)
}

/// Two-register unrolled form of [`ccc_sum`].
///
/// # Safety
///
/// Same as [`ccc_sum`].
#[target_feature(enable = "sse2")]
unsafe fn ccc_sum2(hi: *const i16, hq: *const i16, x: *const i16, blocks: usize) -> (i32, i32) {
    let mut w0a = _mm_setzero_si128();
    let mut w1a = _mm_setzero_si128();
    let mut w0b = _mm_setzero_si128();
    let mut w1b = _mm_setzero_si128();

    let mut b = 0;
    while b + 2 <= blocks {
        let off = b * LANES;
        let (s0, s1) = ccc_block(hi.add(off), hq.add(off), x.add(off));
        let (t0, t1) = ccc_block(hi.add(off + LANES), hq.add(off + LANES), x.add(off + LANES));
        w0a = _mm_add_epi32(w0a, s0);
        w1a = _mm_add_epi32(w1a, s1);
        w0b = _mm_add_epi32(w0b, t0);
        w1b = _mm_add_epi32(w1b, t1);
        b += 2;
    }
    if b < blocks {
        let off = b * LANES;
        let (s0, s1) = ccc_block(hi.add(off), hq.add(off), x.add(off));
        w0a = _mm_add_epi32(w0a, s0);
        w1a = _mm_add_epi32(w1a, s1);
    }

    ccc_fold(_mm_add_epi32(w0a, w0b), _mm_add_epi32(w1a, w1b))
}

// ============================================================================
// Objects
// ============================================================================

/// SSE2 real × real dot product
#[derive(Debug, Clone, PartialEq)]
pub struct Sse2DotProdRrrQ16 {
    h: Vec<Q16>,
}

impl DotProd for Sse2DotProdRrrQ16 {
    type Coeff = Q16;
    type Input = Q16;
    type Output = Q16;

    fn create(coefficients: &[Q16]) -> FpmResult<Self> {
        let h = copy_coefficients(coefficients)?;
        fpm_trace!("dotprod_rrrq16 create: {} elements (sse2)", h.len());
        Ok(Self { h })
    }

    fn recreate(&mut self, coefficients: &[Q16]) -> FpmResult<()> {
        *self = Self::create(coefficients)?;
        Ok(())
    }

    fn execute(&self, input: &[Q16]) -> FpmResult<Q16> {
        let n = self.h.len();
        check_len(n, input.len())?;

        let blocks = n / LANES;
        let h = self.h.as_ptr().cast::<i16>();
        let x = input.as_ptr().cast::<i16>();
        // SAFETY: Q16 is a transparent i16; both slices hold n >= blocks * 8
        // values, and the module only builds with SSE2 enabled.
        let sum = unsafe {
            if n >= DOTPROD_UNROLL_THRESHOLD {
                rrr_sum4(h, x, blocks)
            } else {
                rrr_sum(h, x, blocks)
            }
        };

        let tail = blocks * LANES;
        Ok(Q16::narrow(accumulate_rrr::<Q16>(sum, &self.h[tail..], &input[tail..])))
    }

    fn coefficients(&self) -> &[Q16] {
        &self.h
    }
}

impl fmt::Display for Sse2DotProdRrrQ16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_real(f, &self.h)
    }
}

/// SSE2 real × complex dot product
#[derive(Debug, Clone, PartialEq)]
pub struct Sse2DotProdCrcQ16 {
    h: Vec<Q16>,
    /// `[h0,h1,h0,h1,h2,h3,h2,h3]` per group of four coefficients
    hp: Vec<i16>,
}

impl DotProd for Sse2DotProdCrcQ16 {
    type Coeff = Q16;
    type Input = Cq16;
    type Output = Cq16;

    fn create(coefficients: &[Q16]) -> FpmResult<Self> {
        let h = copy_coefficients(coefficients)?;

        let blocks = h.len() / CPLX_LANES;
        let mut hp = try_vec(blocks * LANES)?;
        for c in h.chunks_exact(CPLX_LANES) {
            let [h0, h1, h2, h3] = [c[0], c[1], c[2], c[3]].map(Q16::to_bits);
            hp.extend_from_slice(&[h0, h1, h0, h1, h2, h3, h2, h3]);
        }

        fpm_trace!("dotprod_crcq16 create: {} elements (sse2)", h.len());
        Ok(Self { h, hp })
    }

    fn recreate(&mut self, coefficients: &[Q16]) -> FpmResult<()> {
        *self = Self::create(coefficients)?;
        Ok(())
    }

    fn execute(&self, input: &[Cq16]) -> FpmResult<Cq16> {
        let n = self.h.len();
        check_len(n, input.len())?;

        let blocks = self.hp.len() / LANES;
        let hp = self.hp.as_ptr();
        let x = input.as_ptr().cast::<i16>();
        // SAFETY: Cq16 is repr(C) over two transparent i16 values, so the
        // input is 2n contiguous i16 >= blocks * 8; hp has blocks * 8 values.
        let sum = unsafe {
            if n >= DOTPROD_UNROLL_THRESHOLD {
                crc_sum4(hp, x, blocks)
            } else {
                crc_sum(hp, x, blocks)
            }
        };

        let tail = blocks * CPLX_LANES;
        Ok(narrow_pair::<Q16>(accumulate_crc::<Q16>(sum, &self.h[tail..], &input[tail..])))
    }

    fn coefficients(&self) -> &[Q16] {
        &self.h
    }
}

impl fmt::Display for Sse2DotProdCrcQ16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_real(f, &self.h)
    }
}

/// SSE2 complex × complex dot product
#[derive(Debug, Clone, PartialEq)]
pub struct Sse2DotProdCccQ16 {
    h: Vec<Cq16>,
    /// Real parts, each repeated twice
    hi: Vec<i16>,
    /// Imaginary parts, each repeated twice
    hq: Vec<i16>,
}

impl DotProd for Sse2DotProdCccQ16 {
    type Coeff = Cq16;
    type Input = Cq16;
    type Output = Cq16;

    fn create(coefficients: &[Cq16]) -> FpmResult<Self> {
        let h = copy_coefficients(coefficients)?;

        let len = (h.len() / CPLX_LANES) * LANES;
        let mut hi = try_vec(len)?;
        let mut hq = try_vec(len)?;
        for c in h.iter().take(len / 2) {
            let (r, q) = (c.real.to_bits(), c.imag.to_bits());
            hi.extend_from_slice(&[r, r]);
            hq.extend_from_slice(&[q, q]);
        }

        fpm_trace!("dotprod_cccq16 create: {} elements (sse2)", h.len());
        Ok(Self { h, hi, hq })
    }

    fn recreate(&mut self, coefficients: &[Cq16]) -> FpmResult<()> {
        *self = Self::create(coefficients)?;
        Ok(())
    }

    fn execute(&self, input: &[Cq16]) -> FpmResult<Cq16> {
        let n = self.h.len();
        check_len(n, input.len())?;

        let blocks = self.hi.len() / LANES;
        let (hi, hq) = (self.hi.as_ptr(), self.hq.as_ptr());
        let x = input.as_ptr().cast::<i16>();
        // SAFETY: as for the crc variant; hi and hq hold blocks * 8 values.
        let sum = unsafe {
            if n >= DOTPROD_UNROLL_THRESHOLD {
                ccc_sum2(hi, hq, x, blocks)
            } else {
                ccc_sum(hi, hq, x, blocks)
            }
        };

        let tail = blocks * CPLX_LANES;
        Ok(narrow_pair::<Q16>(accumulate_ccc::<Q16>(sum, &self.h[tail..], &input[tail..])))
    }

    fn coefficients(&self) -> &[Cq16] {
        &self.h
    }
}

impl fmt::Display for Sse2DotProdCccQ16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_complex(f, &self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc_coefficient_layout() {
        let h: Vec<Q16> = (1..=5).map(Q16::from_bits).collect();
        let q = Sse2DotProdCrcQ16::create(&h).unwrap();
        assert_eq!(q.hp, [1, 2, 1, 2, 3, 4, 3, 4]);
        assert_eq!(q.coefficients(), &h[..]);
    }

    #[test]
    fn test_ccc_coefficient_layout() {
        let h: Vec<Cq16> = (0..4)
            .map(|i| Cq16::new(Q16::from_bits(i), Q16::from_bits(-i)))
            .collect();
        let q = Sse2DotProdCccQ16::create(&h).unwrap();
        assert_eq!(q.hi, [0, 0, 1, 1, 2, 2, 3, 3]);
        assert_eq!(q.hq, [0, 0, -1, -1, -2, -2, -3, -3]);
    }

    #[test]
    fn test_ccc_single_block() {
        // (0.25 + j0.5)(0.75 - j0.25) = 0.3125 + j0.3125, four times
        let h = [Cq16::from_f32(0.25, 0.5); 4];
        let x = [Cq16::from_f32(0.75, -0.25); 4];
        let q = Sse2DotProdCccQ16::create(&h).unwrap();
        assert_eq!(q.execute(&x), Ok(Cq16::from_f32(1.25, 1.25)));
    }

    #[test]
    fn test_rrr_extreme_values_wrap_like_scalar() {
        let h = [Q16::MIN; 16];
        let q = Sse2DotProdRrrQ16::create(&h).unwrap();
        assert_eq!(q.execute(&h), super::super::run_rrr(&h, &h));
    }
}
