//! Fixed-point numeric types shared by every kernel
//!
//! Two Q formats live side by side:
//!
//! | Type  | Container | Fraction bits | Range          | Accumulator |
//! |-------|-----------|---------------|----------------|-------------|
//! | `Q16` | `i16`     | 12            | [-8, 8)        | `i32`       |
//! | `Q32` | `i32`     | 20            | [-2048, 2048)  | `i64`       |
//!
//! Both are `fixed` crate types, so callers get the full `fixed` API for
//! ordinary arithmetic. The [`QFormat`] trait adds what the kernels need on
//! top: raw access widened to `i64`, accumulator widening/narrowing and the
//! per-format lookup tables.
//!
//! Overflow policy: dot-product accumulators wrap (two's complement) in every
//! backend, scalar helpers (`qmul`, `qdiv`, exp2 post-shift) saturate.

use core::fmt;

use fixed::types::extra::{U12, U20};
use fixed::{FixedI16, FixedI32};
#[cfg(not(any(feature = "std", test)))]
use micromath::F32Ext;

use crate::config::{Q16_FRAC_BITS, Q32_FRAC_BITS};
use crate::tables::{Tables, Q16_TABLES, Q32_TABLES};

/// 16-bit fixed-point value, 12 fractional bits
pub type Q16 = FixedI16<U12>;

/// 32-bit fixed-point value, 20 fractional bits
pub type Q32 = FixedI32<U20>;

/// Complex 16-bit fixed-point value
pub type Cq16 = Cq<Q16>;

/// Complex 32-bit fixed-point value
pub type Cq32 = Cq<Q32>;

// ============================================================================
// Accumulator
// ============================================================================

/// Dot-product accumulator: a wide integer with modular arithmetic
pub trait Accumulator: Copy + Default + PartialEq + fmt::Debug {
    /// Additive identity
    const ZERO: Self;

    /// Two's complement addition
    #[must_use]
    fn wrapping_add(self, rhs: Self) -> Self;

    /// Two's complement subtraction
    #[must_use]
    fn wrapping_sub(self, rhs: Self) -> Self;

    /// Two's complement multiplication
    #[must_use]
    fn wrapping_mul(self, rhs: Self) -> Self;
}

macro_rules! impl_accumulator {
    ($($t:ty),*) => {$(
        impl Accumulator for $t {
            const ZERO: Self = 0;

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$t>::wrapping_add(self, rhs)
            }

            #[inline]
            fn wrapping_sub(self, rhs: Self) -> Self {
                <$t>::wrapping_sub(self, rhs)
            }

            #[inline]
            fn wrapping_mul(self, rhs: Self) -> Self {
                <$t>::wrapping_mul(self, rhs)
            }
        }
    )*};
}

impl_accumulator!(i32, i64);

// ============================================================================
// Q format
// ============================================================================

/// A signed Q-format fixed-point type usable by the kernels
pub trait QFormat:
    Copy + Default + PartialEq + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Underlying container integer
    type Raw: Copy + Into<i64> + fmt::Debug + 'static;

    /// Dot-product accumulator, twice the container width
    type Acc: Accumulator;

    /// Total container width
    const BITS: u32;

    /// Fractional bits
    const FRAC_BITS: u32;

    /// Integer bits, excluding the sign
    const INT_BITS: u32 = Self::BITS - Self::FRAC_BITS - 1;

    /// 0.0
    const ZERO: Self;

    /// 1.0
    const ONE: Self;

    /// Largest representable value
    const MAX: Self;

    /// Smallest representable value
    const MIN: Self;

    /// Short format name used in log output
    const NAME: &'static str;

    /// Raw bits, sign-extended
    fn to_raw(self) -> i64;

    /// Build from raw bits, truncating to the container width
    fn from_raw_wrapping(raw: i64) -> Self;

    /// Widen into the accumulator type
    fn widen(self) -> Self::Acc;

    /// Remove the fractional scaling from an accumulator: arithmetic
    /// shift right by `FRAC_BITS`, then truncate to the container.
    fn narrow(acc: Self::Acc) -> Self;

    /// Convert from `f32`, saturating at the range limits. NaN maps to zero.
    fn from_f32(value: f32) -> Self;

    /// Convert to `f32`
    fn to_f32(self) -> f32;

    /// Lookup tables for this format
    fn tables() -> &'static Tables<Self::Raw>;

    /// Build from raw bits, clamping to `[MIN, MAX]`
    #[must_use]
    fn from_raw_saturating(raw: i64) -> Self {
        Self::from_raw_wrapping(raw.clamp(Self::MIN.to_raw(), Self::MAX.to_raw()))
    }

    /// Fixed-point multiply, `(a * b) >> FRAC_BITS`, saturating
    #[must_use]
    fn qmul(self, rhs: Self) -> Self {
        Self::from_raw_saturating((self.to_raw() * rhs.to_raw()) >> Self::FRAC_BITS)
    }

    /// Fixed-point divide, `(a << FRAC_BITS) / b`, saturating.
    /// Division by zero saturates towards the sign of `self`.
    #[must_use]
    fn qdiv(self, rhs: Self) -> Self {
        let num = self.to_raw();
        let den = rhs.to_raw();
        if den == 0 {
            return match num.signum() {
                1 => Self::MAX,
                -1 => Self::MIN,
                _ => Self::ZERO,
            };
        }
        Self::from_raw_saturating((num << Self::FRAC_BITS) / den)
    }

    /// Absolute value, saturating (`|MIN|` becomes `MAX`)
    #[must_use]
    fn qabs(self) -> Self {
        Self::from_raw_saturating(self.to_raw().abs())
    }

    /// Integer part, rounded towards negative infinity
    #[must_use]
    fn intpart(self) -> i64 {
        self.to_raw() >> Self::FRAC_BITS
    }

    /// Fractional part, always in `[0, 1)`
    #[must_use]
    fn fracpart(self) -> Self {
        Self::from_raw_wrapping(self.to_raw() & ((1i64 << Self::FRAC_BITS) - 1))
    }

    /// Smallest positive step as a float
    #[must_use]
    fn epsilon_f32() -> f32 {
        1.0 / (1u64 << Self::FRAC_BITS) as f32
    }
}

macro_rules! impl_qformat {
    ($q:ty, $raw:ty, $acc:ty, $frac:expr, $tables:expr, $name:literal) => {
        impl QFormat for $q {
            type Raw = $raw;
            type Acc = $acc;

            const BITS: u32 = <$raw>::BITS;
            const FRAC_BITS: u32 = $frac;
            const ZERO: Self = <$q>::ZERO;
            const ONE: Self = <$q>::from_bits(1 << $frac);
            const MAX: Self = <$q>::MAX;
            const MIN: Self = <$q>::MIN;
            const NAME: &'static str = $name;

            #[inline]
            fn to_raw(self) -> i64 {
                i64::from(self.to_bits())
            }

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn from_raw_wrapping(raw: i64) -> Self {
                <$q>::from_bits(raw as $raw)
            }

            #[inline]
            fn widen(self) -> $acc {
                <$acc>::from(self.to_bits())
            }

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn narrow(acc: $acc) -> Self {
                <$q>::from_bits((acc >> $frac) as $raw)
            }

            fn from_f32(value: f32) -> Self {
                if value.is_nan() {
                    Self::ZERO
                } else {
                    <$q>::saturating_from_num(value)
                }
            }

            #[inline]
            fn to_f32(self) -> f32 {
                self.to_num::<f32>()
            }

            #[inline]
            fn tables() -> &'static Tables<$raw> {
                &$tables
            }
        }
    };
}

impl_qformat!(Q16, i16, i32, Q16_FRAC_BITS, Q16_TABLES, "q16");
impl_qformat!(Q32, i32, i64, Q32_FRAC_BITS, Q32_TABLES, "q32");

// ============================================================================
// Complex
// ============================================================================

/// Complex fixed-point value
///
/// Plain pair of co-located values with no implied relationship. The layout
/// is `#[repr(C)]`, real first, so slices can be viewed as interleaved
/// `[re, im, re, im, ...]` containers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct Cq<Q> {
    /// In-phase component
    pub real: Q,
    /// Quadrature component
    pub imag: Q,
}

impl<Q: QFormat> Cq<Q> {
    /// 0 + j0
    pub const ZERO: Self = Self { real: Q::ZERO, imag: Q::ZERO };

    /// Create from components
    #[must_use]
    pub const fn new(real: Q, imag: Q) -> Self {
        Self { real, imag }
    }

    /// Create from float components (saturating)
    #[must_use]
    pub fn from_f32(real: f32, imag: f32) -> Self {
        Self { real: Q::from_f32(real), imag: Q::from_f32(imag) }
    }

    /// Convert to float components
    #[must_use]
    pub fn to_f32(self) -> (f32, f32) {
        (self.real.to_f32(), self.imag.to_f32())
    }
}

impl<Q: QFormat> fmt::Display for Cq<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:12.8} + j{:12.8}", self.real.to_f32(), self.imag.to_f32())
    }
}

#[cfg(feature = "defmt")]
impl<Q: QFormat> defmt::Format for Cq<Q> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}+j{}", self.real.to_f32(), self.imag.to_f32());
    }
}

// ============================================================================
// Angle
// ============================================================================

/// Phase angle stored in a Q container with its own scaling
///
/// `2^(BITS-1)` raw units span a full turn, so `π = 2^(BITS-2)` and
/// `π/2 = 2^(BITS-3)`. The representable range is `[-2π, 2π)`; `2π` itself
/// is clipped to the container maximum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Angle<Q>(Q);

impl<Q: QFormat> Angle<Q> {
    /// Raw units per radian
    fn scale() -> f64 {
        (1u64 << (Q::BITS - 2)) as f64 / core::f64::consts::PI
    }

    /// Create from raw angle units (saturating)
    #[must_use]
    pub fn from_raw(raw: i64) -> Self {
        Self(Q::from_raw_saturating(raw))
    }

    /// Raw angle units, sign-extended
    #[must_use]
    pub fn raw(self) -> i64 {
        self.0.to_raw()
    }

    /// Convert from radians, rounding to the nearest unit and saturating
    /// outside `[-2π, 2π)`. NaN maps to zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_radians(radians: f32) -> Self {
        if radians.is_nan() {
            return Self::from_raw(0);
        }
        let raw = (radians * Self::scale() as f32).round() as i64;
        Self::from_raw(raw)
    }

    /// Convert to radians
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_radians(self) -> f32 {
        (self.raw() as f64 / Self::scale()) as f32
    }

    /// π
    #[must_use]
    pub fn pi() -> Self {
        Self::from_raw(1i64 << (Q::BITS - 2))
    }

    /// π/2
    #[must_use]
    pub fn pi_by_2() -> Self {
        Self::from_raw(1i64 << (Q::BITS - 3))
    }

    /// 2π, clipped to the container maximum
    #[must_use]
    pub fn two_pi() -> Self {
        Self(Q::MAX)
    }
}

impl<Q: QFormat> fmt::Display for Angle<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} rad", self.to_radians())
    }
}
