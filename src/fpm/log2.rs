//! Table-driven logarithms

use crate::config::EXP2_TABLE_BITS;
use crate::error::{FpmError, FpmResult};
use crate::types::QFormat;

/// `log2(x)` on a sign-extended raw value.
///
/// The value is normalised on its most significant bit; the 8 bits below
/// it index the mantissa table. The result is in `Q` scaling but not
/// clipped, so e.g. `log2` of the smallest `Q16` step stays `-12`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn log2_frac_raw<Q: QFormat>(x: i64, op: &'static str) -> FpmResult<i64> {
    if x <= 0 {
        fpm_warn!("{}_{}(): x must be > 0", Q::NAME, op);
        return Err(FpmError::invalid_domain(op, "x must be > 0"));
    }

    let msb = i64::from(63 - x.leading_zeros());
    let int = msb - i64::from(Q::FRAC_BITS);
    let table_bits = i64::from(EXP2_TABLE_BITS);
    let mantissa = if msb >= table_bits {
        x >> (msb - table_bits)
    } else {
        x << (table_bits - msb)
    };
    let index = (mantissa & 0xff) as usize;
    let frac: i64 = Q::tables().log2_frac[index].into();

    Ok((int << Q::FRAC_BITS) + frac)
}

/// Scale a raw log2 value by a table constant, then clip.
fn rescale<Q: QFormat>(log2_x: i64, constant: Q::Raw) -> Q {
    let constant: i64 = constant.into();
    Q::from_raw_saturating((log2_x * constant) >> Q::FRAC_BITS)
}

/// Computes `log2(x)` using the fractional mantissa table.
///
/// Values whose logarithm falls outside the format range saturate.
///
/// # Errors
///
/// Returns [`FpmError::InvalidDomain`] when `x <= 0`.
pub fn log2_frac<Q: QFormat>(x: Q) -> FpmResult<Q> {
    log2_frac_raw::<Q>(x.to_raw(), "log2_frac").map(Q::from_raw_saturating)
}

/// Computes `ln(x)` as `log2(x) * ln(2)`.
///
/// # Errors
///
/// Returns [`FpmError::InvalidDomain`] when `x <= 0`.
pub fn log_frac<Q: QFormat>(x: Q) -> FpmResult<Q> {
    let log2_x = log2_frac_raw::<Q>(x.to_raw(), "log_frac")?;
    Ok(rescale::<Q>(log2_x, Q::tables().ln_2))
}

/// Computes `log10(x)` as `log2(x) * log10(2)`.
///
/// # Errors
///
/// Returns [`FpmError::InvalidDomain`] when `x <= 0`.
pub fn log10_frac<Q: QFormat>(x: Q) -> FpmResult<Q> {
    let log2_x = log2_frac_raw::<Q>(x.to_raw(), "log10_frac")?;
    Ok(rescale::<Q>(log2_x, Q::tables().log10_2))
}
