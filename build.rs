//! Build script for the fixed-point kernels
//!
//! Handles:
//! - Generation of the read-only lookup tables (`$OUT_DIR/tables.rs`)
//!   consumed by `src/tables.rs`
//!
//! Every table is emitted as `const` data so there is no runtime
//! initialisation step and no ordering hazard between readers.

use std::env;
use std::error::Error;
use std::f64::consts::{E, LN_2, LOG10_2, PI};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

/// Entries in the fractional exp2/log2 tables (8-bit index)
const FRAC_TABLE_LEN: usize = 256;

/// Fractional bits of the format-independent shift/add table
const SHIFTADD_FRAC_BITS: u32 = 30;

/// One generated fixed-point format
struct Format {
    /// Constant name prefix, e.g. `Q16`
    name: &'static str,
    /// Rust container type
    raw: &'static str,
    /// Total container width
    bits: u32,
    /// Fractional bits
    frac_bits: u32,
}

const FORMATS: [Format; 2] = [
    Format { name: "Q16", raw: "i16", bits: 16, frac_bits: 12 },
    Format { name: "Q32", raw: "i32", bits: 32, frac_bits: 20 },
];

/// Round a real value to raw fixed-point with `frac_bits` fractional bits.
fn to_raw(value: f64, frac_bits: u32) -> i64 {
    // Table values are bounded well inside the containers, so the cast is exact.
    #[allow(clippy::cast_possible_truncation)]
    let raw = (value * f64::from(1u32 << frac_bits)).round() as i64;
    raw
}

fn write_array(out: &mut String, values: impl Iterator<Item = i64>) -> std::fmt::Result {
    out.push('[');
    for (i, v) in values.enumerate() {
        if i % 8 == 0 {
            out.push_str("\n        ");
        }
        write!(out, "{v}, ")?;
    }
    out.push_str("\n    ]");
    Ok(())
}

fn generate_format(out: &mut String, fmt: &Format) -> std::fmt::Result {
    let f = fmt.frac_bits;
    // Angle scale: 2^(bits-1) raw units per full turn
    let angle_per_radian = f64::from(1u32 << (fmt.bits - 2)) * 2.0 / (2.0 * PI);

    writeln!(out, "/// Lookup tables for the `{}` format", fmt.name)?;
    writeln!(out, "pub const {}_TABLES: Tables<{}> = Tables {{", fmt.name, fmt.raw)?;

    out.push_str("    exp2_frac: ");
    write_array(
        out,
        (0..FRAC_TABLE_LEN).map(|i| to_raw((i as f64 / FRAC_TABLE_LEN as f64).exp2(), f)),
    )?;
    out.push_str(",\n");

    out.push_str("    log2_frac: ");
    write_array(
        out,
        (0..FRAC_TABLE_LEN).map(|i| to_raw((1.0 + i as f64 / FRAC_TABLE_LEN as f64).log2(), f)),
    )?;
    out.push_str(",\n");

    out.push_str("    cordic_ak: &");
    write_array(
        out,
        (0..fmt.bits).map(|i| {
            let ak = (0.5f64).powi(i32::try_from(i).unwrap_or(i32::MAX)).atan();
            (ak * angle_per_radian).round() as i64
        }),
    )?;
    out.push_str(",\n");

    out.push_str("    cordic_k_inv: &");
    let mut k_inv = 1.0f64;
    let gains: Vec<i64> = (0..fmt.bits)
        .map(|k| {
            let shrink = (0.25f64).powi(i32::try_from(k).unwrap_or(i32::MAX));
            k_inv /= (1.0 + shrink).sqrt();
            to_raw(k_inv, f)
        })
        .collect();
    write_array(out, gains.into_iter())?;
    out.push_str(",\n");

    writeln!(out, "    log2_e: {},", to_raw(E.log2(), f))?;
    writeln!(out, "    log2_10: {},", to_raw(10f64.log2(), f))?;
    writeln!(out, "    ln_2: {},", to_raw(LN_2, f))?;
    writeln!(out, "    log10_2: {},", to_raw(LOG10_2, f))?;
    writeln!(out, "}};\n")?;
    Ok(())
}

fn generate() -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    out.push_str("// @generated by build.rs. Do not edit.\n\n");

    for fmt in &FORMATS {
        generate_format(&mut out, fmt)?;
    }

    writeln!(
        out,
        "/// `log2(1 + 2^-k)` in Q{SHIFTADD_FRAC_BITS}, index `k - 1` for `k` in `1..={SHIFTADD_FRAC_BITS}`"
    )?;
    write!(out, "pub const SHIFTADD_AK: [i64; {SHIFTADD_FRAC_BITS}] = ")?;
    write_array(
        &mut out,
        (1..=SHIFTADD_FRAC_BITS).map(|k| {
            let k = i32::try_from(k).unwrap_or(i32::MAX);
            to_raw((1.0 + (0.5f64).powi(k)).log2(), SHIFTADD_FRAC_BITS)
        }),
    )?;
    out.push_str(";\n");
    Ok(out)
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    fs::write(out_dir.join("tables.rs"), generate()?)?;
    Ok(())
}
