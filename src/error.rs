//! Error types for the fixed-point kernels
//!
//! Every fallible operation returns [`FpmResult`]. Precision limits
//! (iteration caps, table resolution) are never reported as errors.

use thiserror::Error;

/// Errors produced by the transcendental functions and dot products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FpmError {
    /// Input outside the function's domain (e.g. negative sqrt argument)
    #[error("{op}: invalid domain, {requirement}")]
    InvalidDomain {
        /// Operation that rejected the input
        op: &'static str,
        /// Constraint the input violated
        requirement: &'static str,
    },

    /// Dot product created or recreated with no coefficients
    #[error("dot product length must be non-zero")]
    ZeroLength,

    /// Input window length differs from the coefficient length
    #[error("length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// Coefficient count of the dot product
        expected: usize,
        /// Length of the supplied input
        actual: usize,
    },

    /// Coefficient storage could not be allocated
    #[error("failed to allocate storage for {len} coefficients")]
    Allocation {
        /// Requested element count
        len: usize,
    },
}

impl FpmError {
    /// Shorthand for an [`FpmError::InvalidDomain`] value.
    #[must_use]
    pub const fn invalid_domain(op: &'static str, requirement: &'static str) -> Self {
        Self::InvalidDomain { op, requirement }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FpmError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::InvalidDomain { op, requirement } => {
                defmt::write!(f, "{=str}: invalid domain, {=str}", op, requirement);
            }
            Self::ZeroLength => defmt::write!(f, "dot product length must be non-zero"),
            Self::LengthMismatch { expected, actual } => {
                defmt::write!(f, "length mismatch: expected {}, got {}", expected, actual);
            }
            Self::Allocation { len } => {
                defmt::write!(f, "allocation failed for {} coefficients", len);
            }
        }
    }
}

/// Result alias used throughout the crate
pub type FpmResult<T> = core::result::Result<T, FpmError>;
