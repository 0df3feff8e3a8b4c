//! Logging shims
//!
//! Forward to `tracing` on hosts and `defmt` on embedded targets. With
//! neither feature enabled the arguments are still type-checked.

/// Emit a warning event.
macro_rules! fpm_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::warn!($($arg)*);
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)*);
        #[cfg(not(any(feature = "tracing", feature = "defmt")))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

/// Emit a trace event.
macro_rules! fpm_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)*);
        #[cfg(not(any(feature = "tracing", feature = "defmt")))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}
