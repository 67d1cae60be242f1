//! Logging facade forwarding to `defmt` when the `defmt` feature is enabled.
//!
//! Without the feature every macro expands to nothing, so call sites never need
//! their own `cfg` guards.

#[cfg(feature = "defmt")]
macro_rules! trace {
    ($($arg:tt)*) => {{ ::defmt::trace!($($arg)*); }};
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($arg:tt)*) => {{ ::defmt::debug!($($arg)*); }};
}

#[cfg(feature = "defmt")]
macro_rules! log_warn {
    ($($arg:tt)*) => {{ ::defmt::warn!($($arg)*); }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{}};
}

// `warn` alone would clash with the built-in lint attribute.
pub(crate) use {debug, log_warn as warn, trace};
