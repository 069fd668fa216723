//! Logging shims: forward to `tracing` when `with-tracing` is enabled,
//! compile to nothing otherwise.
//!
//! The macros are defined under distinct names and re-exported as `debug`
//! and `warn`; a bare `warn` import collides with the builtin lint attribute.

macro_rules! debug_event {
    ($($arg:tt)*) => {{
        #[cfg(feature = "with-tracing")]
        tracing::debug!($($arg)*);
    }};
}

macro_rules! warn_event {
    ($($arg:tt)*) => {{
        #[cfg(feature = "with-tracing")]
        tracing::warn!($($arg)*);
    }};
}

pub(crate) use debug_event as debug;
pub(crate) use warn_event as warn;
