//! MX resolution: transports, outcome classification and the per-domain cache.
//!
//! [`resolve_mx`] performs one uncached lookup through any [`LookupMx`]
//! transport. [`MxCache`] memoizes outcomes per domain; the
//! [`Canonicalizer`](crate::Canonicalizer) wires the two together.

mod cache;
#[cfg(feature = "with-doh")]
mod doh;
mod error;
mod resolver;
mod types;

pub use cache::MxCache;
#[cfg(feature = "with-doh")]
pub use doh::{DEFAULT_DOH_ENDPOINT, DohResolver};
pub use error::{MxError as Error, MxErrorKind};
#[cfg(feature = "with-mx")]
pub use resolver::SystemResolver;
pub use resolver::{LookupMx, resolve_mx};
pub use types::{MxHosts, MxOutcome, MxRecord};

pub(crate) use resolver::{normalize_domain, resolve_with};
