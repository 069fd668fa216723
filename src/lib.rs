#![forbid(unsafe_code)]
//! canonical_email: canonical e-mail addresses from MX-detected providers.
//!
//! The domain of an address is resolved to its MX hosts, the hosts are
//! matched against a registry of known mailbox providers, and the provider's
//! addressing rules (plus tags, dash tags, dots, sub-addressing) reduce the
//! address to the form every variant delivers to.

mod log;

pub mod canonical;
pub mod mx;
pub mod provider;
mod service;
mod session;

pub use canonical::{ResolvedAddress, canonicalize, extract_domain};
#[cfg(feature = "with-doh")]
pub use mx::DohResolver;
#[cfg(feature = "with-mx")]
pub use mx::SystemResolver;
pub use mx::{
    Error as MxError, LookupMx, MxCache, MxErrorKind, MxHosts, MxOutcome, MxRecord, resolve_mx,
};
pub use provider::{
    AddressingRules, MailboxProvider, ProviderRegistry, RegistryError, detect_provider,
    find_provider_by_domain,
};
pub use service::{Canonicalizer, CanonicalizerOptions};
pub use session::{CanonicalSession, CanonicalView, PendingLookup};
