//! Input-driven resolution state for an address that is being edited.
//!
//! The session never performs lookups itself. [`CanonicalSession::set_address`]
//! hands out a [`PendingLookup`] when the current domain needs one; the caller
//! runs it wherever it likes and reports back through
//! [`CanonicalSession::complete`]. Results for a domain that is no longer the
//! current one are cached but never shown.

use std::collections::HashSet;
use std::sync::Arc;

use crate::canonical::{ResolvedAddress, extract_domain};
use crate::log;
use crate::mx::{self, MxCache, MxErrorKind, MxOutcome};
use crate::provider::{ProviderRegistry, detect_provider};

/// A lookup the session is waiting on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingLookup {
    domain: String,
}

impl PendingLookup {
    /// Normalized (ASCII, lower-case) domain to resolve.
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

/// What the output surface shows for the current input.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalView {
    /// Empty unless MX records were obtained for the current domain.
    pub canonical_address: String,
    pub loading: bool,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error_kind: Option<MxErrorKind>,
}

pub struct CanonicalSession {
    registry: Arc<ProviderRegistry>,
    cache: Arc<MxCache>,
    address: String,
    domain: Option<String>,
    outcome: Option<MxOutcome>,
    in_flight: HashSet<String>,
}

impl CanonicalSession {
    pub fn new(registry: Arc<ProviderRegistry>, cache: Arc<MxCache>) -> Self {
        Self {
            registry,
            cache,
            address: String::new(),
            domain: None,
            outcome: None,
            in_flight: HashSet::new(),
        }
    }

    /// Record a new input value. Returns the lookup to run, if any.
    pub fn set_address(&mut self, address: &str) -> Option<PendingLookup> {
        self.address = address.trim().to_string();

        let Some(raw_domain) = extract_domain(&self.address) else {
            self.domain = None;
            self.outcome = None;
            return None;
        };

        let key = match mx::normalize_domain(raw_domain) {
            Ok(key) => key,
            Err(err) => {
                self.domain = None;
                self.outcome = Some(Err(err));
                return None;
            }
        };

        if self.domain.as_deref() == Some(key.as_str())
            && (self.outcome.is_some() || self.in_flight.contains(&key))
        {
            return None;
        }

        self.outcome = self.cache.get(&key);
        let pending = if self.outcome.is_none() && self.in_flight.insert(key.clone()) {
            log::debug!(domain = %key, "MX lookup requested");
            Some(PendingLookup {
                domain: key.clone(),
            })
        } else {
            None
        };
        self.domain = Some(key);
        pending
    }

    /// Deliver the outcome of `lookup`. Returns `true` when it applied to the
    /// current domain, `false` when it was stale.
    pub fn complete(&mut self, lookup: PendingLookup, outcome: MxOutcome) -> bool {
        self.in_flight.remove(&lookup.domain);
        let stored = self.cache.put(&lookup.domain, outcome);
        if self.domain.as_deref() != Some(lookup.domain.as_str()) {
            log::debug!(domain = %lookup.domain, "discarding stale MX resolution");
            return false;
        }
        self.outcome = Some(stored);
        true
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn current_domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        match &self.domain {
            Some(domain) => self.outcome.is_none() && self.in_flight.contains(domain),
            None => false,
        }
    }

    pub fn view(&self) -> CanonicalView {
        match &self.outcome {
            Some(Ok(hosts)) => {
                let provider = detect_provider(hosts.as_slice(), &self.registry);
                let canonical_address = ResolvedAddress::new(&self.address, provider)
                    .map(|r| r.canonical)
                    .unwrap_or_default();
                CanonicalView {
                    canonical_address,
                    ..CanonicalView::default()
                }
            }
            Some(Err(err)) => CanonicalView {
                error: Some(err.to_string()),
                error_kind: Some(err.kind()),
                ..CanonicalView::default()
            },
            None => CanonicalView {
                loading: self.is_loading(),
                ..CanonicalView::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Canonicalizer;
    use crate::mx::{MxHosts, tests::StubResolver};

    fn hosts(list: &[&str]) -> MxOutcome {
        Ok(MxHosts::new(list.iter().map(|h| h.to_string()).collect()).expect("non-empty"))
    }

    fn session() -> CanonicalSession {
        CanonicalSession::new(Arc::new(ProviderRegistry::builtin()), Arc::new(MxCache::new()))
    }

    #[test]
    fn empty_or_at_less_input_is_idle() {
        let mut s = session();
        assert!(s.set_address("").is_none());
        assert_eq!(s.view(), CanonicalView::default());
        assert!(s.set_address("user").is_none());
        assert!(s.set_address("user@").is_none());
        assert_eq!(s.current_domain(), None);
        assert_eq!(s.view(), CanonicalView::default());
    }

    #[test]
    fn loading_until_completed() {
        let mut s = session();
        let pending = s.set_address("us.er+x@gmail.com").expect("lookup");
        assert_eq!(pending.domain(), "gmail.com");
        assert!(s.view().loading);
        assert!(s.view().canonical_address.is_empty());

        assert!(s.complete(pending, hosts(&["gmail-smtp-in.l.google.com."])));
        let view = s.view();
        assert!(!view.loading);
        assert_eq!(view.canonical_address, "user@gmail.com");
        assert_eq!(view.error, None);
    }

    #[test]
    fn one_lookup_per_domain_while_in_flight() {
        let mut s = session();
        assert!(s.set_address("a@gmail.com").is_some());
        assert!(s.set_address("ab@gmail.com").is_none());
        assert!(s.set_address("abc@gmail.com").is_none());
        assert!(s.is_loading());
    }

    #[test]
    fn local_part_edits_recompute_from_cache() {
        let mut s = session();
        let pending = s.set_address("a@yahoo.com").expect("lookup");
        s.complete(pending, hosts(&["mta7.am0.yahoodns.net."]));

        assert!(s.set_address("john-shopping@yahoo.com").is_none());
        assert_eq!(s.view().canonical_address, "john@yahoo.com");
    }

    #[test]
    fn stale_resolution_is_discarded() {
        let mut s = session();
        let old = s.set_address("user@gmail.co").expect("lookup");
        let new = s.set_address("user@gmail.com").expect("lookup");

        assert!(s.complete(new, hosts(&["gmail-smtp-in.l.google.com."])));
        assert!(!s.complete(old, Err(mx::Error::query_failed(3))));

        let view = s.view();
        assert_eq!(view.canonical_address, "user@gmail.com");
        assert_eq!(view.error, None);
        assert!(!view.loading);
    }

    #[test]
    fn stale_result_still_fills_its_own_cache_entry() {
        let mut s = session();
        let old = s.set_address("user@gmail.co").expect("lookup");
        s.set_address("user@gmail.com");
        s.complete(old, Err(mx::Error::query_failed(3)));

        assert!(s.set_address("user@gmail.co").is_none());
        let view = s.view();
        assert_eq!(view.error_kind, Some(MxErrorKind::QueryFailed));
        assert!(view.canonical_address.is_empty());
    }

    #[test]
    fn no_records_surfaces_error() {
        let mut s = session();
        let pending = s.set_address("user@nomail.example").expect("lookup");
        s.complete(pending, Err(mx::Error::NoRecords));
        let view = s.view();
        assert_eq!(view.error_kind, Some(MxErrorKind::NoRecords));
        assert_eq!(
            view.error.as_deref(),
            Some("no mailserver records found for this domain")
        );
        assert!(view.canonical_address.is_empty());
        assert!(!view.loading);
    }

    #[test]
    fn invalid_domain_is_reported_without_lookup() {
        let mut s = session();
        assert!(s.set_address("user@exa\u{FFFF}mple.com").is_none());
        assert_eq!(s.view().error_kind, Some(MxErrorKind::InvalidDomain));
    }

    #[test]
    fn session_shares_canonicalizer_cache() {
        let c = Canonicalizer::new(StubResolver::with_hosts(&["mx01.mail.icloud.com."]));
        c.canonicalize("x@icloud.com").expect("resolved");

        let mut s = c.session();
        assert!(s.set_address("Mailbox.Sub+tag@iCloud.com").is_none());
        assert_eq!(s.view().canonical_address, "mailbox.sub@icloud.com");
    }

    #[test]
    fn canonicalizer_lookup_completes_session() {
        let c = Canonicalizer::new(StubResolver::with_hosts(&["mx.zoho.com."]));
        let mut s = c.session();
        let pending = s.set_address("Sales+eu@zoho.example").expect("lookup");
        let outcome = c.lookup(&pending);
        assert!(s.complete(pending, outcome));
        assert_eq!(s.view().canonical_address, "sales@zoho.example");
        assert!(c.cache().contains("zoho.example"));
    }
}
