use std::sync::Arc;

use crate::canonical::{ResolvedAddress, extract_domain};
use crate::log;
use crate::mx::{self, LookupMx, MxCache, MxOutcome};
use crate::provider::{ProviderRegistry, detect_provider};
use crate::session::{CanonicalSession, PendingLookup};

/// Tuning knobs for a [`Canonicalizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalizerOptions {
    cache_failures: bool,
}

impl CanonicalizerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep failed resolutions in the cache (the default). When disabled a
    /// failed domain is looked up again on the next request.
    pub fn cache_failures(mut self, value: bool) -> Self {
        self.cache_failures = value;
        self
    }

    pub fn caches_failures(&self) -> bool {
        self.cache_failures
    }
}

impl Default for CanonicalizerOptions {
    fn default() -> Self {
        Self {
            cache_failures: true,
        }
    }
}

/// Registry, cache and MX transport bundled together.
pub struct Canonicalizer<R> {
    resolver: R,
    registry: Arc<ProviderRegistry>,
    cache: Arc<MxCache>,
}

impl<R: LookupMx> Canonicalizer<R> {
    pub fn new(resolver: R) -> Self {
        Self::with_options(resolver, CanonicalizerOptions::default())
    }

    pub fn with_options(resolver: R, options: CanonicalizerOptions) -> Self {
        Self {
            resolver,
            registry: Arc::new(ProviderRegistry::builtin()),
            cache: Arc::new(MxCache::with_failure_policy(options.caches_failures())),
        }
    }

    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Share an existing cache; its failure policy replaces the options'.
    pub fn with_cache(mut self, cache: Arc<MxCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<MxCache> {
        &self.cache
    }

    /// MX hosts of `domain`, served from the cache when present.
    pub fn resolve_mx(&self, domain: &str) -> MxOutcome {
        let key = mx::normalize_domain(domain)?;
        if let Some(hit) = self.cache.get(&key) {
            log::debug!(domain = %key, "MX cache hit");
            return hit;
        }
        log::debug!(domain = %key, "MX cache miss");
        let outcome = mx::resolve_with(&self.resolver, &key);
        self.cache.put(&key, outcome)
    }

    /// Resolve the provider of `address` and return its canonical form.
    ///
    /// Fails when the address has no domain or its MX resolution failed.
    pub fn canonicalize(&self, address: &str) -> Result<ResolvedAddress, mx::Error> {
        let address = address.trim();
        let domain = extract_domain(address).ok_or(mx::Error::EmptyDomain)?;
        let hosts = self.resolve_mx(domain)?;
        let provider = detect_provider(hosts.as_slice(), &self.registry);
        log::debug!(
            domain,
            provider = provider.map(|p| p.name).unwrap_or("<none>"),
            "provider detection"
        );
        ResolvedAddress::new(address, provider).ok_or(mx::Error::EmptyDomain)
    }

    /// A consumer session sharing this canonicalizer's registry and cache.
    pub fn session(&self) -> CanonicalSession {
        CanonicalSession::new(Arc::clone(&self.registry), Arc::clone(&self.cache))
    }

    /// Run the uncached lookup a session asked for. The result is meant to be
    /// handed back through [`CanonicalSession::complete`].
    pub fn lookup(&self, pending: &PendingLookup) -> MxOutcome {
        mx::resolve_with(&self.resolver, pending.domain())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::mx::{MxErrorKind, MxRecord, tests::StubResolver};
    use crate::provider::{AddressingRules, MailboxProvider};

    #[test]
    fn canonicalizes_through_mx_provider() {
        let c = Canonicalizer::new(StubResolver::with_hosts(&[
            "alt1.gmail-smtp-in.l.google.com.",
        ]));
        let r = c.canonicalize("First.Last+news@GMail.com").expect("resolved");
        assert_eq!(r.canonical, "firstlast@gmail.com");
        assert_eq!(r.provider, Some("Google"));
    }

    #[test]
    fn unknown_provider_only_lowercases() {
        let c = Canonicalizer::new(StubResolver::with_hosts(&["mx.unknown.example."]));
        let r = c.canonicalize("User.Name+X@unknown.example").expect("resolved");
        assert_eq!(r.canonical, "user.name+x@unknown.example");
        assert_eq!(r.provider, None);
    }

    #[test]
    fn second_resolution_hits_cache() {
        let c = Canonicalizer::new(StubResolver::with_hosts(&["mx.yandex.net."]));
        let first = c.resolve_mx("yandex.ru");
        let second = c.resolve_mx("YANDEX.RU");
        assert_eq!(first, second);
        assert_eq!(c.resolver.calls(), 1);
    }

    #[test]
    fn local_part_edits_do_not_relookup() {
        let c = Canonicalizer::new(StubResolver::with_hosts(&["mta6.am0.yahoodns.net."]));
        for address in ["a@yahoo.com", "ab@yahoo.com", "ab-c@yahoo.com"] {
            c.canonicalize(address).expect("resolved");
        }
        assert_eq!(c.resolver.calls(), 1);
        assert_eq!(
            c.canonicalize("ab-c@yahoo.com").expect("resolved").canonical,
            "ab@yahoo.com"
        );
    }

    #[test]
    fn failures_are_sticky_by_default() {
        let c = Canonicalizer::new(StubResolver::new(|_| Err(mx::Error::transport("down"))));
        for _ in 0..3 {
            let err = c.canonicalize("user@flaky.example").expect_err("failure");
            assert_eq!(err.kind(), MxErrorKind::Transport);
        }
        assert_eq!(c.resolver.calls(), 1);
    }

    #[test]
    fn failures_retried_when_not_cached() {
        let c = Canonicalizer::with_options(
            StubResolver::new(|_| Err(mx::Error::NoRecords)),
            CanonicalizerOptions::new().cache_failures(false),
        );
        c.resolve_mx("nomail.example").expect_err("no records");
        c.resolve_mx("nomail.example").expect_err("no records");
        assert_eq!(c.resolver.calls(), 2);
        assert!(c.cache().is_empty());
    }

    #[test]
    fn no_records_is_an_error() {
        let c = Canonicalizer::new(StubResolver::new(|_| Ok(Vec::<MxRecord>::new())));
        let err = c.canonicalize("user@nomail.example").expect_err("no records");
        assert_eq!(err, mx::Error::NoRecords);
    }

    #[test]
    fn missing_domain_skips_lookup() {
        let c = Canonicalizer::new(StubResolver::with_hosts(&["google.com."]));
        assert_eq!(c.canonicalize("user"), Err(mx::Error::EmptyDomain));
        assert_eq!(c.canonicalize("user@"), Err(mx::Error::EmptyDomain));
        assert_eq!(c.resolver.calls(), 0);
    }

    #[test]
    fn custom_registry_and_shared_cache() {
        let registry = ProviderRegistry::new(vec![MailboxProvider::new(
            "Corp",
            AddressingRules::NONE.with_dash_addressing().with_strip_dots(),
            &["mx.corp.example."],
        )])
        .expect("registry");
        let cache = Arc::new(MxCache::new());

        let a = Canonicalizer::new(StubResolver::with_hosts(&["in.mx.corp.example."]))
            .with_registry(registry.clone())
            .with_cache(Arc::clone(&cache));
        let b = Canonicalizer::new(StubResolver::with_hosts(&["unused.example."]))
            .with_registry(registry)
            .with_cache(Arc::clone(&cache));

        assert_eq!(
            a.canonicalize("j.doe-ops@corp.example").expect("a").canonical,
            "jdoe@corp.example"
        );
        assert_eq!(
            b.canonicalize("J.Doe@corp.example").expect("b").canonical,
            "jdoe@corp.example"
        );
        assert_eq!(b.resolver.calls(), 0);
    }
}
