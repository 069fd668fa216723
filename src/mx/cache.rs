use dashmap::DashMap;

use super::MxOutcome;

/// Per-domain memo of MX resolution outcomes.
///
/// Entries are written once and never updated or evicted; only
/// [`MxCache::clear`] removes them. Failures are stored like successes unless
/// the cache was built with [`MxCache::without_failures`].
#[derive(Debug)]
pub struct MxCache {
    entries: DashMap<String, MxOutcome>,
    cache_failures: bool,
}

impl MxCache {
    pub fn new() -> Self {
        Self::with_failure_policy(true)
    }

    /// A cache that only keeps successful resolutions.
    pub fn without_failures() -> Self {
        Self::with_failure_policy(false)
    }

    pub fn with_failure_policy(cache_failures: bool) -> Self {
        Self {
            entries: DashMap::new(),
            cache_failures,
        }
    }

    pub fn get(&self, domain: &str) -> Option<MxOutcome> {
        self.entries.get(domain).map(|entry| entry.value().clone())
    }

    /// Insert `outcome` unless `domain` already has an entry, and return the
    /// entry now associated with `domain`.
    pub fn put(&self, domain: &str, outcome: MxOutcome) -> MxOutcome {
        if outcome.is_err() && !self.cache_failures {
            return outcome;
        }
        self.entries
            .entry(domain.to_string())
            .or_insert(outcome)
            .value()
            .clone()
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.entries.contains_key(domain)
    }

    pub fn caches_failures(&self) -> bool {
        self.cache_failures
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for MxCache {
    fn default() -> Self {
        Self::new()
    }
}
