//! Mailbox provider registry and MX host matching.
//!
//! A hostname matches a provider when it equals one of the provider's MX
//! suffixes, or ends with `"." + suffix`. Comparison is case-insensitive and
//! done in trailing-dot form.

mod builtin;
mod error;
mod types;

use std::borrow::Cow;
use std::collections::HashMap;

pub use error::RegistryError;
pub use types::{AddressingRules, MailboxProvider};

use builtin::{BUILTIN_INDEX, BUILTIN_PROVIDERS};

/// Find the built-in provider owning `hostname`.
pub fn find_provider_by_domain(hostname: &str) -> Option<&'static MailboxProvider> {
    let host = normalize_host(hostname)?;
    best_match(&host, |suffix| BUILTIN_INDEX.get(suffix).copied()).map(|idx| &BUILTIN_PROVIDERS[idx])
}

/// Providers keyed by MX suffix.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Cow<'static, [MailboxProvider]>,
    index: SuffixIndex,
}

#[derive(Debug, Clone)]
enum SuffixIndex {
    Builtin,
    Custom(HashMap<String, usize>),
}

impl ProviderRegistry {
    /// The built-in registry of well-known providers.
    pub fn builtin() -> Self {
        Self {
            providers: Cow::Borrowed(&BUILTIN_PROVIDERS[..]),
            index: SuffixIndex::Builtin,
        }
    }

    /// Build a registry from `providers`, in registration order.
    ///
    /// Names must be unique and every MX suffix must belong to a single
    /// provider.
    pub fn new(providers: Vec<MailboxProvider>) -> Result<Self, RegistryError> {
        let mut index: HashMap<String, usize> = HashMap::new();
        for (idx, provider) in providers.iter().enumerate() {
            if providers[..idx].iter().any(|p| p.name == provider.name) {
                return Err(RegistryError::duplicate(provider.name));
            }
            for suffix in provider.mx_domains {
                let key =
                    normalize_host(suffix).ok_or_else(|| RegistryError::empty_suffix(provider.name))?;
                if key == "." {
                    return Err(RegistryError::empty_suffix(provider.name));
                }
                match index.get(&key) {
                    Some(&owner) if owner != idx => {
                        return Err(RegistryError::shared_suffix(
                            key,
                            providers[owner].name,
                            provider.name,
                        ));
                    }
                    Some(_) => {}
                    None => {
                        index.insert(key, idx);
                    }
                }
            }
        }
        Ok(Self {
            providers: Cow::Owned(providers),
            index: SuffixIndex::Custom(index),
        })
    }

    /// Providers in registration order.
    pub fn providers(&self) -> &[MailboxProvider] {
        &self.providers
    }

    pub fn get(&self, name: &str) -> Option<&MailboxProvider> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// Find the provider owning `hostname`, if any.
    ///
    /// When several suffixes of the hostname are registered, the provider
    /// registered first wins.
    pub fn find_provider_by_domain(&self, hostname: &str) -> Option<&MailboxProvider> {
        let host = normalize_host(hostname)?;
        let idx = match &self.index {
            SuffixIndex::Builtin => best_match(&host, |suffix| BUILTIN_INDEX.get(suffix).copied()),
            SuffixIndex::Custom(map) => best_match(&host, |suffix| map.get(suffix).copied()),
        }?;
        self.providers.get(idx)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Return the first provider matching any of `hosts`, in the given order.
pub fn detect_provider<'r, S>(hosts: &[S], registry: &'r ProviderRegistry) -> Option<&'r MailboxProvider>
where
    S: AsRef<str>,
{
    hosts
        .iter()
        .find_map(|host| registry.find_provider_by_domain(host.as_ref()))
}

/// Lower-case, trim and force the trailing-dot form.
pub(crate) fn normalize_host(hostname: &str) -> Option<String> {
    let trimmed = hostname.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut host = trimmed.to_ascii_lowercase();
    if !host.ends_with('.') {
        host.push('.');
    }
    Some(host)
}

// Walks `host` and every suffix starting after a '.', keeping the lowest
// registration index found.
fn best_match<F>(host: &str, lookup: F) -> Option<usize>
where
    F: Fn(&str) -> Option<usize>,
{
    let mut best: Option<usize> = None;
    let mut candidate = host;
    loop {
        if let Some(idx) = lookup(candidate) {
            best = Some(best.map_or(idx, |b| b.min(idx)));
        }
        match candidate.find('.') {
            Some(pos) if pos + 1 < candidate.len() => candidate = &candidate[pos + 1..],
            _ => break,
        }
    }
    best
}
