//! Canonical form of an address, driven by a provider's addressing rules.

use crate::provider::{AddressingRules, MailboxProvider};

/// Address split into its canonical parts.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub original: String,
    pub local_part: String,
    pub domain: String,
    pub canonical: String,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub provider: Option<&'static str>,
}

impl ResolvedAddress {
    /// Canonicalize `address` for `provider`. `None` when `address` has no `@`.
    pub fn new(address: &str, provider: Option<&MailboxProvider>) -> Option<Self> {
        let (local, domain) = split_address(address)?;
        let (local_part, domain) = match provider {
            Some(p) => apply_rules(local, domain, &p.rules),
            None => (local.to_lowercase(), domain.to_lowercase()),
        };
        let canonical = format!("{local_part}@{domain}");
        Some(Self {
            original: address.to_string(),
            local_part,
            domain,
            canonical,
            provider: provider.map(|p| p.name),
        })
    }
}

/// Canonical form of `address`.
///
/// Without a provider only case-folding is applied. An input without `@` is
/// returned unchanged.
pub fn canonicalize(address: &str, provider: Option<&MailboxProvider>) -> String {
    match ResolvedAddress::new(address, provider) {
        Some(resolved) => resolved.canonical,
        None => address.to_string(),
    }
}

/// Text after the first `@`, if non-empty.
pub fn extract_domain(address: &str) -> Option<&str> {
    split_address(address.trim()).map(|(_, domain)| domain).filter(|d| !d.is_empty())
}

fn split_address(address: &str) -> Option<(&str, &str)> {
    address.split_once('@')
}

// Rules run in a fixed order; each step sees the previous step's output.
fn apply_rules(local: &str, domain: &str, rules: &AddressingRules) -> (String, String) {
    let (local, domain) = if rules.local_part_as_host_name {
        host_name_as_local_part(local, domain)
    } else {
        (local, domain)
    };

    let mut local = local.to_lowercase();

    if rules.plus_addressing {
        truncate_at(&mut local, '+');
    }

    if rules.dash_addressing {
        truncate_at(&mut local, '-');
    }

    if rules.strip_dots {
        local.retain(|c| c != '.');
    }

    (local, domain.to_lowercase())
}

// `x@mailbox.example.com` -> (`mailbox`, `example.com`); two labels or fewer
// leave the pair untouched.
fn host_name_as_local_part<'a>(local: &'a str, domain: &'a str) -> (&'a str, &'a str) {
    if domain.split('.').count() <= 2 {
        return (local, domain);
    }
    match domain.split_once('.') {
        Some((label, rest)) => (label, rest),
        None => (local, domain),
    }
}

fn truncate_at(local: &mut String, tag: char) {
    if let Some(pos) = local.find(tag) {
        local.truncate(pos);
    }
}
