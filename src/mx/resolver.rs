use std::sync::Arc;

use super::{Error, MxHosts, MxOutcome, MxRecord};
use crate::log;

/// Transport seam: fetch the MX answers for an ASCII domain.
///
/// Implementations classify their own failures. An empty answer list means
/// the domain has no MX records.
pub trait LookupMx {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error>;
}

impl<T: LookupMx + ?Sized> LookupMx for &T {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error> {
        (**self).lookup_mx(domain)
    }
}

impl<T: LookupMx + ?Sized> LookupMx for Box<T> {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error> {
        (**self).lookup_mx(domain)
    }
}

impl<T: LookupMx + ?Sized> LookupMx for Arc<T> {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error> {
        (**self).lookup_mx(domain)
    }
}

/// Resolve the MX target hostnames of `domain` through `resolver`, uncached.
///
/// The domain is normalized via IDNA first. Hosts keep the transport's
/// order; preferences are dropped.
pub fn resolve_mx<R>(resolver: &R, domain: &str) -> MxOutcome
where
    R: LookupMx + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    resolve_with(resolver, &ascii)
}

pub(crate) fn resolve_with<R>(resolver: &R, ascii_domain: &str) -> MxOutcome
where
    R: LookupMx + ?Sized,
{
    let records = match resolver.lookup_mx(ascii_domain) {
        Ok(records) => records,
        Err(err) => {
            log::warn!(domain = ascii_domain, error = %err, "MX lookup failed");
            return Err(err);
        }
    };

    let hosts = records.into_iter().map(|r| r.exchange).collect();
    let outcome = MxHosts::new(hosts).ok_or(Error::NoRecords);
    log::debug!(domain = ascii_domain, outcome = ?outcome, "MX lookup finished");
    outcome
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, Error> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(|_| Error::invalid_domain(trimmed))
}

#[cfg(feature = "with-mx")]
pub use system::SystemResolver;

#[cfg(feature = "with-mx")]
mod system {
    use trust_dns_resolver::{
        Resolver,
        error::{ResolveError, ResolveErrorKind},
        proto::op::ResponseCode,
    };

    use super::{Error, LookupMx, MxRecord};

    /// Blocking transport backed by the system resolver configuration.
    pub struct SystemResolver {
        inner: Resolver,
    }

    impl SystemResolver {
        pub fn from_system_conf() -> Result<Self, Error> {
            let inner = Resolver::from_system_conf().map_err(Error::transport)?;
            Ok(Self { inner })
        }
    }

    impl LookupMx for SystemResolver {
        fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error> {
            match Resolver::mx_lookup(&self.inner, domain) {
                Ok(lookup) => Ok(lookup
                    .iter()
                    .map(|mx| MxRecord::new(mx.preference(), mx.exchange().to_utf8()))
                    .collect()),
                Err(err) => classify(err),
            }
        }
    }

    fn classify(err: ResolveError) -> Result<Vec<MxRecord>, Error> {
        match err.kind() {
            ResolveErrorKind::NoRecordsFound { response_code, .. }
                if *response_code == ResponseCode::NoError =>
            {
                Ok(Vec::new())
            }
            ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                Err(Error::query_failed(u16::from(*response_code)))
            }
            _ => Err(Error::transport(err)),
        }
    }

}

#[cfg(test)]
impl LookupMx for crate::mx::tests::StubResolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        (self.on_lookup)(domain)
    }
}
