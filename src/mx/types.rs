use super::Error;

/// One MX answer as returned by a transport.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// Non-empty list of MX target hostnames, in the order the transport
/// returned them.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[cfg_attr(feature = "with-serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxHosts(Vec<String>);

impl MxHosts {
    pub fn new(hosts: Vec<String>) -> Option<Self> {
        if hosts.is_empty() { None } else { Some(Self(hosts)) }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: an `MxHosts` holds at least one host.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl AsRef<[String]> for MxHosts {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

/// Outcome of one resolution attempt, as stored in the cache.
pub type MxOutcome = Result<MxHosts, Error>;
