use std::fmt::Display;

use thiserror::Error;

/// Classified failure of an MX resolution.
///
/// Cloneable so a cached failure can be handed out again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MxError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed: {domain}")]
    InvalidDomain { domain: String },
    #[error("failed to fetch mailserver records: {detail}")]
    Transport { detail: String },
    #[error("DNS query failed (status {status})")]
    QueryFailed { status: u16 },
    #[error("no mailserver records found for this domain")]
    NoRecords,
    #[error("malformed DNS response: {detail}")]
    MalformedResponse { detail: String },
}

/// Fieldless classification of [`MxError`].
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MxErrorKind {
    EmptyDomain,
    InvalidDomain,
    Transport,
    QueryFailed,
    NoRecords,
    MalformedResponse,
}

impl MxErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyDomain => "empty_domain",
            Self::InvalidDomain => "invalid_domain",
            Self::Transport => "transport",
            Self::QueryFailed => "query_failed",
            Self::NoRecords => "no_records",
            Self::MalformedResponse => "malformed_response",
        }
    }
}

impl MxError {
    pub fn kind(&self) -> MxErrorKind {
        match self {
            Self::EmptyDomain => MxErrorKind::EmptyDomain,
            Self::InvalidDomain { .. } => MxErrorKind::InvalidDomain,
            Self::Transport { .. } => MxErrorKind::Transport,
            Self::QueryFailed { .. } => MxErrorKind::QueryFailed,
            Self::NoRecords => MxErrorKind::NoRecords,
            Self::MalformedResponse { .. } => MxErrorKind::MalformedResponse,
        }
    }

    pub(crate) fn invalid_domain(domain: impl Into<String>) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
        }
    }

    pub(crate) fn transport(source: impl Display) -> Self {
        Self::Transport {
            detail: source.to_string(),
        }
    }

    pub(crate) fn query_failed(status: u16) -> Self {
        Self::QueryFailed { status }
    }

    pub(crate) fn malformed(detail: impl Display) -> Self {
        Self::MalformedResponse {
            detail: detail.to_string(),
        }
    }
}
