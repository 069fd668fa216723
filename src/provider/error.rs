use thiserror::Error;

/// Errors raised when building a custom provider registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate provider name '{name}'")]
    DuplicateProvider { name: String },
    #[error("provider '{name}' has an empty MX suffix")]
    EmptySuffix { name: String },
    #[error("MX suffix '{suffix}' is claimed by both '{first}' and '{second}'")]
    SharedSuffix {
        suffix: String,
        first: String,
        second: String,
    },
}

impl RegistryError {
    pub(crate) fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateProvider { name: name.into() }
    }

    pub(crate) fn empty_suffix(name: impl Into<String>) -> Self {
        Self::EmptySuffix { name: name.into() }
    }

    pub(crate) fn shared_suffix(
        suffix: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::SharedSuffix {
            suffix: suffix.into(),
            first: first.into(),
            second: second.into(),
        }
    }
}
