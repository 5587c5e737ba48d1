//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use dns_gateway_provider::{ErrorKind, ProviderError};

/// Gateway layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum GatewayError {
    /// Domain configuration was rejected while building the provider client.
    #[error("{0}")]
    Configuration(ProviderError),

    /// A gateway operation failed; `source` is the client's error unchanged.
    #[error("{operation}: {source}")]
    Operation {
        operation: &'static str,
        source: ProviderError,
    },

    /// The configuration file could not be read or parsed
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// No domain entry with this name in the configuration file
    #[error("Domain not configured: {0}")]
    DomainNotConfigured(String),
}

impl GatewayError {
    pub(crate) fn operation(operation: &'static str, source: ProviderError) -> Self {
        Self::Operation { operation, source }
    }

    /// Error kind; call failures report the kind of the client error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(e) | Self::Operation { source: e, .. } => e.kind(),
            Self::InvalidConfig(_) | Self::DomainNotConfigured(_) => ErrorKind::Configuration,
        }
    }

    /// The underlying provider error, if any.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Configuration(e) | Self::Operation { source: e, .. } => Some(e),
            Self::InvalidConfig(_) | Self::DomainNotConfigured(_) => None,
        }
    }

    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Configuration(_) | Self::DomainNotConfigured(_) => true,
            Self::Operation { source, .. } => source.is_expected(),
            Self::InvalidConfig(_) => false,
        }
    }
}

/// Gateway layer Result type alias
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_error_forwards_kind() {
        let err = GatewayError::operation(
            "delete_record",
            ProviderError::Timeout {
                provider: "powerdns".into(),
                detail: "30s".into(),
            },
        );
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().starts_with("delete_record: "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn config_errors_are_configuration_kind() {
        assert_eq!(
            GatewayError::DomainNotConfigured("x".into()).kind(),
            ErrorKind::Configuration
        );
        assert!(GatewayError::InvalidConfig("bad".into()).provider_error().is_none());
    }

    #[test]
    fn serializes_with_code_tag() {
        let err = GatewayError::DomainNotConfigured("example".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "DomainNotConfigured");
        assert_eq!(json["details"], "example");
    }
}
