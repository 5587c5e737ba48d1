//! DNS Gateway Core Library
//!
//! Provider-agnostic facade over [`dns_gateway_provider`]:
//! - [`DnsGateway`]: record operations on one configured domain, returning
//!   [`UnifiedRecord`]s whatever the provider
//! - [`GatewayConfig`]: TOML file of named domain configurations
//! - [`GatewayError`]: configuration errors and operation failures, each
//!   classified by [`ErrorKind`]
//!
//! ```rust,no_run
//! use dns_gateway_core::{DnsGateway, DomainConfig, RecordOptions, RecordType};
//!
//! # async fn example() -> dns_gateway_core::GatewayResult<()> {
//! let gateway = DnsGateway::new(&DomainConfig {
//!     provider_type: "dnspod".to_string(),
//!     credential_primary: "AKID...".to_string(),
//!     credential_secondary: "secret".to_string(),
//!     zone_ref: "example.com".to_string(),
//!     base_url: None,
//! })?;
//!
//! let record = gateway
//!     .add_record(RecordType::A, "www", "1.2.3.4", &RecordOptions::default().with_ttl(600))
//!     .await?;
//! println!("created {}", record.id);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use config::{GatewayConfig, NamedDomain};
pub use error::{ErrorKind, GatewayError, GatewayResult, ProviderError};
pub use gateway::{DnsGateway, extract_record_id};
pub use types::{DEFAULT_LINE, DiagnosticInfo, RecordOptions, UnifiedRecord};

// Re-export provider types callers need alongside the gateway
pub use dns_gateway_provider::{
    DomainConfig, PaginationParams, ProviderCapabilities, ProviderDomain, ProviderMetadata,
    ProviderType, RecordQuery, RecordType, VerificationAttempt,
};
