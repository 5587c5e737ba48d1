//! # dns-gateway-provider
//!
//! Provider clients behind the DNS gateway: one uniform
//! [`ProviderClient`] trait over four very different upstream APIs.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Auth Method |
//! |----------|-------------|-------------|
//! | [Cloudflare](https://www.cloudflare.com/) | `cloudflare` | Bearer Token / Global API Key |
//! | dnsmgr panel | `dnsmgr` | MD5(uid + timestamp + key) |
//! | [DNSPod (Tencent Cloud)](https://www.dnspod.cn/) | `dnspod` | TC3-HMAC-SHA256 |
//! | [PowerDNS](https://www.powerdns.com/) | `powerdns` | `X-API-Key` |
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)*: enable all providers listed above.
//! - **`cloudflare`**, **`dnsmgr`**, **`dnspod`**, **`powerdns`**: enable a single provider.
//! - **`native-tls`** *(default)* / **`rustls`**: TLS backend for `reqwest`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dns_gateway_provider::{create_provider_from_config, DomainConfig, RecordQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DomainConfig {
//!         provider_type: "powerdns".to_string(),
//!         credential_primary: "http://127.0.0.1:8081".to_string(),
//!         credential_secondary: "api-key".to_string(),
//!         zone_ref: "example.com".to_string(),
//!         base_url: None,
//!     };
//!     let provider = create_provider_from_config(&config)?;
//!
//!     let report = provider.verify_credentials().await?;
//!     println!("credentials valid: {}", report.is_valid());
//!
//!     for record in provider.list_records(&config.zone_ref, &RecordQuery::default()).await? {
//!         println!("{} {} {}", record.name, record.record_type, record.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError). Every
//! variant falls into one [`ErrorKind`]:
//!
//! - `Configuration`: missing or malformed credentials, rejected before any request
//! - `Transport`: timeouts, connection failures, 429 and 5xx gateway errors
//! - `UpstreamRejection`: the provider answered and said no
//! - `ProtectedRecordConflict`: Cloudflare refused to touch a managed record
//! - `UnsupportedOperation`: the provider has no such feature
//!
//! Requests are never retried; a transient failure is reported as-is.

mod capabilities;
mod error;
mod factory;
pub mod http_client;
mod providers;
mod traits;
mod types;
pub mod utils;

pub use capabilities::ProviderCapabilities;

pub use error::{ErrorKind, ProviderError, Result};

pub use factory::{
    create_provider, create_provider_from_config, get_all_provider_metadata, provider_metadata,
};

pub use traits::ProviderClient;

pub use types::{
    ApiEndpoint, ConfigSlot, DomainConfig, DomainStatus, FieldType, NativeMutation,
    PaginationParams, ProviderCredentialField, ProviderCredentials, ProviderDomain,
    ProviderMetadata, ProviderRecord, ProviderType, RecordMutation, RecordQuery, RecordType,
    VerificationAttempt, VerificationReport,
};

#[cfg(feature = "cloudflare")]
pub use providers::{CloudflareProvider, CloudflareProviderBuilder};

#[cfg(feature = "dnsmgr")]
pub use providers::DnsmgrProvider;

#[cfg(feature = "dnspod")]
pub use providers::{DnspodProvider, DnspodProviderBuilder};

#[cfg(feature = "powerdns")]
pub use providers::PowerdnsProvider;
