//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "cloudflare")]
mod cloudflare;
#[cfg(feature = "dnsmgr")]
mod dnsmgr;
#[cfg(feature = "dnspod")]
mod dnspod;
#[cfg(feature = "powerdns")]
mod powerdns;

#[cfg(feature = "cloudflare")]
pub use cloudflare::{CloudflareProvider, CloudflareProviderBuilder};
#[cfg(feature = "dnsmgr")]
pub use dnsmgr::DnsmgrProvider;
#[cfg(feature = "dnspod")]
pub use dnspod::{DnspodProvider, DnspodProviderBuilder};
#[cfg(feature = "powerdns")]
pub use powerdns::PowerdnsProvider;
