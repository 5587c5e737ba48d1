//! Static capability tables, one per provider.
//!
//! Lookups are pure: nothing here touches the network or the credentials.

use serde::Serialize;

use crate::types::{ProviderType, RecordType};

/// What a provider honours beyond name/type/content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCapabilities {
    /// Human-readable provider name.
    pub display_name: &'static str,
    /// Edge proxying (orange cloud).
    pub supports_proxy: bool,
    /// Routing lines (ISP / region resolution).
    pub supports_line: bool,
    /// Weighted round-robin.
    pub supports_weight: bool,
    /// Remark / comment text.
    pub supports_remark: bool,
    /// Enable/disable without deleting.
    pub supports_status: bool,
    /// Record types the provider accepts.
    pub supported_types: &'static [RecordType],
    /// TTL reported when the provider omits one.
    pub default_ttl: u32,
}

const ALL_TYPES: &[RecordType] = &RecordType::ALL;

const WITHOUT_PTR: &[RecordType] = &[
    RecordType::A,
    RecordType::Aaaa,
    RecordType::Cname,
    RecordType::Mx,
    RecordType::Txt,
    RecordType::Ns,
    RecordType::Srv,
    RecordType::Caa,
];

#[cfg(feature = "cloudflare")]
const CLOUDFLARE: ProviderCapabilities = ProviderCapabilities {
    display_name: "Cloudflare",
    supports_proxy: true,
    supports_line: false,
    supports_weight: false,
    supports_remark: true,
    supports_status: false,
    supported_types: ALL_TYPES,
    // 1 = "automatic"
    default_ttl: 1,
};

#[cfg(feature = "dnsmgr")]
const DNSMGR: ProviderCapabilities = ProviderCapabilities {
    display_name: "dnsmgr",
    supports_proxy: false,
    supports_line: true,
    supports_weight: true,
    supports_remark: true,
    supports_status: true,
    supported_types: WITHOUT_PTR,
    default_ttl: 600,
};

#[cfg(feature = "dnspod")]
const DNSPOD: ProviderCapabilities = ProviderCapabilities {
    display_name: "DNSPod",
    supports_proxy: false,
    supports_line: true,
    supports_weight: true,
    supports_remark: true,
    supports_status: true,
    supported_types: WITHOUT_PTR,
    default_ttl: 600,
};

#[cfg(feature = "powerdns")]
const POWERDNS: ProviderCapabilities = ProviderCapabilities {
    display_name: "PowerDNS",
    supports_proxy: false,
    supports_line: false,
    supports_weight: false,
    supports_remark: true,
    supports_status: true,
    supported_types: ALL_TYPES,
    default_ttl: 3600,
};

impl ProviderCapabilities {
    /// Capability table of `provider`.
    pub const fn of(provider: ProviderType) -> &'static Self {
        match provider {
            #[cfg(feature = "cloudflare")]
            ProviderType::Cloudflare => &CLOUDFLARE,
            #[cfg(feature = "dnsmgr")]
            ProviderType::Dnsmgr => &DNSMGR,
            #[cfg(feature = "dnspod")]
            ProviderType::Dnspod => &DNSPOD,
            #[cfg(feature = "powerdns")]
            ProviderType::Powerdns => &POWERDNS,
        }
    }

    /// Whether `record_type` is accepted.
    pub fn supports_type(&self, record_type: RecordType) -> bool {
        self.supported_types.contains(&record_type)
    }
}
