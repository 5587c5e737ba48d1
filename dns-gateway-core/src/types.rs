//! Gateway-facing record, option and diagnostic types

use serde::{Deserialize, Serialize};

use dns_gateway_provider::{ProviderType, RecordType, VerificationAttempt};

/// Provider-agnostic DNS record.
///
/// Every field is always populated; values a provider cannot express are
/// filled with fixed defaults (`proxied = false`, `line = "default"`,
/// `weight = 0`, `mx = 0`, `remark = ""`, `enabled = true`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedRecord {
    /// Provider-native record id, stringified.
    pub id: String,
    /// Subdomain or full name as given / reported.
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub content: String,
    /// TTL in seconds; the provider's default TTL when it reports none.
    pub ttl: u32,
    pub proxied: bool,
    pub line: String,
    pub weight: u32,
    /// MX priority; 0 for non-MX records.
    pub mx: u16,
    pub remark: String,
    pub enabled: bool,
}

/// 线路默认值
pub const DEFAULT_LINE: &str = "default";

/// Optional per-record settings for add/update.
///
/// | field     | honoured by                                |
/// |-----------|--------------------------------------------|
/// | `proxied` | cloudflare                                 |
/// | `line`    | dnsmgr, dnspod                             |
/// | `ttl`     | all                                        |
/// | `mx`      | all (MX records; SRV priority on cloudflare) |
/// | `weight`  | dnsmgr, dnspod                             |
/// | `remark`  | all                                        |
///
/// Settings a provider does not honour are dropped silently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordOptions {
    pub proxied: Option<bool>,
    pub line: Option<String>,
    pub ttl: Option<u32>,
    pub mx: Option<u16>,
    pub weight: Option<u32>,
    pub remark: Option<String>,
}

impl RecordOptions {
    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    #[must_use]
    pub fn with_proxied(mut self, proxied: bool) -> Self {
        self.proxied = Some(proxied);
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.line = Some(line.into());
        self
    }

    #[must_use]
    pub fn with_mx(mut self, mx: u16) -> Self {
        self.mx = Some(mx);
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }
}

/// Result of [`DnsGateway::verification_details`](crate::DnsGateway::verification_details).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticInfo {
    pub provider: ProviderType,
    pub display_name: String,
    /// `true` if any attempt succeeded.
    pub valid: bool,
    /// Every strategy that ran, in order.
    pub attempts: Vec<VerificationAttempt>,
}
