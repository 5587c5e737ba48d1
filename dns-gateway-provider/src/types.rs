use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::capabilities::ProviderCapabilities;
use crate::error::{ErrorKind, ProviderError};

// ============ Pagination ============

/// Pagination parameters for list operations.
///
/// Pages are 1-indexed. The default is `page = 1, page_size = 20`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

impl PaginationParams {
    /// Clamp pagination values to valid ranges.
    ///
    /// - `page` is clamped to `>= 1`
    /// - `page_size` is clamped to `1..=max_page_size`
    #[must_use]
    pub fn validated(&self, max_page_size: u32) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, max_page_size),
        }
    }

    /// Zero-based offset of the first item on this page.
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// Query parameters for record listing.
///
/// Pagination is caller-driven: one query fetches one page, nothing is auto-iterated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
    /// Optional keyword matched against record names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Optional record type filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_type: Option<RecordType>,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 100,
            keyword: None,
            record_type: None,
        }
    }
}

impl RecordQuery {
    /// Convert to basic [`PaginationParams`], discarding search/filter fields.
    pub fn to_pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Clamp pagination values, preserving `keyword` and `record_type`.
    #[must_use]
    pub fn validated(&self, max_page_size: u32) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, max_page_size),
            keyword: self.keyword.clone().filter(|k| !k.is_empty()),
            record_type: self.record_type,
        }
    }
}

// ============ Provider Types ============

/// Identifies which provider client to use.
///
/// Each variant is gated behind its corresponding feature flag. Parse a raw tag
/// with [`FromStr`]; unknown or disabled tags are a configuration error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Cloudflare (token/key REST). Requires feature `cloudflare`.
    #[cfg(feature = "cloudflare")]
    Cloudflare,
    /// dnsmgr aggregation panel (signed form-POST). Requires feature `dnsmgr`.
    #[cfg(feature = "dnsmgr")]
    Dnsmgr,
    /// Tencent Cloud `DNSPod` (secret id/key). Requires feature `dnspod`.
    #[cfg(feature = "dnspod")]
    Dnspod,
    /// Self-hosted PowerDNS (API URL + key). Requires feature `powerdns`.
    #[cfg(feature = "powerdns")]
    Powerdns,
}

impl ProviderType {
    /// Machine tag of this provider.
    pub const fn as_str(self) -> &'static str {
        match self {
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare => "cloudflare",
            #[cfg(feature = "dnsmgr")]
            Self::Dnsmgr => "dnsmgr",
            #[cfg(feature = "dnspod")]
            Self::Dnspod => "dnspod",
            #[cfg(feature = "powerdns")]
            Self::Powerdns => "powerdns",
        }
    }

    /// Static capability table of this provider. No I/O.
    pub const fn capabilities(self) -> &'static ProviderCapabilities {
        ProviderCapabilities::of(self)
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            #[cfg(feature = "cloudflare")]
            "cloudflare" => Ok(Self::Cloudflare),
            #[cfg(feature = "dnsmgr")]
            "dnsmgr" => Ok(Self::Dnsmgr),
            #[cfg(feature = "dnspod")]
            "dnspod" => Ok(Self::Dnspod),
            #[cfg(feature = "powerdns")]
            "powerdns" => Ok(Self::Powerdns),
            other => Err(ProviderError::configuration(
                other,
                Some("provider_type"),
                format!("unsupported provider type '{s}'"),
            )),
        }
    }
}

// ============ Domain Types ============

/// Status of a domain/zone within a DNS provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    /// Domain is active and resolving.
    Active,
    /// Domain is paused (not resolving).
    Paused,
    /// Domain is pending activation/verification.
    Pending,
    /// Domain is in an error state.
    Error,
    /// Status could not be determined.
    Unknown,
}

/// A domain (zone) managed by a DNS provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDomain {
    /// Provider-specific zone reference (zone id, numeric id, or bare name).
    pub id: String,
    /// Domain name (e.g., `"example.com"`).
    pub name: String,
    /// Which provider manages this domain.
    pub provider: ProviderType,
    /// Current domain status.
    pub status: DomainStatus,
    /// Number of DNS records in this domain, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<u32>,
}

// ============ DNS Record Types ============

/// DNS record type.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Name server record.
    Ns,
    /// Pointer (reverse lookup) record.
    Ptr,
    /// Service locator record.
    Srv,
    /// Certificate Authority Authorization record.
    Caa,
}

impl RecordType {
    /// Every record type the gateway knows about.
    pub const ALL: [Self; 9] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Mx,
        Self::Txt,
        Self::Ns,
        Self::Ptr,
        Self::Srv,
        Self::Caa,
    ];

    /// Upper-case wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Ptr => "PTR",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
        }
    }

    /// Case-insensitive parse of a wire name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS record as reported by a provider, before normalization.
///
/// Fields the provider did not report stay `None`; the gateway fills them from
/// the capability table when building a unified record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    /// Provider-native record identifier, stringified.
    pub id: String,
    /// Record name as the provider reports it.
    pub name: String,
    /// Record type.
    pub record_type: RecordType,
    /// Record content/value.
    pub content: String,
    /// TTL in seconds.
    pub ttl: Option<u32>,
    /// Proxy flag (Cloudflare only).
    pub proxied: Option<bool>,
    /// Routing line identifier.
    pub line: Option<String>,
    /// Weight for weighted round-robin.
    pub weight: Option<u32>,
    /// MX priority.
    pub mx: Option<u16>,
    /// Free-form remark/comment.
    pub remark: Option<String>,
    /// Whether the record is enabled.
    pub enabled: Option<bool>,
}

/// A record create/update as handed to a provider client.
///
/// Optional fields are already filtered by the caller down to what the
/// provider honours; clients pass through whatever is `Some`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMutation {
    /// Record type.
    pub record_type: RecordType,
    /// Record name (subdomain or full name).
    pub name: String,
    /// Record content/value.
    pub content: String,
    /// TTL in seconds.
    pub ttl: Option<u32>,
    /// Proxy flag.
    pub proxied: Option<bool>,
    /// Routing line identifier.
    pub line: Option<String>,
    /// Weight.
    pub weight: Option<u32>,
    /// MX priority.
    pub mx: Option<u16>,
    /// Remark/comment.
    pub remark: Option<String>,
}

impl RecordMutation {
    /// A mutation with only the mandatory fields set.
    pub fn new(record_type: RecordType, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            record_type,
            name: name.into(),
            content: content.into(),
            ttl: None,
            proxied: None,
            line: None,
            weight: None,
            mx: None,
            remark: None,
        }
    }
}

/// What a provider returned for a create/update.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeMutation {
    /// A structured record.
    Record(ProviderRecord),
    /// An unstructured payload: a bare id scalar, or an object holding the id
    /// under some provider-specific key.
    Payload(serde_json::Value),
}

// ============ Credential Verification ============

/// Outcome of a single credential verification strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationAttempt {
    /// Strategy name (e.g. `"scoped_token"`).
    pub strategy: String,
    /// Endpoint the strategy called.
    pub endpoint: String,
    /// Whether the strategy accepted the credentials.
    pub success: bool,
    /// Failure detail, or a short status note on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Every verification attempt made for one `verify_credentials` call, in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    /// Attempts in the order they ran.
    pub attempts: Vec<VerificationAttempt>,
    /// 最后一次失败的错误
    #[serde(skip)]
    last_error: Option<ProviderError>,
    /// 传输层失败的次数
    #[serde(skip)]
    transport_failures: usize,
}

impl VerificationReport {
    /// `true` if any strategy succeeded.
    pub fn is_valid(&self) -> bool {
        self.attempts.iter().any(|a| a.success)
    }

    /// The last transport error, when every attempt failed at the transport
    /// level and the provider was never actually reached.
    pub fn transport_error(&self) -> Option<&ProviderError> {
        if self.attempts.is_empty()
            || self.is_valid()
            || self.transport_failures < self.attempts.len()
        {
            return None;
        }
        self.last_error.as_ref()
    }

    pub(crate) fn push(
        &mut self,
        strategy: &str,
        endpoint: &str,
        result: std::result::Result<Option<String>, ProviderError>,
    ) -> bool {
        let (success, detail) = match result {
            Ok(note) => (true, note),
            Err(e) => {
                let detail = e.to_string();
                if e.kind() == ErrorKind::Transport {
                    self.transport_failures += 1;
                }
                self.last_error = Some(e);
                (false, Some(detail))
            }
        };
        self.attempts.push(VerificationAttempt {
            strategy: strategy.to_string(),
            endpoint: endpoint.to_string(),
            success,
            detail,
        });
        success
    }
}

// ============ Provider Metadata Types ============

/// The input type of a credential field (affects UI rendering).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Masked/password input.
    Password,
    /// URL input.
    Url,
}

/// Which generic [`DomainConfig`] slot a provider field is read from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSlot {
    /// `credential_primary`.
    CredentialPrimary,
    /// `credential_secondary`.
    CredentialSecondary,
    /// `base_url`.
    BaseUrl,
}

/// Definition of a single credential field required by a provider.
///
/// Used to build and validate configuration forms upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentialField {
    /// Provider-specific field key (e.g., `"secretId"`).
    pub key: String,
    /// Human-readable label (e.g., `"SecretId"`).
    pub label: String,
    /// Input type for UI rendering.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Generic slot this field is read from.
    pub slot: ConfigSlot,
    /// Whether the field must be non-empty.
    pub required: bool,
    /// Optional placeholder text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Optional help/description text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// Static metadata describing a provider.
///
/// Obtain via [`get_all_provider_metadata()`](crate::get_all_provider_metadata).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    /// Provider type identifier.
    pub id: ProviderType,
    /// Short description of the provider.
    pub description: String,
    /// Credential fields, with the generic slot each maps to.
    pub fields: Vec<ProviderCredentialField>,
    /// Capability flags and supported record types.
    pub capabilities: &'static ProviderCapabilities,
}

// ============ Configuration ============

/// Provider-agnostic configuration of one managed domain.
///
/// The meaning of the two credential slots depends on `provider_type`; see
/// [`ProviderCredentials::from_domain_config`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Provider tag (`cloudflare`, `dnsmgr`, `dnspod`, `powerdns`).
    pub provider_type: String,
    /// First credential (API key, UID, SecretId, or API URL).
    #[serde(default)]
    pub credential_primary: String,
    /// Second credential (email, API key, SecretKey, or API key).
    #[serde(default)]
    pub credential_secondary: String,
    /// Zone id, numeric domain id, or bare domain name.
    #[serde(default)]
    pub zone_ref: String,
    /// Endpoint override; required for self-hosted panels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// `PowerDNS` API endpoint, split out of the configured API URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    /// `http` or `https`.
    pub scheme: String,
    /// Host name or address.
    pub host: String,
    /// TCP port (explicit, or the scheme default).
    pub port: u16,
}

impl ApiEndpoint {
    /// Base URL without trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Type-safe credential container for all supported providers.
///
/// Each variant holds exactly the fields its client constructor needs.
/// Pass this to [`create_provider()`](crate::create_provider).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    /// Cloudflare credentials. Requires feature `cloudflare`.
    #[cfg(feature = "cloudflare")]
    #[serde(rename = "cloudflare")]
    Cloudflare {
        /// Global API key or scoped API token.
        api_key: String,
        /// Account email; when present the key is sent as `X-Auth-Key`.
        email: Option<String>,
        /// API root override.
        api_base: Option<String>,
    },

    /// dnsmgr panel credentials. Requires feature `dnsmgr`.
    #[cfg(feature = "dnsmgr")]
    #[serde(rename = "dnsmgr")]
    Dnsmgr {
        /// Panel user id.
        uid: String,
        /// Panel API key.
        api_key: String,
        /// Panel base URL.
        base_url: String,
    },

    /// Tencent Cloud `DNSPod` credentials. Requires feature `dnspod`.
    #[cfg(feature = "dnspod")]
    #[serde(rename = "dnspod")]
    Dnspod {
        /// Tencent Cloud Secret ID.
        secret_id: String,
        /// Tencent Cloud Secret Key.
        secret_key: String,
        /// Endpoint override.
        endpoint: Option<String>,
    },

    /// `PowerDNS` credentials. Requires feature `powerdns`.
    #[cfg(feature = "powerdns")]
    #[serde(rename = "powerdns")]
    Powerdns {
        /// API endpoint.
        endpoint: ApiEndpoint,
        /// `X-API-Key` value.
        api_key: String,
    },
}

impl ProviderCredentials {
    /// Translate a generic [`DomainConfig`] into provider-specific credentials.
    ///
    /// | provider     | primary      | secondary   | base_url  |
    /// |--------------|--------------|-------------|-----------|
    /// | `cloudflare` | API key      | email (opt) | optional  |
    /// | `dnsmgr`     | UID          | API key     | required  |
    /// | `dnspod`     | SecretId     | SecretKey   | optional  |
    /// | `powerdns`   | API URL      | API key     | ignored   |
    ///
    /// # Errors
    ///
    /// [`ProviderError::Configuration`] for an unknown provider tag, an empty
    /// required field, or a URL that does not parse or has no host.
    pub fn from_domain_config(config: &DomainConfig) -> Result<Self, ProviderError> {
        let provider: ProviderType = config.provider_type.parse()?;
        let tag = provider.as_str();

        match provider {
            #[cfg(feature = "cloudflare")]
            ProviderType::Cloudflare => Ok(Self::Cloudflare {
                api_key: required(tag, "credential_primary", &config.credential_primary)?,
                email: optional(&config.credential_secondary),
                api_base: config
                    .base_url
                    .as_deref()
                    .and_then(optional)
                    .map(|u| validated_url(tag, "base_url", &u).map(|_| u))
                    .transpose()?,
            }),
            #[cfg(feature = "dnsmgr")]
            ProviderType::Dnsmgr => {
                let uid = required(tag, "credential_primary", &config.credential_primary)?;
                let api_key = required(tag, "credential_secondary", &config.credential_secondary)?;
                let base_url = required(tag, "base_url", config.base_url.as_deref().unwrap_or(""))?;
                validated_url(tag, "base_url", &base_url)?;
                Ok(Self::Dnsmgr {
                    uid,
                    api_key,
                    base_url: base_url.trim_end_matches('/').to_string(),
                })
            }
            #[cfg(feature = "dnspod")]
            ProviderType::Dnspod => Ok(Self::Dnspod {
                secret_id: required(tag, "credential_primary", &config.credential_primary)?,
                secret_key: required(tag, "credential_secondary", &config.credential_secondary)?,
                endpoint: config
                    .base_url
                    .as_deref()
                    .and_then(optional)
                    .map(|u| validated_url(tag, "base_url", &u).map(|_| u))
                    .transpose()?,
            }),
            #[cfg(feature = "powerdns")]
            ProviderType::Powerdns => {
                let raw = required(tag, "credential_primary", &config.credential_primary)?;
                let url = validated_url(tag, "credential_primary", &raw)?;
                let host = url.host_str().unwrap_or_default().to_string();
                let port = url.port_or_known_default().ok_or_else(|| {
                    ProviderError::configuration(
                        tag,
                        Some("credential_primary"),
                        format!("cannot determine port of API URL '{raw}'"),
                    )
                })?;
                Ok(Self::Powerdns {
                    endpoint: ApiEndpoint {
                        scheme: url.scheme().to_string(),
                        host,
                        port,
                    },
                    api_key: required(tag, "credential_secondary", &config.credential_secondary)?,
                })
            }
        }
    }

    /// Provider type of these credentials.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare { .. } => ProviderType::Cloudflare,
            #[cfg(feature = "dnsmgr")]
            Self::Dnsmgr { .. } => ProviderType::Dnsmgr,
            #[cfg(feature = "dnspod")]
            Self::Dnspod { .. } => ProviderType::Dnspod,
            #[cfg(feature = "powerdns")]
            Self::Powerdns { .. } => ProviderType::Powerdns,
        }
    }
}

fn required(provider: &str, field: &str, value: &str) -> Result<String, ProviderError> {
    optional(value).ok_or_else(|| {
        ProviderError::configuration(provider, Some(field), "required field is empty")
    })
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn validated_url(provider: &str, field: &str, raw: &str) -> Result<url::Url, ProviderError> {
    let url = url::Url::parse(raw).map_err(|e| {
        ProviderError::configuration(provider, Some(field), format!("invalid URL '{raw}': {e}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ProviderError::configuration(
            provider,
            Some(field),
            format!("unsupported URL scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ProviderError::configuration(
            provider,
            Some(field),
            format!("URL '{raw}' has no host"),
        ));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn config(provider: &str, primary: &str, secondary: &str, base: Option<&str>) -> DomainConfig {
        DomainConfig {
            provider_type: provider.to_string(),
            credential_primary: primary.to_string(),
            credential_secondary: secondary.to_string(),
            zone_ref: "example.com".to_string(),
            base_url: base.map(ToString::to_string),
        }
    }

    #[test]
    fn record_type_parse_is_case_insensitive() {
        assert_eq!(RecordType::parse("aaaa"), Some(RecordType::Aaaa));
        assert_eq!(RecordType::parse(" Ptr "), Some(RecordType::Ptr));
        assert_eq!(RecordType::parse("LOC"), None);
    }

    #[test]
    fn record_type_serializes_uppercase() {
        let json = serde_json::to_string(&RecordType::Cname).unwrap();
        assert_eq!(json, "\"CNAME\"");
    }

    #[test]
    fn provider_type_from_str() {
        assert_eq!(
            "Cloudflare".parse::<ProviderType>().unwrap(),
            ProviderType::Cloudflare
        );
        let err = "route53".parse::<ProviderType>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn pagination_offset() {
        let p = PaginationParams {
            page: 3,
            page_size: 20,
        };
        assert_eq!(p.offset(), 40);
        let p = PaginationParams {
            page: 0,
            page_size: 20,
        };
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn cloudflare_email_is_optional() {
        let creds =
            ProviderCredentials::from_domain_config(&config("cloudflare", "key", "", None))
                .unwrap();
        assert!(matches!(
            creds,
            ProviderCredentials::Cloudflare { email: None, .. }
        ));
    }

    #[test]
    fn dnsmgr_requires_base_url() {
        let err = ProviderCredentials::from_domain_config(&config("dnsmgr", "1", "key", None))
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Configuration { field: Some(ref f), .. } if f == "base_url"
        ));
    }

    #[test]
    fn dnsmgr_trims_trailing_slash() {
        let creds = ProviderCredentials::from_domain_config(&config(
            "dnsmgr",
            "1",
            "key",
            Some("https://panel.example.com/"),
        ))
        .unwrap();
        assert!(matches!(
            creds,
            ProviderCredentials::Dnsmgr { ref base_url, .. } if base_url == "https://panel.example.com"
        ));
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let err = ProviderCredentials::from_domain_config(&config("dnspod", "   ", "key", None))
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Configuration { field: Some(ref f), .. } if f == "credential_primary"
        ));
    }

    #[test]
    fn powerdns_url_split_into_host_and_port() {
        let creds = ProviderCredentials::from_domain_config(&config(
            "powerdns",
            "http://ns1.example.net:8081",
            "secret",
            None,
        ))
        .unwrap();
        let ProviderCredentials::Powerdns { endpoint, .. } = creds else {
            panic!("expected powerdns credentials");
        };
        assert_eq!(endpoint.host, "ns1.example.net");
        assert_eq!(endpoint.port, 8081);
        assert_eq!(endpoint.base_url(), "http://ns1.example.net:8081");
    }

    #[test]
    fn powerdns_default_port_from_scheme() {
        let creds = ProviderCredentials::from_domain_config(&config(
            "powerdns",
            "https://dns.example.net",
            "secret",
            None,
        ))
        .unwrap();
        assert!(matches!(
            creds,
            ProviderCredentials::Powerdns { ref endpoint, .. } if endpoint.port == 443
        ));
    }

    #[test]
    fn powerdns_url_without_host_fails_fast() {
        let err = ProviderCredentials::from_domain_config(&config(
            "powerdns",
            "http://:8081",
            "secret",
            None,
        ))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err =
            ProviderCredentials::from_domain_config(&config("powerdns", "ns1:8081", "secret", None))
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn verification_report_validity() {
        let mut report = VerificationReport::default();
        assert!(!report.is_valid());
        report.push(
            "first",
            "/a",
            Err(ProviderError::NetworkError {
                provider: "t".into(),
                detail: "refused".into(),
            }),
        );
        assert!(!report.is_valid());
        report.push("second", "/b", Ok(None));
        assert!(report.is_valid());
        assert_eq!(report.attempts.len(), 2);
        assert!(report.attempts[0].detail.as_deref().unwrap().contains("refused"));
        assert!(report.transport_error().is_none());
    }

    #[test]
    fn verification_transport_failure() {
        let refused = || {
            Err(ProviderError::NetworkError {
                provider: "t".into(),
                detail: "connection refused".into(),
            })
        };
        let mut report = VerificationReport::default();
        assert!(report.transport_error().is_none());
        report.push("first", "/a", refused());
        report.push("second", "/b", refused());
        let err = report.transport_error().unwrap();
        assert_eq!(err.kind(), ErrorKind::Transport);

        // 只要有一次到达了上游，就是凭证问题而不是传输问题
        let mut report = VerificationReport::default();
        report.push("first", "/a", refused());
        report.push(
            "second",
            "/b",
            Err(ProviderError::InvalidCredentials {
                provider: "t".into(),
                raw_message: None,
            }),
        );
        assert!(!report.is_valid());
        assert!(report.transport_error().is_none());
    }
}
