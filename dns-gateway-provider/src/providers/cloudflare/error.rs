//! Cloudflare error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::CloudflareProvider;

/// Lower-case fragments Cloudflare uses when refusing to touch a record that
/// backs a fallback origin or a SaaS custom hostname.
///
/// This is a wording heuristic: Cloudflare has no dedicated error code for it,
/// so a reworded upstream message will fall through to the generic mapping.
const PROTECTED_MARKERS: &[&str] = &[
    "fallback origin",
    "fallback_origin",
    "custom hostname",
    "cloudflare for saas",
    "ssl for saas",
];

const PROTECTED_GUIDANCE: &str = "This record is the target of a Cloudflare fallback origin \
or custom hostname (Cloudflare for SaaS) and cannot be changed here. Update or remove the \
fallback origin or custom hostname in the Cloudflare dashboard first.";

/// Whether an upstream message describes a protected fallback-origin record.
pub(crate) fn is_protected_record_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    PROTECTED_MARKERS.iter().any(|m| lower.contains(m))
}

/// Cloudflare error code mapping
/// Reference: <https://api.cloudflare.com/#getting-started-responses>
impl ProviderErrorMapper for CloudflareProvider {
    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        if context.mutation && is_protected_record_message(&raw.message) {
            return ProviderError::ProtectedRecord {
                provider: self.provider_name().to_string(),
                record: context
                    .record_id
                    .or(context.record_name)
                    .unwrap_or_else(|| "<unknown>".to_string()),
                guidance: PROTECTED_GUIDANCE.to_string(),
                raw_message: Some(raw.message),
            };
        }

        match raw.code.as_deref() {
            // Authentication error
            // 1000: Invalid API Token
            // 6003: Invalid request headers
            // 6103: Invalid format for X-Auth-Key header
            // 6111: Invalid format for Authorization header
            // 9103: Unknown X-Auth-Key or X-Auth-Email
            // 9109: Unauthorized to access requested resource / Max auth failures reached
            // 10000: Authentication error
            Some("401" | "1000" | "6003" | "6103" | "6111" | "9103" | "9109" | "10000") => {
                ProviderError::InvalidCredentials {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }

            Some("403") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // Invalid parameter
            // 1004: DNS Validation Error
            // 9000: Invalid or missing name
            // 9005: Content for A record is invalid. Must be a valid IPv4 address
            // 9006: Content for AAAA record is invalid. Must be a valid IPv6 address
            // 9009: Content for MX record must be a hostname
            // 9021: Invalid TTL. Must be between 120 and 2147483647 seconds or 1 for automatic
            // 9041: This DNS record cannot be proxied
            Some(code @ ("1004" | "9000" | "9005" | "9006" | "9009" | "9021" | "9041")) => {
                let param = match code {
                    "9000" => "name",
                    "9005" | "9006" | "9009" => "value",
                    "9021" => "ttl",
                    "9041" => "proxied",
                    _ => "general",
                };
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: param.to_string(),
                    detail: raw.message,
                }
            }

            // 81053-81058: record with that host/settings already exists
            Some("81053" | "81054" | "81055" | "81056" | "81057" | "81058") => {
                ProviderError::RecordExists {
                    provider: self.provider_name().to_string(),
                    record_name: context
                        .record_name
                        .unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                }
            }

            // 81044: Record does not exist
            Some("81044") => ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record_id: context.record_id.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            // 404 without a Cloudflare code: record if one was addressed, otherwise the zone
            Some("404") if context.record_id.is_some() => ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record_id: context.record_id.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // 81045: The record quota has been exceeded
            Some("81045") => ProviderError::QuotaExceeded {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 7000: No route for that URI
            // 7003: Could not route to /path. perhaps your object identifier is invalid?
            Some("404" | "7000" | "7003") => ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            _ => self.unknown_error(raw),
        }
    }
}
