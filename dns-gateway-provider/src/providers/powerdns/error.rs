//! `PowerDNS` error mapping
//!
//! The API reports failures through the HTTP status and a single `error`
//! string, so `raw.code` is always the status code here.

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::PowerdnsProvider;

impl ProviderErrorMapper for PowerdnsProvider {
    fn provider_name(&self) -> &'static str {
        "powerdns"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        let lower = raw.message.to_lowercase();

        match raw.code.as_deref() {
            Some("401") => ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },
            Some("403") => ProviderError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            },
            Some("404") if context.record_id.is_some() && !lower.contains("zone") => {
                ProviderError::RecordNotFound {
                    provider,
                    record_id: context.record_id.unwrap_or_default(),
                    raw_message: Some(raw.message),
                }
            }
            Some("404") => ProviderError::DomainNotFound {
                provider,
                domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },
            Some("409") => ProviderError::RecordExists {
                provider,
                record_name: context
                    .record_name
                    .unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },
            Some("422") if lower.contains("conflicts with") => ProviderError::RecordExists {
                provider,
                record_name: context
                    .record_name
                    .unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },
            Some("400" | "422") => ProviderError::InvalidParameter {
                provider,
                param: if lower.contains("ttl") { "ttl" } else { "record" }.to_string(),
                detail: raw.message,
            },
            _ => self.unknown_error(raw),
        }
    }
}
