//! dnsmgr error mapping
//!
//! The panel answers almost every failure with `code = -1` and a free-form
//! (usually Chinese) `msg`, so classification goes by HTTP status first and
//! message wording second.

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::DnsmgrProvider;

fn mentions(message: &str, needles: &[&str]) -> bool {
    let lower = message.to_lowercase();
    needles.iter().any(|n| lower.contains(n))
}

impl ProviderErrorMapper for DnsmgrProvider {
    fn provider_name(&self) -> &'static str {
        "dnsmgr"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        let msg = raw.message.as_str();

        if matches!(raw.code.as_deref(), Some("401"))
            || mentions(msg, &["签名", "sign", "uid", "密钥", "apikey", "认证", "未登录"])
        {
            return ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            };
        }

        if matches!(raw.code.as_deref(), Some("403")) || mentions(msg, &["无权限", "permission"])
        {
            return ProviderError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            };
        }

        if mentions(msg, &["已存在", "already exist"]) {
            return ProviderError::RecordExists {
                provider,
                record_name: context
                    .record_name
                    .unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            };
        }

        if mentions(msg, &["域名不存在", "domain not found", "domain does not exist"]) {
            return ProviderError::DomainNotFound {
                provider,
                domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            };
        }

        if mentions(msg, &["不存在", "not found", "does not exist"])
            || (matches!(raw.code.as_deref(), Some("404")) && context.record_id.is_some())
        {
            return match context.record_id {
                Some(record_id) => ProviderError::RecordNotFound {
                    provider,
                    record_id,
                    raw_message: Some(raw.message),
                },
                None => ProviderError::DomainNotFound {
                    provider,
                    domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                },
            };
        }

        if matches!(raw.code.as_deref(), Some("404")) {
            return ProviderError::DomainNotFound {
                provider,
                domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            };
        }

        self.unknown_error(raw)
    }
}
