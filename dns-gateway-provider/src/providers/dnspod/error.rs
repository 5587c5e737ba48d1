//! `DNSPod` error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::DnspodProvider;

/// `DNSPod` Error code mapping
/// Reference: <https://cloud.tencent.com/document/api/1427/56192>
impl ProviderErrorMapper for DnspodProvider {
    fn provider_name(&self) -> &'static str {
        "dnspod"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        let Some(code) = raw.code.as_deref() else {
            return self.unknown_error(raw);
        };

        // 鉴权
        if code.starts_with("AuthFailure")
            || matches!(
                code,
                "401"
                    | "InvalidParameter.InvalidSecretId"
                    | "InvalidParameter.InvalidSignature"
                    | "InvalidParameter.LoginTokenIdError"
                    | "InvalidParameter.LoginTokenNotExists"
                    | "InvalidParameter.LoginTokenValidateFailed"
            )
        {
            return ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            };
        }

        // 频率限制（临时）先于配额判断，二者前缀重叠
        if matches!(
            code,
            "RequestLimitExceeded"
                | "RequestLimitExceeded.RequestLimitExceeded"
                | "FailedOperation.FrequencyLimit"
                | "InvalidParameter.OperationIsTooFrequent"
        ) {
            return ProviderError::RateLimited {
                provider,
                retry_after: None,
                raw_message: Some(raw.message),
            };
        }

        // 配额
        if (code.starts_with("LimitExceeded") && code != "LimitExceeded.RecordTtlLimit")
            || code.starts_with("RequestLimitExceeded.")
        {
            return ProviderError::QuotaExceeded {
                provider,
                raw_message: Some(raw.message),
            };
        }

        // 权限
        if code.starts_with("OperationDenied")
            || matches!(
                code,
                "403"
                    | "UnauthorizedOperation"
                    | "InvalidParameter.PermissionDenied"
                    | "FailedOperation.NotDomainOwner"
                    | "FailedOperation.NotResourceOwner"
                    | "InvalidParameter.NoAuthorityToSrcDomain"
            )
        {
            return ProviderError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            };
        }

        let invalid = |param: &str| ProviderError::InvalidParameter {
            provider: provider.clone(),
            param: param.to_string(),
            detail: raw.message.clone(),
        };

        match code {
            "InvalidParameter.DomainRecordExist" => ProviderError::RecordExists {
                provider,
                record_name: context
                    .record_name
                    .unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            "ResourceNotFound.NoDataOfRecord" | "InvalidParameter.RecordIdInvalid" => {
                ProviderError::RecordNotFound {
                    provider,
                    record_id: context.record_id.unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                }
            }

            "ResourceNotFound.NoDataOfDomain"
            | "InvalidParameterValue.DomainNotExists"
            | "InvalidParameter.DomainIdInvalid" => ProviderError::DomainNotFound {
                provider,
                domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            "FailedOperation.DomainIsLocked"
            | "FailedOperation.DomainIsSpam"
            | "FailedOperation.AccountIsLocked" => ProviderError::DomainLocked {
                provider,
                domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            "InvalidParameter.RecordLineInvalid" | "InvalidParameter.LineNotExist" => {
                invalid("line")
            }
            "InvalidParameter.RecordTypeInvalid" => invalid("type"),
            "InvalidParameter.RecordValueInvalid" | "InvalidParameter.RecordValueLengthInvalid" => {
                invalid("value")
            }
            "InvalidParameter.SubdomainInvalid" => invalid("subdomain"),
            "LimitExceeded.RecordTtlLimit" => invalid("ttl"),
            "InvalidParameter.MxInvalid" => invalid("mx"),
            "InvalidParameter.WeightInvalid" => invalid("weight"),
            "InvalidParameter.DomainInvalid" | "InvalidParameter.DomainTooLong" => {
                invalid("domain")
            }

            _ => self.unknown_error(raw),
        }
    }
}
