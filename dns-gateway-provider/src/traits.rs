use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    NativeMutation, PaginationParams, ProviderDomain, ProviderRecord, ProviderType, RecordMutation,
    RecordQuery, VerificationReport,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Provider 格式不同；HTTP 状态码以字符串形式传入）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录名称（用于 `RecordExists` 等错误）
    pub record_name: Option<String>,
    /// 记录 ID（用于 `RecordNotFound` 等错误）
    pub record_id: Option<String>,
    /// 域名或 zone 引用（用于 `DomainNotFound` 等错误）
    pub domain: Option<String>,
    /// 是否为写操作（create/update/delete/status）
    pub mutation: bool,
}

impl ErrorContext {
    pub fn zone(zone: &str) -> Self {
        Self {
            domain: Some(zone.to_string()),
            ..Self::default()
        }
    }

    pub fn record(zone: &str, record_id: &str) -> Self {
        Self {
            record_id: Some(record_id.to_string()),
            domain: Some(zone.to_string()),
            mutation: true,
            ..Self::default()
        }
    }

    pub fn create(zone: &str, name: &str) -> Self {
        Self {
            record_name: Some(name.to_string()),
            domain: Some(zone.to_string()),
            mutation: true,
            ..Self::default()
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 实现此 trait 以将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }

    /// 快捷方法：不支持的操作
    fn unsupported(&self, operation: &str) -> ProviderError {
        ProviderError::UnsupportedOperation {
            provider: self.provider_name().to_string(),
            operation: operation.to_string(),
        }
    }
}

/// DNS 提供商客户端 Trait
///
/// One implementation per provider family. Every method performs the HTTP
/// round trips of that call and nothing else: no caching, no retries, no
/// background work. `zone` is the provider-specific zone reference from the
/// domain configuration (zone id, numeric domain id, or bare domain name).
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// 提供商类型
    fn provider_type(&self) -> ProviderType;

    /// 验证凭证，返回每个验证策略的结果
    async fn verify_credentials(&self) -> Result<VerificationReport>;

    /// 获取 DNS 记录列表（单页）
    async fn list_records(&self, zone: &str, query: &RecordQuery) -> Result<Vec<ProviderRecord>>;

    /// 创建 DNS 记录
    async fn create_record(&self, zone: &str, record: &RecordMutation) -> Result<NativeMutation>;

    /// 更新 DNS 记录
    async fn update_record(
        &self,
        zone: &str,
        record_id: &str,
        record: &RecordMutation,
    ) -> Result<NativeMutation>;

    /// 删除 DNS 记录
    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<()>;

    /// 获取域名列表（单页）
    ///
    /// 默认实现返回 `UnsupportedOperation`。
    async fn list_domains(&self, _params: &PaginationParams) -> Result<Vec<ProviderDomain>> {
        Err(ProviderError::UnsupportedOperation {
            provider: self.provider_type().to_string(),
            operation: "list_domains".to_string(),
        })
    }

    /// 启用/暂停 DNS 记录
    ///
    /// 默认实现返回 `UnsupportedOperation`。
    async fn set_record_status(&self, _zone: &str, _record_id: &str, _enabled: bool) -> Result<()> {
        Err(ProviderError::UnsupportedOperation {
            provider: self.provider_type().to_string(),
            operation: "set_record_status".to_string(),
        })
    }
}
