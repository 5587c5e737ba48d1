//! Cloudflare `ProviderClient` 实现

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::providers::common::{normalize_domain_name, parse_record_type, split_priority};
use crate::traits::{ErrorContext, ProviderClient, ProviderErrorMapper};
use crate::types::{
    DomainStatus, NativeMutation, PaginationParams, ProviderDomain, ProviderRecord, ProviderType,
    RecordMutation, RecordQuery, RecordType, VerificationReport,
};

use super::types::{
    CloudflareCaaData, CloudflareSrvData, CloudflareUser, RecordBody, TokenVerifyResult,
};
use super::{
    AuthMode, CloudflareDnsRecord, CloudflareProvider, CloudflareZone, MAX_PAGE_SIZE_RECORDS,
    MAX_PAGE_SIZE_ZONES,
};

/// Cloudflare 的 "automatic" TTL
const AUTO_TTL: u32 = 1;

impl CloudflareProvider {
    /// 将 Cloudflare zone 转换为 `ProviderDomain`
    /// Cloudflare 状态：active, pending, initializing, moved
    pub(crate) fn zone_to_domain(zone: CloudflareZone) -> ProviderDomain {
        let status = match zone.status.as_str() {
            "active" => DomainStatus::Active,
            "pending" | "initializing" => DomainStatus::Pending,
            "moved" => DomainStatus::Paused,
            _ => DomainStatus::Unknown,
        };

        ProviderDomain {
            id: zone.id,
            name: zone.name,
            provider: ProviderType::Cloudflare,
            status,
            record_count: None,
        }
    }

    /// 将 Cloudflare 记录转换为 `ProviderRecord`
    pub(crate) fn convert_record(&self, cf_record: CloudflareDnsRecord) -> Result<ProviderRecord> {
        let record_type = parse_record_type(&cf_record.record_type, self.provider_name())?;

        Ok(ProviderRecord {
            id: cf_record.id,
            name: normalize_domain_name(&cf_record.name),
            record_type,
            content: cf_record.content,
            ttl: cf_record.ttl,
            proxied: cf_record.proxied,
            line: None,
            weight: None,
            mx: cf_record.priority.filter(|_| record_type == RecordType::Mx),
            remark: cf_record.comment.filter(|c| !c.is_empty()),
            enabled: None,
        })
    }

    /// 构造创建/更新请求体
    ///
    /// SRV/CAA 的 content 字符串会被拆成 Cloudflare 要求的 `data` 对象。
    pub(crate) fn build_record_body(&self, record: &RecordMutation) -> Result<RecordBody> {
        let (content, data) = match record.record_type {
            RecordType::Srv => (None, Some(self.srv_data(&record.content, record.mx)?)),
            RecordType::Caa => (None, Some(self.caa_data(&record.content)?)),
            _ => (Some(record.content.clone()), None),
        };

        Ok(RecordBody {
            record_type: record.record_type.as_str(),
            name: record.name.clone(),
            content,
            ttl: record.ttl.unwrap_or(AUTO_TTL),
            priority: record.mx.filter(|_| record.record_type == RecordType::Mx),
            proxied: record.proxied,
            comment: record.remark.clone(),
            data,
        })
    }

    /// "priority weight port target" 或 "weight port target"（优先级取 mx 选项）
    fn srv_data(&self, content: &str, mx: Option<u16>) -> Result<Value> {
        let parts: Vec<&str> = content.split_whitespace().collect();
        let (priority, rest) = match parts.as_slice() {
            [priority, weight, port, target] => (self.number(priority, "content")?, [*weight, *port, *target]),
            [weight, port, target] => (mx.unwrap_or(0), [*weight, *port, *target]),
            _ => {
                return Err(self.invalid_content(
                    "SRV content must be \"[priority] weight port target\"",
                ));
            }
        };
        let data = CloudflareSrvData {
            priority,
            weight: self.number(rest[0], "content")?,
            port: self.number(rest[1], "content")?,
            target: normalize_domain_name(rest[2]),
        };
        serde_json::to_value(data).map_err(|e| self.serialization_error(&e))
    }

    /// "flags tag value"，value 可带引号
    fn caa_data(&self, content: &str) -> Result<Value> {
        let mut parts = content.splitn(3, char::is_whitespace);
        let (Some(flags), Some(tag), Some(value)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(self.invalid_content("CAA content must be \"flags tag value\""));
        };
        let data = CloudflareCaaData {
            flags: flags
                .parse()
                .map_err(|_| self.invalid_content("CAA flags must be 0-255"))?,
            tag: tag.to_string(),
            value: value.trim().trim_matches('"').to_string(),
        };
        serde_json::to_value(data).map_err(|e| self.serialization_error(&e))
    }

    fn number(&self, s: &str, param: &str) -> Result<u16> {
        s.parse().map_err(|_| ProviderError::InvalidParameter {
            provider: self.provider_name().to_string(),
            param: param.to_string(),
            detail: format!("'{s}' is not a valid number"),
        })
    }

    fn invalid_content(&self, detail: &str) -> ProviderError {
        ProviderError::InvalidParameter {
            provider: self.provider_name().to_string(),
            param: "content".to_string(),
            detail: detail.to_string(),
        }
    }

    fn serialization_error(&self, e: &serde_json::Error) -> ProviderError {
        ProviderError::SerializationError {
            provider: self.provider_name().to_string(),
            detail: e.to_string(),
        }
    }

    /// 结构化记录优先；无法识别时原样返回 payload
    fn into_mutation(&self, value: Value) -> NativeMutation {
        match serde_json::from_value::<CloudflareDnsRecord>(value.clone())
            .ok()
            .and_then(|r| self.convert_record(r).ok())
        {
            Some(record) => NativeMutation::Record(record),
            None => NativeMutation::Payload(value),
        }
    }

    /// 策略 1：Scoped API Token
    async fn verify_token(&self) -> Result<Option<String>> {
        let result: TokenVerifyResult = self
            .get("/user/tokens/verify", AuthMode::Token, ErrorContext::default())
            .await?;
        if result.status == "active" {
            Ok(Some("token active".to_string()))
        } else {
            Err(ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(format!("token status is '{}'", result.status)),
            })
        }
    }

    /// 策略 2：Global API Key + 账户邮箱
    async fn verify_global_key(&self) -> Result<Option<String>> {
        if self.email.is_none() {
            return Err(ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some("no account email configured for global API key".to_string()),
            });
        }
        let user: CloudflareUser = self
            .get("/user", AuthMode::GlobalKey, ErrorContext::default())
            .await?;
        Ok(Some(format!(
            "account {}",
            user.email.unwrap_or(user.id)
        )))
    }
}

#[async_trait]
impl ProviderClient for CloudflareProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Cloudflare
    }

    async fn verify_credentials(&self) -> Result<VerificationReport> {
        let mut report = VerificationReport::default();

        if report.push("scoped_token", "/user/tokens/verify", self.verify_token().await) {
            return Ok(report);
        }
        report.push("global_api_key", "/user", self.verify_global_key().await);

        if !report.is_valid() {
            log::warn!(
                "[cloudflare] credential verification failed after {} attempts",
                report.attempts.len()
            );
        }
        Ok(report)
    }

    async fn list_records(&self, zone: &str, query: &RecordQuery) -> Result<Vec<ProviderRecord>> {
        let query = query.validated(MAX_PAGE_SIZE_RECORDS);
        let mut path = format!(
            "/zones/{zone}/dns_records?page={}&per_page={}",
            query.page, query.page_size
        );

        // 搜索关键词（只搜索记录名称）
        if let Some(ref keyword) = query.keyword {
            path.push_str(&format!("&name.contains={}", urlencoding::encode(keyword)));
        }
        if let Some(record_type) = query.record_type {
            path.push_str(&format!("&type={record_type}"));
        }

        let records: Vec<CloudflareDnsRecord> = self
            .request::<_, ()>(Method::GET, &path, None, self.default_auth(), ErrorContext::zone(zone))
            .await?
            .unwrap_or_default();

        records
            .into_iter()
            .map(|r| self.convert_record(r))
            .collect()
    }

    async fn create_record(&self, zone: &str, record: &RecordMutation) -> Result<NativeMutation> {
        let body = self.build_record_body(record)?;
        let result: Value = self
            .send_json(
                Method::POST,
                &format!("/zones/{zone}/dns_records"),
                &body,
                ErrorContext::create(zone, &record.name),
            )
            .await?;
        Ok(self.into_mutation(result))
    }

    async fn update_record(
        &self,
        zone: &str,
        record_id: &str,
        record: &RecordMutation,
    ) -> Result<NativeMutation> {
        let body = self.build_record_body(record)?;
        let mut ctx = ErrorContext::record(zone, record_id);
        ctx.record_name = Some(record.name.clone());
        let result: Value = self
            .send_json(
                Method::PUT,
                &format!("/zones/{zone}/dns_records/{record_id}"),
                &body,
                ctx,
            )
            .await?;
        Ok(self.into_mutation(result))
    }

    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<()> {
        self.delete(
            &format!("/zones/{zone}/dns_records/{record_id}"),
            ErrorContext::record(zone, record_id),
        )
        .await
    }

    async fn list_domains(&self, params: &PaginationParams) -> Result<Vec<ProviderDomain>> {
        let params = params.validated(MAX_PAGE_SIZE_ZONES);
        let path = format!("/zones?page={}&per_page={}", params.page, params.page_size);
        let zones: Vec<CloudflareZone> = self
            .request::<_, ()>(Method::GET, &path, None, self.default_auth(), ErrorContext::default())
            .await?
            .unwrap_or_default();
        Ok(zones.into_iter().map(Self::zone_to_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> CloudflareProvider {
        CloudflareProvider::new("token".to_string()).unwrap()
    }

    #[test]
    fn zone_status_mapping() {
        let zone = |status: &str| CloudflareZone {
            id: "z".into(),
            name: "example.com".into(),
            status: status.into(),
        };
        assert_eq!(
            CloudflareProvider::zone_to_domain(zone("active")).status,
            DomainStatus::Active
        );
        assert_eq!(
            CloudflareProvider::zone_to_domain(zone("initializing")).status,
            DomainStatus::Pending
        );
        assert_eq!(
            CloudflareProvider::zone_to_domain(zone("moved")).status,
            DomainStatus::Paused
        );
    }

    #[test]
    fn body_for_plain_record() {
        let mut m = RecordMutation::new(RecordType::A, "www", "1.2.3.4");
        m.proxied = Some(true);
        m.remark = Some("web".into());
        let body = provider().build_record_body(&m).unwrap();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "A");
        assert_eq!(json["content"], "1.2.3.4");
        assert_eq!(json["ttl"], 1);
        assert_eq!(json["proxied"], true);
        assert_eq!(json["comment"], "web");
        assert!(json.get("priority").is_none());
        assert!(json.get("data").is_none());
    }

    #[test]
    fn body_for_mx_carries_priority() {
        let mut m = RecordMutation::new(RecordType::Mx, "@", "mail.example.com");
        m.mx = Some(10);
        m.ttl = Some(300);
        let json = serde_json::to_value(provider().build_record_body(&m).unwrap()).unwrap();
        assert_eq!(json["priority"], 10);
        assert_eq!(json["ttl"], 300);
    }

    #[test]
    fn srv_with_four_parts() {
        let m = RecordMutation::new(RecordType::Srv, "_sip._tcp", "10 5 5060 sip.example.com.");
        let json = serde_json::to_value(provider().build_record_body(&m).unwrap()).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["data"]["priority"], 10);
        assert_eq!(json["data"]["weight"], 5);
        assert_eq!(json["data"]["port"], 5060);
        assert_eq!(json["data"]["target"], "sip.example.com");
    }

    #[test]
    fn srv_with_three_parts_takes_priority_from_mx() {
        let mut m = RecordMutation::new(RecordType::Srv, "_sip._tcp", "5 5060 sip.example.com");
        m.mx = Some(20);
        let json = serde_json::to_value(provider().build_record_body(&m).unwrap()).unwrap();
        assert_eq!(json["data"]["priority"], 20);
        assert_eq!(json["data"]["weight"], 5);
    }

    #[test]
    fn srv_malformed() {
        let m = RecordMutation::new(RecordType::Srv, "_sip._tcp", "sip.example.com");
        let err = provider().build_record_body(&m).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidParameter { .. }));
    }

    #[test]
    fn caa_parsed() {
        let m = RecordMutation::new(RecordType::Caa, "@", "0 issue \"letsencrypt.org\"");
        let json = serde_json::to_value(provider().build_record_body(&m).unwrap()).unwrap();
        assert_eq!(json["data"]["flags"], 0);
        assert_eq!(json["data"]["tag"], "issue");
        assert_eq!(json["data"]["value"], "letsencrypt.org");
    }

    #[test]
    fn mutation_payload_fallback() {
        let p = provider();
        let structured = serde_json::json!({
            "id": "rec-1", "type": "A", "name": "www.example.com",
            "content": "1.2.3.4", "ttl": 1, "proxied": false
        });
        assert!(matches!(p.into_mutation(structured), NativeMutation::Record(_)));

        let bare = serde_json::json!({ "id": "rec-2" });
        assert!(matches!(p.into_mutation(bare), NativeMutation::Payload(_)));
    }
}
