//! DNS gateway facade
//!
//! One `DnsGateway` wraps one provider client chosen at construction. Each
//! operation validates its input against the provider's capability table,
//! trims the caller's options to what the provider honours, makes the call,
//! and normalises the native answer into a [`UnifiedRecord`].

use std::sync::Arc;

use serde_json::Value;

use dns_gateway_provider::{
    DomainConfig, NativeMutation, PaginationParams, ProviderCapabilities, ProviderClient,
    ProviderDomain, ProviderError, ProviderRecord, ProviderType, RecordMutation, RecordQuery,
    RecordType, VerificationReport, create_provider_from_config,
};

use crate::error::{GatewayError, GatewayResult};
use crate::types::{DEFAULT_LINE, DiagnosticInfo, RecordOptions, UnifiedRecord};

/// 响应中可能出现的记录 ID 字段，按优先级排列
const ID_KEYS: &[&str] = &["id", "record_id", "recordId", "RecordId", "recordid"];
/// 包裹层字段（`{"data": {...}}` / `{"result": ...}`）
const WRAPPER_KEYS: &[&str] = &["data", "result"];

/// Provider-agnostic entry point for record operations on one domain.
pub struct DnsGateway {
    client: Arc<dyn ProviderClient>,
    zone: String,
}

impl DnsGateway {
    /// Build the provider client for `config`.
    ///
    /// Fails with [`GatewayError::Configuration`] when the provider tag is
    /// unknown or a required field is empty; no request is made.
    pub fn new(config: &DomainConfig) -> GatewayResult<Self> {
        let client = create_provider_from_config(config).map_err(GatewayError::Configuration)?;
        log::debug!(
            "gateway ready: provider={}, zone={}",
            client.provider_type(),
            config.zone_ref
        );
        Ok(Self {
            client,
            zone: config.zone_ref.trim().to_string(),
        })
    }

    /// Wrap an existing client (used to inject fakes).
    pub fn with_client(client: Arc<dyn ProviderClient>, zone: impl Into<String>) -> Self {
        Self {
            client,
            zone: zone.into(),
        }
    }

    // ===== Capability lookups (no I/O) =====

    pub fn provider_type(&self) -> ProviderType {
        self.client.provider_type()
    }

    pub fn capabilities(&self) -> &'static ProviderCapabilities {
        self.provider_type().capabilities()
    }

    pub fn supports_proxy(&self) -> bool {
        self.capabilities().supports_proxy
    }

    pub fn supports_line(&self) -> bool {
        self.capabilities().supports_line
    }

    pub fn supported_record_types(&self) -> &'static [RecordType] {
        self.capabilities().supported_types
    }

    /// Zone reference from the domain config.
    pub fn zone(&self) -> &str {
        &self.zone
    }

    // ===== Record operations =====

    pub async fn list_records(&self, query: &RecordQuery) -> GatewayResult<Vec<UnifiedRecord>> {
        self.list_records_in(self.configured_zone("list_records")?, query)
            .await
    }

    pub async fn list_records_in(
        &self,
        zone: &str,
        query: &RecordQuery,
    ) -> GatewayResult<Vec<UnifiedRecord>> {
        const OP: &str = "list_records";
        if let Some(record_type) = query.record_type {
            self.check_type(OP, record_type)?;
        }
        let records = self
            .client
            .list_records(zone, query)
            .await
            .map_err(|e| self.fail(OP, e))?;
        Ok(records.into_iter().map(|r| self.normalize(r)).collect())
    }

    pub async fn add_record(
        &self,
        record_type: RecordType,
        name: &str,
        content: &str,
        options: &RecordOptions,
    ) -> GatewayResult<UnifiedRecord> {
        self.add_record_in(
            self.configured_zone("add_record")?,
            record_type,
            name,
            content,
            options,
        )
        .await
    }

    pub async fn add_record_in(
        &self,
        zone: &str,
        record_type: RecordType,
        name: &str,
        content: &str,
        options: &RecordOptions,
    ) -> GatewayResult<UnifiedRecord> {
        const OP: &str = "add_record";
        self.check_type(OP, record_type)?;
        let mutation = self.to_mutation(record_type, name, content, options);

        let native = self
            .client
            .create_record(zone, &mutation)
            .await
            .map_err(|e| self.fail(OP, e))?;
        self.unify(OP, native, &mutation, None)
    }

    pub async fn update_record(
        &self,
        record_id: &str,
        record_type: RecordType,
        name: &str,
        content: &str,
        options: &RecordOptions,
    ) -> GatewayResult<UnifiedRecord> {
        self.update_record_in(
            self.configured_zone("update_record")?,
            record_id,
            record_type,
            name,
            content,
            options,
        )
        .await
    }

    pub async fn update_record_in(
        &self,
        zone: &str,
        record_id: &str,
        record_type: RecordType,
        name: &str,
        content: &str,
        options: &RecordOptions,
    ) -> GatewayResult<UnifiedRecord> {
        const OP: &str = "update_record";
        self.check_type(OP, record_type)?;
        let mutation = self.to_mutation(record_type, name, content, options);

        let native = self
            .client
            .update_record(zone, record_id, &mutation)
            .await
            .map_err(|e| self.fail(OP, e))?;
        self.unify(OP, native, &mutation, Some(record_id))
    }

    /// Delete a record. Returns `true` once the provider confirms; any
    /// rejection, including an unknown id, is an error.
    pub async fn delete_record(&self, record_id: &str) -> GatewayResult<bool> {
        self.delete_record_in(self.configured_zone("delete_record")?, record_id)
            .await
    }

    pub async fn delete_record_in(&self, zone: &str, record_id: &str) -> GatewayResult<bool> {
        self.client
            .delete_record(zone, record_id)
            .await
            .map_err(|e| self.fail("delete_record", e))?;
        Ok(true)
    }

    /// Enable or disable a record without deleting it.
    pub async fn set_record_status(&self, record_id: &str, enabled: bool) -> GatewayResult<()> {
        self.set_record_status_in(self.configured_zone("set_record_status")?, record_id, enabled)
            .await
    }

    pub async fn set_record_status_in(
        &self,
        zone: &str,
        record_id: &str,
        enabled: bool,
    ) -> GatewayResult<()> {
        self.client
            .set_record_status(zone, record_id, enabled)
            .await
            .map_err(|e| self.fail("set_record_status", e))
    }

    pub async fn list_domains(
        &self,
        params: &PaginationParams,
    ) -> GatewayResult<Vec<ProviderDomain>> {
        self.client
            .list_domains(params)
            .await
            .map_err(|e| self.fail("list_domains", e))
    }

    // ===== Credential verification =====

    /// `true` if any verification strategy accepted the credentials.
    ///
    /// Fails with a transport error when no strategy reached the provider.
    pub async fn verify_credentials(&self) -> GatewayResult<bool> {
        let report = self.run_verification().await?;
        if let Some(e) = report.transport_error() {
            return Err(self.fail("verify_credentials", e.clone()));
        }
        Ok(report.is_valid())
    }

    /// Run every verification strategy the provider defines and report each attempt.
    ///
    /// Unreachable strategies show up as failed attempts here, not as an error.
    pub async fn verification_details(&self) -> GatewayResult<DiagnosticInfo> {
        let report = self.run_verification().await?;
        let caps = self.capabilities();
        Ok(DiagnosticInfo {
            provider: self.provider_type(),
            display_name: caps.display_name.to_string(),
            valid: report.is_valid(),
            attempts: report.attempts,
        })
    }

    // ===== Helpers =====

    async fn run_verification(&self) -> GatewayResult<VerificationReport> {
        self.client
            .verify_credentials()
            .await
            .map_err(|e| self.fail("verify_credentials", e))
    }

    fn configured_zone(&self, operation: &'static str) -> GatewayResult<&str> {
        if self.zone.is_empty() {
            return Err(GatewayError::operation(
                operation,
                ProviderError::Configuration {
                    provider: self.provider_type().to_string(),
                    field: Some("zone_ref".to_string()),
                    detail: "no zone reference configured".to_string(),
                },
            ));
        }
        Ok(&self.zone)
    }

    fn check_type(&self, operation: &'static str, record_type: RecordType) -> GatewayResult<()> {
        if self.capabilities().supports_type(record_type) {
            return Ok(());
        }
        Err(self.fail(
            operation,
            ProviderError::UnsupportedRecordType {
                provider: self.provider_type().to_string(),
                record_type: record_type.to_string(),
            },
        ))
    }

    fn fail(&self, operation: &'static str, error: ProviderError) -> GatewayError {
        if error.is_expected() {
            log::warn!("[{}] {operation} failed: {error}", self.provider_type());
        } else {
            log::error!("[{}] {operation} failed: {error}", self.provider_type());
        }
        GatewayError::operation(operation, error)
    }

    /// 将调用方选项裁剪为 provider 支持的子集
    pub(crate) fn to_mutation(
        &self,
        record_type: RecordType,
        name: &str,
        content: &str,
        options: &RecordOptions,
    ) -> RecordMutation {
        let caps = self.capabilities();
        let keep = |supported: bool, what: &str| {
            if !supported {
                log::debug!("[{}] dropping unsupported option '{what}'", caps.display_name);
            }
            supported
        };

        let mut mutation = RecordMutation::new(record_type, name, content);
        mutation.ttl = options.ttl;
        mutation.proxied = options
            .proxied
            .filter(|_| keep(caps.supports_proxy, "proxied"));
        mutation.line = options
            .line
            .clone()
            .filter(|_| keep(caps.supports_line, "line"));
        mutation.weight = options
            .weight
            .filter(|_| keep(caps.supports_weight, "weight"));
        mutation.remark = options
            .remark
            .clone()
            .filter(|_| keep(caps.supports_remark, "remark"));
        mutation.mx = options
            .mx
            .filter(|_| matches!(record_type, RecordType::Mx | RecordType::Srv));
        mutation
    }

    /// Fill a provider record's gaps from the capability table.
    pub(crate) fn normalize(&self, record: ProviderRecord) -> UnifiedRecord {
        let caps = self.capabilities();
        UnifiedRecord {
            id: record.id,
            name: record.name,
            record_type: record.record_type,
            content: record.content,
            ttl: record.ttl.unwrap_or(caps.default_ttl),
            proxied: caps.supports_proxy && record.proxied.unwrap_or(false),
            line: record
                .line
                .filter(|l| caps.supports_line && !l.is_empty())
                .unwrap_or_else(|| DEFAULT_LINE.to_string()),
            weight: record.weight.filter(|_| caps.supports_weight).unwrap_or(0),
            mx: record
                .mx
                .filter(|_| record.record_type == RecordType::Mx)
                .unwrap_or(0),
            remark: record.remark.unwrap_or_default(),
            enabled: record.enabled.unwrap_or(true),
        }
    }

    fn unify(
        &self,
        operation: &'static str,
        native: NativeMutation,
        mutation: &RecordMutation,
        known_id: Option<&str>,
    ) -> GatewayResult<UnifiedRecord> {
        match native {
            NativeMutation::Record(record) => Ok(self.normalize(record)),
            NativeMutation::Payload(payload) => {
                let id = extract_record_id(&payload)
                    .or_else(|| known_id.map(str::to_string))
                    .ok_or_else(|| {
                        self.fail(
                            operation,
                            ProviderError::ParseError {
                                provider: self.provider_type().to_string(),
                                detail: format!("no record id in response: {payload}"),
                            },
                        )
                    })?;
                Ok(self.echo(id, mutation))
            }
        }
    }

    /// 仅拿到 ID 时，用请求参数回填记录
    fn echo(&self, id: String, mutation: &RecordMutation) -> UnifiedRecord {
        self.normalize(ProviderRecord {
            id,
            name: mutation.name.clone(),
            record_type: mutation.record_type,
            content: mutation.content.clone(),
            ttl: mutation.ttl,
            proxied: mutation.proxied,
            line: mutation.line.clone(),
            weight: mutation.weight,
            mx: mutation.mx,
            remark: mutation.remark.clone(),
            enabled: None,
        })
    }
}

/// Find the record id in a loosely typed provider response.
///
/// A bare scalar is the id itself. Objects are searched for the keys in
/// [`ID_KEYS`] first, then inside `data` / `result` wrappers.
pub fn extract_record_id(payload: &Value) -> Option<String> {
    match payload {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => ID_KEYS
            .iter()
            .filter_map(|k| map.get(*k))
            .find_map(scalar_id)
            .or_else(|| {
                WRAPPER_KEYS
                    .iter()
                    .filter_map(|k| map.get(*k))
                    .find_map(extract_record_id)
            }),
        _ => None,
    }
}

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProviderClient;
    use dns_gateway_provider::ErrorKind;
    use serde_json::json;

    fn gateway(provider: ProviderType) -> (DnsGateway, Arc<MockProviderClient>) {
        let mock = Arc::new(MockProviderClient::new(provider));
        (DnsGateway::with_client(mock.clone(), "example.com"), mock)
    }

    #[test]
    fn id_extraction() {
        assert_eq!(extract_record_id(&json!(12345)), Some("12345".into()));
        assert_eq!(extract_record_id(&json!("abc")), Some("abc".into()));
        assert_eq!(extract_record_id(&json!({ "id": 7 })), Some("7".into()));
        assert_eq!(
            extract_record_id(&json!({ "RecordId": "r", "recordId": "x" })),
            Some("x".into())
        );
        assert_eq!(
            extract_record_id(&json!({ "msg": "ok", "data": { "id": "nested" } })),
            Some("nested".into())
        );
        assert_eq!(extract_record_id(&json!({ "data": 99 })), Some("99".into()));
        assert_eq!(extract_record_id(&json!({ "id": null, "record_id": 5 })), Some("5".into()));
        assert_eq!(extract_record_id(&json!({ "msg": "ok" })), None);
        assert_eq!(extract_record_id(&json!("  ")), None);
        assert_eq!(extract_record_id(&Value::Null), None);
    }

    #[test]
    fn options_trimmed_to_capabilities() {
        let (gw, _) = gateway(ProviderType::Powerdns);
        let options = RecordOptions::default()
            .with_proxied(true)
            .with_line("telecom")
            .with_weight(5)
            .with_ttl(60)
            .with_remark("note")
            .with_mx(10);
        let m = gw.to_mutation(RecordType::A, "www", "1.2.3.4", &options);
        assert_eq!(m.proxied, None);
        assert_eq!(m.line, None);
        assert_eq!(m.weight, None);
        assert_eq!(m.mx, None);
        assert_eq!(m.ttl, Some(60));
        assert_eq!(m.remark.as_deref(), Some("note"));

        let (gw, _) = gateway(ProviderType::Dnspod);
        let m = gw.to_mutation(RecordType::Mx, "@", "mail.example.com", &options);
        assert_eq!(m.proxied, None);
        assert_eq!(m.line.as_deref(), Some("telecom"));
        assert_eq!(m.weight, Some(5));
        assert_eq!(m.mx, Some(10));
    }

    #[test]
    fn normalize_fills_defaults() {
        let (gw, _) = gateway(ProviderType::Cloudflare);
        let record = gw.normalize(ProviderRecord {
            id: "r1".into(),
            name: "www.example.com".into(),
            record_type: RecordType::A,
            content: "1.2.3.4".into(),
            ttl: None,
            proxied: Some(true),
            line: Some("ignored".into()),
            weight: Some(3),
            mx: Some(10),
            remark: None,
            enabled: None,
        });
        assert_eq!(record.ttl, 1);
        assert!(record.proxied);
        assert_eq!(record.line, "default");
        assert_eq!(record.weight, 0);
        assert_eq!(record.mx, 0);
        assert_eq!(record.remark, "");
        assert!(record.enabled);
    }

    #[tokio::test]
    async fn proxied_dropped_for_non_proxy_provider() {
        let (gw, mock) = gateway(ProviderType::Dnspod);
        mock.set_mutation_response(NativeMutation::Payload(json!(555))).await;

        let record = gw
            .add_record(
                RecordType::A,
                "www",
                "1.2.3.4",
                &RecordOptions::default().with_proxied(true),
            )
            .await
            .unwrap();

        assert_eq!(record.id, "555");
        assert!(!record.proxied);
        assert_eq!(record.ttl, 600);
        assert_eq!(record.line, "default");
        assert_eq!(mock.last_mutation().await.unwrap().proxied, None);
    }

    #[tokio::test]
    async fn unsupported_type_rejected_before_io() {
        let (gw, mock) = gateway(ProviderType::Dnsmgr);
        let err = gw
            .add_record(RecordType::Ptr, "1", "host.example.com", &RecordOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
        assert_eq!(mock.calls().await, 0);
    }

    #[tokio::test]
    async fn update_without_id_in_payload_keeps_request_id() {
        let (gw, mock) = gateway(ProviderType::Dnsmgr);
        mock.set_mutation_response(NativeMutation::Payload(json!({}))).await;

        let record = gw
            .update_record("r-9", RecordType::Txt, "_acme", "token", &RecordOptions::default())
            .await
            .unwrap();
        assert_eq!(record.id, "r-9");
        assert_eq!(record.content, "token");
    }

    #[tokio::test]
    async fn add_without_any_id_is_parse_error() {
        let (gw, mock) = gateway(ProviderType::Dnsmgr);
        mock.set_mutation_response(NativeMutation::Payload(json!({ "msg": "ok" })))
            .await;

        let err = gw
            .add_record(RecordType::A, "www", "1.2.3.4", &RecordOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.provider_error(),
            Some(ProviderError::ParseError { .. })
        ));
    }

    #[tokio::test]
    async fn empty_zone_is_configuration_error() {
        let mock = Arc::new(MockProviderClient::new(ProviderType::Cloudflare));
        let gw = DnsGateway::with_client(mock.clone(), "");
        let err = gw.list_records(&RecordQuery::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(mock.calls().await, 0);
    }

    #[tokio::test]
    async fn errors_carry_operation_name() {
        let (gw, mock) = gateway(ProviderType::Powerdns);
        mock.fail_with(ProviderError::RecordNotFound {
            provider: "powerdns".into(),
            record_id: "x".into(),
            raw_message: None,
        })
        .await;

        let err = gw.delete_record("x").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Operation { operation: "delete_record", .. }
        ));
        assert_eq!(err.kind(), ErrorKind::UpstreamRejection);
    }

    #[test]
    fn capability_lookups_are_static() {
        let (gw, _) = gateway(ProviderType::Cloudflare);
        assert!(gw.supports_proxy());
        assert!(!gw.supports_line());
        assert_eq!(gw.supported_record_types().len(), 9);
    }
}
