//! dnsmgr `ProviderClient` 实现

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::providers::common::parse_record_type;
use crate::traits::{ErrorContext, ProviderClient, ProviderErrorMapper};
use crate::types::{
    DomainStatus, NativeMutation, PaginationParams, ProviderDomain, ProviderRecord, ProviderType,
    RecordMutation, RecordQuery, RecordType, VerificationReport,
};

use super::types::{as_i64, as_text, as_u32};
use super::{DnsmgrDomain, DnsmgrProvider, DnsmgrRecord, DnsmgrReply, MAX_PAGE_SIZE};

impl DnsmgrProvider {
    fn convert_record(&self, row: Value) -> Result<ProviderRecord> {
        let r: DnsmgrRecord = serde_json::from_value(row).map_err(|e| self.parse_error(e))?;
        let record_type = parse_record_type(&r.record_type, self.provider_name())?;

        Ok(ProviderRecord {
            id: as_text(&r.record_id).unwrap_or_default(),
            name: r.name,
            record_type,
            content: r.value,
            ttl: as_u32(r.ttl.as_ref()),
            proxied: None,
            line: r.line.as_ref().and_then(as_text),
            weight: as_u32(r.weight.as_ref()),
            mx: as_u32(r.mx.as_ref())
                .and_then(|v| u16::try_from(v).ok())
                .filter(|_| record_type == RecordType::Mx),
            remark: r.remark.filter(|s| !s.is_empty()),
            enabled: r.status.as_ref().and_then(as_i64).map(|s| s == 1),
        })
    }

    /// 写操作的业务字段（add/update 共用）
    pub(crate) fn record_fields(record: &RecordMutation) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", record.name.clone()),
            ("type", record.record_type.as_str().to_string()),
            ("value", record.content.clone()),
        ];
        if let Some(line) = &record.line {
            fields.push(("line", line.clone()));
        }
        if let Some(ttl) = record.ttl {
            fields.push(("ttl", ttl.to_string()));
        }
        if let Some(mx) = record.mx.filter(|_| record.record_type == RecordType::Mx) {
            fields.push(("mx", mx.to_string()));
        }
        if let Some(weight) = record.weight {
            fields.push(("weight", weight.to_string()));
        }
        if let Some(remark) = &record.remark {
            fields.push(("remark", remark.clone()));
        }
        fields
    }

    /// 写操作应答：去掉 `code`/`msg` 后原样交给上层提取记录 ID
    fn mutation_payload(reply: DnsmgrReply) -> NativeMutation {
        let mut payload = reply.extra;
        if let Some(rows) = reply.rows {
            payload.insert("rows".to_string(), Value::Array(rows));
        }
        NativeMutation::Payload(Value::Object(payload))
    }
}

#[async_trait]
impl ProviderClient for DnsmgrProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Dnsmgr
    }

    async fn verify_credentials(&self) -> Result<VerificationReport> {
        let result = self
            .post_form(
                "/api/domain",
                &[("offset", "0".to_string()), ("limit", "1".to_string())],
                ErrorContext::default(),
            )
            .await
            .map(|_| None);

        let mut report = VerificationReport::default();
        if !report.push("domain_list", "/api/domain", result) {
            log::warn!("[dnsmgr] credential verification failed");
        }
        Ok(report)
    }

    async fn list_records(&self, zone: &str, query: &RecordQuery) -> Result<Vec<ProviderRecord>> {
        let query = query.validated(MAX_PAGE_SIZE);
        let mut fields = vec![
            ("offset", query.to_pagination().offset().to_string()),
            ("limit", query.page_size.to_string()),
        ];
        if let Some(keyword) = &query.keyword {
            fields.push(("keyword", keyword.clone()));
        }
        if let Some(record_type) = query.record_type {
            fields.push(("type", record_type.as_str().to_string()));
        }

        let reply = self
            .post_form(
                &format!("/api/record/{zone}"),
                &fields,
                ErrorContext::zone(zone),
            )
            .await?;

        reply
            .rows
            .unwrap_or_default()
            .into_iter()
            .map(|row| self.convert_record(row))
            .collect()
    }

    async fn create_record(&self, zone: &str, record: &RecordMutation) -> Result<NativeMutation> {
        let reply = self
            .post_form(
                &format!("/api/record/add/{zone}"),
                &Self::record_fields(record),
                ErrorContext::create(zone, &record.name),
            )
            .await?;
        Ok(Self::mutation_payload(reply))
    }

    async fn update_record(
        &self,
        zone: &str,
        record_id: &str,
        record: &RecordMutation,
    ) -> Result<NativeMutation> {
        let mut fields = vec![("recordid", record_id.to_string())];
        fields.extend(Self::record_fields(record));
        let reply = self
            .post_form(
                &format!("/api/record/update/{zone}"),
                &fields,
                ErrorContext::record(zone, record_id),
            )
            .await?;
        Ok(Self::mutation_payload(reply))
    }

    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<()> {
        self.post_form(
            &format!("/api/record/delete/{zone}"),
            &[("recordid", record_id.to_string())],
            ErrorContext::record(zone, record_id),
        )
        .await
        .map(|_| ())
    }

    async fn list_domains(&self, params: &PaginationParams) -> Result<Vec<ProviderDomain>> {
        let params = params.validated(MAX_PAGE_SIZE);
        let reply = self
            .post_form(
                "/api/domain",
                &[
                    ("offset", params.offset().to_string()),
                    ("limit", params.page_size.to_string()),
                ],
                ErrorContext::default(),
            )
            .await?;

        reply
            .rows
            .unwrap_or_default()
            .into_iter()
            .map(|row| {
                let d: DnsmgrDomain =
                    serde_json::from_value(row).map_err(|e| self.parse_error(e))?;
                Ok(ProviderDomain {
                    id: as_text(&d.id).unwrap_or_default(),
                    name: d.name,
                    provider: ProviderType::Dnsmgr,
                    status: DomainStatus::Active,
                    record_count: as_u32(d.recordcount.as_ref()),
                })
            })
            .collect()
    }

    async fn set_record_status(&self, zone: &str, record_id: &str, enabled: bool) -> Result<()> {
        self.post_form(
            &format!("/api/record/status/{zone}"),
            &[
                ("recordid", record_id.to_string()),
                ("status", if enabled { "1" } else { "0" }.to_string()),
            ],
            ErrorContext::record(zone, record_id),
        )
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> DnsmgrProvider {
        DnsmgrProvider::new("1".into(), "k".into(), "http://panel.local").unwrap()
    }

    #[test]
    fn row_with_string_scalars() {
        let row = json!({
            "RecordId": "1001", "Domain": "example.com", "Name": "www", "Type": "A",
            "Value": "1.2.3.4", "Line": "0", "TTL": "600", "MX": "0", "Weight": null,
            "Status": "1", "Remark": ""
        });
        let r = provider().convert_record(row).unwrap();
        assert_eq!(r.id, "1001");
        assert_eq!(r.ttl, Some(600));
        assert_eq!(r.mx, None);
        assert_eq!(r.weight, None);
        assert_eq!(r.enabled, Some(true));
        assert_eq!(r.remark, None);
        assert_eq!(r.line.as_deref(), Some("0"));
    }

    #[test]
    fn row_with_numeric_scalars() {
        let row = json!({
            "RecordId": 7, "Name": "@", "Type": "MX", "Value": "mail.example.com",
            "TTL": 300, "MX": 10, "Weight": 5, "Status": 0, "Remark": "backup"
        });
        let r = provider().convert_record(row).unwrap();
        assert_eq!(r.id, "7");
        assert_eq!(r.mx, Some(10));
        assert_eq!(r.weight, Some(5));
        assert_eq!(r.enabled, Some(false));
        assert_eq!(r.remark.as_deref(), Some("backup"));
    }

    #[test]
    fn fields_only_include_given_options() {
        let m = RecordMutation::new(RecordType::A, "www", "1.2.3.4");
        let fields = DnsmgrProvider::record_fields(&m);
        let keys: Vec<&str> = fields.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["name", "type", "value"]);

        let mut mx = RecordMutation::new(RecordType::Mx, "@", "mail.example.com");
        mx.mx = Some(10);
        mx.line = Some("default".into());
        mx.ttl = Some(600);
        let fields = DnsmgrProvider::record_fields(&mx);
        assert!(fields.contains(&("mx", "10".to_string())));
        assert!(fields.contains(&("line", "default".to_string())));
        assert!(fields.contains(&("ttl", "600".to_string())));
    }

    #[test]
    fn mutation_payload_drops_envelope() {
        let reply: DnsmgrReply =
            serde_json::from_value(json!({"code": 0, "msg": "添加成功", "id": "55"})).unwrap();
        let NativeMutation::Payload(payload) = DnsmgrProvider::mutation_payload(reply) else {
            panic!("expected payload");
        };
        assert_eq!(payload, json!({"id": "55"}));
    }
}
