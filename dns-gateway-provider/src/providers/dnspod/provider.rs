//! `DNSPod` `ProviderClient` 实现

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::providers::common::{parse_record_type, split_priority};
use crate::traits::{ErrorContext, ProviderClient, ProviderErrorMapper};
use crate::types::{
    DomainStatus, NativeMutation, PaginationParams, ProviderDomain, ProviderRecord, ProviderType,
    RecordMutation, RecordQuery, RecordType, VerificationReport,
};

use super::types::{
    DeleteRecordRequest, DescribeDomainListRequest, DescribeRecordListRequest, DnspodRecord,
    DomainRef, ModifyRecordStatusRequest, RecordRequest,
};
use super::{
    CreateRecordResponse, DEFAULT_LINE, DnspodProvider, DomainListResponse, MAX_PAGE_SIZE,
    ModifyRecordResponse, RecordListResponse,
};

impl DnspodProvider {
    /// 将 `DNSPod` 域名状态转换为内部状态
    pub(crate) fn convert_domain_status(status: &str, dns_status: &str) -> DomainStatus {
        match (status.to_ascii_uppercase().as_str(), dns_status) {
            ("ENABLE", "") => DomainStatus::Active,
            ("ENABLE", "DNSERROR") | ("SPAM", _) => DomainStatus::Error,
            ("PAUSE", _) => DomainStatus::Paused,
            _ => DomainStatus::Unknown,
        }
    }

    /// 线路名：`DNSPod` 的 "默认" 对外呈现为 "default"
    pub(crate) fn line_from_api(line: Option<String>) -> Option<String> {
        line.map(|l| {
            if l == DEFAULT_LINE {
                "default".to_string()
            } else {
                l
            }
        })
    }

    pub(crate) fn line_to_api(line: Option<&str>) -> String {
        match line {
            None | Some("" | "default") => DEFAULT_LINE.to_string(),
            Some(l) => l.to_string(),
        }
    }

    fn convert_record(&self, r: DnspodRecord) -> Result<ProviderRecord> {
        let record_type = parse_record_type(&r.record_type, self.provider_name())?;
        Ok(ProviderRecord {
            id: r.record_id.to_string(),
            name: r.name,
            record_type,
            content: r.value,
            ttl: r.ttl,
            proxied: None,
            line: Self::line_from_api(r.line),
            weight: r.weight,
            mx: r.mx.filter(|_| record_type == RecordType::Mx),
            remark: r.remark.filter(|s| !s.is_empty()),
            enabled: r.status.map(|s| s.eq_ignore_ascii_case("ENABLE")),
        })
    }

    fn parse_record_id(&self, record_id: &str) -> Result<u64> {
        record_id
            .trim()
            .parse()
            .map_err(|_| ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "record_id".to_string(),
                detail: format!("'{record_id}' is not a numeric DNSPod record id"),
            })
    }

    /// 构造 `CreateRecord` / `ModifyRecord` 请求体
    ///
    /// MX 优先级优先取 `mx` 字段，其次取 content 中的 "10 mail.example.com" 前缀。
    pub(crate) fn build_record_request(
        zone: &str,
        record_id: Option<u64>,
        record: &RecordMutation,
    ) -> RecordRequest {
        let (value, mx) = if record.record_type == RecordType::Mx {
            let (prefix, exchange) = split_priority(&record.content);
            (exchange.to_string(), record.mx.or(prefix).or(Some(10)))
        } else {
            (record.content.clone(), None)
        };

        RecordRequest {
            domain: DomainRef::from_zone(zone),
            record_id,
            sub_domain: record.name.clone(),
            record_type: record.record_type.as_str(),
            record_line: Self::line_to_api(record.line.as_deref()),
            value,
            mx,
            ttl: record.ttl,
            weight: record.weight,
            remark: record.remark.clone(),
        }
    }

    /// 写入成功后按实际提交的请求回填记录（MX 已拆分，优先级已补默认值）
    fn applied_record(
        record_id: u64,
        record_type: RecordType,
        req: RecordRequest,
    ) -> ProviderRecord {
        ProviderRecord {
            id: record_id.to_string(),
            name: req.sub_domain,
            record_type,
            content: req.value,
            ttl: req.ttl,
            proxied: None,
            line: Self::line_from_api(Some(req.record_line)),
            weight: req.weight,
            mx: req.mx,
            remark: req.remark,
            enabled: None,
        }
    }
}

#[async_trait]
impl ProviderClient for DnspodProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Dnspod
    }

    async fn verify_credentials(&self) -> Result<VerificationReport> {
        let req = DescribeDomainListRequest {
            offset: 0,
            limit: 1,
        };
        let result = self
            .request::<DomainListResponse, _>("DescribeDomainList", &req, ErrorContext::default())
            .await
            .map(|_| None);

        let mut report = VerificationReport::default();
        if !report.push("describe_domain_list", "DescribeDomainList", result) {
            log::warn!("[dnspod] credential verification failed");
        }
        Ok(report)
    }

    async fn list_records(&self, zone: &str, query: &RecordQuery) -> Result<Vec<ProviderRecord>> {
        let query = query.validated(MAX_PAGE_SIZE);
        let req = DescribeRecordListRequest {
            domain: DomainRef::from_zone(zone),
            offset: query.to_pagination().offset(),
            limit: query.page_size,
            keyword: query.keyword.clone(),
            record_type: query.record_type.map(RecordType::as_str),
        };

        let response: RecordListResponse = match self
            .request("DescribeRecordList", &req, ErrorContext::zone(zone))
            .await
        {
            Ok(r) => r,
            // 空列表时 DNSPod 返回 ResourceNotFound.NoDataOfRecord
            Err(ProviderError::RecordNotFound { .. }) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        response
            .record_list
            .unwrap_or_default()
            .into_iter()
            .map(|r| self.convert_record(r))
            .collect()
    }

    async fn create_record(&self, zone: &str, record: &RecordMutation) -> Result<NativeMutation> {
        let req = Self::build_record_request(zone, None, record);
        let response: CreateRecordResponse = self
            .request("CreateRecord", &req, ErrorContext::create(zone, &record.name))
            .await?;
        Ok(NativeMutation::Record(Self::applied_record(
            response.record_id,
            record.record_type,
            req,
        )))
    }

    async fn update_record(
        &self,
        zone: &str,
        record_id: &str,
        record: &RecordMutation,
    ) -> Result<NativeMutation> {
        let id = self.parse_record_id(record_id)?;
        let req = Self::build_record_request(zone, Some(id), record);
        let response: ModifyRecordResponse = self
            .request("ModifyRecord", &req, ErrorContext::record(zone, record_id))
            .await?;
        Ok(NativeMutation::Record(Self::applied_record(
            response.record_id.unwrap_or(id),
            record.record_type,
            req,
        )))
    }

    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<()> {
        let req = DeleteRecordRequest {
            domain: DomainRef::from_zone(zone),
            record_id: self.parse_record_id(record_id)?,
        };
        self.request::<Value, _>("DeleteRecord", &req, ErrorContext::record(zone, record_id))
            .await
            .map(|_| ())
    }

    async fn list_domains(&self, params: &PaginationParams) -> Result<Vec<ProviderDomain>> {
        let params = params.validated(MAX_PAGE_SIZE);
        let req = DescribeDomainListRequest {
            offset: params.offset(),
            limit: params.page_size,
        };
        let response: DomainListResponse = self
            .request("DescribeDomainList", &req, ErrorContext::default())
            .await?;

        Ok(response
            .domain_list
            .unwrap_or_default()
            .into_iter()
            .map(|d| ProviderDomain {
                id: d.domain_id.to_string(),
                name: d.name,
                provider: ProviderType::Dnspod,
                status: Self::convert_domain_status(&d.status, &d.dns_status),
                record_count: d.record_count,
            })
            .collect())
    }

    async fn set_record_status(&self, zone: &str, record_id: &str, enabled: bool) -> Result<()> {
        let req = ModifyRecordStatusRequest {
            domain: DomainRef::from_zone(zone),
            record_id: self.parse_record_id(record_id)?,
            status: if enabled { "ENABLE" } else { "DISABLE" },
        };
        self.request::<Value, _>(
            "ModifyRecordStatus",
            &req,
            ErrorContext::record(zone, record_id),
        )
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_status() {
        assert_eq!(
            DnspodProvider::convert_domain_status("ENABLE", ""),
            DomainStatus::Active
        );
        assert_eq!(
            DnspodProvider::convert_domain_status("enable", "DNSERROR"),
            DomainStatus::Error
        );
        assert_eq!(
            DnspodProvider::convert_domain_status("PAUSE", ""),
            DomainStatus::Paused
        );
        assert_eq!(
            DnspodProvider::convert_domain_status("LOCK", ""),
            DomainStatus::Unknown
        );
    }

    #[test]
    fn line_translation() {
        assert_eq!(DnspodProvider::line_to_api(None), "默认");
        assert_eq!(DnspodProvider::line_to_api(Some("default")), "默认");
        assert_eq!(DnspodProvider::line_to_api(Some("电信")), "电信");
        assert_eq!(
            DnspodProvider::line_from_api(Some("默认".to_string())).as_deref(),
            Some("default")
        );
    }

    #[test]
    fn request_by_name_or_id() {
        let m = RecordMutation::new(RecordType::A, "www", "1.2.3.4");
        let by_name = serde_json::to_value(DnspodProvider::build_record_request(
            "example.com",
            None,
            &m,
        ))
        .unwrap();
        assert_eq!(by_name["Domain"], "example.com");
        assert!(by_name.get("DomainId").is_none());
        assert!(by_name.get("RecordId").is_none());

        let by_id =
            serde_json::to_value(DnspodProvider::build_record_request("12345", Some(9), &m))
                .unwrap();
        assert_eq!(by_id["DomainId"], 12345);
        assert_eq!(by_id["RecordId"], 9);
        assert_eq!(by_id["RecordLine"], "默认");
        assert_eq!(by_id["SubDomain"], "www");
    }

    #[test]
    fn mx_priority_sources() {
        let mut m = RecordMutation::new(RecordType::Mx, "@", "20 mail.example.com");
        let req = DnspodProvider::build_record_request("example.com", None, &m);
        assert_eq!(req.mx, Some(20));
        assert_eq!(req.value, "mail.example.com");

        m.mx = Some(5);
        let req = DnspodProvider::build_record_request("example.com", None, &m);
        assert_eq!(req.mx, Some(5));

        let plain = RecordMutation::new(RecordType::Mx, "@", "mail.example.com");
        let req = DnspodProvider::build_record_request("example.com", None, &plain);
        assert_eq!(req.mx, Some(10));
    }

    #[test]
    fn applied_mx_record_reports_split_exchange() {
        let m = RecordMutation::new(RecordType::Mx, "@", "10 mail.example.com");
        let req = DnspodProvider::build_record_request("example.com", None, &m);
        let record = DnspodProvider::applied_record(88, RecordType::Mx, req);
        assert_eq!(record.id, "88");
        assert_eq!(record.content, "mail.example.com");
        assert_eq!(record.mx, Some(10));
        assert_eq!(record.line.as_deref(), Some("default"));

        let plain = RecordMutation::new(RecordType::Mx, "@", "mail.example.com");
        let req = DnspodProvider::build_record_request("example.com", None, &plain);
        let record = DnspodProvider::applied_record(89, RecordType::Mx, req);
        assert_eq!(record.content, "mail.example.com");
        assert_eq!(record.mx, Some(10));
    }

    #[test]
    fn non_numeric_record_id_rejected() {
        let p = DnspodProvider::new("id".into(), "key".into()).unwrap();
        assert!(matches!(
            p.parse_record_id("abc"),
            Err(ProviderError::InvalidParameter { .. })
        ));
        assert_eq!(p.parse_record_id(" 42 ").unwrap(), 42);
    }
}
