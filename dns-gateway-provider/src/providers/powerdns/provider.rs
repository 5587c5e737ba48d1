//! `PowerDNS` `ProviderClient` 实现

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::{normalize_domain_name, relative_to_full_name, split_priority};
use crate::traits::{ErrorContext, ProviderClient, ProviderErrorMapper};
use crate::types::{
    DomainStatus, NativeMutation, PaginationParams, ProviderDomain, ProviderRecord, ProviderType,
    RecordMutation, RecordQuery, RecordType, VerificationReport,
};

use super::{
    Comment, MAX_PAGE_SIZE, PdnsRecord, PowerdnsProvider, RRSet, RRSetPatch, Zone, ZonePatch,
    absolute_name,
};

const ID_SEPARATOR: char = '|';
/// 新建 RRset 且调用方未指定 TTL 时使用
const DEFAULT_TTL: u32 = 3600;

/// 合成记录 ID 的组成部分
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct RecordKey {
    /// 绝对名称（带结尾的点）
    pub name: String,
    pub record_type: String,
    /// 线上格式的 content
    pub content: String,
}

impl RecordKey {
    pub fn encode(name: &str, record_type: &str, content: &str) -> String {
        format!(
            "{}{ID_SEPARATOR}{record_type}{ID_SEPARATOR}{content}",
            normalize_domain_name(name)
        )
    }

    /// content 中允许出现分隔符（如 TXT），故只切前两段
    pub fn decode(id: &str) -> Option<Self> {
        let mut parts = id.splitn(3, ID_SEPARATOR);
        let (Some(name), Some(record_type), Some(content)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return None;
        };
        if name.is_empty() || record_type.is_empty() {
            return None;
        }
        Some(Self {
            name: absolute_name(name),
            record_type: record_type.to_ascii_uppercase(),
            content: content.to_string(),
        })
    }
}

/// 写入 `PowerDNS` 的 content：MX 带优先级前缀，TXT 带引号
pub(crate) fn wire_content(record: &RecordMutation) -> String {
    match record.record_type {
        RecordType::Mx => match (record.mx, split_priority(&record.content)) {
            (Some(mx), (_, exchange)) => format!("{mx} {exchange}"),
            (None, (Some(_), _)) => record.content.clone(),
            (None, (None, exchange)) => format!("10 {exchange}"),
        },
        RecordType::Txt if !record.content.starts_with('"') => {
            format!("\"{}\"", record.content.replace('"', "\\\""))
        }
        _ => record.content.clone(),
    }
}

fn unquote_txt(content: &str) -> String {
    content
        .strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .map_or_else(|| content.to_string(), |c| c.replace("\\\"", "\""))
}

fn find_rrset(zone: &mut Zone, name: &str, record_type: &str) -> Option<RRSet> {
    let idx = zone
        .rrsets
        .iter()
        .position(|r| r.name.eq_ignore_ascii_case(name) && r.record_type == record_type)?;
    Some(zone.rrsets.swap_remove(idx))
}

fn empty_rrset(name: String, record_type: &str) -> RRSet {
    RRSet {
        name,
        record_type: record_type.to_string(),
        ttl: None,
        records: Vec::new(),
        comments: Vec::new(),
    }
}

/// 应用 TTL 与备注（RRset 级别）
fn apply_options(rrset: &mut RRSet, record: &RecordMutation) {
    if let Some(ttl) = record.ttl {
        rrset.ttl = Some(ttl);
    } else if rrset.ttl.is_none() {
        rrset.ttl = Some(DEFAULT_TTL);
    }
    if let Some(remark) = &record.remark {
        rrset.comments = vec![Comment {
            content: remark.clone(),
            account: String::new(),
        }];
    }
}

fn page<T>(items: Vec<T>, params: &PaginationParams) -> Vec<T> {
    items
        .into_iter()
        .skip(params.offset() as usize)
        .take(params.page_size as usize)
        .collect()
}

impl PowerdnsProvider {
    /// 将 RRset 中的一条记录转换为 `ProviderRecord`；未知类型（SOA 等）返回 `None`
    pub(crate) fn convert_record(rrset: &RRSet, record: &PdnsRecord) -> Option<ProviderRecord> {
        let record_type = RecordType::parse(&rrset.record_type)?;
        let (mx, content) = match record_type {
            RecordType::Mx => {
                let (priority, exchange) = split_priority(&record.content);
                (priority, exchange.to_string())
            }
            RecordType::Txt => (None, unquote_txt(&record.content)),
            _ => (None, record.content.clone()),
        };

        Some(ProviderRecord {
            id: RecordKey::encode(&rrset.name, &rrset.record_type, &record.content),
            name: normalize_domain_name(&rrset.name),
            record_type,
            content,
            ttl: rrset.ttl,
            proxied: None,
            line: None,
            weight: None,
            mx,
            remark: rrset.comments.first().map(|c| c.content.clone()),
            enabled: Some(!record.disabled),
        })
    }

    fn decode_id(&self, record_id: &str) -> Result<RecordKey> {
        RecordKey::decode(record_id).ok_or_else(|| ProviderError::InvalidParameter {
            provider: self.provider_name().to_string(),
            param: "record_id".to_string(),
            detail: format!("'{record_id}' is not of the form name|TYPE|content"),
        })
    }

    fn not_found(&self, record_id: &str) -> ProviderError {
        ProviderError::RecordNotFound {
            provider: self.provider_name().to_string(),
            record_id: record_id.to_string(),
            raw_message: None,
        }
    }

    fn exists(&self, record_name: &str) -> ProviderError {
        ProviderError::RecordExists {
            provider: self.provider_name().to_string(),
            record_name: record_name.to_string(),
            raw_message: None,
        }
    }

    async fn fetch_zone(&self, zone: &str, ctx: ErrorContext) -> Result<Zone> {
        self.get(&Self::zone_path(zone), ctx).await
    }

    async fn apply(&self, zone: &str, rrsets: Vec<RRSetPatch>, ctx: ErrorContext) -> Result<()> {
        self.patch(&Self::zone_path(zone), &ZonePatch { rrsets }, ctx)
            .await
    }

    fn structured(&self, rrset: &RRSet, record: &PdnsRecord) -> Result<NativeMutation> {
        Self::convert_record(rrset, record)
            .map(NativeMutation::Record)
            .ok_or_else(|| self.parse_error("unrecognised record type in rrset"))
    }
}

#[async_trait]
impl ProviderClient for PowerdnsProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Powerdns
    }

    async fn verify_credentials(&self) -> Result<VerificationReport> {
        let path = Self::server_path("");
        let result = self
            .get::<serde_json::Value>(&path, ErrorContext::default())
            .await
            .map(|info| {
                info.get("version")
                    .and_then(serde_json::Value::as_str)
                    .map(|v| format!("PowerDNS {v}"))
            });

        let mut report = VerificationReport::default();
        if !report.push("server_info", &path, result) {
            log::warn!("[powerdns] credential verification failed");
        }
        Ok(report)
    }

    async fn list_records(&self, zone: &str, query: &RecordQuery) -> Result<Vec<ProviderRecord>> {
        let query = query.validated(MAX_PAGE_SIZE);
        let z = self.fetch_zone(zone, ErrorContext::zone(zone)).await?;
        let keyword = query.keyword.as_deref().map(str::to_lowercase);

        let records: Vec<ProviderRecord> = z
            .rrsets
            .iter()
            .flat_map(|rrset| {
                rrset
                    .records
                    .iter()
                    .filter_map(move |r| Self::convert_record(rrset, r))
            })
            .filter(|r| query.record_type.is_none_or(|t| r.record_type == t))
            .filter(|r| {
                keyword
                    .as_deref()
                    .is_none_or(|k| r.name.to_lowercase().contains(k))
            })
            .collect();

        Ok(page(records, &query.to_pagination()))
    }

    async fn create_record(&self, zone: &str, record: &RecordMutation) -> Result<NativeMutation> {
        let ctx = ErrorContext::create(zone, &record.name);
        let name = absolute_name(&relative_to_full_name(&record.name, zone));
        let record_type = record.record_type.as_str();
        let content = wire_content(record);

        let mut z = self.fetch_zone(zone, ctx.clone()).await?;
        let mut rrset = find_rrset(&mut z, &name, record_type)
            .unwrap_or_else(|| empty_rrset(name, record_type));

        if rrset.records.iter().any(|r| r.content == content) {
            return Err(self.exists(&record.name));
        }

        let new_record = PdnsRecord {
            content,
            disabled: false,
        };
        rrset.records.push(new_record.clone());
        apply_options(&mut rrset, record);

        self.apply(zone, vec![RRSetPatch::replace_or_delete(rrset.clone())], ctx)
            .await?;
        self.structured(&rrset, &new_record)
    }

    async fn update_record(
        &self,
        zone: &str,
        record_id: &str,
        record: &RecordMutation,
    ) -> Result<NativeMutation> {
        let key = self.decode_id(record_id)?;
        let ctx = ErrorContext::record(zone, record_id);

        let mut z = self.fetch_zone(zone, ctx.clone()).await?;
        let mut old = find_rrset(&mut z, &key.name, &key.record_type)
            .ok_or_else(|| self.not_found(record_id))?;
        let idx = old
            .records
            .iter()
            .position(|r| r.content == key.content)
            .ok_or_else(|| self.not_found(record_id))?;

        let new_name = absolute_name(&relative_to_full_name(&record.name, zone));
        let new_type = record.record_type.as_str();
        let updated = PdnsRecord {
            content: wire_content(record),
            disabled: old.records[idx].disabled,
        };

        let patches = if old.name.eq_ignore_ascii_case(&new_name) && old.record_type == new_type {
            // RRset 内不允许重复内容
            let taken = old
                .records
                .iter()
                .enumerate()
                .any(|(i, r)| i != idx && r.content == updated.content);
            if taken {
                return Err(self.exists(&record.name));
            }
            old.records[idx] = updated.clone();
            apply_options(&mut old, record);
            vec![RRSetPatch::replace_or_delete(old.clone())]
        } else {
            old.records.remove(idx);
            let mut target = find_rrset(&mut z, &new_name, new_type)
                .unwrap_or_else(|| empty_rrset(new_name, new_type));
            if target.records.iter().any(|r| r.content == updated.content) {
                return Err(self.exists(&record.name));
            }
            target.records.push(updated.clone());
            apply_options(&mut target, record);
            let patches = vec![
                RRSetPatch::replace_or_delete(old),
                RRSetPatch::replace_or_delete(target.clone()),
            ];
            old = target;
            patches
        };

        self.apply(zone, patches, ctx).await?;
        self.structured(&old, &updated)
    }

    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<()> {
        let key = self.decode_id(record_id)?;
        let ctx = ErrorContext::record(zone, record_id);

        let mut z = self.fetch_zone(zone, ctx.clone()).await?;
        let mut rrset = find_rrset(&mut z, &key.name, &key.record_type)
            .ok_or_else(|| self.not_found(record_id))?;
        let before = rrset.records.len();
        rrset.records.retain(|r| r.content != key.content);
        if rrset.records.len() == before {
            return Err(self.not_found(record_id));
        }

        self.apply(zone, vec![RRSetPatch::replace_or_delete(rrset)], ctx)
            .await
    }

    async fn list_domains(&self, params: &PaginationParams) -> Result<Vec<ProviderDomain>> {
        let params = params.validated(MAX_PAGE_SIZE);
        let zones: Vec<Zone> = self
            .get(&Self::server_path("/zones"), ErrorContext::default())
            .await?;

        let domains = zones
            .into_iter()
            .map(|z| ProviderDomain {
                id: normalize_domain_name(&z.id),
                name: normalize_domain_name(&z.name),
                provider: ProviderType::Powerdns,
                status: DomainStatus::Active,
                record_count: None,
            })
            .collect();
        Ok(page(domains, &params))
    }

    async fn set_record_status(&self, zone: &str, record_id: &str, enabled: bool) -> Result<()> {
        let key = self.decode_id(record_id)?;
        let ctx = ErrorContext::record(zone, record_id);

        let mut z = self.fetch_zone(zone, ctx.clone()).await?;
        let mut rrset = find_rrset(&mut z, &key.name, &key.record_type)
            .ok_or_else(|| self.not_found(record_id))?;
        let target = rrset
            .records
            .iter_mut()
            .find(|r| r.content == key.content)
            .ok_or_else(|| self.not_found(record_id))?;
        target.disabled = !enabled;

        self.apply(zone, vec![RRSetPatch::replace_or_delete(rrset)], ctx)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_round_trip_keeps_separator_in_content() {
        let id = RecordKey::encode("txt.example.com.", "TXT", "\"a|b\"");
        assert_eq!(id, "txt.example.com|TXT|\"a|b\"");
        let key = RecordKey::decode(&id).unwrap();
        assert_eq!(key.name, "txt.example.com.");
        assert_eq!(key.record_type, "TXT");
        assert_eq!(key.content, "\"a|b\"");
    }

    #[test]
    fn malformed_ids_rejected() {
        assert!(RecordKey::decode("no-separators").is_none());
        assert!(RecordKey::decode("|A|1.2.3.4").is_none());
        assert!(RecordKey::decode("www.example.com|A").is_none());
    }

    #[test]
    fn wire_content_formats() {
        let mut mx = RecordMutation::new(RecordType::Mx, "@", "mail.example.com.");
        mx.mx = Some(5);
        assert_eq!(wire_content(&mx), "5 mail.example.com.");

        let mx_prefixed = RecordMutation::new(RecordType::Mx, "@", "20 mail.example.com.");
        assert_eq!(wire_content(&mx_prefixed), "20 mail.example.com.");

        let txt = RecordMutation::new(RecordType::Txt, "@", "v=spf1 -all");
        assert_eq!(wire_content(&txt), "\"v=spf1 -all\"");

        let quoted = RecordMutation::new(RecordType::Txt, "@", "\"already\"");
        assert_eq!(wire_content(&quoted), "\"already\"");
    }

    #[test]
    fn convert_mx_and_txt() {
        let mx = RRSet {
            name: "example.com.".into(),
            record_type: "MX".into(),
            ttl: Some(300),
            records: vec![PdnsRecord {
                content: "10 mail.example.com.".into(),
                disabled: true,
            }],
            comments: vec![Comment {
                content: "primary".into(),
                account: String::new(),
            }],
        };
        let r = PowerdnsProvider::convert_record(&mx, &mx.records[0]).unwrap();
        assert_eq!(r.id, "example.com|MX|10 mail.example.com.");
        assert_eq!(r.name, "example.com");
        assert_eq!(r.content, "mail.example.com.");
        assert_eq!(r.mx, Some(10));
        assert_eq!(r.enabled, Some(false));
        assert_eq!(r.remark.as_deref(), Some("primary"));

        let soa = RRSet {
            record_type: "SOA".into(),
            ..mx.clone()
        };
        assert!(PowerdnsProvider::convert_record(&soa, &soa.records[0]).is_none());

        let txt = RRSet {
            record_type: "TXT".into(),
            records: vec![PdnsRecord {
                content: "\"say \\\"hi\\\"\"".into(),
                disabled: false,
            }],
            ..mx
        };
        let r = PowerdnsProvider::convert_record(&txt, &txt.records[0]).unwrap();
        assert_eq!(r.content, "say \"hi\"");
    }

    #[test]
    fn empty_rrset_patch_deletes() {
        let patch = RRSetPatch::replace_or_delete(empty_rrset("www.example.com.".into(), "A"));
        assert_eq!(patch.changetype, "DELETE");
        assert!(patch.records.is_none());
    }

    #[test]
    fn local_paging() {
        let items: Vec<u32> = (0..10).collect();
        let p = PaginationParams {
            page: 2,
            page_size: 4,
        };
        assert_eq!(page(items, &p), vec![4, 5, 6, 7]);
    }
}
