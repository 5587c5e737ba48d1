//! Tencent Cloud `DNSPod` API type definition

use serde::{Deserialize, Serialize};

// ============ Tencent Cloud API response structure ============

/// Generic Tencent Cloud response envelope.
///
/// `Response` holds either an `Error` object or the action's payload.
#[derive(Debug, Deserialize)]
pub struct TencentResponse {
    #[serde(rename = "Response")]
    pub response: serde_json::Value,
}

/// Error payload nested inside Tencent Cloud responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TencentError {
    pub code: String,
    pub message: String,
}

// ============ DNSPod domain structures ============

/// Response payload for `DescribeDomainList`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainListResponse {
    pub domain_list: Option<Vec<DnspodDomain>>,
}

/// Domain item returned by `DescribeDomainList`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DnspodDomain {
    pub domain_id: u64,
    pub name: String,
    pub status: String,
    #[serde(rename = "DNSStatus", default)]
    pub dns_status: String,
    pub record_count: Option<u32>,
}

// ============ DNSPod record structures ============

/// Response payload for `DescribeRecordList`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordListResponse {
    pub record_list: Option<Vec<DnspodRecord>>,
}

/// DNS record item returned by `DescribeRecordList`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DnspodRecord {
    pub record_id: u64,
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    pub value: String,
    #[serde(rename = "TTL")]
    pub ttl: Option<u32>,
    #[serde(rename = "MX")]
    pub mx: Option<u16>,
    pub line: Option<String>,
    pub weight: Option<u32>,
    pub status: Option<String>,
    pub remark: Option<String>,
}

/// Response payload for `CreateRecord`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateRecordResponse {
    pub record_id: u64,
}

/// Response payload for `ModifyRecord`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyRecordResponse {
    pub record_id: Option<u64>,
}

// ============ Request bodies ============

/// `Domain` or `DomainId`, whichever the zone reference is.
#[derive(Debug, Serialize)]
pub enum DomainRef {
    Domain(String),
    DomainId(u64),
}

impl DomainRef {
    /// Numeric references address the domain by id, anything else by name.
    pub fn from_zone(zone: &str) -> Self {
        zone.parse()
            .map_or_else(|_| Self::Domain(zone.to_string()), Self::DomainId)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDomainListRequest {
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeRecordListRequest {
    #[serde(flatten)]
    pub domain: DomainRef,
    pub offset: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_type: Option<&'static str>,
}

/// Shared body of `CreateRecord` and `ModifyRecord`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordRequest {
    #[serde(flatten)]
    pub domain: DomainRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<u64>,
    pub sub_domain: String,
    pub record_type: &'static str,
    pub record_line: String,
    pub value: String,
    #[serde(rename = "MX", skip_serializing_if = "Option::is_none")]
    pub mx: Option<u16>,
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRecordRequest {
    #[serde(flatten)]
    pub domain: DomainRef,
    pub record_id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyRecordStatusRequest {
    #[serde(flatten)]
    pub domain: DomainRef,
    pub record_id: u64,
    pub status: &'static str,
}
