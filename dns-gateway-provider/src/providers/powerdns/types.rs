//! `PowerDNS` API 类型定义

use serde::{Deserialize, Serialize};

/// `GET /zones/{zone}` 与 `GET /zones` 的 zone 对象
#[derive(Debug, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rrsets: Vec<RRSet>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RRSet {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub records: Vec<PdnsRecord>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PdnsRecord {
    pub content: String,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Comment {
    pub content: String,
    #[serde(default)]
    pub account: String,
}

/// `PATCH /zones/{zone}` 请求体
#[derive(Debug, Serialize)]
pub struct ZonePatch {
    pub rrsets: Vec<RRSetPatch>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RRSetPatch {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub changetype: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<PdnsRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

impl RRSetPatch {
    /// 用 `rrset` 的完整内容替换；记录为空时改为删除整个 RRset
    pub fn replace_or_delete(rrset: RRSet) -> Self {
        if rrset.records.is_empty() {
            return Self {
                name: rrset.name,
                record_type: rrset.record_type,
                changetype: "DELETE",
                ttl: None,
                records: None,
                comments: None,
            };
        }
        Self {
            name: rrset.name,
            record_type: rrset.record_type,
            changetype: "REPLACE",
            ttl: rrset.ttl,
            records: Some(rrset.records),
            comments: Some(rrset.comments),
        }
    }
}

/// `PowerDNS` 错误体
#[derive(Debug, Deserialize)]
pub struct PdnsError {
    pub error: String,
}
