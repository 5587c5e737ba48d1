//! dnsmgr API 类型定义
//!
//! The panel is loose about scalar types: ids, TTLs and flags arrive as
//! either numbers or strings depending on the backing provider, so rows keep
//! them as raw JSON and read them through the helpers below.

use serde::Deserialize;
use serde_json::{Map, Value};

/// 通用应答
///
/// Either `{code, msg, ...}` or, for list endpoints, `{total, rows}`.
#[derive(Debug, Deserialize)]
pub struct DnsmgrReply {
    pub code: Option<Value>,
    pub msg: Option<String>,
    pub rows: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DnsmgrReply {
    /// `code == 0`，或没有 `code` 但带 `rows` 的列表应答
    pub fn is_ok(&self) -> bool {
        match &self.code {
            Some(c) => as_i64(c) == Some(0),
            None => self.rows.is_some(),
        }
    }

    pub fn code_string(&self) -> Option<String> {
        self.code.as_ref().map(|c| match c {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// 记录行
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DnsmgrRecord {
    pub record_id: Value,
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    pub value: String,
    pub line: Option<Value>,
    #[serde(rename = "TTL")]
    pub ttl: Option<Value>,
    #[serde(rename = "MX")]
    pub mx: Option<Value>,
    pub weight: Option<Value>,
    pub status: Option<Value>,
    pub remark: Option<String>,
}

/// 域名行
#[derive(Debug, Deserialize)]
pub struct DnsmgrDomain {
    pub id: Value,
    pub name: String,
    #[serde(default)]
    pub recordcount: Option<Value>,
}

pub fn as_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

pub fn as_u32(v: Option<&Value>) -> Option<u32> {
    v.and_then(as_i64).and_then(|n| u32::try_from(n).ok())
}

pub fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
