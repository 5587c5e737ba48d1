//! `PowerDNS` Authoritative HTTP API Provider
//!
//! `PowerDNS` stores records as RRsets (name + type) with no per-record id.
//! This client synthesizes ids as `name|TYPE|content` and performs every
//! record mutation as a read of the zone followed by one RRset `PATCH`.

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::http_client::create_http_client;
use crate::types::ApiEndpoint;

pub(crate) use types::{Comment, PdnsRecord, RRSet, RRSetPatch, Zone, ZonePatch};

/// 唯一支持的 server id
pub(crate) const SERVER_ID: &str = "localhost";
/// 本地分页的最大页大小
pub(crate) const MAX_PAGE_SIZE: u32 = 500;

/// `PowerDNS` Provider
pub struct PowerdnsProvider {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
}

impl PowerdnsProvider {
    pub fn new(endpoint: &ApiEndpoint, api_key: String) -> Result<Self> {
        Ok(Self {
            client: create_http_client("powerdns")?,
            api_key,
            base_url: endpoint.base_url(),
        })
    }

    /// `/api/v1/servers/localhost` 下的路径
    pub(crate) fn server_path(suffix: &str) -> String {
        format!("/api/v1/servers/{SERVER_ID}{suffix}")
    }

    /// zone 路径；zone 名统一带结尾的点
    pub(crate) fn zone_path(zone: &str) -> String {
        Self::server_path(&format!(
            "/zones/{}",
            urlencoding::encode(&absolute_name(zone))
        ))
    }
}

/// "example.com" -> "example.com."（zone 名与 RRset 名均使用绝对形式）
pub(crate) fn absolute_name(zone: &str) -> String {
    format!("{}.", zone.trim().trim_end_matches('.'))
}
