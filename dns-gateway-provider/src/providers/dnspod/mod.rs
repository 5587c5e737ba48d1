//! 腾讯云 `DNSPod` Provider

mod error;
mod http;
mod provider;
mod sign;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::http_client::create_http_client;

pub(crate) use types::{
    CreateRecordResponse, DomainListResponse, ModifyRecordResponse, RecordListResponse,
    TencentResponse,
};

pub(crate) const DNSPOD_API_HOST: &str = "dnspod.tencentcloudapi.com";
pub(crate) const DNSPOD_SERVICE: &str = "dnspod";
pub(crate) const DNSPOD_VERSION: &str = "2021-03-23";
/// `DNSPod` API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE: u32 = 100;
/// `DNSPod` 默认线路名
pub(crate) const DEFAULT_LINE: &str = "默认";

/// 腾讯云 `DNSPod` Provider
pub struct DnspodProvider {
    pub(crate) client: Client,
    pub(crate) secret_id: String,
    pub(crate) secret_key: String,
    /// 请求地址（scheme + host[:port]）
    pub(crate) endpoint: String,
    /// 参与签名的 Host 头
    pub(crate) host: String,
}

/// `DNSPod` Provider Builder
pub struct DnspodProviderBuilder {
    secret_id: String,
    secret_key: String,
    endpoint: Option<String>,
}

impl DnspodProviderBuilder {
    fn new(secret_id: String, secret_key: String) -> Self {
        Self {
            secret_id,
            secret_key,
            endpoint: None,
        }
    }

    /// Endpoint override (e.g. a regional endpoint or a local mock).
    pub fn endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint.filter(|e| !e.trim().is_empty());
        self
    }

    pub fn build(self) -> Result<DnspodProvider> {
        let endpoint = self
            .endpoint
            .map_or_else(
                || format!("https://{DNSPOD_API_HOST}"),
                |e| e.trim_end_matches('/').to_string(),
            );
        let host = url::Url::parse(&endpoint)
            .ok()
            .and_then(|u| {
                u.host_str().map(|h| match u.port() {
                    Some(port) => format!("{h}:{port}"),
                    None => h.to_string(),
                })
            })
            .unwrap_or_else(|| DNSPOD_API_HOST.to_string());

        Ok(DnspodProvider {
            client: create_http_client("dnspod")?,
            secret_id: self.secret_id,
            secret_key: self.secret_key,
            endpoint,
            host,
        })
    }
}

impl DnspodProvider {
    pub fn new(secret_id: String, secret_key: String) -> Result<Self> {
        Self::builder(secret_id, secret_key).build()
    }

    pub fn builder(secret_id: String, secret_key: String) -> DnspodProviderBuilder {
        DnspodProviderBuilder::new(secret_id, secret_key)
    }
}
