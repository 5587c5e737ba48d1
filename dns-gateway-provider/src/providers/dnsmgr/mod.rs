//! dnsmgr 聚合面板 Provider
//!
//! All calls are URL-encoded form POSTs carrying `uid`, `timestamp` and
//! `sign = md5(uid ‖ timestamp ‖ key)`.

mod error;
mod http;
mod provider;
mod sign;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::http_client::create_http_client;

pub(crate) use types::{DnsmgrDomain, DnsmgrRecord, DnsmgrReply};

/// 单页最大记录数
pub(crate) const MAX_PAGE_SIZE: u32 = 100;

/// dnsmgr Provider
pub struct DnsmgrProvider {
    pub(crate) client: Client,
    pub(crate) uid: String,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
}

impl DnsmgrProvider {
    pub fn new(uid: String, api_key: String, base_url: &str) -> Result<Self> {
        Ok(Self {
            client: create_http_client("dnsmgr")?,
            uid,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}
