//! Cloudflare DNS Provider

mod error;
mod http;
mod provider;
mod types;

use reqwest::{Client, RequestBuilder};

use crate::error::Result;
use crate::http_client::create_http_client;

pub(crate) use types::{CloudflareDnsRecord, CloudflareResponse, CloudflareZone};

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Cloudflare Zones API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE_ZONES: u32 = 50;
/// Cloudflare DNS Records API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE_RECORDS: u32 = 100;

/// 认证方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthMode {
    /// `Authorization: Bearer <token>`
    Token,
    /// `X-Auth-Email` + `X-Auth-Key`
    GlobalKey,
}

/// Cloudflare DNS Provider
pub struct CloudflareProvider {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) email: Option<String>,
    pub(crate) api_base: String,
}

/// Cloudflare Provider Builder
pub struct CloudflareProviderBuilder {
    api_key: String,
    email: Option<String>,
    api_base: String,
}

impl CloudflareProviderBuilder {
    fn new(api_key: String) -> Self {
        Self {
            api_key,
            email: None,
            api_base: CF_API_BASE.to_string(),
        }
    }

    /// Account email. When set, requests authenticate with the global API key.
    pub fn email(mut self, email: Option<String>) -> Self {
        self.email = email.filter(|e| !e.trim().is_empty());
        self
    }

    /// API root override.
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn build(self) -> Result<CloudflareProvider> {
        Ok(CloudflareProvider {
            client: create_http_client("cloudflare")?,
            api_key: self.api_key,
            email: self.email,
            api_base: self.api_base,
        })
    }
}

impl CloudflareProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: String) -> CloudflareProviderBuilder {
        CloudflareProviderBuilder::new(api_key)
    }

    /// 记录操作使用的认证方式：有 email 时用 Global API Key，否则用 Token
    pub(crate) fn default_auth(&self) -> AuthMode {
        if self.email.is_some() {
            AuthMode::GlobalKey
        } else {
            AuthMode::Token
        }
    }

    pub(crate) fn authorize(&self, request: RequestBuilder, mode: AuthMode) -> RequestBuilder {
        match (mode, &self.email) {
            (AuthMode::GlobalKey, Some(email)) => request
                .header("X-Auth-Email", email)
                .header("X-Auth-Key", &self.api_key),
            _ => request.bearer_auth(&self.api_key),
        }
    }
}
