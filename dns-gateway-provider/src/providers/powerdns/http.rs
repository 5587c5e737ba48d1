//! `PowerDNS` HTTP 请求方法

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::PowerdnsProvider;
use super::types::PdnsError;

impl PowerdnsProvider {
    /// 发送一次请求；空响应体（204）返回 `None`
    pub(crate) async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        ctx: ErrorContext,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self
            .client
            .request(method.clone(), format!("{}{path}", self.base_url))
            .header("X-API-Key", &self.api_key)
            .header("Accept", "application/json");
        if let Some(body) = body {
            log::debug!(
                "[powerdns] Request Body: {}",
                serde_json::to_string(body).unwrap_or_default()
            );
            request = request.json(body);
        }

        let response =
            HttpUtils::execute_request(request, self.provider_name(), method.as_str(), path)
                .await?;

        if !response.is_success() {
            let message = serde_json::from_str::<PdnsError>(&response.body)
                .map_or_else(|_| truncate_for_log(&response.body), |e| e.error);
            let err = self.map_error(
                RawApiError::with_code(response.status.to_string(), message),
                ctx,
            );
            if err.is_expected() {
                log::warn!("[powerdns] {method} {path}: {err}");
            } else {
                log::error!("[powerdns] {method} {path}: {err}");
            }
            return Err(err);
        }

        if response.body.trim().is_empty() {
            return Ok(None);
        }
        HttpUtils::parse_json(&response.body, self.provider_name()).map(Some)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, ctx: ErrorContext) -> Result<T> {
        self.request::<T, ()>(Method::GET, path, None, ctx)
            .await?
            .ok_or_else(|| self.parse_error("empty response body"))
    }

    pub(crate) async fn patch<B: Serialize>(&self, path: &str, body: &B, ctx: ErrorContext) -> Result<()> {
        self.request::<serde_json::Value, B>(Method::PATCH, path, Some(body), ctx)
            .await
            .map(|_| ())
    }
}
