//! Cloudflare HTTP 请求方法

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::{AuthMode, CloudflareProvider, CloudflareResponse};

impl CloudflareProvider {
    /// 发送一次请求并解析 Cloudflare 响应信封
    ///
    /// 非 2xx 状态或 `success=false` 均映射为错误；`result` 缺失时返回 `None`。
    pub(crate) async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: AuthMode,
        ctx: ErrorContext,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{path}", self.api_base);
        let mut request = self.authorize(self.client.request(method.clone(), &url), auth);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response =
            HttpUtils::execute_request(request, self.provider_name(), method.as_str(), path)
                .await?;

        let envelope: CloudflareResponse<T> = match serde_json::from_str(&response.body) {
            Ok(envelope) => envelope,
            Err(e) if response.is_success() => return Err(self.parse_error(e)),
            Err(_) => {
                // 非 JSON 错误体（例如反向代理返回的 HTML）
                return Err(self.map_error(
                    RawApiError::with_code(
                        response.status.to_string(),
                        truncate_for_log(&response.body),
                    ),
                    ctx,
                ));
            }
        };

        if !envelope.success || !response.is_success() {
            // 错误码取第一条，消息合并全部（保护记录提示不一定排在首位）
            let raw = match envelope.errors.first() {
                Some(first) => RawApiError::with_code(
                    first.code.to_string(),
                    envelope
                        .errors
                        .iter()
                        .map(|e| e.message.as_str())
                        .collect::<Vec<_>>()
                        .join("; "),
                ),
                None => RawApiError::with_code(
                    response.status.to_string(),
                    format!("HTTP {}", response.status),
                ),
            };
            let err = self.map_error(raw, ctx);
            if err.is_expected() {
                log::warn!("[cloudflare] {method} {path}: {err}");
            } else {
                log::error!("[cloudflare] {method} {path}: {err}");
            }
            return Err(err);
        }

        Ok(envelope.result)
    }

    /// 执行 GET 请求，要求 `result` 存在
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: AuthMode,
        ctx: ErrorContext,
    ) -> Result<T> {
        self.request::<T, ()>(Method::GET, path, None, auth, ctx)
            .await?
            .ok_or_else(|| self.missing_result())
    }

    /// 执行带 JSON body 的请求（POST/PUT），要求 `result` 存在
    pub(crate) async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        log::debug!(
            "[cloudflare] Request Body: {}",
            serde_json::to_string(body).unwrap_or_default()
        );
        self.request(method, path, Some(body), self.default_auth(), ctx)
            .await?
            .ok_or_else(|| self.missing_result())
    }

    /// 执行 DELETE 请求
    pub(crate) async fn delete(&self, path: &str, ctx: ErrorContext) -> Result<()> {
        self.request::<serde_json::Value, ()>(Method::DELETE, path, None, self.default_auth(), ctx)
            .await
            .map(|_| ())
    }

    fn missing_result(&self) -> ProviderError {
        self.parse_error("响应中缺少 result 字段")
    }
}
