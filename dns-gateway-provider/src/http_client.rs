//! Shared HTTP plumbing for provider clients.
//!
//! Each provider builds its own `RequestBuilder` (auth and signing differ too
//! much to share) and hands it to [`HttpUtils::execute_request`], which sends
//! it exactly once, logs it, and turns transport failures into typed errors.
//! There is no retry loop here; a failed call is reported to the caller as-is.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// 默认连接超时（秒）
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 创建带超时配置的 HTTP Client
///
/// Every provider client owns one of these; no call can block past the
/// overall timeout.
pub fn create_http_client(provider_name: &str) -> Result<Client, ProviderError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| {
            ProviderError::configuration(
                provider_name,
                None,
                format!("failed to build HTTP client: {e}"),
            )
        })
}

/// A response that made it back over the wire.
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl HttpResponse {
    /// `true` for 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Sends a request once and reads the body.
    ///
    /// # Arguments
    /// * `request_builder` - fully configured request (URL, headers, body, auth)
    /// * `provider_name` - provider tag, used in logs and errors
    /// * `method_name` - HTTP method or RPC flavour, for logs
    /// * `url_or_action` - path or action name, for logs
    ///
    /// # Errors
    /// * `Timeout` when the connect or overall deadline passes
    /// * `NetworkError` for any other transport failure, and for 502/503/504
    /// * `RateLimited` for HTTP 429
    ///
    /// Other non-2xx responses are returned to the caller, which knows how to
    /// read the provider's error body.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url_or_action: &str,
    ) -> Result<HttpResponse, ProviderError> {
        log::debug!("[{provider_name}] {method_name} {url_or_action}");

        let response = request_builder.send().await.map_err(|e| {
            log::warn!("[{provider_name}] {method_name} {url_or_action} failed: {e}");
            transport_error(provider_name, &e)
        })?;

        let status = response.status().as_u16();
        log::debug!("[{provider_name}] Response Status: {status}");

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                provider: provider_name.to_string(),
                retry_after,
                raw_message: Some(truncate_for_log(&body)),
            });
        }

        if matches!(status, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Upstream gateway error (HTTP {status})");
            return Err(ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("HTTP {status}: {}", truncate_for_log(&body)),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(provider_name, &e))?;

        log::debug!("[{provider_name}] Response Body: {}", truncate_for_log(&body));

        Ok(HttpResponse { status, body })
    }

    /// Parse JSON response
    ///
    /// # Errors
    /// `ParseError` when the text is not valid JSON for `T`.
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] JSON parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

fn transport_error(provider_name: &str, e: &reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout {
            provider: provider_name.to_string(),
            detail: e.to_string(),
        }
    } else {
        ProviderError::NetworkError {
            provider: provider_name.to_string(),
            detail: e.to_string(),
        }
    }
}
