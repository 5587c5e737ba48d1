//! `DNSPod` HTTP 请求方法

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::sign::CONTENT_TYPE;
use super::types::TencentError;
use super::{DNSPOD_VERSION, DnspodProvider, TencentResponse};

impl DnspodProvider {
    /// 执行腾讯云 API 请求
    ///
    /// 每次调用使用新的时间戳重新签名；`Response.Error` 映射为错误。
    pub(crate) async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        action: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let payload =
            serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
                provider: self.provider_name().to_string(),
                detail: e.to_string(),
            })?;

        log::debug!("[dnspod] Request Body: {payload}");

        let timestamp = Utc::now().timestamp();
        let authorization = self.sign(action, &payload, timestamp);

        let request = self
            .client
            .post(format!("{}/", self.endpoint))
            .header("Content-Type", CONTENT_TYPE)
            .header("Host", &self.host)
            .header("X-TC-Action", action)
            .header("X-TC-Version", DNSPOD_VERSION)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("Authorization", authorization)
            .body(payload);

        let response = HttpUtils::execute_request(
            request,
            self.provider_name(),
            "POST",
            &format!("Action: {action}"),
        )
        .await?;

        let tc_response: TencentResponse = match serde_json::from_str(&response.body) {
            Ok(r) => r,
            Err(_) if !response.is_success() => {
                return Err(self.map_error(
                    RawApiError::with_code(
                        response.status.to_string(),
                        truncate_for_log(&response.body),
                    ),
                    ctx,
                ));
            }
            Err(e) => return Err(self.parse_error(e)),
        };

        if let Some(error) = tc_response.response.get("Error") {
            let error: TencentError =
                serde_json::from_value(error.clone()).map_err(|e| self.parse_error(e))?;
            let err = self.map_error(RawApiError::with_code(error.code, error.message), ctx);
            if err.is_expected() {
                log::warn!("[dnspod] {action}: {err}");
            } else {
                log::error!("[dnspod] {action}: {err}");
            }
            return Err(err);
        }

        if !response.is_success() {
            return Err(self.map_error(
                RawApiError::with_code(response.status.to_string(), format!("HTTP {}", response.status)),
                ctx,
            ));
        }

        serde_json::from_value(tc_response.response).map_err(|e| self.parse_error(e))
    }
}
