//! dnsmgr HTTP 请求方法

use chrono::Utc;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::{DnsmgrProvider, DnsmgrReply};

impl DnsmgrProvider {
    /// 发送签名表单 POST
    ///
    /// `fields` 为业务字段；`uid`/`timestamp`/`sign` 每次调用重新生成。
    pub(crate) async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, String)],
        ctx: ErrorContext,
    ) -> Result<DnsmgrReply> {
        let timestamp = Utc::now().timestamp();
        let mut form: Vec<(&str, String)> = self.auth_fields(timestamp).into();
        form.extend(fields.iter().cloned());

        let request = self
            .client
            .post(format!("{}{path}", self.base_url))
            .form(&form);

        let response =
            HttpUtils::execute_request(request, self.provider_name(), "POST", path).await?;

        let reply: DnsmgrReply = match serde_json::from_str(&response.body) {
            Ok(reply) => reply,
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

        if !reply.is_ok() || !response.is_success() {
            let raw = match reply.code_string() {
                Some(code) if !reply.is_ok() => RawApiError::with_code(
                    code,
                    reply.msg.unwrap_or_else(|| "request failed".to_string()),
                ),
                _ if response.is_success() => RawApiError::new(
                    reply
                        .msg
                        .unwrap_or_else(|| "unrecognised reply".to_string()),
                ),
                _ => RawApiError::with_code(
                    response.status.to_string(),
                    reply.msg.unwrap_or_else(|| format!("HTTP {}", response.status)),
                ),
            };
            let err = self.map_error(raw, ctx);
            if err.is_expected() {
                log::warn!("[dnsmgr] POST {path}: {err}");
            } else {
                log::error!("[dnsmgr] POST {path}: {err}");
            }
            return Err(err);
        }

        Ok(reply)
    }
}
