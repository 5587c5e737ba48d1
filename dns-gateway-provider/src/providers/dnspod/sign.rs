//! `DNSPod` TC3-HMAC-SHA256 签名
//!
//! Reference: <https://cloud.tencent.com/document/api/1427/56189>

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::providers::common::hmac_sha256;

use super::{DNSPOD_SERVICE, DnspodProvider};

const ALGORITHM: &str = "TC3-HMAC-SHA256";
const SIGNED_HEADERS: &str = "content-type;host;x-tc-action";
pub(crate) const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// 规范请求串（POST /，无 query）
fn canonical_request(host: &str, action: &str, payload: &str) -> String {
    let canonical_headers = format!(
        "content-type:{CONTENT_TYPE}\nhost:{host}\nx-tc-action:{}\n",
        action.to_lowercase()
    );
    let hashed_payload = hex::encode(Sha256::digest(payload.as_bytes()));
    format!("POST\n/\n\n{canonical_headers}\n{SIGNED_HEADERS}\n{hashed_payload}")
}

impl DnspodProvider {
    /// 生成 TC3-HMAC-SHA256 `Authorization` 头
    ///
    /// `timestamp` 同时决定签名日期（UTC），调用方须保证与 `X-TC-Timestamp` 一致。
    pub(crate) fn sign(&self, action: &str, payload: &str, timestamp: i64) -> String {
        let date = DateTime::from_timestamp(timestamp, 0)
            .unwrap_or_else(Utc::now)
            .format("%Y-%m-%d")
            .to_string();

        let credential_scope = format!("{date}/{DNSPOD_SERVICE}/tc3_request");
        let hashed_canonical_request = hex::encode(Sha256::digest(
            canonical_request(&self.host, action, payload).as_bytes(),
        ));
        let string_to_sign =
            format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{hashed_canonical_request}");

        let secret_date = hmac_sha256(
            format!("TC3{}", self.secret_key).as_bytes(),
            date.as_bytes(),
        );
        let secret_service = hmac_sha256(&secret_date, DNSPOD_SERVICE.as_bytes());
        let secret_signing = hmac_sha256(&secret_service, b"tc3_request");
        let signature = hex::encode(hmac_sha256(&secret_signing, string_to_sign.as_bytes()));

        format!(
            "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
            self.secret_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::DnspodProvider;
    use super::*;

    // 2024-01-15 08:00:00 UTC
    const TS: i64 = 1_705_305_600;

    fn provider() -> DnspodProvider {
        DnspodProvider::new("test_secret_id".to_string(), "test_secret_key".to_string()).unwrap()
    }

    fn field<'a>(auth: &'a str, name: &str) -> &'a str {
        let start = auth.find(name).unwrap() + name.len();
        let rest = &auth[start..];
        rest.find(',').map_or(rest, |end| &rest[..end])
    }

    #[test]
    fn canonical_request_layout() {
        let req = canonical_request("dnspod.tencentcloudapi.com", "DescribeRecordList", "{}");
        let lines: Vec<&str> = req.split('\n').collect();
        assert_eq!(lines[0], "POST");
        assert_eq!(lines[1], "/");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "content-type:application/json; charset=utf-8");
        assert_eq!(lines[4], "host:dnspod.tencentcloudapi.com");
        assert_eq!(lines[5], "x-tc-action:describerecordlist");
        assert_eq!(lines[7], SIGNED_HEADERS);
        // sha256("{}")
        assert_eq!(
            lines[8],
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn sign_output_format() {
        let auth = provider().sign("DescribeRecordList", "{}", TS);
        assert!(auth.starts_with("TC3-HMAC-SHA256 Credential="), "{auth}");
        assert_eq!(
            field(&auth, "Credential="),
            "test_secret_id/2024-01-15/dnspod/tc3_request"
        );
        assert_eq!(field(&auth, "SignedHeaders="), SIGNED_HEADERS);
        assert_eq!(field(&auth, "Signature=").len(), 64);
    }

    #[test]
    fn sign_deterministic() {
        let p = provider();
        let payload = r#"{"Domain":"example.com"}"#;
        assert_eq!(
            p.sign("DescribeRecordList", payload, TS),
            p.sign("DescribeRecordList", payload, TS)
        );
    }

    #[test]
    fn signature_depends_on_every_input() {
        let p = provider();
        let base = p.sign("DescribeRecordList", "{}", TS);
        let sig = |s: &str| field(s, "Signature=").to_string();

        assert_ne!(sig(&base), sig(&p.sign("CreateRecord", "{}", TS)));
        assert_ne!(sig(&base), sig(&p.sign("DescribeRecordList", "{\"a\":1}", TS)));
        assert_ne!(sig(&base), sig(&p.sign("DescribeRecordList", "{}", TS + 1)));

        let other_key = DnspodProvider::new("test_secret_id".into(), "other".into()).unwrap();
        assert_ne!(sig(&base), sig(&other_key.sign("DescribeRecordList", "{}", TS)));

        let other_host = DnspodProvider::builder("test_secret_id".into(), "test_secret_key".into())
            .endpoint(Some("http://127.0.0.1:9000".into()))
            .build()
            .unwrap();
        assert_ne!(sig(&base), sig(&other_host.sign("DescribeRecordList", "{}", TS)));
    }

    #[test]
    fn date_rolls_over_at_utc_midnight() {
        let p = provider();
        // 2024-01-15 23:59:59 UTC / 2024-01-16 00:00:00 UTC
        let before = p.sign("DescribeRecordList", "{}", 1_705_363_199);
        let after = p.sign("DescribeRecordList", "{}", 1_705_363_200);
        assert!(field(&before, "Credential=").contains("/2024-01-15/"));
        assert!(field(&after, "Credential=").contains("/2024-01-16/"));
    }
}
