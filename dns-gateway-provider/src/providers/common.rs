//! Provider 公共工具函数

#[cfg(feature = "dnspod")]
use hmac::{Hmac, Mac};
#[cfg(feature = "dnspod")]
use sha2::Sha256;

use crate::error::{ProviderError, Result};
use crate::types::RecordType;

#[cfg(feature = "dnspod")]
type HmacSha256 = Hmac<Sha256>;

// ============ 记录类型转换 ============

/// 将字符串转换为 `RecordType`
pub fn parse_record_type(record_type: &str, provider: &str) -> Result<RecordType> {
    RecordType::parse(record_type).ok_or_else(|| ProviderError::UnsupportedRecordType {
        provider: provider.to_string(),
        record_type: record_type.to_string(),
    })
}

// ============ HMAC-SHA256 ============

/// HMAC-SHA256 计算（供 dnspod 使用）
#[cfg(feature = "dnspod")]
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    #[allow(clippy::expect_used)]
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

// ============ 域名名称处理 ============

/// 去掉域名末尾的点
pub fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

/// 将相对名称转换为完整域名
/// 如: "www" + "example.com" -> "www.example.com"
/// 如: "@" + "example.com" -> "example.com"
/// 已是完整域名时原样返回
pub fn relative_to_full_name(relative_name: &str, zone_name: &str) -> String {
    let zone = normalize_domain_name(zone_name);
    let name = normalize_domain_name(relative_name);

    if name == "@" || name.is_empty() {
        zone
    } else if name.eq_ignore_ascii_case(&zone) || name.ends_with(&format!(".{zone}")) {
        name
    } else {
        format!("{name}.{zone}")
    }
}

/// 将内容中的 MX 优先级前缀拆出，如 "10 mail.example.com" -> (Some(10), "mail.example.com")
pub fn split_priority(content: &str) -> (Option<u16>, &str) {
    match content.split_once(' ') {
        Some((head, rest)) => match head.parse::<u16>() {
            Ok(priority) => (Some(priority), rest.trim_start()),
            Err(_) => (None, content),
        },
        None => (None, content),
    }
}
