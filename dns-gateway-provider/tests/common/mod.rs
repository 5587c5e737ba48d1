//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use dns_gateway_provider::{DomainConfig, ProviderClient, create_provider_from_config};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 构造一个 `DomainConfig`
pub fn domain_config(
    provider: &str,
    primary: &str,
    secondary: &str,
    zone_ref: &str,
    base_url: Option<String>,
) -> DomainConfig {
    DomainConfig {
        provider_type: provider.to_string(),
        credential_primary: primary.to_string(),
        credential_secondary: secondary.to_string(),
        zone_ref: zone_ref.to_string(),
        base_url,
    }
}

/// 从配置创建客户端（配置必须合法）
pub fn client(config: &DomainConfig) -> Arc<dyn ProviderClient> {
    create_provider_from_config(config).expect("valid test configuration")
}

/// 真实环境测试上下文
///
/// 读取 `GATEWAY_PROVIDER`、`GATEWAY_PRIMARY`、`GATEWAY_SECONDARY`、
/// `GATEWAY_ZONE` 与可选的 `GATEWAY_BASE_URL`。
pub struct LiveContext {
    pub provider: Arc<dyn ProviderClient>,
    pub zone: String,
}

impl LiveContext {
    pub fn from_env() -> Option<Self> {
        let config = domain_config(
            &env::var("GATEWAY_PROVIDER").ok()?,
            &env::var("GATEWAY_PRIMARY").ok()?,
            &env::var("GATEWAY_SECONDARY").unwrap_or_default(),
            &env::var("GATEWAY_ZONE").ok()?,
            env::var("GATEWAY_BASE_URL").ok(),
        );
        let provider = create_provider_from_config(&config).ok()?;
        Some(Self {
            provider,
            zone: config.zone_ref,
        })
    }
}

/// 生成唯一的测试记录名称
pub fn generate_test_record_name() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!("_test-{nanos:08x}")
}
