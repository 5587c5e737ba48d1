//! Provider factory functions and metadata.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::ProviderClient;
use crate::types::{
    ConfigSlot, DomainConfig, FieldType, ProviderCredentialField, ProviderCredentials,
    ProviderMetadata, ProviderType,
};

#[cfg(feature = "cloudflare")]
use crate::providers::CloudflareProvider;
#[cfg(feature = "dnsmgr")]
use crate::providers::DnsmgrProvider;
#[cfg(feature = "dnspod")]
use crate::providers::DnspodProvider;
#[cfg(feature = "powerdns")]
use crate::providers::PowerdnsProvider;

/// Creates a [`ProviderClient`] instance from the given credentials.
///
/// The concrete client is chosen by the [`ProviderCredentials`] variant and
/// returned as `Arc<dyn ProviderClient>` so callers can share it freely.
///
/// # Examples
///
/// ```rust,no_run
/// use dns_gateway_provider::{create_provider, ProviderCredentials};
///
/// let provider = create_provider(ProviderCredentials::Cloudflare {
///     api_key: "your-token".to_string(),
///     email: None,
///     api_base: None,
/// }).unwrap();
/// ```
pub fn create_provider(credentials: ProviderCredentials) -> Result<Arc<dyn ProviderClient>> {
    log::debug!("creating {} client", credentials.provider_type());
    match credentials {
        #[cfg(feature = "cloudflare")]
        ProviderCredentials::Cloudflare {
            api_key,
            email,
            api_base,
        } => {
            let mut builder = CloudflareProvider::builder(api_key).email(email);
            if let Some(api_base) = api_base {
                builder = builder.api_base(api_base);
            }
            Ok(Arc::new(builder.build()?))
        }
        #[cfg(feature = "dnsmgr")]
        ProviderCredentials::Dnsmgr {
            uid,
            api_key,
            base_url,
        } => Ok(Arc::new(DnsmgrProvider::new(uid, api_key, &base_url)?)),
        #[cfg(feature = "dnspod")]
        ProviderCredentials::Dnspod {
            secret_id,
            secret_key,
            endpoint,
        } => Ok(Arc::new(
            DnspodProvider::builder(secret_id, secret_key)
                .endpoint(endpoint)
                .build()?,
        )),
        #[cfg(feature = "powerdns")]
        ProviderCredentials::Powerdns { endpoint, api_key } => {
            Ok(Arc::new(PowerdnsProvider::new(&endpoint, api_key)?))
        }
    }
}

/// Validates a generic [`DomainConfig`] and builds its client in one step.
pub fn create_provider_from_config(config: &DomainConfig) -> Result<Arc<dyn ProviderClient>> {
    create_provider(ProviderCredentials::from_domain_config(config)?)
}

/// Returns metadata for all providers enabled via feature flags.
///
/// Each field names the generic [`DomainConfig`] slot it is read from, so a
/// configuration UI can be generated without provider-specific code.
pub fn get_all_provider_metadata() -> Vec<ProviderMetadata> {
    vec![
        #[cfg(feature = "cloudflare")]
        provider_metadata(ProviderType::Cloudflare),
        #[cfg(feature = "dnsmgr")]
        provider_metadata(ProviderType::Dnsmgr),
        #[cfg(feature = "dnspod")]
        provider_metadata(ProviderType::Dnspod),
        #[cfg(feature = "powerdns")]
        provider_metadata(ProviderType::Powerdns),
    ]
}

/// Metadata of a single provider.
pub fn provider_metadata(provider: ProviderType) -> ProviderMetadata {
    let (description, fields) = match provider {
        #[cfg(feature = "cloudflare")]
        ProviderType::Cloudflare => (
            "Cloudflare DNS，支持 API Token 或 Global API Key + 邮箱",
            vec![
                field(
                    "apiKey",
                    "API Token / Global API Key",
                    FieldType::Password,
                    ConfigSlot::CredentialPrimary,
                    true,
                    Some("输入 API Token 或 Global API Key"),
                    Some("Token 需要 Zone:Read 与 DNS:Edit 权限"),
                ),
                field(
                    "email",
                    "Email",
                    FieldType::Text,
                    ConfigSlot::CredentialSecondary,
                    false,
                    Some("you@example.com"),
                    Some("仅 Global API Key 需要"),
                ),
                field(
                    "apiBase",
                    "API Base URL",
                    FieldType::Url,
                    ConfigSlot::BaseUrl,
                    false,
                    Some("https://api.cloudflare.com/client/v4"),
                    None,
                ),
            ],
        ),
        #[cfg(feature = "dnsmgr")]
        ProviderType::Dnsmgr => (
            "自建 dnsmgr 聚合面板",
            vec![
                field(
                    "uid",
                    "UID",
                    FieldType::Text,
                    ConfigSlot::CredentialPrimary,
                    true,
                    Some("面板用户 ID"),
                    None,
                ),
                field(
                    "apiKey",
                    "API Key",
                    FieldType::Password,
                    ConfigSlot::CredentialSecondary,
                    true,
                    Some("面板 API 密钥"),
                    None,
                ),
                field(
                    "baseUrl",
                    "Panel URL",
                    FieldType::Url,
                    ConfigSlot::BaseUrl,
                    true,
                    Some("https://dns.example.com"),
                    Some("面板访问地址，不含 /api"),
                ),
            ],
        ),
        #[cfg(feature = "dnspod")]
        ProviderType::Dnspod => (
            "腾讯云 DNSPod (API 3.0)",
            vec![
                field(
                    "secretId",
                    "SecretId",
                    FieldType::Text,
                    ConfigSlot::CredentialPrimary,
                    true,
                    Some("输入 SecretId"),
                    None,
                ),
                field(
                    "secretKey",
                    "SecretKey",
                    FieldType::Password,
                    ConfigSlot::CredentialSecondary,
                    true,
                    Some("输入 SecretKey"),
                    None,
                ),
                field(
                    "endpoint",
                    "Endpoint",
                    FieldType::Url,
                    ConfigSlot::BaseUrl,
                    false,
                    Some("https://dnspod.tencentcloudapi.com"),
                    None,
                ),
            ],
        ),
        #[cfg(feature = "powerdns")]
        ProviderType::Powerdns => (
            "PowerDNS Authoritative HTTP API",
            vec![
                field(
                    "apiUrl",
                    "API URL",
                    FieldType::Url,
                    ConfigSlot::CredentialPrimary,
                    true,
                    Some("http://127.0.0.1:8081"),
                    Some("webserver-address 与 webserver-port"),
                ),
                field(
                    "apiKey",
                    "API Key",
                    FieldType::Password,
                    ConfigSlot::CredentialSecondary,
                    true,
                    Some("pdns.conf 中的 api-key"),
                    None,
                ),
            ],
        ),
    };

    ProviderMetadata {
        id: provider,
        description: description.to_string(),
        fields,
        capabilities: provider.capabilities(),
    }
}

fn field(
    key: &str,
    label: &str,
    field_type: FieldType,
    slot: ConfigSlot,
    required: bool,
    placeholder: Option<&str>,
    help_text: Option<&str>,
) -> ProviderCredentialField {
    ProviderCredentialField {
        key: key.to_string(),
        label: label.to_string(),
        field_type,
        slot,
        required,
        placeholder: placeholder.map(str::to_string),
        help_text: help_text.map(str::to_string),
    }
}
