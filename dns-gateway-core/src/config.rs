//! 域名配置文件（TOML）
//!
//! ```toml
//! [[domains]]
//! name = "main"
//! provider_type = "cloudflare"
//! credential_primary = "token"
//! zone_ref = "023e105f4ecef8ad9ca31a8372d0c353"
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use dns_gateway_provider::DomainConfig;

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::DnsGateway;

/// Every domain the gateway manages, keyed by a local name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub domains: Vec<NamedDomain>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedDomain {
    /// Local handle, unique within the file.
    pub name: String,
    #[serde(flatten)]
    pub config: DomainConfig,
}

impl GatewayConfig {
    /// Parse a TOML document.
    ///
    /// Fails with [`GatewayError::InvalidConfig`] on malformed TOML or a
    /// repeated domain name. Credentials are not checked here; that happens
    /// when a gateway is built.
    pub fn from_toml_str(raw: &str) -> GatewayResult<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| GatewayError::InvalidConfig(e.to_string()))?;

        let mut seen = HashSet::new();
        for domain in &config.domains {
            if !seen.insert(domain.name.as_str()) {
                return Err(GatewayError::InvalidConfig(format!(
                    "duplicate domain name '{}'",
                    domain.name
                )));
            }
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> GatewayResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GatewayError::InvalidConfig(format!("{}: {e}", path.display())))?;
        log::debug!("loading gateway config from {}", path.display());
        Self::from_toml_str(&raw)
    }

    pub fn domain(&self, name: &str) -> GatewayResult<&DomainConfig> {
        self.domains
            .iter()
            .find(|d| d.name == name)
            .map(|d| &d.config)
            .ok_or_else(|| GatewayError::DomainNotConfigured(name.to_string()))
    }

    /// Build the gateway for the named domain.
    pub fn gateway(&self, name: &str) -> GatewayResult<DnsGateway> {
        DnsGateway::new(self.domain(name)?)
    }
}
