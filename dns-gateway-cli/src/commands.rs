//! Subcommand execution

use anyhow::{Result, bail};
use serde_json::{Value, json};

use dns_gateway_core::{
    DnsGateway, GatewayConfig, GatewayError, PaginationParams, RecordOptions, RecordQuery,
};
use dns_gateway_provider::get_all_provider_metadata;
use dns_gateway_provider::utils::log_sanitizer::mask_secret;

use crate::{Cli, Command, RecordArgs, RecordState};

/// Run the selected subcommand and render its result as pretty JSON.
pub async fn run(cli: &Cli) -> Result<String> {
    let value = match &cli.command {
        Command::Providers => serde_json::to_value(get_all_provider_metadata())?,
        Command::Domains => domains(&GatewayConfig::load(&cli.config)?),
        command => {
            let gateway = open_gateway(cli)?;
            execute(&gateway, command).await?
        }
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

fn open_gateway(cli: &Cli) -> Result<DnsGateway> {
    let config = GatewayConfig::load(&cli.config)?;
    let name = match (&cli.domain, config.domains.as_slice()) {
        (Some(name), _) => name.clone(),
        (None, [only]) => only.name.clone(),
        (None, []) => bail!("no domains in {}", cli.config.display()),
        (None, _) => bail!("several domains configured; pick one with --domain"),
    };
    tracing::info!("using domain '{name}'");
    Ok(config.gateway(&name)?)
}

async fn execute(gateway: &DnsGateway, command: &Command) -> Result<Value> {
    let value = match command {
        Command::Verify => serde_json::to_value(gateway.verification_details().await?)?,
        Command::List {
            record_type,
            keyword,
            page,
            page_size,
        } => {
            let query = RecordQuery {
                page: *page,
                page_size: *page_size,
                keyword: keyword.clone(),
                record_type: *record_type,
            };
            serde_json::to_value(gateway.list_records(&query).await?)?
        }
        Command::Add(args) => {
            let record = gateway
                .add_record(args.record_type, &args.name, &args.content, &options(args))
                .await?;
            serde_json::to_value(record)?
        }
        Command::Update { id, record: args } => {
            let record = gateway
                .update_record(
                    id,
                    args.record_type,
                    &args.name,
                    &args.content,
                    &options(args),
                )
                .await?;
            serde_json::to_value(record)?
        }
        Command::Delete { id } => json!({ "id": id, "deleted": gateway.delete_record(id).await? }),
        Command::Status { id, state } => {
            let enabled = *state == RecordState::Enable;
            gateway.set_record_status(id, enabled).await?;
            json!({ "id": id, "enabled": enabled })
        }
        Command::ListDomains { page, page_size } => {
            let params = PaginationParams {
                page: *page,
                page_size: *page_size,
            };
            serde_json::to_value(gateway.list_domains(&params).await?)?
        }
        Command::Domains | Command::Providers => bail!("{command:?} does not use a gateway"),
    };
    Ok(value)
}

fn options(args: &RecordArgs) -> RecordOptions {
    RecordOptions {
        proxied: args.proxied,
        line: args.line.clone(),
        ttl: args.ttl,
        mx: args.mx,
        weight: args.weight,
        remark: args.remark.clone(),
    }
}

/// 配置文件中的域名列表，凭证打码
fn domains(config: &GatewayConfig) -> Value {
    config
        .domains
        .iter()
        .map(|d| {
            json!({
                "name": d.name,
                "providerType": d.config.provider_type,
                "zoneRef": d.config.zone_ref,
                "credentialPrimary": mask_secret(&d.config.credential_primary),
                "credentialSecondary": mask_secret(&d.config.credential_secondary),
                "baseUrl": d.config.base_url,
            })
        })
        .collect()
}

/// Error output: gateway errors carry their kind and structured details.
pub fn render_error(error: &anyhow::Error) -> String {
    let value = match error.downcast_ref::<GatewayError>() {
        Some(e) => json!({
            "kind": e.kind(),
            "message": e.to_string(),
            "error": e,
        }),
        None => json!({ "message": format!("{error:#}") }),
    };
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| error.to_string())
}
