//! dns-gateway command-line entry point
//!
//! Reads a TOML file of named domains and runs one gateway operation per
//! invocation. Results go to stdout as JSON; logs go to stderr.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dns_gateway_core::RecordType;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "dns-gateway", version, about = "Manage DNS records across providers")]
struct Cli {
    /// Domain configuration file
    #[arg(short, long, env = "DNS_GATEWAY_CONFIG", default_value = "gateway.toml")]
    config: PathBuf,

    /// Configured domain to operate on
    #[arg(short, long, env = "DNS_GATEWAY_DOMAIN")]
    domain: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List configured domains (credentials masked)
    Domains,
    /// Show provider metadata and capabilities
    Providers,
    /// Run every credential verification strategy
    Verify,
    /// List records of the domain (one page)
    List {
        #[arg(long = "type", value_parser = parse_record_type)]
        record_type: Option<RecordType>,
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
    /// Create a record
    Add(RecordArgs),
    /// Replace a record
    Update {
        /// Provider record id
        id: String,
        #[command(flatten)]
        record: RecordArgs,
    },
    /// Delete a record
    Delete { id: String },
    /// Enable or disable a record
    Status {
        id: String,
        #[arg(value_enum)]
        state: RecordState,
    },
    /// List zones visible to the credentials
    ListDomains {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
}

#[derive(Args, Debug)]
struct RecordArgs {
    #[arg(long = "type", value_parser = parse_record_type)]
    record_type: RecordType,
    #[arg(long)]
    name: String,
    #[arg(long)]
    content: String,
    #[arg(long)]
    ttl: Option<u32>,
    #[arg(long)]
    proxied: Option<bool>,
    #[arg(long)]
    line: Option<String>,
    #[arg(long)]
    weight: Option<u32>,
    /// MX priority
    #[arg(long)]
    mx: Option<u16>,
    #[arg(long)]
    remark: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum RecordState {
    Enable,
    Disable,
}

fn parse_record_type(raw: &str) -> Result<RecordType, String> {
    RecordType::parse(raw).ok_or_else(|| format!("unknown record type '{raw}'"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout 只输出 JSON 结果
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(cli.log_level.into()))
        .init();

    match commands::run(&cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!("command failed: {e:?}");
            eprintln!("{}", commands::render_error(&e));
            ExitCode::FAILURE
        }
    }
}
