//! Google Tag Manager MCP Server
//!
//! # Usage
//!
//! ```bash
//! gtm-mcp [--transport stdio|http] [--bind <addr>] [--credentials <key.json>] [--config <file.toml>]
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `gtm_mcp=info`)
//! - `NO_COLOR`: Disable ANSI colors in log output
//! - `GOOGLE_APPLICATION_CREDENTIALS`: Service-account key file
//! - `GTM_MCP_TRANSPORT`, `GTM_MCP_BIND`, `GTM_API_BASE_URL`: see `--help`
//!
//! # Protocol
//!
//! With the stdio transport, JSON-RPC 2.0 goes through stdin/stdout and logs
//! go to stderr. With the http transport, messages are posted to `/mcp`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use gtm_api::GoogleClientProvider;
use gtm_mcp::{Error, FileConfig, GtmMcpServer, Overrides, ServerConfig, ToolRegistry, TransportKind};

/// MCP server for the Google Tag Manager API
#[derive(Parser)]
#[command(name = "gtm-mcp")]
#[command(about = "MCP server for the Google Tag Manager API")]
#[command(version)]
struct Args {
    /// Transport to serve on
    #[arg(long, value_enum, env = "GTM_MCP_TRANSPORT")]
    transport: Option<TransportKind>,

    /// Listen address for the http transport
    #[arg(long, env = "GTM_MCP_BIND")]
    bind: Option<String>,

    /// Service-account key file; application-default credentials when absent
    #[arg(long = "credentials", env = "GOOGLE_APPLICATION_CREDENTIALS")]
    credentials_file: Option<PathBuf>,

    /// Tag Manager API base URL
    #[arg(long, env = "GTM_API_BASE_URL")]
    api_base_url: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable colored log output (any non-empty `NO_COLOR` value)
    #[arg(long, env = "NO_COLOR", num_args = 0..=1, default_missing_value = "1")]
    no_color: Option<String>,
}

impl Args {
    fn color(&self) -> bool {
        self.no_color.as_deref().is_none_or(str::is_empty)
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            transport: self.transport,
            bind: self.bind.clone(),
            credentials_file: self.credentials_file.clone(),
            api_base_url: self.api_base_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr; stdout is reserved for the stdio transport
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gtm_mcp=info,gtm_api=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(args.color())
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "gtm-mcp failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> gtm_mcp::Result<()> {
    let file = args.config.as_deref().map(FileConfig::load).transpose()?;
    let config = ServerConfig::resolve(args.overrides(), file)?;
    tracing::info!(
        transport = ?config.transport,
        api_base_url = %config.api_base_url,
        "Starting gtm-mcp server"
    );

    let registry = ToolRegistry::with_all_tools()?;
    let provider = Arc::new(GoogleClientProvider::new(config.api_base_url.clone()));
    let server = GtmMcpServer::new(registry, provider, config.credentials());

    match config.transport {
        TransportKind::Stdio => server.run_stdio().await,
        TransportKind::Http => {
            let addr = config
                .bind
                .ok_or_else(|| Error::Config("http transport needs a bind address".into()))?;
            gtm_mcp::http::serve(server, addr, config.max_body_bytes).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_no_color_flag_disables_color() {
        assert!(!parse(&["gtm-mcp", "--no-color"]).color());
    }

    #[test]
    fn test_any_non_empty_no_color_value_disables_color() {
        for value in ["1", "0", "false", "yes"] {
            assert!(!parse(&["gtm-mcp", "--no-color", value]).color(), "{value}");
        }
    }

    #[test]
    fn test_empty_no_color_keeps_color() {
        assert!(parse(&["gtm-mcp", "--no-color="]).color());
    }
}
