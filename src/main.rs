//! dnscheck CLI
//!
//! Serve the resolver check over HTTP, or run a single check from the shell.

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dnscheck::check::Checker;
use dnscheck::config::{CheckConfig, DEFAULT_LISTEN, DEFAULT_LIST_PATH};
use dnscheck::server::{self, DnsCheckService};

/// Ask every DNS resolver in a list what it answers for a domain
#[derive(Parser)]
#[command(name = "dnscheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the resolver list (CSV: name, address)
    #[arg(short = 'f', long, global = true, default_value = DEFAULT_LIST_PATH)]
    list: PathBuf,

    /// Per-resolver timeout in milliseconds
    #[arg(short, long, global = true, default_value_t = 1000)]
    timeout_ms: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to listen on
        #[arg(long, default_value_t = DEFAULT_LISTEN)]
        listen: SocketAddr,
    },

    /// Check one domain and print the JSON result
    Check {
        /// Domain to look up
        domain: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let config = CheckConfig::default()
        .with_list_path(cli.list)
        .with_query_timeout(Duration::from_millis(cli.timeout_ms));

    match cli.command {
        Commands::Serve { listen } => run_server(config.with_listen(listen)).await,
        Commands::Check { domain } => run_check(config, &domain).await,
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_service(config: &CheckConfig) -> DnsCheckService {
    let checker = Checker::default().with_timeout(config.query_timeout);
    DnsCheckService::new(Arc::new(config.endpoint_source()), checker)
}

async fn run_server(config: CheckConfig) -> Result<()> {
    info!(
        list = %config.list_path.display(),
        timeout = ?config.query_timeout,
        "starting dnscheck service"
    );

    let service = build_service(&config);
    let listener = server::bind(config.listen).await?;

    server::serve(listener, service, wait_for_shutdown()).await;
    Ok(())
}

async fn run_check(config: CheckConfig, domain: &str) -> Result<()> {
    let service = build_service(&config);
    let result = service.run(Some(domain)).await?;

    let json = serde_json::to_string_pretty(&result).context("Failed to encode result")?;
    println!("{json}");
    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
