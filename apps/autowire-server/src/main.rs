mod components;
mod config;
mod logging;
mod signals;
mod startup;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use autowire::EndpointRegistry;
use autowire_http::HttpRuntime;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;

/// Autowire Server - publishes managed components as remote endpoints
#[derive(Parser)]
#[command(name = "autowire-server")]
#[command(about = "Autowire Server - publishes managed components as remote endpoints")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover components and serve their endpoints
    Run,
    /// Run discovery against a scratch registry and report the outcome
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref()
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // defaults -> YAML (if provided) -> env (AUTOWIRE__*) -> CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port, cli.verbose)?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    logging::init_logging(&config.logging)?;
    tracing::info!("Autowire Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config).await,
    }
}

async fn run_server(config: AppConfig) -> Result<()> {
    let container = Arc::new(startup::ready_container()?);
    let runtime = Arc::new(HttpRuntime::new(&config.server));

    let report = startup::discover(container, runtime.clone(), &config.discovery).await?;
    for (component, endpoint) in report.published() {
        tracing::info!(
            %component,
            url = %runtime.url_path(&endpoint.path),
            operations = %endpoint.operations.join(", "),
            "serving endpoint"
        );
    }

    let listener = TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;

    let cancel = CancellationToken::new();
    signals::spawn_shutdown_waiter(cancel.clone());

    runtime.serve(listener, cancel).await?;
    tracing::info!("Autowire Server stopped");
    Ok(())
}

async fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    let container = Arc::new(startup::ready_container()?);
    let scratch = Arc::new(EndpointRegistry::new());

    let report = startup::discover(container, scratch, &config.discovery).await?;
    for (component, endpoint) in report.published() {
        println!("{component}: {}", endpoint.path);
    }
    for (component, error) in report.failures() {
        println!("{component}: FAILED ({error})");
    }
    if !report.is_clean() {
        anyhow::bail!("discovery check failed: {report}");
    }
    println!("Configuration is valid ({report})");
    Ok(())
}
