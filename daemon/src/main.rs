//! Verinum daemon — entry point for running a registry service.
//!
//! Loads the verifier roster and panel configuration, starts the
//! single-writer registry service, and tails the event log to stdout as
//! JSON lines until SIGINT/SIGTERM.

use clap::Parser;
use std::path::PathBuf;
use verinum_service::{init_logging, LogFormat, RegistryConfig, RegistryService, ShutdownController};

#[derive(Parser)]
#[command(name = "verinum-daemon", about = "Verinum phone number registry daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "VERINUM_CONFIG")]
    config: Option<PathBuf>,

    /// Verifier roster (comma-separated identities). Overrides the config file.
    #[arg(long, env = "VERINUM_VERIFIERS", value_delimiter = ',')]
    verifiers: Vec<String>,

    /// Verifiers assigned per request. Overrides the config file.
    #[arg(long, env = "VERINUM_PANEL_SIZE")]
    panel_size: Option<usize>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "VERINUM_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "VERINUM_LOG_FORMAT")]
    log_format: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RegistryConfig::from_toml_file(
            path.to_str()
                .ok_or_else(|| anyhow::anyhow!("config path is not valid UTF-8"))?,
        )?,
        None => RegistryConfig::from_toml_str("verifiers = []")?,
    };
    if !cli.verifiers.is_empty() {
        config.verifiers = cli.verifiers.clone();
    }
    if let Some(panel_size) = cli.panel_size {
        config.panel_size = panel_size;
    }
    config.log_level = cli.log_level.clone();
    config.log_format = cli.log_format.clone();

    init_logging(LogFormat::parse(&config.log_format), &config.log_level);
    tracing::info!(
        roster_size = config.verifiers.len(),
        panel_size = config.panel_size,
        policy = ?config.resolution_policy,
        "starting verinum registry"
    );

    let registry = config.build_registry()?;
    let service = RegistryService::start(registry);
    let handle = service.handle();

    let shutdown = ShutdownController::new();
    let mut shutdown_rx = shutdown.subscribe();

    // Tail the event stream as JSON lines so operators (and the role UIs'
    // backends) can follow registry activity.
    let mut events = handle.events().subscribe();
    let tail = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                record = events.recv() => match record {
                    Ok(record) => match serde_json::to_string(&record) {
                        Ok(line) => println!("{line}"),
                        Err(e) => tracing::warn!(error = %e, "failed to render event"),
                    },
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "event tail lagged behind the log");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    });

    shutdown.wait_for_signal().await;
    let _ = tail.await;
    service.stop().await;

    Ok(())
}
