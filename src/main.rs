//! archost - debounced single-flight replanning host
//!
//! CLI entry point for planning, applying and watching an arc.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use archost::cli::{Cli, Command, OutputFormat, render_applied, render_event, render_plans};
use archost::config::Config;
use archost::events::EventLogEntry;
use archost::host::ArcHost;
use archost::planning::ManifestPlanner;
use archost::watcher::ManifestWatcher;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("archost")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to the log file; stdout carries command output
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("archost.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        "archost loaded config: debounce={}ms, manifests={:?}",
        config.host.debounce_ms,
        config.manifest.import_list()
    );

    match cli.command {
        Command::Plan { format } => cmd_plan(&config, format).await,
        Command::Apply { name, format } => cmd_apply(&config, &name, format).await,
        Command::Watch { format } => cmd_watch(&config, format).await,
    }
}

async fn open_host(config: &Config) -> Result<ArcHost> {
    ArcHost::open(config, Arc::new(ManifestPlanner::new()))
        .await
        .context("Failed to open arc host")
}

/// Plan once and print the suggestions
async fn cmd_plan(config: &Config, format: OutputFormat) -> Result<()> {
    let host = open_host(config).await?;
    let plans = host.plans().await.context("Planning did not complete")?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "session-id": host.session_id(),
                "plans": plans,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => print!("{}", render_plans(host.session_id(), &plans)),
    }

    host.shutdown()?;
    Ok(())
}

/// Plan, apply the named suggestion, then print the replanned set
async fn cmd_apply(config: &Config, name: &str, format: OutputFormat) -> Result<()> {
    let host = open_host(config).await?;
    let plans = host.plans().await.context("Planning did not complete")?;
    let plan = host.find_plan(&plans, name)?;

    let mut rx = host.subscribe();
    let signal = host.apply_suggestion(plan).await;
    let next = host.next_plans(&mut rx).await.context("Replanning did not complete")?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "session-id": host.session_id(),
                "applied": signal,
                "plans": next,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            print!("{}", render_applied(&signal));
            print!("{}", render_plans(host.session_id(), &next));
        }
    }

    host.shutdown()?;
    Ok(())
}

/// Print every host event until Ctrl-C
async fn cmd_watch(config: &Config, format: OutputFormat) -> Result<()> {
    let host = open_host(config).await?;
    let mut rx = host.subscribe();

    if config.watcher.enabled {
        let watcher = ManifestWatcher::new(config.watcher.clone(), host.clone());
        tokio::spawn(async move {
            if let Err(e) = watcher.run().await {
                warn!(error = %e, "Manifest watcher exited");
            }
        });
    }

    host.request_plans();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, shutting down");
                break;
            }
            event = rx.recv() => match event {
                Ok(event) => match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string(&EventLogEntry::new(event))?),
                    OutputFormat::Text => println!("{}", render_event(&event)),
                },
                Err(RecvError::Lagged(missed)) => warn!(missed, "Event printer lagged"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    host.shutdown()?;
    Ok(())
}
