//! CLI entrypoint for toolrun
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use toolrun_application::{NoUpdateLogger, RunToolsInput, RunToolsUseCase, UpdateLogger};
use toolrun_domain::{Message, MessageFile};
use toolrun_infrastructure::{
    ConfigLoader, FileConfig, InMemoryToolMetrics, JsonlUpdateLogger, ReplayEndpoint,
    ToolRegistry,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    // Keep the guard alive so buffered file logs are flushed on exit
    let (file_layer, _guard) = match &cli.log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let file_name = path
                .file_name()
                .context("--log-file must name a file")?;
            let appender = tracing_appender::rolling::never(
                dir.unwrap_or_else(|| Path::new(".")),
                file_name,
            );
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    info!("Starting toolrun");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate()?;

    // === Dependency Injection ===
    let endpoint = Arc::new(
        ReplayEndpoint::from_file(&cli.transcript)
            .with_context(|| format!("Failed to load transcript {}", cli.transcript.display()))?,
    );

    let registry = ToolRegistry::builtin(&config.tools);
    let stats = registry.stats();
    info!(
        "Registered {} tool(s) ({} locked, {} on by default)",
        stats.total_tools, stats.locked, stats.on_by_default
    );
    let tools = Arc::new(registry.build());

    let metrics = Arc::new(InMemoryToolMetrics::new());
    let logger = update_logger(&cli, &config);

    let use_case = RunToolsUseCase::new(endpoint, tools)
        .with_metrics(metrics.clone())
        .with_logger(logger)
        .with_config(config.orchestrator.to_run_tools_config());

    // Build input
    let mut user = Message::user(cli.message.clone());
    for path in &cli.attach {
        user = user.with_file(attachment(path)?);
    }
    let mut input = RunToolsInput::new(vec![user]);
    for tool in &cli.enable {
        input = input.with_preference(tool.clone(), true);
    }
    for tool in &cli.disable {
        input = input.with_preference(tool.clone(), false);
    }
    if cli.assistant {
        input = input.for_assistant();
    }

    // Print updates as they arrive
    let mut turn = use_case.execute(input).await?;
    while let Some(update) = turn.next().await {
        match serde_json::to_string(&update) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("Could not serialize {} update: {}", update.kind(), e),
        }
    }
    let output = turn.results().await;

    println!("{}", serde_json::to_string_pretty(&output.results)?);

    let snapshot = metrics.snapshot();
    info!(
        "Turn finished: {} call(s), {} result(s), metrics: {}",
        output.calls.len(),
        output.results.len(),
        serde_json::to_string(&snapshot)?
    );

    Ok(())
}

/// JSONL logger for `--events` (or `[logging] events_file`), if any.
fn update_logger(cli: &Cli, config: &FileConfig) -> Arc<dyn UpdateLogger> {
    let path = cli
        .events
        .as_deref()
        .or(config.logging.events_file.as_deref());

    match path.and_then(|p| JsonlUpdateLogger::new(p)) {
        Some(logger) => {
            info!("Logging updates to {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoUpdateLogger),
    }
}

/// Read an attachment; files that are not valid UTF-8 are attached
/// without text content.
fn attachment(path: &Path) -> Result<MessageFile> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Attachment {} has no file name", path.display()))?;
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let file = MessageFile::new(name, mime.essence_str());
    Ok(match String::from_utf8(bytes) {
        Ok(text) => file.with_content(text),
        Err(_) => {
            warn!("Attachment {} is not UTF-8 text", path.display());
            file
        }
    })
}
