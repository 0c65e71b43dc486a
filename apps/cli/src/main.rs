//! Intake CLI entry point.

mod bridge;
mod config;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use futures_util::future::join_all;
use intake_uploader::{
    ChannelObserver, DropItem, FileTransport, NoticeQueue, Progress, UploadOrchestrator,
};
use tracing_subscriber::EnvFilter;

use crate::bridge::ApiBridge;
use crate::config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "intake-cli")]
#[command(about = "Upload files and folders into a dataset", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.config/intake/cli.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `server_url` from the configuration.
    #[arg(long, global = true)]
    server_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload files and directories.
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Skip the file-count ceiling.
        #[arg(long)]
        unlimited: bool,

        /// Keep only the first file.
        #[arg(long)]
        single_file: bool,
    },
    /// Print the server's upload limits.
    Limits,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match CliConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            CliConfig::default()
        }
    };
    if let Some(url) = cli.server_url {
        config.server_url = url;
    }

    let mut client = intake_api::Client::new(&config.server_url)?;
    if let Some(source) = config.upload_source()? {
        client = client.with_source(source);
    }
    let bridge = Arc::new(ApiBridge::new(client));

    match cli.command {
        Command::Limits => {
            let limits = bridge.fetch_config().await?;
            println!("file_size_limit = {} MB", limits.file_size_limit);
            println!("batch_count_limit = {}", limits.batch_count_limit);
            Ok(ExitCode::SUCCESS)
        }
        Command::Upload {
            paths,
            unlimited,
            single_file,
        } => {
            config.unlimited |= unlimited;
            config.single_file_only |= single_file;
            upload(bridge, &config, paths).await
        }
    }
}

async fn upload(
    bridge: Arc<ApiBridge>,
    config: &CliConfig,
    paths: Vec<PathBuf>,
) -> anyhow::Result<ExitCode> {
    tracing::info!(server = %config.server_url, paths = paths.len(), "starting upload");

    let (observer, events_rx) = ChannelObserver::new();
    let notices = Arc::new(Mutex::new(NoticeQueue::new()));
    let orchestrator = UploadOrchestrator::new(bridge, Arc::new(observer), notices.clone())
        .with_policy(config.policy())
        .with_messages(config.messages.clone());

    let renderer = tokio::spawn(render::progress(events_rx));

    let items = join_all(paths.into_iter().map(DropItem::from_path)).await;
    let result = orchestrator.intake_drop(items).await;
    let snapshot = orchestrator.snapshot();

    // Closes the event channel so the renderer finishes.
    drop(orchestrator);
    renderer.await?;

    let notices = notices
        .lock()
        .map(|mut q| q.drain())
        .unwrap_or_default();
    for notice in &notices {
        eprintln!("{}", render::notice_line(notice));
    }

    if let Err(e) = result {
        tracing::error!(error = %e, "intake rejected");
        return Ok(ExitCode::FAILURE);
    }

    let failed = snapshot
        .iter()
        .filter(|i| i.progress == Progress::Failed)
        .count();
    println!(
        "{} uploaded, {} failed",
        snapshot.len() - failed,
        failed
    );

    if failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
