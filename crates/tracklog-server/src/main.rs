//! tracklog binary.
//!
//! Reads `tracklog.toml` (or the path given with `--config`) layered with
//! `TRACKLOG_*` environment variables, then either serves the HTTP API or runs
//! one ingestion step and exits.
//!
//! ```text
//! tracklog download --file-limit 4
//! tracklog prepare
//! tracklog serve
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracklog_server::{ServerConfig, app, build_ingestor};

#[derive(Parser)]
#[command(author, version, about = "Aircraft snapshot ingestion and query server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "tracklog.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (default).
  Serve,
  /// Fetch the configured day's snapshots into the raw directory.
  Download {
    /// Maximum number of files to store.
    #[arg(long, default_value_t = 100)]
    file_limit: usize,
  },
  /// Rebuild the record store from the raw directory.
  Prepare,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
  let ingestor = build_ingestor(&server_cfg).await?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Download { file_limit } => {
      let report = ingestor.download(file_limit).await.context("download failed")?;
      println!(
        "downloaded {} file(s), skipped {}, removed {}",
        report.downloaded, report.skipped, report.removed
      );
    }
    Command::Prepare => {
      let report = ingestor.prepare().await.context("prepare failed")?;
      println!(
        "prepared {} of {} file(s): {} aircraft, {} positions",
        report.parsed, report.files, report.aircraft, report.positions
      );
    }
    Command::Serve => {
      let address = server_cfg.address();
      let app = app(Arc::new(ingestor));

      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

      axum::serve(listener, app).await.context("server error")?;
    }
  }

  Ok(())
}
