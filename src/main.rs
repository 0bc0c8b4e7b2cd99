use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prettytable::{Table, row};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use voice_gis::config::Config;
use voice_gis::history::export::{csv_file_name, snapshot_file_name, write_csv};
use voice_gis::history::{CommandStore, SqliteCommandStore};
use voice_gis::map::{InMemoryMap, MapSurface};
use voice_gis::session::{ConsolePresenter, VoiceSession};
use voice_gis::speech::parse_capture_line;

#[derive(Parser)]
#[command(name = "voice-gis")]
#[command(about = "Voice-controlled map: type transcripts, get map actions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read transcripts from stdin, one per line (`!error <code>` simulates a capture error)
    Listen,
    /// Show logged commands, newest first
    History,
    /// Export the command history
    Export {
        /// Output path (defaults to voice_commands_YYYY-MM-DD.sqlite or .csv)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write CSV instead of a database snapshot
        #[arg(long)]
        csv: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config::load also reads .env, so RUST_LOG from there reaches the filter
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    // stdout belongs to the presenter
    tracing_subscriber::fmt()
        .with_env_filter(config.runtime.env_filter())
        .with_writer(std::io::stderr)
        .init();

    match &config.runtime.config_file {
        Some(path) => info!("Configuration loaded from {}", path),
        None => warn!("No config file found, using defaults"),
    }

    match cli.command.unwrap_or(Commands::Listen) {
        Commands::Listen => listen(&config).await,
        Commands::History => history(&config),
        Commands::Export { out, csv } => export(&config, out, csv),
    }
}

async fn listen(config: &Config) -> Result<()> {
    let map = Arc::new(InMemoryMap::new(&config.map));
    let ctx = voice_gis::build_context(
        config,
        Some(map.clone() as Arc<dyn MapSurface>),
        Arc::new(ConsolePresenter),
    )?;
    let (session, router) = VoiceSession::new(ctx);
    let router = tokio::spawn(router.run());

    info!("Listening for commands on stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(event) = parse_capture_line(&line)
            && let Some(delivery) = session.handle_event(event).await
        {
            // One command at a time: wait until its outcome is on screen
            delivery.delivered().await;
        }
    }

    drop(session);
    router.await.context("outcome router stopped unexpectedly")?;

    let view = map.view();
    info!(
        "final view: center=({:.4}, {:.4}) zoom={} base={:?} markers={}",
        view.center.0,
        view.center.1,
        view.zoom,
        view.active_base_layer,
        view.markers.len()
    );
    Ok(())
}

fn history(config: &Config) -> Result<()> {
    let store = SqliteCommandStore::open(&config.storage.database_path)?;
    let records = store.list_commands()?;
    if records.is_empty() {
        println!("No commands logged yet");
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(row!["ID", "Time", "Command", "OK", "Response"]);
    for r in records {
        let ok = if r.succeeded { "yes" } else { "no" };
        table.add_row(row![
            r.id,
            r.timestamp,
            r.command,
            ok,
            r.response.unwrap_or_default()
        ]);
    }
    table.printstd();
    Ok(())
}

fn export(config: &Config, out: Option<PathBuf>, csv: bool) -> Result<()> {
    let store = SqliteCommandStore::open(&config.storage.database_path)?;
    let today = chrono::Local::now().date_naive();

    let path = if csv {
        let path = out.unwrap_or_else(|| PathBuf::from(csv_file_name(today)));
        let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        write_csv(&store.list_commands()?, file)?;
        path
    } else {
        let path = out.unwrap_or_else(|| PathBuf::from(snapshot_file_name(today)));
        let bytes = store.export_snapshot()?;
        let mut file =
            File::create(&path).with_context(|| format!("create {}", path.display()))?;
        file.write_all(&bytes)?;
        path
    };

    println!("Exported command history to {}", path.display());
    Ok(())
}
