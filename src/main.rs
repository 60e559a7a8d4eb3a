// ZaraSprite - private-message listener for game chat
//
// Reads chat components as JSON Lines (stdin, or a capture file with
// `zarasprite parse`), extracts private messages and emits them as events.
//
// Architecture:
// - Ingest: parses each line and produces ChatEvents
// - Dispatcher: echoes events to stdout and forwards them to storage
// - Storage: writes events to JSON Lines files for later analysis
// - Event system: mpsc channels connect all components

use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use zarasprite::cli::{self, Action};
use zarasprite::config::Config;
use zarasprite::events::ChatEvent;
use zarasprite::ingest::Ingest;
use zarasprite::relay::TracingSession;
use zarasprite::storage::Storage;
use zarasprite::{logging, startup};

/// Generate a unique session ID for log file naming
/// Format: YYYYMMDD-HHMMSS-XXXX (timestamp + 4 random hex chars)
fn generate_session_id() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    // Use RandomState to get a random value without adding a dependency
    let random = RandomState::new().build_hasher().finish();
    let short_hash = format!("{:04x}", random & 0xFFFF);

    format!("{}-{}", timestamp, short_hash)
}

/// Fan events out to stdout and the storage task
async fn dispatch_events(
    mut event_rx: mpsc::Receiver<ChatEvent>,
    mut storage_tx: Option<mpsc::Sender<ChatEvent>>,
    echo: bool,
) {
    let mut stdout = tokio::io::stdout();

    while let Some(event) = event_rx.recv().await {
        if echo {
            match serde_json::to_string(&event) {
                Ok(mut line) => {
                    line.push('\n');
                    if let Err(e) = stdout.write_all(line.as_bytes()).await {
                        tracing::warn!("Failed to write event to stdout: {}", e);
                    }
                    let _ = stdout.flush().await;
                }
                Err(e) => tracing::error!("Failed to serialize event: {}", e),
            }
        }

        if let Some(tx) = &storage_tx {
            if tx.send(event).await.is_err() {
                tracing::error!("Storage task stopped, events are no longer persisted");
                storage_tx = None;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config --show, --reset, ...)
    let action = cli::handle_cli();
    if action == Action::Exit {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let mut config = Config::from_env();

    // Replays only write a session log when asked to
    if let Action::Parse { store, .. } = &action {
        config.features.storage = *store;
    }

    // The guard must be kept alive for the duration of the program to ensure logs flush
    let _file_guard = logging::init(&config.logging);

    let session_id = generate_session_id();
    let source = match &action {
        Action::Parse { file, .. } => file.display().to_string(),
        _ => "stdin".to_string(),
    };

    if action == Action::Listen {
        startup::print_startup(&config, &source);
    }
    startup::log_startup(&config, &session_id);

    let mut ingest = Ingest::from_config(&config, Arc::new(TracingSession))
        .context("Invalid configuration")?;

    // Bounded channels: if a consumer falls behind, ingest waits (backpressure)
    let (event_tx, event_rx) = mpsc::channel(1000);

    let (storage_tx, storage_handle) = if config.features.storage {
        let (tx, rx) = mpsc::channel(1000);
        let storage = Storage::new(config.log_dir.clone(), session_id.clone(), rx)?;
        (Some(tx), Some(tokio::spawn(storage.run())))
    } else {
        (None, None)
    };

    let dispatcher = tokio::spawn(dispatch_events(
        event_rx,
        storage_tx,
        config.features.echo,
    ));

    match &action {
        Action::Parse { file, .. } => {
            let input = tokio::fs::File::open(file)
                .await
                .with_context(|| format!("Failed to open capture {}", file.display()))?;
            ingest.run(BufReader::new(input), &event_tx).await?;
        }
        _ => {
            let stdin = BufReader::new(tokio::io::stdin());
            tokio::select! {
                result = ingest.run(stdin, &event_tx) => {
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted, shutting down");
                }
            }
        }
    }

    // Closing the channel lets the dispatcher and storage drain and exit
    drop(event_tx);
    if let Err(e) = dispatcher.await {
        tracing::error!("Event dispatcher failed: {}", e);
    }
    if let Some(handle) = storage_handle {
        match handle.await {
            Ok(Ok(written)) => tracing::debug!(written, "Session log closed"),
            Ok(Err(e)) => tracing::error!("Storage failed: {:#}", e),
            Err(e) => tracing::error!("Storage task panicked: {}", e),
        }
    }

    let stats = ingest.stats();
    tracing::info!(
        lines = stats.lines,
        direct_messages = stats.direct_messages,
        ignored = stats.ignored,
        invalid = stats.invalid_lines,
        triggered = stats.triggered,
        relayed = stats.relayed,
        "Session {} finished ({:.1}% private messages)",
        session_id,
        stats.hit_rate()
    );

    Ok(())
}
