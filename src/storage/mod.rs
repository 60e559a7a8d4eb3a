// Storage module - appends chat events to disk in JSON Lines format
//
// One JSON object per line, so session logs can be tailed, grepped, or fed
// to jq while the listener is still running.
//
// Each session gets its own log file: zarasprite-YYYYMMDD-HHMMSS-XXXX.jsonl
// Example: jq 'select(.type == "direct_message") | .body' logs/zarasprite-20251127-143022-a7b3.jsonl

use crate::events::ChatEvent;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Handles writing events to JSON Lines files
pub struct Storage {
    log_dir: PathBuf,
    session_id: String,
    event_rx: mpsc::Receiver<ChatEvent>,
}

impl Storage {
    /// Create a new storage handler
    /// Each session gets its own log file based on session_id
    pub fn new(
        log_dir: PathBuf,
        session_id: String,
        event_rx: mpsc::Receiver<ChatEvent>,
    ) -> Result<Self> {
        fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

        Ok(Self {
            log_dir,
            session_id,
            event_rx,
        })
    }

    /// Path to this session's log file
    pub fn log_file_path(&self) -> PathBuf {
        session_log_path(&self.log_dir, &self.session_id)
    }

    /// Run the storage loop, writing events to disk as they arrive
    ///
    /// Runs in its own task until every sender has been dropped.
    pub async fn run(mut self) -> Result<usize> {
        tracing::info!("Storage started, session log: {:?}", self.log_file_path());

        let mut written = 0;
        while let Some(event) = self.event_rx.recv().await {
            match self.write_event(&event) {
                Ok(()) => written += 1,
                // Keep going: one bad write should not lose the rest of the session
                Err(e) => tracing::error!(kind = event.kind(), "Failed to write event: {:?}", e),
            }
        }

        tracing::info!(written, "Storage shutting down");
        Ok(written)
    }

    /// Write a single event to the log file
    fn write_event(&self, event: &ChatEvent) -> Result<()> {
        let log_path = self.log_file_path();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .context("Failed to open log file")?;

        let json = serde_json::to_string(event).context("Failed to serialize event")?;
        writeln!(file, "{}", json).context("Failed to write to log file")?;

        // Flush immediately so logs are visible even if process crashes
        file.flush().context("Failed to flush log file")?;

        Ok(())
    }
}

/// Format: <log_dir>/zarasprite-<session_id>.jsonl
pub fn session_log_path(log_dir: &Path, session_id: &str) -> PathBuf {
    log_dir.join(format!("zarasprite-{}.jsonl", session_id))
}

/// Read back every event in a session log
pub fn read_events(path: &Path) -> Result<Vec<ChatEvent>> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open session log {}", path.display()))?;

    BufReader::new(file)
        .lines()
        .enumerate()
        .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
        .map(|(i, line)| {
            let line = line.context("Failed to read session log")?;
            serde_json::from_str(&line)
                .with_context(|| format!("Invalid event on line {}", i + 1))
        })
        .collect()
}
