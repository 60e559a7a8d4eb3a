// Events that flow from the ingest loop to storage and stdout
//
// Every chat line the listener sees ends up as at most one event, plus a
// `Relayed` event when a private message carried a relay command. Using an
// enum allows pattern matching and ensures type-safe communication between
// async tasks.

use crate::parser::{ParsedMessage, Strategy};
use crate::triggers::TriggerMatch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Main event type that flows through the application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")] // {"type": "direct_message", ...}
pub enum ChatEvent {
    /// A private message was recognised
    DirectMessage {
        id: String,
        timestamp: DateTime<Utc>,
        sender: String,
        receiver: Option<String>,
        body: String,
        strategy: Strategy,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trigger: Option<TriggerMatch>,
    },

    /// A chat line that was not a private message (only with `record_ignored`)
    Ignored {
        timestamp: DateTime<Utc>,
        reason: String,
        fragment_count: Option<usize>,
    },

    /// A relay command was forwarded to the server
    Relayed {
        message_id: String,
        timestamp: DateTime<Utc>,
        sender: String,
        text: String,
    },

    /// Something went wrong handling a line
    Error {
        timestamp: DateTime<Utc>,
        message: String,
        context: Option<String>,
    },
}

impl ChatEvent {
    /// Wrap a parsed message
    pub fn direct_message(message: ParsedMessage, trigger: Option<TriggerMatch>) -> Self {
        ChatEvent::DirectMessage {
            id: generate_id(),
            timestamp: Utc::now(),
            sender: message.sender,
            receiver: message.receiver,
            body: message.body,
            strategy: message.strategy,
            trigger,
        }
    }

    pub fn error(message: impl Into<String>, context: Option<String>) -> Self {
        ChatEvent::Error {
            timestamp: Utc::now(),
            message: message.into(),
            context,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ChatEvent::DirectMessage { timestamp, .. }
            | ChatEvent::Ignored { timestamp, .. }
            | ChatEvent::Relayed { timestamp, .. }
            | ChatEvent::Error { timestamp, .. } => *timestamp,
        }
    }

    /// Id of a direct message, used to correlate follow-up events
    pub fn id(&self) -> Option<&str> {
        match self {
            ChatEvent::DirectMessage { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChatEvent::DirectMessage { .. } => "direct_message",
            ChatEvent::Ignored { .. } => "ignored",
            ChatEvent::Relayed { .. } => "relayed",
            ChatEvent::Error { .. } => "error",
        }
    }
}

/// Counters for one ingest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub lines: usize,
    pub blank_lines: usize,
    pub invalid_lines: usize,
    pub direct_messages: usize,
    pub ignored: usize,
    pub triggered: usize,
    pub relayed: usize,
    pub relay_failures: usize,
}

impl Stats {
    /// Share of non-blank lines that were private messages (0-100)
    pub fn hit_rate(&self) -> f64 {
        let considered = self.lines - self.blank_lines;
        if considered == 0 {
            0.0
        } else {
            (self.direct_messages as f64 / considered as f64) * 100.0
        }
    }
}

/// Helper to generate unique IDs for correlating messages and relays
pub fn generate_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let count = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", Utc::now().timestamp_millis(), count)
}
