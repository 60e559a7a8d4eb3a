//! Chat ingest loop
//!
//! Reads one JSON chat component per line, runs it through the parser and
//! turns the outcome into [`ChatEvent`]s:
//!
//! ```text
//! line → Parser → ParsedMessage → triggers → relay → events → mpsc
//! ```
//!
//! Lines that are not valid JSON become `Error` events and ingest moves on.
//! Nothing here is fatal except failing to read the input itself.

use crate::config::{Config, Features};
use crate::error::{ConfigError, Rejection, RelayError};
use crate::events::{ChatEvent, Stats};
use crate::parser::{ParsedMessage, Parser, TracingSink};
use crate::relay::{CommandRelay, OutboundSession};
use crate::triggers::TriggerRules;
use crate::util::preview;
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// Longest slice of a bad line quoted in logs and error events
const PREVIEW_CHARS: usize = 120;

/// Turns raw chat lines into events
pub struct Ingest {
    parser: Parser,
    triggers: TriggerRules,
    relay: CommandRelay,
    session: Arc<dyn OutboundSession>,
    bot_name: String,
    record_ignored: bool,
    stats: Stats,
}

impl Ingest {
    pub fn new(
        parser: Parser,
        triggers: TriggerRules,
        relay: CommandRelay,
        session: Arc<dyn OutboundSession>,
        bot_name: impl Into<String>,
    ) -> Self {
        Self {
            parser,
            triggers,
            relay,
            session,
            bot_name: bot_name.into(),
            record_ignored: false,
            stats: Stats::default(),
        }
    }

    /// Build every stage from configuration, reporting parser diagnostics to `tracing`
    pub fn from_config(config: &Config, session: Arc<dyn OutboundSession>) -> Result<Self, ConfigError> {
        let parser = Parser::new(config.parser.clone())?.with_sink(TracingSink);
        let triggers = TriggerRules::from_config(&config.triggers)?;
        let relay = CommandRelay::new(&config.relay);

        Ok(Self::new(parser, triggers, relay, session, config.bot_name.clone())
            .with_features(&config.features))
    }

    pub fn with_features(mut self, features: &Features) -> Self {
        self.record_ignored = features.record_ignored;
        self
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Handle one raw line, returning the events it produced
    pub fn handle_line(&mut self, line: &str) -> Vec<ChatEvent> {
        self.stats.lines += 1;
        let line = line.trim();
        if line.is_empty() {
            self.stats.blank_lines += 1;
            return Vec::new();
        }

        match self.parser.try_parse_str(line) {
            Ok(message) => self.on_message(message),
            Err(Rejection::InvalidJson(error)) => {
                self.stats.invalid_lines += 1;
                tracing::warn!(line = self.stats.lines, "Skipping invalid chat line: {}", error);
                vec![ChatEvent::error(
                    format!("invalid JSON: {}", error),
                    Some(preview(line, PREVIEW_CHARS).into_owned()),
                )]
            }
            Err(rejection) => self.on_rejection(rejection),
        }
    }

    fn on_message(&mut self, message: ParsedMessage) -> Vec<ChatEvent> {
        self.stats.direct_messages += 1;

        let receiver = message.receiver.as_deref().unwrap_or(&self.bot_name);
        tracing::info!(
            strategy = %message.strategy,
            "From: {} → {} | {}",
            message.sender,
            receiver,
            message.body
        );

        let trigger = self.triggers.evaluate(&message.body);
        if let Some(trigger) = &trigger {
            self.stats.triggered += 1;
            tracing::debug!(pattern = %trigger.pattern, argument = ?trigger.argument, "Trigger matched");
        }

        let relayed = self.try_relay(&message);
        let sender = message.sender.clone();
        let mut events = vec![ChatEvent::direct_message(message, trigger)];

        if let Some(result) = relayed {
            let message_id = events[0].id().unwrap_or_default().to_string();
            events.push(match result {
                Ok(text) => ChatEvent::Relayed {
                    message_id,
                    timestamp: Utc::now(),
                    sender,
                    text,
                },
                Err(e) => ChatEvent::error(format!("relay refused: {}", e), Some(message_id)),
            });
        }
        events
    }

    /// `None` when the message is not a relay command
    fn try_relay(&mut self, message: &ParsedMessage) -> Option<Result<String, RelayError>> {
        self.relay.command(message)?;

        match self.relay.relay(message, self.session.as_ref()) {
            Ok(Some(text)) => {
                self.stats.relayed += 1;
                tracing::info!(sender = %message.sender, "Relayed: {}", text);
                Some(Ok(text))
            }
            Ok(None) => None,
            Err(e) => {
                self.stats.relay_failures += 1;
                tracing::warn!(sender = %message.sender, "Relay refused: {}", e);
                Some(Err(e))
            }
        }
    }

    fn on_rejection(&mut self, rejection: Rejection) -> Vec<ChatEvent> {
        self.stats.ignored += 1;
        if !self.record_ignored {
            return Vec::new();
        }

        let fragment_count = match &rejection {
            Rejection::NoSignature { fragment_count } => Some(*fragment_count),
            Rejection::EmptyTree => Some(0),
            _ => None,
        };
        vec![ChatEvent::Ignored {
            timestamp: Utc::now(),
            reason: rejection.to_string(),
            fragment_count,
        }]
    }

    /// Read lines until EOF, sending every event to `tx`
    ///
    /// Stops early (without error) if the receiving side goes away.
    pub async fn run<R>(&mut self, reader: R, tx: &mpsc::Sender<ChatEvent>) -> Result<Stats>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await.context("Failed to read chat input")? {
            for event in self.handle_line(&line) {
                if tx.send(event).await.is_err() {
                    tracing::warn!("Event channel closed, stopping ingest");
                    return Ok(self.stats.clone());
                }
            }
        }

        tracing::debug!(lines = self.stats.lines, "Chat input exhausted");
        Ok(self.stats.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParserConfig, RelayConfig, TriggersConfig};
    use crate::parser::Strategy;
    use crate::relay::TracingSession;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<String>>,
    }

    impl OutboundSession for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn send(&self, text: &str) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn config() -> Config {
        Config {
            parser: ParserConfig::default().with_aliases(["Zarathale"]),
            relay: RelayConfig {
                enabled: true,
                allowed_senders: vec!["Zarathale".to_string()],
                ..RelayConfig::default()
            },
            triggers: TriggersConfig::default(),
            ..Config::default()
        }
    }

    fn ingest(session: Arc<dyn OutboundSession>) -> Ingest {
        Ingest::from_config(&config(), session).unwrap()
    }

    fn bracket_line(sender: &str, body: &str) -> String {
        json!({"text": "", "extra": ["[", "PM", "] ", "[", sender, " -> ", "ZaraSprite", "] ", body]})
            .to_string()
    }

    #[test]
    fn test_direct_message_event() {
        let mut ingest = ingest(Arc::new(TracingSession));
        let events = ingest.handle_line(&bracket_line("Alice", "hello flpm_0a1b there"));

        assert_eq!(events.len(), 1);
        match &events[0] {
            ChatEvent::DirectMessage {
                sender,
                receiver,
                body,
                strategy,
                trigger,
                ..
            } => {
                assert_eq!(sender, "Alice");
                assert_eq!(receiver.as_deref(), Some("ZaraSprite"));
                assert_eq!(body, "hello there");
                assert_eq!(*strategy, Strategy::BracketForm);
                assert!(trigger.is_none());
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(ingest.stats().direct_messages, 1);
    }

    #[test]
    fn test_trigger_is_attached() {
        let mut ingest = ingest(Arc::new(TracingSession));
        let events = ingest.handle_line(&bracket_line("Alice", "/zarasprite wave"));

        let ChatEvent::DirectMessage { trigger, .. } = &events[0] else {
            panic!("expected a direct message");
        };
        assert_eq!(
            trigger.as_ref().and_then(|t| t.argument.as_deref()),
            Some("wave")
        );
        assert_eq!(ingest.stats().triggered, 1);
    }

    #[test]
    fn test_plain_chat_produces_nothing() {
        let mut ingest = ingest(Arc::new(TracingSession));
        let line = json!({"text": "<Bob> ", "extra": ["anyone around?"]}).to_string();

        assert!(ingest.handle_line(&line).is_empty());
        assert!(ingest.handle_line("   ").is_empty());
        assert_eq!(ingest.stats().ignored, 1);
        assert_eq!(ingest.stats().blank_lines, 1);
    }

    #[test]
    fn test_ignored_events_when_recorded() {
        let features = Features {
            record_ignored: true,
            ..Features::default()
        };
        let mut ingest = ingest(Arc::new(TracingSession)).with_features(&features);
        let events = ingest.handle_line(&json!(["just", "chatting"]).to_string());

        assert_eq!(
            events,
            vec![ChatEvent::Ignored {
                timestamp: events[0].timestamp(),
                reason: Rejection::NoSignature { fragment_count: 2 }.to_string(),
                fragment_count: Some(2),
            }]
        );
    }

    #[test]
    fn test_invalid_json_is_an_error_event() {
        let mut ingest = ingest(Arc::new(TracingSession));
        let events = ingest.handle_line("{\"text\": ");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), "error");
        assert_eq!(ingest.stats().invalid_lines, 1);
    }

    #[test]
    fn test_relay_command_from_allowed_sender() {
        let session = Arc::new(Recorder::default());
        let mut ingest = ingest(session.clone());
        let events = ingest.handle_line(&bracket_line("Zarathale", "!say good morning"));

        assert_eq!(events.len(), 2);
        let (ChatEvent::DirectMessage { id, .. }, ChatEvent::Relayed { message_id, text, .. }) =
            (&events[0], &events[1])
        else {
            panic!("unexpected events {:?}", events);
        };
        assert_eq!(id, message_id);
        assert_eq!(text, "good morning");
        assert_eq!(*session.sent.lock().unwrap(), vec!["good morning"]);
    }

    #[test]
    fn test_relay_refused_for_stranger() {
        let session = Arc::new(Recorder::default());
        let mut ingest = ingest(session.clone());
        let events = ingest.handle_line(&bracket_line("Mallory", "!say /op Mallory"));

        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind(), "error");
        assert!(session.sent.lock().unwrap().is_empty());
        assert_eq!(ingest.stats().relay_failures, 1);
    }

    #[tokio::test]
    async fn test_run_reads_until_eof() {
        let input = format!(
            "{}\nnot json\n\n{}\n",
            bracket_line("Alice", "one"),
            bracket_line("Bob", "two")
        );
        let (tx, mut rx) = mpsc::channel(16);
        let mut ingest = ingest(Arc::new(TracingSession));

        let stats = ingest.run(input.as_bytes(), &tx).await.unwrap();
        drop(tx);

        let mut kinds = Vec::new();
        while let Some(event) = rx.recv().await {
            kinds.push(event.kind());
        }
        assert_eq!(kinds, vec!["direct_message", "error", "direct_message"]);
        assert_eq!(stats.lines, 4);
        assert_eq!(stats.direct_messages, 2);
        assert_eq!(stats.invalid_lines, 1);
    }

    #[tokio::test]
    async fn test_run_stops_when_receiver_drops() {
        let input = format!("{}\n{}\n", bracket_line("Alice", "one"), bracket_line("Bob", "two"));
        let (tx, rx) = mpsc::channel(16);
        drop(rx);

        let mut ingest = ingest(Arc::new(TracingSession));
        let stats = ingest.run(input.as_bytes(), &tx).await.unwrap();
        assert_eq!(stats.lines, 1);
    }
}
