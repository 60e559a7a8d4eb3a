// Command relay - lets trusted senders make the bot speak
//
// A private message whose body starts with the command prefix ("!say " by
// default) is relayed: the rest of the body is sent to the server as the
// bot's own chat line. Only allow-listed senders may do this, and outbound
// text may not contain control characters or the '|' separator the chat
// bridge uses between fields.

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::parser::ParsedMessage;
use crate::util::eq_ignore_case;
use std::sync::Arc;

/// Separator used by the chat bridge between fields
const FIELD_SEPARATOR: char = '|';

/// Where relayed text goes
///
/// Implementations must not block for long: the ingest loop calls `send`
/// inline for every relayed command.
pub trait OutboundSession: Send + Sync {
    /// Name for logging
    fn name(&self) -> &'static str;

    /// Send one line of chat as the bot
    fn send(&self, text: &str) -> anyhow::Result<()>;
}

impl<T: OutboundSession + ?Sized> OutboundSession for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn send(&self, text: &str) -> anyhow::Result<()> {
        (**self).send(text)
    }
}

/// Session that only logs what would be sent
///
/// Used when no live game connection is attached (e.g. replaying a log file).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSession;

impl OutboundSession for TracingSession {
    fn name(&self) -> &'static str {
        "tracing"
    }

    fn send(&self, text: &str) -> anyhow::Result<()> {
        tracing::info!(text = %text, "Relay (dry run)");
        Ok(())
    }
}

/// Reject text that could break out of a single chat line
pub fn validate_outbound(text: &str) -> Result<&str, RelayError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(RelayError::EmptyCommand);
    }
    if let Some(character) = text
        .chars()
        .find(|c| c.is_control() || *c == FIELD_SEPARATOR)
    {
        return Err(RelayError::ForbiddenCharacter { character });
    }
    Ok(text)
}

/// Forwards `!say` commands from allow-listed senders
#[derive(Debug, Clone)]
pub struct CommandRelay {
    enabled: bool,
    allowed_senders: Vec<String>,
    command_prefix: String,
}

impl CommandRelay {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            enabled: config.enabled,
            allowed_senders: config.allowed_senders.clone(),
            command_prefix: config.command_prefix.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_allowed(&self, sender: &str) -> bool {
        self.allowed_senders
            .iter()
            .any(|allowed| eq_ignore_case(allowed, sender))
    }

    /// Command text after the prefix, if the body is a relay command
    pub fn command<'a>(&self, message: &'a ParsedMessage) -> Option<&'a str> {
        if !self.enabled || self.command_prefix.is_empty() {
            return None;
        }
        message.body.strip_prefix(self.command_prefix.as_str())
    }

    /// Relay `message` if it is a command
    ///
    /// Returns `Ok(None)` for ordinary messages and `Ok(Some(text))` with the
    /// text that was sent.
    pub fn relay(
        &self,
        message: &ParsedMessage,
        session: &dyn OutboundSession,
    ) -> Result<Option<String>, RelayError> {
        let Some(command) = self.command(message) else {
            return Ok(None);
        };

        if !self.is_allowed(&message.sender) {
            return Err(RelayError::Unauthorized {
                sender: message.sender.clone(),
            });
        }

        let text = validate_outbound(command)?;
        session
            .send(text)
            .map_err(|e| RelayError::Session(format!("{:#}", e)))?;

        tracing::debug!(session = session.name(), sender = %message.sender, "Command relayed");
        Ok(Some(text.to_string()))
    }
}
