// ZaraSprite - private-message extraction for game chat
//
// The game server delivers every chat line as a nested JSON "chat component".
// Private messages arrive in one of several visual forms; this crate decodes
// the component, flattens it to styled text fragments, recognises the PM form
// and pulls out sender, receiver and body.
//
// Architecture:
// - component: JSON → ComponentTree decoding
// - parser: flatten → classify → extract → sanitize, behind the `Parser` façade
// - triggers / relay: what to do with a recognised PM
// - ingest: JSON Lines input loop producing `ChatEvent`s
// - storage: per-session JSONL event log
// - Event system: an mpsc channel connects ingest to the outputs

pub mod cli;
pub mod component;
pub mod config;
pub mod error;
pub mod events;
pub mod ingest;
pub mod logging;
pub mod parser;
pub mod relay;
pub mod startup;
pub mod storage;
pub mod triggers;
pub mod util;

pub use component::ComponentTree;
pub use config::{Config, ParserConfig};
pub use error::{ConfigError, Rejection, RelayError, Warning};
pub use parser::{ParsedMessage, Parser, Strategy, TextFragment};
