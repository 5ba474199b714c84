//! The translation chat: transcript, input field, session orchestration, and slash commands.
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`transcript`]: the ordered list of rendered entries
//! - [`input`]: draft text, cursor, busy state, and key handling
//! - [`session`]: submission flow and API interaction
//! - [`commands`]: slash command parsing

pub mod commands;
pub mod config;
pub mod input;
pub mod session;
pub mod transcript;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use input::{CursorHint, InputController, Key, KeyAction, KeyPress};
pub use session::{Admission, ChatSession, PendingTurn, SessionStats, SubmitOutcome};
pub use transcript::{AppendEffect, Message, MessageRole, Transcript};
