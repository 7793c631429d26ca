//! `gen`: a conversational command-line client for the Gemini API.
//!
//! Each invocation either manages the session directory (list, restore,
//! delete) or sends one prompt, replaying the active session as history and
//! appending the new exchange once a usable response arrives.
//!
//! The protocol lives in `gemini_api`, persistence in `session_store` and the
//! schema notation in `response_schema`; this crate wires them to the command
//! line, the preferences file and the terminal.

pub mod app;
pub mod args;
pub mod chat;
pub mod config;
pub mod configure;
pub mod error;
pub mod logging;
pub mod sessions;
pub mod spinner;

pub use app::run;
pub use args::{Cli, Command};
pub use chat::{run_turn, BlockingGenerator, Generator, Stats, TurnInput};
pub use config::{AppConfig, ConfigError, SettingsOverrides};
pub use error::AppError;
