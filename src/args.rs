use std::path::PathBuf;

use clap::Parser;
use gemini_api::GeminiApiConfig;

use crate::config::{SettingsOverrides, APP_NAME};

/// Converse with Gemini from the terminal. Each prompt continues the active
/// session.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = APP_NAME)]
#[command(version)]
#[command(about = "Converse with Gemini from the terminal", long_about = None)]
pub struct Cli {
    /// The prompt to send
    pub prompt: Option<String>,

    /// Suppress activity indicators so stdout can be piped when scripting
    #[arg(short, long)]
    pub script: bool,

    /// Disable grounding with search
    #[arg(long)]
    pub no_grounding: bool,

    /// Required response format: `[]name:type:description|name:type|...` or a
    /// JSON schema. Takes precedence over grounding
    #[arg(long, value_name = "DEFINITION")]
    pub schema: Option<String>,

    /// Enable debug logging on stderr
    #[arg(long)]
    pub debug: bool,

    /// Print request statistics as JSON on stderr
    #[arg(long)]
    pub stats: bool,

    /// Location of the app directory (default: ~/.gen)
    #[arg(long, value_name = "DIR")]
    pub app_dir: Option<PathBuf>,

    /// Interactively set user details and preferences
    #[arg(long)]
    pub config: bool,

    /// The specific model to use
    #[arg(long)]
    pub model: Option<String>,

    /// Use the cheaper flash model instead of the pro model
    #[arg(long)]
    pub flash: bool,

    /// Maximum number of tokens in a response
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_tokens: Option<u32>,

    /// Temperature setting for the model
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Top-p setting for the model
    #[arg(long)]
    pub top_p: Option<f64>,

    /// Base URL of the generation API
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// URL that starts file uploads
    #[arg(long, value_name = "URL")]
    pub upload_url: Option<String>,

    /// Base system prompt
    #[arg(long)]
    pub system_prompt: Option<String>,

    /// Comma separated list of files to attach to the prompt
    #[arg(short, long, value_delimiter = ',', value_name = "FILES")]
    pub files: Vec<String>,

    /// Save the current session and start a new one
    #[arg(short, long = "new")]
    pub new_session: bool,

    /// List all sessions by id
    #[arg(short, long)]
    pub list: bool,

    /// Restore the session with this id
    #[arg(short, long, value_name = "ID")]
    pub restore: Option<usize>,

    /// Delete the session with this id
    #[arg(short, long, value_name = "ID")]
    pub delete: Option<usize>,

    /// Delete all session data
    #[arg(long)]
    pub delete_all: bool,
}

/// What one invocation does, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Configure,
    Restore(usize),
    Delete(usize),
    DeleteAll,
    List,
    Prompt,
}

impl Cli {
    #[must_use]
    pub fn command(&self) -> Command {
        if self.config {
            Command::Configure
        } else if let Some(id) = self.restore {
            Command::Restore(id)
        } else if let Some(id) = self.delete {
            Command::Delete(id)
        } else if self.delete_all {
            Command::DeleteAll
        } else if self.list {
            Command::List
        } else {
            Command::Prompt
        }
    }

    /// Attachment paths, trimmed, with empty entries dropped.
    #[must_use]
    pub fn attachments(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .map(|file| file.trim())
            .filter(|file| !file.is_empty())
            .map(PathBuf::from)
            .collect()
    }

    #[must_use]
    pub fn settings_overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            model: self.model.clone(),
            flash: self.flash,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            system_prompt: self.system_prompt.clone(),
        }
    }

    #[must_use]
    pub fn api_config(&self, api_key: String) -> GeminiApiConfig {
        let mut config = GeminiApiConfig::new(api_key);
        if let Some(api_url) = &self.api_url {
            config = config.with_api_url(api_url);
        }
        if let Some(upload_url) = &self.upload_url {
            config = config.with_upload_url(upload_url);
        }
        config
    }
}
