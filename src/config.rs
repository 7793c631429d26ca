//! Preferences file, credential lookup and effective generation settings.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use gemini_api::{GenerationSettings, UserProfile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const APP_NAME: &str = "gen";
pub const CONFIG_FILE: &str = "config";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const PRO_MODEL: &str = "gemini-2.5-pro-preview-03-25";
pub const FLASH_MODEL: &str = "gemini-2.5-flash-preview-04-17";

pub const DEFAULT_MAX_TOKENS: u32 = 10_000;
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_TOP_P: f64 = 0.2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read the API key from the {var} environment variable")]
    MissingApiKey { var: &'static str },

    #[error("unable to locate the home directory; pass --app-dir")]
    NoHomeDir,

    #[error("unable to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to encode config file {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to read interactive input: {0}")]
    Input(#[source] io::Error),
}

impl ConfigError {
    fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSection {
    pub name: String,
    pub location: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub response_style: String,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            response_style: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Contents of `<app_dir>/config`. The API key is never stored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub user: UserSection,
    pub preferences: Preferences,
}

/// Per-invocation overrides taken from the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub model: Option<String>,
    pub flash: bool,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub system_prompt: Option<String>,
}

pub fn default_app_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(format!(".{APP_NAME}")))
        .ok_or(ConfigError::NoHomeDir)
}

pub fn config_path(app_dir: &Path) -> PathBuf {
    app_dir.join(CONFIG_FILE)
}

pub fn default_system_prompt() -> String {
    format!(
        "You are a command line assistant utility named '{APP_NAME}' running in a terminal on the OS '{}'",
        env::consts::OS
    )
}

/// Reads the API key from the environment.
pub fn api_key_from_env() -> Result<String, ConfigError> {
    api_key_from(env::var(API_KEY_ENV).ok())
}

pub fn api_key_from(value: Option<String>) -> Result<String, ConfigError> {
    value
        .map(|key| key.trim().to_owned())
        .filter(|key| !key.is_empty())
        .ok_or(ConfigError::MissingApiKey { var: API_KEY_ENV })
}

impl AppConfig {
    /// Loads the config file, creating it with defaults when it is missing or
    /// empty. Unknown fields are ignored.
    pub fn load(app_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_path(app_dir);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(source) if source.kind() == io::ErrorKind::NotFound => String::new(),
            Err(source) => return Err(ConfigError::io("read config file", path, source)),
        };

        if contents.trim().is_empty() {
            let config = Self::default();
            config.save(app_dir)?;
            tracing::debug!(path = %path.display(), "created default config file");
            return Ok(config);
        }

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn save(&self, app_dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(app_dir)
            .map_err(|source| ConfigError::io("create app directory", app_dir, source))?;

        let path = config_path(app_dir);
        let mut encoded = serde_json::to_string_pretty(self).map_err(|source| {
            ConfigError::Encode {
                path: path.clone(),
                source,
            }
        })?;
        encoded.push('\n');

        fs::write(&path, encoded).map_err(|source| ConfigError::io("write config file", path, source))
    }

    /// Resolves the settings for one request: flag, else preference, else
    /// default.
    pub fn generation_settings(&self, overrides: &SettingsOverrides) -> GenerationSettings {
        let model = match (&overrides.model, overrides.flash) {
            (Some(model), _) if !model.trim().is_empty() => model.trim().to_owned(),
            (_, true) => FLASH_MODEL.to_owned(),
            _ => PRO_MODEL.to_owned(),
        };

        let preferences = &self.preferences;
        GenerationSettings {
            model,
            max_tokens: overrides
                .max_tokens
                .or_else(|| non_zero(preferences.max_tokens))
                .unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: overrides
                .temperature
                .or_else(|| non_zero_f64(preferences.temperature))
                .unwrap_or(DEFAULT_TEMPERATURE),
            top_p: overrides
                .top_p
                .or_else(|| non_zero_f64(preferences.top_p))
                .unwrap_or(DEFAULT_TOP_P),
            system_prompt: overrides
                .system_prompt
                .clone()
                .unwrap_or_else(default_system_prompt),
            response_style: preferences.response_style.clone(),
            user: UserProfile {
                name: self.user.name.clone(),
                location: self.user.location.clone(),
                description: self.user.description.clone(),
            },
        }
    }
}

fn non_zero(value: u32) -> Option<u32> {
    (value > 0).then_some(value)
}

fn non_zero_f64(value: f64) -> Option<f64> {
    (value > 0.0).then_some(value)
}
