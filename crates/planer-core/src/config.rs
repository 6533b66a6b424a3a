//! Process-wide settings resolved once at start-up.
//!
//! Values come from the environment, after a `.env` file in the working
//! directory (if any) has been loaded into it. Keys are case-insensitive in the
//! sense that both `API_KEY` and `api_key` are accepted.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;

use crate::error::ConfigError;

/// Default DeepSeek endpoint (OpenAI-compatible).
pub const DEFAULT_DEEPSEEK_API_BASE: &str = "https://api.deepseek.com";

/// Default Google Generative Language endpoint.
pub const DEFAULT_GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Backend platform hosting the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    DeepSeek,
    Google,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::DeepSeek => "deepseek",
            Platform::Google => "google",
        }
    }

    /// Endpoint used when no base URL is configured.
    pub fn default_api_base(&self) -> &'static str {
        match self {
            Platform::DeepSeek => DEFAULT_DEEPSEEK_API_BASE,
            Platform::Google => DEFAULT_GOOGLE_API_BASE,
        }
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deepseek" => Ok(Platform::DeepSeek),
            "google" => Ok(Platform::Google),
            _ => Err(ConfigError::UnsupportedPlatform(s.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application settings.
#[derive(Clone)]
pub struct Settings {
    pub platform: Platform,
    pub model_name: String,
    pub api_key: String,
    pub api_base: String,
    pub log_level: LevelFilter,
    pub log_dir: PathBuf,
    pub log_to_file: bool,
    pub output_dir: PathBuf,
    pub prompt_dir: PathBuf,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("platform", &self.platform)
            .field("model_name", &self.model_name)
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .field("log_to_file", &self.log_to_file)
            .field("output_dir", &self.output_dir)
            .field("prompt_dir", &self.prompt_dir)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Settings {
    /// Load `.env` (if present) and resolve settings from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(env_value)
    }

    /// Template directory from the environment, without requiring the rest of
    /// the settings to be valid.
    pub fn prompt_dir_from_env() -> PathBuf {
        dotenv::dotenv().ok();
        env_value("PROMPT_DIR")
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from("prompts"), PathBuf::from)
    }

    /// Resolve settings through `lookup`, which maps an upper-case key to its
    /// value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let platform = match get("PLATFORM") {
            Some(value) => value.parse()?,
            None => Platform::DeepSeek,
        };
        let model_name = get("MODEL_NAME").unwrap_or_else(|| "deepseek-chat".to_string());
        let api_key = get("API_KEY").ok_or_else(|| ConfigError::Missing {
            key: "API_KEY".to_string(),
        })?;
        let api_base = match platform {
            Platform::DeepSeek => get("DEEPSEEK_API_BASE").or_else(|| get("API_BASE")),
            Platform::Google => get("API_BASE"),
        }
        .unwrap_or_else(|| platform.default_api_base().to_string());

        let log_level = match get("LOG_LEVEL") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "LOG_LEVEL".to_string(),
                value: value.clone(),
                reason: "expected one of off, error, warn, info, debug, trace".to_string(),
            })?,
            None => LevelFilter::Info,
        };
        let log_to_file = match get("LOG_TO_FILE") {
            Some(value) => parse_bool("LOG_TO_FILE", &value)?,
            None => true,
        };
        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(value) => Some(Duration::from_secs(value.trim().parse().map_err(|_| {
                ConfigError::Invalid {
                    key: "REQUEST_TIMEOUT_SECS".to_string(),
                    value: value.clone(),
                    reason: "expected a whole number of seconds".to_string(),
                }
            })?)),
            None => None,
        };

        Ok(Self {
            platform,
            model_name,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            log_level,
            log_dir: get("LOG_DIR").map_or_else(|| PathBuf::from("logs"), PathBuf::from),
            log_to_file,
            output_dir: get("OUTPUT_DIR").map_or_else(|| PathBuf::from("plans"), PathBuf::from),
            prompt_dir: get("PROMPT_DIR").map_or_else(|| PathBuf::from("prompts"), PathBuf::from),
            request_timeout,
        })
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .or_else(|_| std::env::var(key.to_lowercase()))
        .ok()
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
