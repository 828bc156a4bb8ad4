//! Runtime configuration resolved from the environment and CLI arguments.

use std::env;
use std::path::PathBuf;

use crate::cli::Args;

/// Environment variable holding the inference API credential.
pub const API_KEY_VAR: &str = "API_KEY";

/// Environment variable overriding the endpoint base URL.
pub const API_BASE_VAR: &str = "GEMINI_API_BASE";

/// Environment variable holding the log filter directive.
pub const LOG_FILTER_VAR: &str = "IMAGE_ANALYZER_LOG";

/// Default endpoint base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Generation temperature, biased toward literal output.
pub const TEMPERATURE: f32 = 0.3;

/// Default log file name, created in the system temp directory.
const DEFAULT_LOG_FILE: &str = "image-analyzer.log";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// API credential. `None` is reported when a request is attempted.
    pub api_key: Option<String>,
    /// Endpoint base URL, without trailing slash.
    pub api_base: String,
    /// Model identifier.
    pub model: String,
    /// Generation temperature.
    pub temperature: f32,
    /// Root directory the image picker searches.
    pub picker_root: PathBuf,
    /// Log file path.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: TEMPERATURE,
            picker_root: PathBuf::from("."),
            log_file: env::temp_dir().join(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Builds the configuration from the process environment and `args`.
    ///
    /// Empty or whitespace-only environment values count as unset.
    #[must_use]
    pub fn resolve(args: &Args) -> Self {
        let defaults = Self::default();
        Self {
            api_key: non_empty_env(API_KEY_VAR),
            api_base: non_empty_env(API_BASE_VAR)
                .map_or(defaults.api_base, |base| {
                    base.trim_end_matches('/').to_string()
                }),
            model: args
                .model
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map_or(defaults.model, str::to_string),
            temperature: TEMPERATURE,
            picker_root: args.dir.clone().unwrap_or(defaults.picker_root),
            log_file: args.log_file.clone().unwrap_or(defaults.log_file),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
