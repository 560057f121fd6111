use reqwest::Url;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Debug)]
pub struct Config {
    pub gemini_api_key: SecretString,
    pub model: String,
    pub base_url: String,
    /// An `EnvFilter` directive string such as `info` or `study_core=debug`.
    pub log_filter: String,
    /// Invalid optional values that were replaced by their defaults. Logged
    /// once the subscriber is up.
    pub warnings: Vec<ConfigError>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// `GEMINI_API_KEY` is the only required variable and the only one whose
    /// absence is an error. Invalid optional values fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingVar("GEMINI_API_KEY".to_string()))?;

        let mut warnings = Vec::new();

        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url = match std::env::var("GEMINI_BASE_URL") {
            Ok(raw) => match Url::parse(&raw) {
                Ok(_) => raw,
                Err(e) => {
                    warnings.push(ConfigError::InvalidValue(
                        "GEMINI_BASE_URL".to_string(),
                        format!("{e}; using {DEFAULT_BASE_URL}"),
                    ));
                    DEFAULT_BASE_URL.to_string()
                }
            },
            Err(_) => DEFAULT_BASE_URL.to_string(),
        };

        let log_filter = match std::env::var("RUST_LOG") {
            Ok(raw) => match EnvFilter::try_new(&raw) {
                Ok(_) => raw,
                Err(e) => {
                    warnings.push(ConfigError::InvalidValue(
                        "RUST_LOG".to_string(),
                        format!("'{raw}' is not a valid filter ({e}); using {DEFAULT_LOG_FILTER}"),
                    ));
                    DEFAULT_LOG_FILTER.to_string()
                }
            },
            Err(_) => DEFAULT_LOG_FILTER.to_string(),
        };

        Ok(Self {
            gemini_api_key,
            model,
            base_url,
            log_filter,
            warnings,
        })
    }
}
