//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::{ClientConfig, Endpoint, Envelope, MODELS_PATH, PREDICTIONS_PATH};
use crate::dashboard::DashboardEndpoints;
use crate::sandbox::SandboxConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub sandbox: SandboxSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Prediction backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_login_path")]
    pub login_path: String,

    #[serde(default = "default_predictions_path")]
    pub predictions_path: String,

    #[serde(default = "default_models_path")]
    pub models_path: String,

    #[serde(default = "default_predictions_envelope")]
    pub predictions_envelope: Envelope,

    #[serde(default = "default_models_envelope")]
    pub models_envelope: Envelope,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    5000 // 5 seconds
}

fn default_login_path() -> String {
    "/google-login".to_string()
}

fn default_predictions_path() -> String {
    PREDICTIONS_PATH.to_string()
}

fn default_models_path() -> String {
    MODELS_PATH.to_string()
}

fn default_predictions_envelope() -> Envelope {
    Envelope::Wrapped
}

fn default_models_envelope() -> Envelope {
    Envelope::Bare
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
            login_path: default_login_path(),
            predictions_path: default_predictions_path(),
            models_path: default_models_path(),
            predictions_envelope: default_predictions_envelope(),
            models_envelope: default_models_envelope(),
        }
    }
}

/// Identity used by the CLI when signing in
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    pub email: Option<String>,
}

/// Poll loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Seconds between polls; 0 polls only on demand
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,
}

fn default_poll_interval() -> u64 {
    30
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_secs > 0).then(|| Duration::from_secs(self.interval_secs))
    }
}

/// Sandbox backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SandboxSettings {
    #[serde(default = "default_sandbox_host")]
    pub host: String,

    #[serde(default = "default_sandbox_port")]
    pub port: u16,

    /// JSON fixtures file; the built-in sample set when absent
    pub fixtures: Option<String>,
}

fn default_sandbox_host() -> String {
    "127.0.0.1".to_string()
}

fn default_sandbox_port() -> u16 {
    8000
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            host: default_sandbox_host(),
            port: default_sandbox_port(),
            fixtures: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("predictdash").join("config.toml")),
            Some(PathBuf::from("./predictdash.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Backend overrides
        if let Some(url) = var("PREDICTDASH_BACKEND_URL") {
            self.backend.base_url = url;
        }

        // Auth overrides
        if let Some(email) = var("PREDICTDASH_EMAIL") {
            self.auth.email = Some(email);
        }

        // Polling overrides
        if let Some(interval) = var("PREDICTDASH_POLL_INTERVAL") {
            match interval.parse() {
                Ok(secs) => self.polling.interval_secs = secs,
                Err(_) => tracing::warn!(value = %interval, "Ignoring invalid PREDICTDASH_POLL_INTERVAL"),
            }
        }

        // Sandbox overrides
        if let Some(host) = var("PREDICTDASH_SANDBOX_HOST") {
            self.sandbox.host = host;
        }
        if let Some(port) = var("PREDICTDASH_SANDBOX_PORT") {
            if let Ok(p) = port.parse() {
                self.sandbox.port = p;
            }
        }

        // Logging overrides
        if let Some(level) = var("PREDICTDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("PREDICTDASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// HTTP client settings for the backend
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.backend.base_url.clone(),
            login_path: self.backend.login_path.clone(),
            request_timeout_ms: self.backend.request_timeout_ms,
        }
    }

    /// The two list endpoints with their configured envelopes
    pub fn endpoints(&self) -> DashboardEndpoints {
        DashboardEndpoints {
            models: Endpoint::new(&self.backend.models_path, self.backend.models_envelope),
            predictions: Endpoint::new(
                &self.backend.predictions_path,
                self.backend.predictions_envelope,
            ),
        }
    }

    pub fn sandbox_config(&self) -> SandboxConfig {
        SandboxConfig::new(&self.sandbox.host, self.sandbox.port)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Predictdash Configuration
#
# Environment variables override these settings:
# - PREDICTDASH_BACKEND_URL
# - PREDICTDASH_EMAIL
# - PREDICTDASH_POLL_INTERVAL
# - PREDICTDASH_SANDBOX_HOST
# - PREDICTDASH_SANDBOX_PORT
# - PREDICTDASH_LOG_LEVEL
# - PREDICTDASH_LOG_FORMAT

[backend]
# Prediction backend base URL
base_url = "http://localhost:8000"

# Request timeout (ms)
request_timeout_ms = 5000

# Email-for-token exchange
login_path = "/google-login"

# List endpoints and how each wraps its payload: "wrapped" or "bare"
predictions_path = "/common/all-predictions"
predictions_envelope = "wrapped"
models_path = "/common/get-all-models-data"
models_envelope = "bare"

[auth]
# Email to sign in with
# email = "you@example.com"

[polling]
# Seconds between polls (0 = only on demand)
interval_secs = 30

[sandbox]
# Local sandbox backend
host = "127.0.0.1"
port = 8000

# JSON fixtures file with "predictions" and "models" arrays
# fixtures = "./fixtures.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
