use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use confidant_assistants::{OpenAIConfig, PollConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub assistants: AssistantsConfig,
    pub logging: LoggingConfig,

    // Secrets and identifiers (from ENV only)
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub assistant_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Hard cap on a single request, including run polling
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantsConfig {
    pub base_url: String,
    /// System instructions injected on every run
    pub instructions: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    #[serde(default = "default_history_page_size")]
    pub history_page_size: u32,
    /// Limit for each individual call to the remote API
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_history_page_size() -> u32 {
    100
}

fn default_http_timeout_secs() -> u64 {
    30
}

impl AssistantsConfig {
    pub fn poll_config(&self) -> PollConfig {
        PollConfig::new(
            Duration::from_millis(self.poll_interval_ms),
            self.max_poll_attempts,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set, defaults to "dev")
    /// 3. Environment variables prefixed with CONFIDANT_, nested with "__"
    ///    (e.g. CONFIDANT_SERVER__PORT=8080)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            // 1. Load default config
            .add_source(File::with_name("config/default").required(false))
            // 2. Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // 3. Environment variables override everything
            .add_source(
                Environment::with_prefix("CONFIDANT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;

        let mut cfg: Config = config.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.openai_api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ConfigError::Message("OPENAI_API_KEY environment variable is required".to_string())
        })?;
        // Checked lazily: a missing assistant only fails when a run is started
        cfg.assistant_id = std::env::var("OPENAI_ASSISTANT_ID")
            .ok()
            .filter(|id| !id.trim().is_empty());
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            cfg.assistants.base_url = base_url;
        }

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    pub fn openai(&self) -> OpenAIConfig {
        OpenAIConfig::new(self.openai_api_key.clone())
            .with_base_url(&self.assistants.base_url)
            .with_timeout_secs(self.assistants.http_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Polling settings, with a deadline that leaves part of the request
    /// timeout for cancelling the run and answering with a structured error
    pub fn poll_config(&self) -> PollConfig {
        self.assistants
            .poll_config()
            .with_deadline(self.request_timeout() * 9 / 10)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
