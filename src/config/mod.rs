use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;
pub const DEFAULT_OUTPUT_PATH: &str = "output.json";
pub const DEFAULT_ZONE_CODES: [&str; 3] = ["UNNT", "UNKL", "UIII"];

/// Legacy variable names the feed job has always been configured with.
/// They override everything else, including `APP__FEED__*`.
const LEGACY_ENV_OVERRIDES: [(&str, &str); 4] = [
    ("feed.url", "XML_DATA_URL"),
    ("feed.use_proxy", "USE_PROXY"),
    ("feed.http_proxy", "HTTP_PROXY"),
    ("feed.https_proxy", "HTTPS_PROXY"),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("XML_DATA_URL is not set")]
    MissingUrl,

    #[error("Feed timeout must be greater than zero")]
    InvalidTimeout,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub use_proxy: Option<String>,
    #[serde(default)]
    pub http_proxy: Option<String>,
    #[serde(default)]
    pub https_proxy: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_zone_codes")]
    pub zone_codes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

/// How the feed request reaches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyMode {
    Direct,
    Proxied { http: String, https: String },
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_zone_codes() -> Vec<String> {
    DEFAULT_ZONE_CODES.iter().map(|c| c.to_string()).collect()
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: None,
            use_proxy: None,
            http_proxy: None,
            https_proxy: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            zone_codes: default_zone_codes(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl FeedConfig {
    pub fn url(&self) -> Option<&str> {
        non_empty(&self.url)
    }

    /// `USE_PROXY` counts as enabled only for `true`, `1` or `yes`.
    pub fn proxy_enabled(&self) -> bool {
        non_empty(&self.use_proxy)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false)
    }

    pub fn proxy_mode(&self) -> ProxyMode {
        if !self.proxy_enabled() {
            return ProxyMode::Direct;
        }

        match (non_empty(&self.http_proxy), non_empty(&self.https_proxy)) {
            (Some(http), Some(https)) => ProxyMode::Proxied {
                http: http.to_string(),
                https: https.to_string(),
            },
            (Some(http), None) => ProxyMode::Proxied {
                http: http.to_string(),
                https: http.to_string(),
            },
            _ => {
                warn!("USE_PROXY is enabled but HTTP_PROXY is not set, using a direct connection");
                ProxyMode::Direct
            }
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
        Self::load_from(PathBuf::from(config_dir), |name| std::env::var(name).ok())
    }

    /// Builds the layered configuration. `lookup` resolves the legacy
    /// variable names so callers can substitute the process environment.
    pub fn load_from<F>(config_dir: PathBuf, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .add_source(config::File::from(config_dir.join("default.toml")).required(false))
            .add_source(config::File::from(config_dir.join("local.toml")).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        for (key, var) in LEGACY_ENV_OVERRIDES {
            let value = lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            builder = builder.set_override_option(key, value)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.url().is_none() {
            return Err(ConfigError::MissingUrl);
        }
        if self.feed.timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }
}
