// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{ExplorerError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub outline: OutlineConfig,
    #[serde(default)]
    pub locator: LocatorConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutlineConfig {
    pub drop_page_title: bool,
    pub skip_fenced_code: bool,
    pub max_level: u8,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LocatorConfig {
    /// Also highlight the block right after the matched run.
    pub extend_highlight: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    pub parallel_requests: usize,
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            drop_page_title: true,
            skip_fenced_code: false,
            max_level: 6,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            parallel_requests: 4,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| ExplorerError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("DOC_EXPLORER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| ExplorerError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ExplorerError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080".to_string(),
                timeout_secs: 30,
                max_retries: 3,
                retry_backoff_ms: default_retry_backoff_ms(),
            },
            outline: OutlineConfig::default(),
            locator: LocatorConfig::default(),
            fetch: FetchConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(ExplorerError::Config(format!(
                "api.base_url must be an http(s) URL, got {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ExplorerError::Config(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.fetch.parallel_requests == 0 {
            return Err(ExplorerError::Config(
                "fetch.parallel_requests must be greater than 0".to_string(),
            ));
        }

        if !(1..=6).contains(&self.outline.max_level) {
            return Err(ExplorerError::Config(format!(
                "outline.max_level must be between 1 and 6, got {}",
                self.outline.max_level
            )));
        }

        Ok(())
    }
}
