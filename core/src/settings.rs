use serde::Deserialize;

use crate::error::ConfigError;

pub const ENV_PREFIX: &str = "CINEMA";
pub const DEFAULT_CACHE_LIFETIME_MIN_SECS: u64 = 300;
pub const DEFAULT_CACHE_LIFETIME_MAX_SECS: u64 = 600;

/// Construction-time settings. Never mutated after the client is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub api_host: String,
    pub api_client_token: String,
    pub cache_lifetime_min_secs: u64,
    pub cache_lifetime_max_secs: u64,
}

impl ClientConfig {
    pub fn new(api_host: impl Into<String>, api_client_token: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
            api_client_token: api_client_token.into(),
            cache_lifetime_min_secs: DEFAULT_CACHE_LIFETIME_MIN_SECS,
            cache_lifetime_max_secs: DEFAULT_CACHE_LIFETIME_MAX_SECS,
        }
    }

    pub fn with_cache_lifetime(mut self, min_secs: u64, max_secs: u64) -> Self {
        self.cache_lifetime_min_secs = min_secs;
        self.cache_lifetime_max_secs = max_secs;
        self
    }

    /// Load from `.env` and `CINEMA_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_from(config::Environment::with_prefix(ENV_PREFIX))
    }

    pub fn load_from(environment: config::Environment) -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .set_default("api_host", "")?
            .set_default("api_client_token", "")?
            .set_default("cache_lifetime_min_secs", DEFAULT_CACHE_LIFETIME_MIN_SECS as i64)?
            .set_default("cache_lifetime_max_secs", DEFAULT_CACHE_LIFETIME_MAX_SECS as i64)?
            .add_source(environment.try_parsing(true))
            .build()?;
        let loaded: Self = cfg.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_host.trim().is_empty() {
            return Err(ConfigError::Missing("api_host"));
        }
        if self.cache_lifetime_min_secs > self.cache_lifetime_max_secs {
            return Err(ConfigError::InvalidLifetimeWindow {
                min: self.cache_lifetime_min_secs,
                max: self.cache_lifetime_max_secs,
            });
        }
        Ok(())
    }
}
