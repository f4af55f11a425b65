//! Settings structs for each `[section]` of `config.ini`.

use super::defaults::*;
use super::ClientConfig;
use std::time::Duration;

/// Complete configuration loaded from `config.ini`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub api: ApiSettings,
    pub cache: CacheSettings,
    pub rate_limit: RateLimitSettings,
    pub batch: BatchSettings,
}

/// `[api]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// API key; `None` when neither the file nor the environment sets one.
    pub key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub enabled: bool,
    pub capacity: usize,
}

/// `[rate_limit]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub single_requests: usize,
    pub single_period_secs: u64,
    pub batch_requests: usize,
    pub batch_period_secs: u64,
}

/// `[batch]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSettings {
    pub chunk_size: usize,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                key: None,
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                max_retries: DEFAULT_MAX_RETRIES,
            },
            cache: CacheSettings {
                enabled: true,
                capacity: DEFAULT_CACHE_CAPACITY,
            },
            rate_limit: RateLimitSettings {
                single_requests: DEFAULT_SINGLE_REQUESTS,
                single_period_secs: DEFAULT_SINGLE_PERIOD_SECS,
                batch_requests: DEFAULT_BATCH_REQUESTS,
                batch_period_secs: DEFAULT_BATCH_PERIOD_SECS,
            },
            batch: BatchSettings {
                chunk_size: DEFAULT_CHUNK_SIZE,
            },
        }
    }
}

impl ConfigFile {
    /// Builds a [`ClientConfig`] from these settings.
    ///
    /// Returns `None` when no API key is configured.
    pub fn client_config(&self) -> Option<ClientConfig> {
        let key = self.api.key.as_deref()?;
        let limits = &self.rate_limit;

        Some(
            ClientConfig::new(key)
                .with_base_url(self.api.base_url.as_str())
                .with_timeout(Duration::from_secs(self.api.timeout_secs))
                .with_max_retries(self.api.max_retries)
                .with_cache(self.cache.enabled)
                .with_cache_capacity(self.cache.capacity)
                .with_single_rate_limit(
                    limits.single_requests,
                    Duration::from_secs(limits.single_period_secs),
                )
                .with_batch_rate_limit(
                    limits.batch_requests,
                    Duration::from_secs(limits.batch_period_secs),
                ),
        )
    }
}
