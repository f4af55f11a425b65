//! Resolution client configuration.

use super::defaults::*;
use std::fmt;
use std::time::Duration;

/// Settings for [`PlacekeyClient`](crate::client::PlacekeyClient).
///
/// Two independent sliding-window limits apply: a tighter one for single
/// lookups and a looser one for batch requests, mirroring the upstream
/// quotas.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    retry_base_delay: Duration,
    cache_enabled: bool,
    cache_capacity: usize,
    single_requests: usize,
    single_period: Duration,
    batch_requests: usize,
    batch_period: Duration,
    fields: Option<Vec<String>>,
}

impl ClientConfig {
    /// Create a configuration with default values for `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
            cache_enabled: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            single_requests: DEFAULT_SINGLE_REQUESTS,
            single_period: Duration::from_secs(DEFAULT_SINGLE_PERIOD_SECS),
            batch_requests: DEFAULT_BATCH_REQUESTS,
            batch_period: Duration::from_secs(DEFAULT_BATCH_PERIOD_SECS),
            fields: None,
        }
    }

    /// Set the API root. A trailing `/` is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the HTTP request timeout. Default: 30 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how many times a rate-limited or failed request is retried.
    /// Default: 20.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay of the retry backoff. Attempt `n` waits
    /// `2^n × delay`. Default: 100 ms.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Enable or disable the result cache. Default: enabled.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Set the result cache size in entries. Default: 10 000.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the single lookup limit. Default: 100 per minute.
    pub fn with_single_rate_limit(mut self, requests: usize, period: Duration) -> Self {
        self.single_requests = requests;
        self.single_period = period;
        self
    }

    /// Set the batch request limit. Default: 1000 per minute.
    pub fn with_batch_rate_limit(mut self, requests: usize, period: Duration) -> Self {
        self.batch_requests = requests;
        self.batch_period = period;
        self
    }

    /// Restrict the response to the named fields.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn retry_base_delay(&self) -> Duration {
        self.retry_base_delay
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    /// Single lookup limit as `(requests, period)`.
    pub fn single_rate_limit(&self) -> (usize, Duration) {
        (self.single_requests, self.single_period)
    }

    /// Batch request limit as `(requests, period)`.
    pub fn batch_rate_limit(&self) -> (usize, Duration) {
        (self.batch_requests, self.batch_period)
    }

    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_base_delay", &self.retry_base_delay)
            .field("cache_enabled", &self.cache_enabled)
            .field("cache_capacity", &self.cache_capacity)
            .field("single_rate_limit", &self.single_rate_limit())
            .field("batch_rate_limit", &self.batch_rate_limit())
            .field("fields", &self.fields)
            .finish()
    }
}
