//! INI serialization: `ConfigFile` → commented INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let key = config.api.key.as_deref().unwrap_or("");

    format!(
        r#"[api]
; API key from https://dev.placekey.io (the PLACEKEY_API_KEY environment
; variable takes precedence)
key = {}
; Resolution API root
base_url = {}
; HTTP request timeout in seconds
timeout_secs = {}
; Retries for rate-limited or failed requests (backoff 0.1s, 0.2s, 0.4s, ...)
max_retries = {}

[cache]
; Cache lookup results in memory
enabled = {}
; Maximum number of cached results
capacity = {}

[rate_limit]
; Single lookups allowed per window
single_requests = {}
single_period_secs = {}
; Batch requests allowed per window
batch_requests = {}
batch_period_secs = {}

[batch]
; Records processed per chunk (1-100)
chunk_size = {}
"#,
        key,
        config.api.base_url,
        config.api.timeout_secs,
        config.api.max_retries,
        config.cache.enabled,
        config.cache.capacity,
        config.rate_limit.single_requests,
        config.rate_limit.single_period_secs,
        config.rate_limit.batch_requests,
        config.rate_limit.batch_period_secs,
        config.batch.chunk_size,
    )
}
