//! Default values for all configuration settings.

/// Resolution API root.
pub const DEFAULT_BASE_URL: &str = "https://api.placekey.io/v1";

/// HTTP request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Attempts after the first before a rate-limit or transport error surfaces.
pub const DEFAULT_MAX_RETRIES: u32 = 20;

/// Single lookups admitted per window.
pub const DEFAULT_SINGLE_REQUESTS: usize = 100;

/// Single lookup window length.
pub const DEFAULT_SINGLE_PERIOD_SECS: u64 = 60;

/// Batch requests admitted per window.
pub const DEFAULT_BATCH_REQUESTS: usize = 1000;

/// Batch request window length.
pub const DEFAULT_BATCH_PERIOD_SECS: u64 = 60;

/// Result cache size in entries.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Queries per batch request.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Largest batch the resolution API accepts.
pub const MAX_BATCH_SIZE: usize = 100;

/// Records per batch processor chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Base delay of the exponential retry backoff (`2^attempt × base`).
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 100;
