//! Resolution API client
//!
//! Looks up placekeys for addresses and coordinates through the remote
//! resolution service, with result caching, two sliding-window rate
//! limiters (single and batch) and exponential-backoff retries.
//!
//! # Example
//!
//! ```ignore
//! use placekey::client::{PlacekeyClient, Query};
//! use placekey::config::ClientConfig;
//!
//! let client = PlacekeyClient::new(ClientConfig::new(api_key))?;
//! let result = client.lookup(&Query::from_coordinates(37.7371, -122.44283))?;
//! println!("{}", result["placekey"]);
//! ```

mod error;
mod http;
mod query;
mod rate_limiter;


pub use error::ClientError;
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use query::{Query, METADATA_KEYS, MINIMUM_INPUTS, QUERY_KEYS};
pub use rate_limiter::RateLimiter;

#[cfg(test)]
pub use http::tests::{MockHttpClient, RecordedRequest};

use crate::cache::LruCache;
use crate::config::{ClientConfig, MAX_BATCH_SIZE};
use crate::log::{Logger, NoOpLogger};
use crate::{log_debug, log_error, log_warn};
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const SINGLE_ENDPOINT: &str = "placekey";
const BATCH_ENDPOINT: &str = "placekeys";

/// Error reported for a batch query the response has no entry for.
const NO_RESULT: &str = "no result returned";

/// Client for the placekey resolution API.
pub struct PlacekeyClient<H: HttpClient = ReqwestClient> {
    http: H,
    config: ClientConfig,
    user_agent: String,
    cache: Option<LruCache<String, Value>>,
    single_limiter: RateLimiter,
    batch_limiter: RateLimiter,
    logger: Arc<dyn Logger>,
}

impl PlacekeyClient<ReqwestClient> {
    /// Creates a client talking HTTP through `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = ReqwestClient::new(config.timeout())?;
        Self::with_http_client(config, http)
    }
}

impl<H: HttpClient> PlacekeyClient<H> {
    /// Creates a client sending requests through `http`.
    ///
    /// Fails when the API key is empty.
    pub fn with_http_client(config: ClientConfig, http: H) -> Result<Self, ClientError> {
        if config.api_key().trim().is_empty() {
            return Err(ClientError::Argument("API key must not be empty".to_string()));
        }

        let (single_requests, single_period) = config.single_rate_limit();
        let (batch_requests, batch_period) = config.batch_rate_limit();
        let cache = config
            .cache_enabled()
            .then(|| LruCache::new(config.cache_capacity()));

        Ok(Self {
            http,
            user_agent: format!("placekey-rs/{}", crate::VERSION),
            cache,
            single_limiter: RateLimiter::new(single_requests, single_period),
            batch_limiter: RateLimiter::new(batch_requests, batch_period),
            logger: Arc::new(NoOpLogger),
            config,
        })
    }

    /// Routes client diagnostics to `logger`.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The transport requests go through.
    pub fn http_client(&self) -> &H {
        &self.http
    }

    /// The result cache, when enabled.
    pub fn cache(&self) -> Option<&LruCache<String, Value>> {
        self.cache.as_ref()
    }

    /// Resolves one query.
    ///
    /// Cached results are returned without a request. Otherwise the request
    /// waits for the single-lookup limiter and is retried on rate limiting
    /// or transport failure.
    pub fn lookup(&self, query: &Query) -> Result<Value, ClientError> {
        query.validate()?;

        let key = query.cache_key();
        if let Some(cached) = self.cached(&key, query.query_id()) {
            log_debug!(self.logger, "Cache hit for {}", key);
            return Ok(cached);
        }

        let body = self.request_body("query", json!(query));
        let result = self.send(SINGLE_ENDPOINT, &body, &self.single_limiter)?;

        self.store(key, &result);
        Ok(result)
    }

    /// Resolves many queries, `batch_size` per request.
    ///
    /// Queries without a `query_id` are given `place_<index>`. Results come
    /// back in query order. A batch the API rejects yields one
    /// `{"query_id", "error"}` entry per query in it, and so does every
    /// query a response leaves unanswered. When a request fails
    /// after all retries, the results gathered so far are returned.
    ///
    /// # Errors
    ///
    /// Only for bad arguments: `batch_size` outside `1..=100`, an invalid
    /// query, or duplicate query ids. Nothing is sent in that case.
    pub fn lookup_batch(
        &self,
        mut queries: Vec<Query>,
        batch_size: usize,
    ) -> Result<Vec<Value>, ClientError> {
        if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
            return Err(ClientError::Argument(format!(
                "batch_size must be between 1 and {}, got {}",
                MAX_BATCH_SIZE, batch_size
            )));
        }

        let mut positions = HashMap::with_capacity(queries.len());
        for (index, query) in queries.iter_mut().enumerate() {
            query.validate().map_err(|e| match e {
                ClientError::Argument(msg) => {
                    ClientError::Argument(format!("Query {}: {}", index, msg))
                }
                other => other,
            })?;
            if query.query_id().is_none() {
                query.set_query_id(format!("place_{}", index));
            }
            let id = query.query_id().unwrap_or_default().to_string();
            if positions.insert(id.clone(), index).is_some() {
                return Err(ClientError::Argument(format!(
                    "Duplicate query_id: {}",
                    id
                )));
            }
        }

        let mut results: Vec<(usize, Value)> = Vec::with_capacity(queries.len());
        let mut misses = Vec::new();
        for (index, query) in queries.iter().enumerate() {
            match self.cached(&query.cache_key(), query.query_id()) {
                Some(hit) => results.push((index, hit)),
                None => misses.push(query),
            }
        }
        log_debug!(
            self.logger,
            "Batch of {}: {} cached, {} to request",
            queries.len(),
            results.len(),
            misses.len()
        );

        for chunk in misses.chunks(batch_size) {
            let body = self.request_body("queries", json!(chunk));
            match self.send(BATCH_ENDPOINT, &body, &self.batch_limiter) {
                Ok(Value::Array(items)) => {
                    let mut answered = HashSet::with_capacity(items.len());
                    for item in items {
                        let index = item
                            .get("query_id")
                            .and_then(Value::as_str)
                            .and_then(|id| positions.get(id).copied())
                            .unwrap_or(queries.len());
                        if index < queries.len() {
                            answered.insert(index);
                            if item.get("error").is_none() {
                                self.store(queries[index].cache_key(), &item);
                            }
                        }
                        results.push((index, item));
                    }

                    let unanswered: Vec<&Query> = chunk
                        .iter()
                        .copied()
                        .filter(|query| {
                            query
                                .query_id()
                                .and_then(|id| positions.get(id))
                                .is_some_and(|index| !answered.contains(index))
                        })
                        .collect();
                    if !unanswered.is_empty() {
                        log_warn!(
                            self.logger,
                            "Batch response left {} queries unanswered",
                            unanswered.len()
                        );
                        results.extend(expand_error(&unanswered, &positions, NO_RESULT));
                    }
                }
                Ok(other) => {
                    let message = batch_error_message(&other);
                    log_warn!(self.logger, "Batch rejected: {}", message);
                    results.extend(expand_error(chunk, &positions, &message));
                }
                Err(ClientError::Api { code, body }) => {
                    let message = format!("API error {}: {}", code, body);
                    log_warn!(self.logger, "Batch rejected: {}", message);
                    results.extend(expand_error(chunk, &positions, &message));
                }
                Err(e) => {
                    log_error!(
                        self.logger,
                        "Batch lookup stopped after {} results: {}",
                        results.len(),
                        e
                    );
                    break;
                }
            }
        }

        results.sort_by_key(|(index, _)| *index);
        Ok(results.into_iter().map(|(_, value)| value).collect())
    }

    fn request_body(&self, key: &str, payload: Value) -> Value {
        let mut body = Map::new();
        body.insert(key.to_string(), payload);
        if let Some(fields) = self.config.fields() {
            body.insert("options".to_string(), json!({ "fields": fields }));
        }
        Value::Object(body)
    }

    fn cached(&self, key: &str, query_id: Option<&str>) -> Option<Value> {
        let mut value = self.cache.as_ref()?.get(&key.to_string())?;
        if let (Some(id), Value::Object(map)) = (query_id, &mut value) {
            map.insert("query_id".to_string(), Value::String(id.to_string()));
        }
        Some(value)
    }

    fn store(&self, key: String, result: &Value) {
        let Some(cache) = &self.cache else {
            return;
        };
        let mut value = result.clone();
        if let Value::Object(map) = &mut value {
            map.remove("query_id");
        }
        cache.set(key, value);
    }

    /// Sends with retries. Every attempt passes through `limiter`.
    fn send(
        &self,
        endpoint: &str,
        body: &Value,
        limiter: &RateLimiter,
    ) -> Result<Value, ClientError> {
        let url = format!("{}/{}", self.config.base_url(), endpoint);
        let payload = body.to_string();

        let mut attempt: u32 = 0;
        loop {
            let waited = limiter.admit();
            if waited > Duration::ZERO {
                log_debug!(self.logger, "Rate limiter held {} for {:?}", endpoint, waited);
            }

            match self.send_once(&url, &payload) {
                Err(e) if e.is_retryable() && attempt < self.config.max_retries() => {
                    let delay = self.backoff(attempt);
                    log_warn!(
                        self.logger,
                        "{} (attempt {}), retrying in {:?}",
                        e,
                        attempt + 1,
                        delay
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.config.retry_base_delay().saturating_mul(factor)
    }

    fn send_once(&self, url: &str, payload: &str) -> Result<Value, ClientError> {
        let headers = [
            ("apikey", self.config.api_key()),
            ("Content-Type", "application/json"),
            ("User-Agent", self.user_agent.as_str()),
        ];
        let response = self.http.post_json(url, &headers, payload)?;

        match response.status {
            429 => Err(ClientError::RateLimitExceeded),
            _ if response.is_success() => match serde_json::from_str::<Value>(&response.body) {
                Ok(value) => Ok(value),
                Err(e) => {
                    log_warn!(self.logger, "Malformed response from {}: {}", url, e);
                    Ok(Value::Object(Map::new()))
                }
            },
            code => Err(ClientError::Api {
                code,
                body: response.body,
            }),
        }
    }
}

fn batch_error_message(response: &Value) -> String {
    match response.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => format!("unexpected batch response: {}", response),
    }
}

fn expand_error(
    chunk: &[&Query],
    positions: &HashMap<String, usize>,
    message: &str,
) -> Vec<(usize, Value)> {
    chunk
        .iter()
        .filter_map(|query| {
            let id = query.query_id()?;
            let index = *positions.get(id)?;
            Some((index, json!({ "query_id": id, "error": message })))
        })
        .collect()
}
