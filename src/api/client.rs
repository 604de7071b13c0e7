use log::{debug, error, info};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

use super::cache::ResponseCache;
use crate::config::DashboardConfig;

/// Failure of a single API request. Requests are never retried.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// The body was not the JSON shape we expected.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl RequestError {
    /// HTTP status of the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RequestError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            RequestError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            RequestError::Network(err.to_string())
        }
    }
}

/// GET-only client with a per-path response cache.
///
/// Cloning is cheap; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cache: Arc<Mutex<ResponseCache>>,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:8000/api`).
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        cache_capacity: usize,
    ) -> Result<Self, RequestError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RequestError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: Arc::new(Mutex::new(ResponseCache::new(cache_capacity))),
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, RequestError> {
        Self::new(
            config.api_base.clone(),
            Duration::from_secs(config.request_timeout_secs),
            config.cache_capacity,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and return the parsed JSON body.
    ///
    /// Responses are memoized per exact path until [`ApiClient::clear_cache`].
    /// Identical concurrent calls are not deduplicated.
    pub async fn call(&self, path: &str) -> Result<Value, RequestError> {
        let epoch = {
            let mut cache = self.cache();
            if let Some(value) = cache.get(path) {
                debug!("Cache hit for {}", path);
                return Ok(value);
            }
            cache.epoch()
        };

        let url = format!("{}{}", self.base_url, path);
        info!("GET {}", url);

        let response = self.http.get(&url).send().await.map_err(|e| {
            error!("API call failed for {}: {}", path, e);
            RequestError::from(e)
        })?;

        let status = response.status();
        debug!("Response status for {}: {}", path, status);
        if !status.is_success() {
            let err = RequestError::Status {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            };
            error!("API call failed for {}: {}", path, err);
            return Err(err);
        }

        let body: Value = response.json().await.map_err(|e| {
            error!("Invalid JSON from {}: {}", path, e);
            RequestError::Decode(e.to_string())
        })?;

        if !self.cache().store(path, body.clone(), epoch) {
            debug!("Cache was cleared while {} was in flight, not storing", path);
        }
        Ok(body)
    }

    /// [`ApiClient::call`] followed by a typed decode of the body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        let value = self.call(path).await?;
        serde_json::from_value(value).map_err(|e| {
            error!("Unexpected body shape from {}: {}", path, e);
            RequestError::Decode(e.to_string())
        })
    }

    /// Invalidate every cached response.
    pub fn clear_cache(&self) {
        debug!("Clearing response cache");
        self.cache().clear();
    }

    /// Number of responses currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache().len()
    }

    fn cache(&self) -> MutexGuard<'_, ResponseCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
