//! HTTP fetch pipeline
//!
//! Per request: check connectivity, look the key up in the cache, resolve
//! the cache mode into an [`ActionPlan`], then fetch and/or serve cached
//! data accordingly. Network failures fall back to any cached entry.
//! Background refreshes and detached saves are spawned tasks; their
//! failures are logged and never reach the caller.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

use super::connectivity::ConnectivityProbe;
use super::error::{FetchError, TransportError};
use super::result::HttpResult;
use super::transport::{Transport, TransportResponse, DEFAULT_TIMEOUT};
use crate::cache::{CacheResult, NetworkCache};
use crate::policy::{resolve, ActionPlan, CacheMode, EntryState, StoreWrite};

/// Cache-aware HTTP client
///
/// Cheap to clone; clones share the transport, probe and cache.
#[derive(Clone)]
pub struct HttpFetcher {
    transport: Arc<dyn Transport>,
    connectivity: Arc<dyn ConnectivityProbe>,
    cache: Option<Arc<dyn NetworkCache>>,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(transport: Arc<dyn Transport>, connectivity: Arc<dyn ConnectivityProbe>) -> Self {
        Self {
            transport,
            connectivity,
            cache: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn NetworkCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cache(&self) -> Option<&Arc<dyn NetworkCache>> {
        self.cache.as_ref()
    }

    pub fn is_connection_available(&self) -> bool {
        self.connectivity.is_connection_available()
    }

    /// Fetch `url` using the cache as directed by `mode`.
    ///
    /// `ttl` decides whether a cached entry counts as expired. The only
    /// error returned directly is [`FetchError::CacheNotConfigured`];
    /// everything else is reported inside the [`HttpResult`].
    pub async fn fetch(
        &self,
        url: &str,
        mode: CacheMode,
        ttl: Option<Duration>,
    ) -> Result<HttpResult<Bytes>, FetchError> {
        let span = tracing::info_span!(
            "fetch",
            request_id = %Uuid::new_v4(),
            url = %url,
            mode = %mode
        );
        self.run_fetch(url, mode, ttl).instrument(span).await
    }

    /// [`HttpFetcher::fetch`] decoded as UTF-8
    pub async fn fetch_string(
        &self,
        url: &str,
        mode: CacheMode,
        ttl: Option<Duration>,
    ) -> Result<HttpResult<String>, FetchError> {
        let result = self.fetch(url, mode, ttl).await?;
        Ok(result.map_content(|bytes| {
            String::from_utf8(bytes.to_vec()).map_err(|e| FetchError::Decode(e.to_string()))
        }))
    }

    /// [`HttpFetcher::fetch`] decoded as JSON
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        mode: CacheMode,
        ttl: Option<Duration>,
    ) -> Result<HttpResult<T>, FetchError> {
        let result = self.fetch(url, mode, ttl).await?;
        Ok(result.map_content(|bytes| {
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
        }))
    }

    /// Uncached POST. Requires connectivity.
    pub async fn post(&self, url: &str, body: Bytes, content_type: &str) -> HttpResult<Bytes> {
        let span = tracing::info_span!("post", request_id = %Uuid::new_v4(), url = %url);
        async {
            let online = self.connectivity.is_connection_available();
            let result = HttpResult::new(url, online);
            if !online {
                tracing::debug!("No connection, skipping POST");
                return result.failed(FetchError::Offline);
            }

            let started = Instant::now();
            let outcome = self.bounded(self.transport.post(url, body, content_type, self.timeout));
            match outcome.await {
                Ok(response) => {
                    tracing::info!(
                        status = response.status,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "POST completed"
                    );
                    accept_response(result, response)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "POST failed");
                    let mut result = result.failed(err.clone().into());
                    result.connection_available = !err.is_connection_failure();
                    result
                }
            }
        }
        .instrument(span)
        .await
    }

    /// POST a JSON body and decode a JSON response
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> HttpResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = match serde_json::to_vec(body) {
            Ok(payload) => payload,
            Err(e) => {
                let online = self.connectivity.is_connection_available();
                return HttpResult::new(url, online).failed(FetchError::Encode(e.to_string()));
            }
        };

        self.post(url, Bytes::from(payload), "application/json")
            .await
            .map_content(|bytes| {
                serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
            })
    }

    /// Drop every cached entry. No-op without a cache.
    pub async fn clear_cache(&self) {
        match &self.cache {
            Some(cache) => cache.clear().await,
            None => tracing::debug!("No cache configured, nothing to clear"),
        }
    }

    /// Evict cached entries above capacity. No-op without a cache.
    pub async fn trim_cache(&self) {
        match &self.cache {
            Some(cache) => cache.trim().await,
            None => tracing::debug!("No cache configured, nothing to trim"),
        }
    }

    async fn run_fetch(
        &self,
        url: &str,
        mode: CacheMode,
        ttl: Option<Duration>,
    ) -> Result<HttpResult<Bytes>, FetchError> {
        let cache = if mode.uses_cache() {
            match &self.cache {
                Some(cache) => Some(Arc::clone(cache)),
                None => return Err(FetchError::CacheNotConfigured(mode)),
            }
        } else {
            None
        };

        let online = self.connectivity.is_connection_available();
        let cached = match &cache {
            Some(cache) => cache.get_bytes(url, ttl).await,
            None => CacheResult::miss(),
        };

        let plan = resolve(mode, EntryState::of(&cached), online);
        tracing::debug!(
            online = online,
            cached = cached.exists,
            expired = cached.expired,
            plan = ?plan,
            "Resolved cache plan"
        );

        let result = HttpResult::new(url, online);
        let result = match plan {
            ActionPlan::ServeCacheOnly => serve_cached(result, cached),
            ActionPlan::ServeCacheThenRefresh => {
                if let Some(cache) = cache {
                    self.spawn_refresh(url, cache);
                }
                serve_cached(result, cached)
            }
            ActionPlan::FetchThenServe { store } => {
                self.fetch_then_serve(result, cached, cache, store).await
            }
        };
        Ok(result)
    }

    async fn fetch_then_serve(
        &self,
        result: HttpResult<Bytes>,
        cached: CacheResult<Bytes>,
        cache: Option<Arc<dyn NetworkCache>>,
        store: StoreWrite,
    ) -> HttpResult<Bytes> {
        let url = result.original_uri.clone();
        let started = Instant::now();

        let (mut result, error) = match self.get_remote(&url).await {
            Ok(response) if response.is_success() => {
                tracing::info!(
                    status = response.status,
                    size = response.body.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Fetched from network"
                );
                let body = response.body.clone();
                let result = accept_response(result, response);
                if let Some(cache) = cache {
                    self.save_response(cache, &url, body, store).await;
                }
                return result;
            }
            Ok(response) => {
                let status = response.status;
                let mut result = result;
                result.status_code = Some(status);
                result.headers = response.headers;
                (result, TransportError::Status(status))
            }
            Err(err) => (result, err),
        };

        tracing::warn!(
            error = %error,
            elapsed_ms = started.elapsed().as_millis() as u64,
            cached = cached.exists,
            "Network fetch failed"
        );

        // An error status still means the host answered
        if error.is_connection_failure() {
            result.connection_available = false;
        }

        match cached.result {
            Some(data) => {
                result.content = Some(data);
                result.success = true;
                result.from_cache = true;
                result.cache_expired = cached.expired;
                result.error = Some(error.into());
                result
            }
            None => result.failed(error.into()),
        }
    }

    async fn save_response(
        &self,
        cache: Arc<dyn NetworkCache>,
        url: &str,
        body: Bytes,
        store: StoreWrite,
    ) {
        match store {
            StoreWrite::None => {}
            StoreWrite::Await => {
                if !cache.save(url, body).await {
                    tracing::warn!("Response not cached");
                }
            }
            StoreWrite::Detached => {
                let url = url.to_string();
                tokio::spawn(
                    async move {
                        if !cache.save(&url, body).await {
                            tracing::warn!("Response not cached");
                        }
                    }
                    .in_current_span(),
                );
            }
        }
    }

    fn spawn_refresh(&self, url: &str, cache: Arc<dyn NetworkCache>) {
        let fetcher = self.clone();
        let url = url.to_string();
        tokio::spawn(
            async move {
                match fetcher.get_remote(&url).await {
                    Ok(response) if response.is_success() => {
                        if cache.save(&url, response.body).await {
                            tracing::debug!(status = response.status, "Background refresh stored");
                        } else {
                            tracing::warn!("Background refresh not cached");
                        }
                    }
                    Ok(response) => {
                        tracing::warn!(status = response.status, "Background refresh got error status");
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Background refresh failed");
                    }
                }
            }
            .in_current_span(),
        );
    }

    async fn get_remote(&self, url: &str) -> Result<TransportResponse, TransportError> {
        self.bounded(self.transport.get(url, self.timeout)).await
    }

    // Enforce the timeout even if the transport does not
    async fn bounded<F>(&self, request: F) -> Result<TransportResponse, TransportError>
    where
        F: std::future::Future<Output = Result<TransportResponse, TransportError>>,
    {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(outcome) => outcome,
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        }
    }
}

fn accept_response(mut result: HttpResult<Bytes>, response: TransportResponse) -> HttpResult<Bytes> {
    result.status_code = Some(response.status);
    result.headers = response.headers;
    if (200..300).contains(&response.status) {
        result.content = Some(response.body);
        result.success = true;
        result
    } else {
        result.failed(TransportError::Status(response.status).into())
    }
}

fn serve_cached(mut result: HttpResult<Bytes>, cached: CacheResult<Bytes>) -> HttpResult<Bytes> {
    match cached.result {
        Some(data) => {
            tracing::debug!(expired = cached.expired, "Serving from cache");
            result.content = Some(data);
            result.success = true;
            result.from_cache = true;
            result.cache_expired = cached.expired;
            result
        }
        None => result.failed(FetchError::Offline),
    }
}
