//! Scripted transport and recording cache for pipeline tests

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::error::TransportError;
use super::transport::{Transport, TransportResponse};
use crate::cache::{CacheResult, NetworkCache};

/// One scripted reaction of [`MockTransport`]
#[derive(Clone)]
pub enum Scripted {
    Respond(TransportResponse),
    Fail(TransportError),
    /// Never answers within any reasonable timeout
    Hang,
}

/// Transport answering from a queue; an empty queue fails the request
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    gets: Arc<AtomicUsize>,
    posts: Arc<AtomicUsize>,
    last_post: Arc<Mutex<Option<(Bytes, String)>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, step: Scripted) -> &Self {
        self.script.lock().push_back(step);
        self
    }

    pub fn respond(&self, status: u16, body: &'static str) -> &Self {
        self.push(Scripted::Respond(TransportResponse::new(status, body)))
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn post_count(&self) -> usize {
        self.posts.load(Ordering::SeqCst)
    }

    pub fn last_post(&self) -> Option<(Bytes, String)> {
        self.last_post.lock().clone()
    }

    async fn next(&self) -> Result<TransportResponse, TransportError> {
        let step = self.script.lock().pop_front();
        match step {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(err)) => Err(err),
            Some(Scripted::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(TransportError::Other("hung request resumed".to_string()))
            }
            None => Err(TransportError::Other("no scripted response".to_string())),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, _url: &str, _timeout: Duration) -> Result<TransportResponse, TransportError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.next().await
    }

    async fn post(
        &self,
        _url: &str,
        body: Bytes,
        content_type: &str,
        _timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        self.posts.fetch_add(1, Ordering::SeqCst);
        *self.last_post.lock() = Some((body, content_type.to_string()));
        self.next().await
    }
}

/// In-memory cache that counts calls. Expiry is set per entry.
#[derive(Clone, Default)]
pub struct RecordingCache {
    entries: Arc<RwLock<HashMap<String, (Bytes, bool)>>>,
    gets: Arc<AtomicUsize>,
    saves: Arc<AtomicUsize>,
    trims: Arc<AtomicUsize>,
    clears: Arc<AtomicUsize>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preload(&self, key: &str, data: &'static str, expired: bool) {
        self.entries
            .write()
            .insert(key.to_string(), (Bytes::from_static(data.as_bytes()), expired));
    }

    pub fn stored(&self, key: &str) -> Option<Bytes> {
        self.entries.read().get(key).map(|(data, _)| data.clone())
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn trim_count(&self) -> usize {
        self.trims.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// Wait for detached saves to land
    pub async fn wait_for_saves(&self, expected: usize) {
        for _ in 0..200 {
            if self.save_count() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "expected {} saves, saw {}",
            expected,
            self.save_count()
        );
    }
}

#[async_trait]
impl NetworkCache for RecordingCache {
    fn max_entries(&self) -> usize {
        300
    }

    async fn get_bytes(&self, key: &str, _ttl: Option<Duration>) -> CacheResult<Bytes> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        match self.entries.read().get(key) {
            Some((data, expired)) => CacheResult::hit(data.clone(), *expired),
            None => CacheResult::miss(),
        }
    }

    async fn save(&self, key: &str, data: Bytes) -> bool {
        self.entries.write().insert(key.to_string(), (data, false));
        self.saves.fetch_add(1, Ordering::SeqCst);
        true
    }

    async fn trim(&self) {
        self.trims.fetch_add(1, Ordering::SeqCst);
    }

    async fn clear(&self) {
        self.entries.write().clear();
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}
