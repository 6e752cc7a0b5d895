// Shared helpers for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use netcache::network::{Transport, TransportError, TransportResponse};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Transport that replays a fixed script of outcomes
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Result<TransportResponse, TransportError>>>>,
    delay: Arc<Mutex<Option<Duration>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(&self, body: &'static str) -> &Self {
        self.script
            .lock()
            .push_back(Ok(TransportResponse::new(200, body)));
        self
    }

    pub fn status(&self, status: u16) -> &Self {
        self.script
            .lock()
            .push_back(Ok(TransportResponse::new(status, "")));
        self
    }

    pub fn fail(&self, err: TransportError) -> &Self {
        self.script.lock().push_back(Err(err));
        self
    }

    /// Delay every answer, e.g. beyond the fetcher timeout
    pub fn delay(&self, delay: Duration) -> &Self {
        *self.delay.lock() = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next(&self) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let step = self.script.lock().pop_front();
        step.unwrap_or_else(|| Err(TransportError::Other("script exhausted".to_string())))
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, _url: &str, _timeout: Duration) -> Result<TransportResponse, TransportError> {
        self.next().await
    }

    async fn post(
        &self,
        _url: &str,
        _body: Bytes,
        _content_type: &str,
        _timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        self.next().await
    }
}

/// Serve `responses` (raw HTTP/1.1 text) in order, one per connection.
/// Returns the base URL.
pub async fn serve_http(responses: Vec<String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        for response in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 8192];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{}", addr)
}

pub fn http_ok(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

/// Poll until `check` passes or two seconds elapse
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..400 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within 2s");
}
