//! Network connectivity probes
//!
//! The fetch pipeline only asks "is there a connection right now?", so the
//! check must be cheap. Probes that need I/O refresh their answer in the
//! background and report the last observed state.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

/// Callback invoked with the new state whenever connectivity flips
pub type StatusCallback = Arc<dyn Fn(bool) + Send + Sync>;

pub trait ConnectivityProbe: Send + Sync {
    fn is_connection_available(&self) -> bool;

    fn on_status_changed(&self, callback: StatusCallback);
}

#[derive(Default)]
struct StatusListeners {
    callbacks: Mutex<Vec<StatusCallback>>,
}

impl StatusListeners {
    fn push(&self, callback: StatusCallback) {
        self.callbacks.lock().push(callback);
    }

    fn notify(&self, online: bool) {
        // Snapshot so callbacks may register further callbacks
        let callbacks: Vec<StatusCallback> = self.callbacks.lock().clone();
        for callback in callbacks {
            callback(online);
        }
    }
}

/// Probe that always reports a connection. Status never changes.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysOnline;

impl ConnectivityProbe for AlwaysOnline {
    fn is_connection_available(&self) -> bool {
        true
    }

    fn on_status_changed(&self, _callback: StatusCallback) {}
}

/// Probe whose state is set by the application
#[derive(Default)]
pub struct ManualConnectivity {
    online: AtomicBool,
    listeners: StatusListeners,
}

impl ManualConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
            listeners: StatusListeners::default(),
        }
    }

    /// Update the state, notifying listeners if it changed
    pub fn set_online(&self, online: bool) {
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous != online {
            tracing::info!(online = online, "Connectivity changed");
            self.listeners.notify(online);
        }
    }
}

impl ConnectivityProbe for ManualConnectivity {
    fn is_connection_available(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn on_status_changed(&self, callback: StatusCallback) {
        self.listeners.push(callback);
    }
}

/// Probe that checks TCP reachability of a host:port on an interval
///
/// The refresh task holds only a weak reference and stops once the probe
/// is dropped.
pub struct TcpConnectivityProbe {
    target: String,
    connect_timeout: Duration,
    online: AtomicBool,
    listeners: StatusListeners,
    refresher: Mutex<Option<JoinHandle<()>>>,
}

impl TcpConnectivityProbe {
    /// Check `target` once, then keep re-checking every `refresh_interval`
    pub async fn start(
        target: impl Into<String>,
        refresh_interval: Duration,
        connect_timeout: Duration,
    ) -> Arc<Self> {
        let probe = Arc::new(Self {
            target: target.into(),
            connect_timeout,
            online: AtomicBool::new(false),
            listeners: StatusListeners::default(),
            refresher: Mutex::new(None),
        });

        let initial = probe.check().await;
        probe.online.store(initial, Ordering::SeqCst);
        tracing::info!(target = %probe.target, online = initial, "Connectivity probe started");

        let handle = tokio::spawn(refresh_loop(Arc::downgrade(&probe), refresh_interval));
        *probe.refresher.lock() = Some(handle);
        probe
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Re-check now and return the observed state
    pub async fn refresh(&self) -> bool {
        let online = self.check().await;
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous != online {
            tracing::info!(target = %self.target, online = online, "Connectivity changed");
            self.listeners.notify(online);
        }
        online
    }

    async fn check(&self) -> bool {
        let attempt = TcpStream::connect(self.target.as_str());
        match tokio::time::timeout(self.connect_timeout, attempt).await {
            Ok(Ok(_)) => true,
            Ok(Err(err)) => {
                tracing::debug!(target = %self.target, error = %err, "Connectivity check failed");
                false
            }
            Err(_) => {
                tracing::debug!(target = %self.target, "Connectivity check timed out");
                false
            }
        }
    }
}

async fn refresh_loop(probe: Weak<TcpConnectivityProbe>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    // First tick completes immediately; the initial check already ran
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let Some(probe) = probe.upgrade() else {
            break;
        };
        probe.refresh().await;
    }
}

impl Drop for TcpConnectivityProbe {
    fn drop(&mut self) {
        if let Some(handle) = self.refresher.lock().take() {
            handle.abort();
        }
    }
}

impl ConnectivityProbe for TcpConnectivityProbe {
    fn is_connection_available(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn on_status_changed(&self, callback: StatusCallback) {
        self.listeners.push(callback);
    }
}
