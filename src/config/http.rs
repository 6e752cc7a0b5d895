// HTTP client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout (default: 30s)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// TTL applied by the CLI when none is given (default: 5 minutes)
    #[serde(default = "default_cache_expiry_seconds")]
    pub default_cache_expiry_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            default_cache_expiry_seconds: default_cache_expiry_seconds(),
            user_agent: None,
            connectivity: ConnectivityConfig::default(),
        }
    }
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_cache_expiry_seconds() -> u64 {
    300
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn default_cache_expiry(&self) -> Duration {
        Duration::from_secs(self.default_cache_expiry_seconds)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 {
            return Err("http.timeout_seconds must be greater than 0".to_string());
        }
        if let Some(agent) = &self.user_agent {
            if agent.is_empty() {
                return Err("http.user_agent cannot be empty when set".to_string());
            }
        }
        self.connectivity.validate()
    }
}

/// Which connectivity probe to run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// Assume the network is always reachable (default)
    #[default]
    Always,
    /// Periodically open a TCP connection to `target`
    Tcp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    #[serde(default)]
    pub probe: ProbeKind,
    /// host:port used by the tcp probe
    #[serde(default = "default_probe_target")]
    pub target: String,
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe: ProbeKind::default(),
            target: default_probe_target(),
            refresh_interval_ms: default_refresh_interval_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

fn default_probe_target() -> String {
    "1.1.1.1:443".to_string()
}

fn default_refresh_interval_ms() -> u64 {
    5000
}

fn default_connect_timeout_ms() -> u64 {
    1000
}

impl ConnectivityConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.probe != ProbeKind::Tcp {
            return Ok(());
        }
        if !self.target.contains(':') {
            return Err(format!(
                "http.connectivity.target '{}' must be host:port",
                self.target
            ));
        }
        if self.refresh_interval_ms == 0 {
            return Err("http.connectivity.refresh_interval_ms must be greater than 0".to_string());
        }
        if self.connect_timeout_ms == 0 {
            return Err("http.connectivity.connect_timeout_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}
