//! Builds the stores, transport, connectivity probe and fetcher from
//! configuration and hands out owned handles to them.

use std::path::Path;
use std::sync::Arc;

use crate::cache::{CacheConfig, SqliteCache, StoreConfig};
use crate::config::{Config, ProbeKind};
use crate::error::NetcacheError;
use crate::network::{
    AlwaysOnline, ConnectivityProbe, HttpFetcher, ReqwestTransport, TcpConnectivityProbe,
    Transport,
};

/// Everything a caller needs, constructed once and passed around
#[derive(Clone)]
pub struct CacheStack {
    network_cache: Option<SqliteCache>,
    resume_cache: Option<SqliteCache>,
    fetcher: HttpFetcher,
}

impl CacheStack {
    /// Validate `config` and build the production stack
    pub async fn build(config: &Config) -> Result<Self, NetcacheError> {
        config.validate().map_err(NetcacheError::Config)?;

        let transport = ReqwestTransport::new(config.http.user_agent.as_deref())?;

        let connectivity: Arc<dyn ConnectivityProbe> = match config.http.connectivity.probe {
            ProbeKind::Always => Arc::new(AlwaysOnline),
            ProbeKind::Tcp => {
                let settings = &config.http.connectivity;
                TcpConnectivityProbe::start(
                    settings.target.clone(),
                    settings.refresh_interval(),
                    settings.connect_timeout(),
                )
                .await
            }
        };

        Self::with_parts(config, Arc::new(transport), connectivity)
    }

    /// Build with caller-supplied transport and probe
    pub fn with_parts(
        config: &Config,
        transport: Arc<dyn Transport>,
        connectivity: Arc<dyn ConnectivityProbe>,
    ) -> Result<Self, NetcacheError> {
        let (network_cache, resume_cache) = open_stores(&config.cache)?;

        let mut fetcher =
            HttpFetcher::new(transport, connectivity).with_timeout(config.http.timeout());
        if let Some(cache) = &network_cache {
            fetcher = fetcher.with_cache(Arc::new(cache.clone()));
        }

        tracing::info!(
            cache_enabled = network_cache.is_some(),
            resume_store = resume_cache.is_some(),
            timeout_seconds = config.http.timeout_seconds,
            "Cache stack ready"
        );

        Ok(Self {
            network_cache,
            resume_cache,
            fetcher,
        })
    }

    pub fn fetcher(&self) -> &HttpFetcher {
        &self.fetcher
    }

    /// Store used by the fetcher, if caching is enabled
    pub fn network_cache(&self) -> Option<&SqliteCache> {
        self.network_cache.as_ref()
    }

    /// Application resume-data store, if configured
    pub fn resume_cache(&self) -> Option<&SqliteCache> {
        self.resume_cache.as_ref()
    }

    /// Every open store with its configured role
    pub fn stores(&self) -> Vec<(&'static str, &SqliteCache)> {
        let mut stores = Vec::new();
        if let Some(cache) = &self.network_cache {
            stores.push(("network", cache));
        }
        if let Some(cache) = &self.resume_cache {
            stores.push(("resume", cache));
        }
        stores
    }
}

fn open_stores(
    config: &CacheConfig,
) -> Result<(Option<SqliteCache>, Option<SqliteCache>), NetcacheError> {
    if !config.enabled {
        return Ok((None, None));
    }

    let directory = Path::new(&config.directory);
    let network = open_store(directory, &config.network)?;
    let resume = match &config.resume {
        Some(store) => Some(open_store(directory, store)?),
        None => None,
    };
    Ok((Some(network), resume))
}

fn open_store(directory: &Path, store: &StoreConfig) -> Result<SqliteCache, NetcacheError> {
    SqliteCache::from_config(directory, store).map_err(|e| {
        NetcacheError::Cache(format!(
            "failed to open '{}': {}",
            store.path_in(directory).display(),
            e
        ))
    })
}
