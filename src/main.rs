use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use netcache::cache::NetworkCache;
use netcache::config::Config;
use netcache::{CacheMode, CacheStack};

/// Netcache - fetch HTTP resources through a persistent local cache
#[derive(Parser, Debug)]
#[command(name = "netcache")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable the cache in this directory, overriding the config file
    #[arg(long)]
    cache_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a URL and write the body to stdout
    Fetch {
        url: String,

        /// skip, update_async, update_async_if_expired, update_immediately,
        /// update_immediately_if_expired
        #[arg(short, long, default_value_t = CacheMode::default())]
        mode: CacheMode,

        /// Cache TTL in seconds (defaults to http.default_cache_expiry_seconds)
        #[arg(long)]
        ttl: Option<u64>,

        /// Write the body to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print result metadata as JSON to stderr
        #[arg(long)]
        meta: bool,
    },
    /// Drop every entry from the selected stores
    Clear {
        #[arg(long, value_enum, default_value_t = StoreSelector::All)]
        store: StoreSelector,
    },
    /// Evict entries above each store's capacity
    Trim {
        #[arg(long, value_enum, default_value_t = StoreSelector::All)]
        store: StoreSelector,
    },
    /// Print store statistics as JSON
    Stats,
    /// Validate the configuration and exit
    Check,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum StoreSelector {
    Network,
    Resume,
    All,
}

impl StoreSelector {
    fn matches(&self, role: &str) -> bool {
        match self {
            StoreSelector::All => true,
            StoreSelector::Network => role == "network",
            StoreSelector::Resume => role == "resume",
        }
    }
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(dir) = &args.cache_dir {
        config.cache.enabled = true;
        config.cache.directory = dir.clone();
    }

    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    netcache::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging subsystem: {}", e))?;

    tracing::info!(
        config_file = ?args.config,
        cache_enabled = config.cache.enabled,
        cache_dir = %config.cache.directory,
        "Configuration loaded successfully"
    );

    if matches!(args.command, Command::Check) {
        println!("configuration OK");
        return Ok(());
    }

    let stack = CacheStack::build(&config).await?;

    match args.command {
        Command::Fetch {
            url,
            mode,
            ttl,
            output,
            meta,
        } => {
            let ttl = ttl
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.http.default_cache_expiry());
            let result = stack.fetcher().fetch(&url, mode, Some(ttl)).await?;

            if meta {
                let summary = serde_json::json!({
                    "uri": result.original_uri,
                    "success": result.success,
                    "from_cache": result.from_cache,
                    "cache_expired": result.cache_expired,
                    "connection_available": result.connection_available,
                    "status_code": result.status_code,
                    "headers": result.headers,
                    "error": result.error.as_ref().map(|e| e.to_string()),
                });
                eprintln!("{}", serde_json::to_string_pretty(&summary)?);
            }

            let body = result.into_result()?;
            match output {
                Some(path) => std::fs::write(&path, &body)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => std::io::stdout().write_all(&body)?,
            }
        }
        Command::Clear { store } => {
            let stores = stack.stores();
            if stores.is_empty() {
                bail!("cache is disabled; pass --cache-dir or enable it in the config");
            }
            for (role, cache) in stores.into_iter().filter(|(role, _)| store.matches(role)) {
                cache.clear().await;
                println!("cleared {} ({})", role, cache.path().display());
            }
        }
        Command::Trim { store } => {
            let stores = stack.stores();
            if stores.is_empty() {
                bail!("cache is disabled; pass --cache-dir or enable it in the config");
            }
            for (role, cache) in stores.into_iter().filter(|(role, _)| store.matches(role)) {
                cache.trim().await;
                println!("trimmed {} to at most {} entries", role, cache.max_entries());
            }
        }
        Command::Stats => {
            let mut report = serde_json::Map::new();
            for (role, cache) in stack.stores() {
                report.insert(role.to_string(), serde_json::to_value(cache.stats().await)?);
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Check => {}
    }

    Ok(())
}
