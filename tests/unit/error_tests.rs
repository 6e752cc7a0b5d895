// Error handling tests

use netcache::cache::CacheError;
use netcache::error::NetcacheError;
use netcache::network::{FetchError, TransportError};
use netcache::policy::CacheMode;
use std::time::Duration;

#[test]
fn test_can_create_netcache_error_variants() {
    // Test: each category carries its message
    let config_error = NetcacheError::Config("invalid YAML syntax".to_string());
    match config_error {
        NetcacheError::Config(msg) => assert_eq!(msg, "invalid YAML syntax"),
        _ => panic!("Expected Config variant"),
    }

    let cache_error = NetcacheError::Cache("disk full".to_string());
    assert!(matches!(cache_error, NetcacheError::Cache(_)));

    let network_error = NetcacheError::Network("connection refused".to_string());
    assert!(matches!(network_error, NetcacheError::Network(_)));

    let internal_error = NetcacheError::Internal("task panicked".to_string());
    assert!(matches!(internal_error, NetcacheError::Internal(_)));
}

#[test]
fn test_display_prefixes_category() {
    assert_eq!(
        NetcacheError::Config("bad".to_string()).to_string(),
        "Configuration error: bad"
    );
    assert_eq!(
        NetcacheError::Cache("bad".to_string()).to_string(),
        "Cache error: bad"
    );
    assert_eq!(
        NetcacheError::Network("bad".to_string()).to_string(),
        "Network error: bad"
    );
    assert_eq!(
        NetcacheError::Internal("bad".to_string()).to_string(),
        "Internal error: bad"
    );
}

#[test]
fn test_netcache_error_is_std_error() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
    assert_error::<NetcacheError>();

    let boxed: Box<dyn std::error::Error> = Box::new(NetcacheError::Internal("x".to_string()));
    assert!(boxed.to_string().contains("x"));
}

#[test]
fn test_cache_configuration_error_maps_to_config() {
    let err: NetcacheError = CacheError::ConfigurationError("max_entries is 0".to_string()).into();
    match err {
        NetcacheError::Config(msg) => assert_eq!(msg, "max_entries is 0"),
        other => panic!("Expected Config variant, got {:?}", other),
    }
}

#[test]
fn test_cache_io_error_maps_to_cache() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let err: NetcacheError = CacheError::from(io_err).into();
    assert!(matches!(err, NetcacheError::Cache(ref msg) if msg.contains("read-only")));
}

#[test]
fn test_transport_error_maps_to_network() {
    let err: NetcacheError = TransportError::Timeout(Duration::from_secs(3)).into();
    assert!(matches!(err, NetcacheError::Network(ref msg) if msg.contains("timed out")));
}

#[test]
fn test_fetch_error_categories() {
    let err: NetcacheError = FetchError::CacheNotConfigured(CacheMode::UpdateAsync).into();
    assert!(matches!(err, NetcacheError::Config(ref msg) if msg.contains("update_async")));

    let err: NetcacheError = FetchError::Offline.into();
    assert!(matches!(err, NetcacheError::Network(_)));

    let err: NetcacheError = FetchError::from(TransportError::Status(503)).into();
    assert!(matches!(err, NetcacheError::Network(ref msg) if msg.contains("503")));

    let err: NetcacheError = FetchError::Decode("expected value".to_string()).into();
    assert!(matches!(err, NetcacheError::Internal(_)));
}

#[test]
fn test_only_connect_and_timeout_are_connection_failures() {
    assert!(TransportError::Timeout(Duration::from_secs(1)).is_connection_failure());
    assert!(TransportError::Connect("refused".to_string()).is_connection_failure());
    assert!(!TransportError::Status(500).is_connection_failure());
    assert!(!TransportError::Body("truncated".to_string()).is_connection_failure());
    assert!(!TransportError::InvalidUrl("::".to_string()).is_connection_failure());
}
