// Configuration module unit tests

use netcache::compression::Compression;
use netcache::config::*;
use std::time::Duration;

#[test]
fn test_can_deserialize_minimal_valid_yaml_config() {
    let yaml = r#"
cache:
  enabled: true
  directory: "/tmp/netcache"
"#;
    let config: Config = serde_yaml::from_str(yaml).expect("Failed to deserialize YAML");
    assert!(config.cache.enabled);
    assert_eq!(config.cache.directory, "/tmp/netcache");
}

#[test]
fn test_missing_sections_use_defaults() {
    let config: Config = serde_yaml::from_str("{}").expect("Failed to deserialize YAML");

    assert!(!config.cache.enabled);
    assert_eq!(config.cache.network.file_name, "netcache.db");
    assert_eq!(config.cache.network.max_entries, 300);
    assert!(config.cache.network.compression.enabled);
    assert!(config.cache.resume.is_none());
    assert_eq!(config.http.timeout(), Duration::from_secs(30));
    assert_eq!(config.http.default_cache_expiry(), Duration::from_secs(300));
    assert_eq!(config.http.connectivity.probe, ProbeKind::Always);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_can_parse_full_config() {
    let yaml = r#"
cache:
  enabled: true
  directory: "/var/cache/app"
  network:
    file_name: "net.db"
    max_entries: 500
    compression:
      enabled: true
      algorithm: br
      level: 5
  resume:
    file_name: "resume.db"
    max_entries: 50
http:
  timeout_seconds: 10
  default_cache_expiry_seconds: 60
  user_agent: "app/1.0"
  connectivity:
    probe: tcp
    target: "example.com:443"
    refresh_interval_ms: 2000
    connect_timeout_ms: 500
logging:
  level: "netcache=debug"
  format: json
"#;
    let config = Config::from_yaml_with_env(yaml).expect("Failed to parse config");
    assert!(config.validate().is_ok());

    assert_eq!(config.cache.network.file_name, "net.db");
    assert_eq!(config.cache.network.max_entries, 500);
    assert_eq!(config.cache.network.compression.algorithm, Compression::Brotli);
    assert_eq!(config.cache.network.compression.level, 5);

    let resume = config.cache.resume.as_ref().expect("resume store");
    assert_eq!(resume.max_entries, 50);
    assert!(!resume.compression.enabled);

    assert_eq!(config.http.timeout(), Duration::from_secs(10));
    assert_eq!(config.http.user_agent.as_deref(), Some("app/1.0"));
    assert_eq!(config.http.connectivity.probe, ProbeKind::Tcp);
    assert_eq!(
        config.http.connectivity.refresh_interval(),
        Duration::from_millis(2000)
    );
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_env_var_substitution_in_directory() {
    // Test: ${VAR} references are replaced before parsing
    std::env::set_var("NETCACHE_UNIT_TEST_DIR", "/tmp/from-env");
    let yaml = r#"
cache:
  enabled: true
  directory: "${NETCACHE_UNIT_TEST_DIR}"
"#;
    let config = Config::from_yaml_with_env(yaml).expect("Failed to parse config");
    assert_eq!(config.cache.directory, "/tmp/from-env");
    std::env::remove_var("NETCACHE_UNIT_TEST_DIR");
}

#[test]
fn test_missing_env_var_is_an_error() {
    let yaml = r#"
cache:
  directory: "${NETCACHE_UNIT_TEST_UNSET_VAR}"
"#;
    let err = Config::from_yaml_with_env(yaml).unwrap_err();
    assert!(err.contains("NETCACHE_UNIT_TEST_UNSET_VAR"));
}

#[test]
fn test_rejects_zero_max_entries() {
    let yaml = r#"
cache:
  enabled: true
  network:
    file_name: "net.db"
    max_entries: 0
"#;
    let config = Config::from_yaml_with_env(yaml).expect("Failed to parse config");
    let err = config.validate().unwrap_err();
    assert!(err.contains("cache.network"));
}

#[test]
fn test_rejects_out_of_range_compression_level() {
    let mut config = Config::default();
    config.cache.network.compression.level = 42;
    assert!(config.validate().is_err());
}

#[test]
fn test_rejects_shared_store_file() {
    let mut config = Config::default();
    config.cache.resume = Some(StoreConfig::new("netcache.db"));
    let err = config.validate().unwrap_err();
    assert!(err.contains("netcache.db"));
}

#[test]
fn test_rejects_zero_timeout() {
    let mut config = Config::default();
    config.http.timeout_seconds = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_rejects_unknown_log_format() {
    let yaml = r#"
logging:
  format: xml
"#;
    assert!(Config::from_yaml_with_env(yaml).is_err());
}

#[test]
fn test_store_path_joins_directory_and_file_name() {
    let config = CacheConfig {
        directory: "/data/cache".to_string(),
        ..Default::default()
    };
    assert_eq!(
        config.store_path(&config.network),
        std::path::PathBuf::from("/data/cache/netcache.db")
    );
}

#[test]
fn test_from_file_reads_yaml() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("netcache.yaml");
    std::fs::write(&path, "http:\n  timeout_seconds: 7\n").unwrap();

    let config = Config::from_file(&path).expect("Failed to load config");
    assert_eq!(config.http.timeout_seconds, 7);

    assert!(Config::from_file(dir.path().join("missing.yaml")).is_err());
}
