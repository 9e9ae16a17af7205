use datachat_core::{DatachatError, StaleAutocompletePolicy, WidgetConfig};
use datachat_infrastructure::ConfigService;
use tempfile::TempDir;

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let service = ConfigService::new()
        .with_path(temp_dir.path().join("config.toml"))
        .with_base_url_override(None);

    let config = service.get_config().expect("Should fall back to defaults");
    assert_eq!(config, WidgetConfig::default());
}

#[test]
fn test_load_partial_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
base_url = "https://reports.example.com/api"
query_timeout_secs = 90
stale_autocomplete = "render"
"#,
    )
    .unwrap();

    let service = ConfigService::new()
        .with_path(&config_path)
        .with_base_url_override(None);
    let config = service.get_config().expect("Should load config");

    assert_eq!(config.base_url, "https://reports.example.com/api");
    assert_eq!(config.query_timeout_secs, 90);
    assert_eq!(config.stale_autocomplete, StaleAutocompletePolicy::Render);
    assert_eq!(config.health_timeout_secs, 5);
}

#[test]
fn test_env_override_wins_over_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "base_url = \"http://file.example/api\"\n").unwrap();

    let service = ConfigService::new()
        .with_path(&config_path)
        .with_base_url_override(Some("http://env.example/api".to_string()));

    let config = service.get_config().unwrap();
    assert_eq!(config.base_url, "http://env.example/api");
}

#[test]
fn test_invalid_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "query_timeout_secs = \"soon\"\n").unwrap();

    let service = ConfigService::new()
        .with_path(&config_path)
        .with_base_url_override(None);

    let err = service.get_config().unwrap_err();
    assert!(matches!(err, DatachatError::Config(_)), "got {err:?}");
}

#[test]
fn test_cache_and_invalidate() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "suggestions_reveal_ms = 250\n").unwrap();

    let service = ConfigService::new()
        .with_path(&config_path)
        .with_base_url_override(None);
    assert_eq!(service.get_config().unwrap().suggestions_reveal_ms, 250);

    std::fs::write(&config_path, "suggestions_reveal_ms = 300\n").unwrap();
    assert_eq!(service.get_config().unwrap().suggestions_reveal_ms, 250);

    service.invalidate_cache();
    assert_eq!(service.get_config().unwrap().suggestions_reveal_ms, 300);
}
