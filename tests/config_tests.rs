use hapi_brief::{AppError, Config, HapiClient};
use tempfile::tempdir;

/// Test configuration round trips through TOML
#[tokio::test]
async fn test_config_validation() {
    let configs = vec![
        Config {
            api_host: "https://hapi.example.org".to_string(),
            app_identifier: "aGFwaS10ZXN0".to_string(),
            ..Config::default()
        },
        Config {
            api_host: "http://localhost:8080".to_string(),
            app_identifier: "aGFwaS10ZXN0".to_string(),
            page_size: 250,
            log_file_path: Some("/custom/log/path".to_string()),
            ..Config::default()
        },
    ];

    for config in configs {
        let config_str = toml::to_string_pretty(&config).unwrap();
        let loaded_config: Config = toml::from_str(&config_str).unwrap();

        assert_eq!(loaded_config, config);
        assert!(loaded_config.validate().is_ok());
    }
}

/// Test configuration loading and saving
#[tokio::test]
async fn test_config_integration() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");
    let config_path_str = config_path.to_string_lossy();

    let test_config = Config {
        api_host: "hapi.test.org".to_string(),
        app_identifier: "aGFwaS10ZXN0".to_string(),
        http_timeout_seconds: 12,
        ..Config::default()
    };
    test_config.save_to_path(&config_path_str).await.unwrap();

    let loaded_config = Config::load_from_path(&config_path_str).await.unwrap();

    assert_eq!(loaded_config.api_host, "https://hapi.test.org");
    assert_eq!(loaded_config.http_timeout_seconds, 12);
    assert_eq!(loaded_config.page_size, 10_000);
    assert!(HapiClient::new(&loaded_config).is_ok());
}

#[test]
fn test_identifier_never_in_debug_output() {
    let config = Config {
        app_identifier: "c2VjcmV0LWlkZW50aWZpZXI=".to_string(),
        ..Config::default()
    };
    let client = HapiClient::with_client(reqwest::Client::new(), config.clone());

    assert!(!format!("{config:?}").contains("c2VjcmV0LWlkZW50aWZpZXI="));
    assert!(!format!("{client:?}").contains("c2VjcmV0LWlkZW50aWZpZXI="));
}

#[test]
fn test_invalid_config_rejected_by_client() {
    let config = Config {
        app_identifier: "aGFwaS10ZXN0".to_string(),
        page_size: 0,
        ..Config::default()
    };
    assert!(matches!(HapiClient::new(&config), Err(AppError::Config(_))));
}
