use crate::error::AppError;
use std::path::Path;

use super::Config;

/// Validates the configuration settings
///
/// # Validation Rules
/// - API host cannot be empty and must be an http(s) URL or a domain name
/// - Application identifier cannot be empty
/// - Page size and HTTP timeout must be positive
/// - If log file path is provided, it cannot be empty and its parent
///   directory must exist or be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    let api_host = config.api_host.trim();
    if api_host.is_empty() {
        return Err(AppError::config_error("API host cannot be empty"));
    }

    if !api_host.starts_with("http://")
        && !api_host.starts_with("https://")
        && !api_host.contains('.')
        && !api_host.starts_with("localhost")
    {
        return Err(AppError::config_error(
            "API host must be a valid URL or domain name",
        ));
    }

    if config.app_identifier.trim().is_empty() {
        return Err(AppError::config_error(
            "Application identifier cannot be empty",
        ));
    }

    if config.page_size == 0 {
        return Err(AppError::config_error("Page size must be greater than zero"));
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error(
            "HTTP timeout must be greater than zero",
        ));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            app_identifier: "dGVzdDp0ZXN0QGV4YW1wbGUub3Jn".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_host_with_identifier_is_valid() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_rejects_empty_identifier() {
        let config = Config::default();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("Application identifier"));
    }

    #[test]
    fn test_rejects_bad_host() {
        let mut config = valid_config();
        config.api_host = "not-a-host".to_string();
        assert!(validate_config(&config).is_err());

        config.api_host = "localhost:8080".to_string();
        assert!(validate_config(&config).is_ok());

        config.api_host = "   ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_page_size_and_timeout() {
        let mut config = valid_config();
        config.page_size = 0;
        assert!(validate_config(&config).is_err());

        let mut config = valid_config();
        config.http_timeout_seconds = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_log_file_parent_is_created() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("nested").join("hapi.log");
        let mut config = valid_config();
        config.log_file_path = Some(log_path.to_string_lossy().to_string());

        assert!(validate_config(&config).is_ok());
        assert!(temp_dir.path().join("nested").exists());
    }

    #[test]
    fn test_rejects_empty_log_file_path() {
        let mut config = valid_config();
        config.log_file_path = Some(String::new());
        assert!(validate_config(&config).is_err());
    }
}
