use crate::constants::{self, env_vars};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod user_prompts;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use user_prompts::prompt_for_app_identifier;
use validation::validate_config;

/// Configuration structure for the application.
///
/// Built once at startup and handed to [`crate::data_fetcher::api::HapiClient`];
/// nothing reads these values from globals.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// HAPI host, e.g. `https://hapi.humdata.org`. The `/api/v1` prefix is added per request.
    #[serde(default = "default_api_host")]
    pub api_host: String,
    /// Application identifier sent as `app_identifier` on every request.
    #[serde(default)]
    pub app_identifier: String,
    /// Records requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// HTTP timeout in seconds for API requests. Defaults to 30 seconds if not specified.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Retries per page for transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
}

fn default_api_host() -> String {
    constants::DEFAULT_API_HOST.to_string()
}

fn default_page_size() -> usize {
    constants::DEFAULT_PAGE_SIZE
}

fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_max_retries() -> u32 {
    constants::retry::MAX_ATTEMPTS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_host: default_api_host(),
            app_identifier: String::new(),
            page_size: default_page_size(),
            http_timeout_seconds: default_http_timeout(),
            max_retries: default_max_retries(),
            log_file_path: None,
        }
    }
}

// The identifier is a credential; keep it out of logs and panics.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_host", &self.api_host)
            .field("app_identifier", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .field("max_retries", &self.max_retries)
            .field("log_file_path", &self.log_file_path)
            .finish()
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// If no config file exists and no identifier is set in the environment,
    /// prompts the user for the application identifier and creates one.
    ///
    /// # Environment Variables
    /// - `HAPI_API_HOST` - Override API host
    /// - `HAPI_APP_IDENTIFIER` - Override application identifier
    /// - `HAPI_PAGE_SIZE` - Override page size
    /// - `HAPI_HTTP_TIMEOUT` - Override HTTP timeout in seconds (default: 30)
    /// - `HAPI_LOG_FILE` - Override log file path
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else if std::env::var(env_vars::APP_IDENTIFIER).is_ok() {
            Config::default()
        } else {
            let config = Config {
                app_identifier: prompt_for_app_identifier().await?,
                ..Config::default()
            };
            config.save().await?;
            config
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Applies overrides from a variable lookup. Unparseable numbers are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_host) = lookup(env_vars::API_HOST) {
            self.api_host = api_host;
        }

        if let Some(app_identifier) = lookup(env_vars::APP_IDENTIFIER) {
            self.app_identifier = app_identifier;
        }

        if let Some(page_size) = lookup(env_vars::PAGE_SIZE).and_then(|s| s.parse().ok()) {
            self.page_size = page_size;
        }

        if let Some(timeout) = lookup(env_vars::HTTP_TIMEOUT).and_then(|s| s.parse().ok()) {
            self.http_timeout_seconds = timeout;
        }

        if let Some(log_file_path) = lookup(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Host with a scheme and without a trailing slash.
    pub fn normalized_api_host(&self) -> String {
        let host = self.api_host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout. The identifier is masked.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if Path::new(&config_path).exists() {
            let config = Config::load().await?;
            println!("\nCurrent Configuration");
            println!("────────────────────────────────────");
            println!("Config Location:");
            println!("{config_path}");
            println!("────────────────────────────────────");
            println!("API Host:");
            println!("{}", config.normalized_api_host());
            println!("────────────────────────────────────");
            println!("App Identifier:");
            println!("{}", mask_identifier(&config.app_identifier));
            println!("────────────────────────────────────");
            println!("Page Size / Timeout / Retries:");
            println!(
                "{} records / {} seconds / {}",
                config.page_size, config.http_timeout_seconds, config.max_retries
            );
            println!("────────────────────────────────────");
            println!("Log File Location:");
            if let Some(custom_path) = &config.log_file_path {
                println!("{custom_path}");
            } else {
                println!("{log_dir}/hapi_brief.log");
                println!("(Default location)");
            }
        } else {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path, creating the parent
    /// directory and normalizing the host.
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(&Config {
            api_host: self.normalized_api_host(),
            ..self.clone()
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without env overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

fn mask_identifier(identifier: &str) -> String {
    let shown: String = identifier.chars().take(4).collect();
    if identifier.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{shown}****")
    }
}
