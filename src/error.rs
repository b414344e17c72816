use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch data from API: {0}")]
    ApiFetch(#[from] reqwest::Error),

    #[error("Failed to parse API response: {0}")]
    ApiParse(#[from] serde_json::Error),

    // Specific HTTP status code errors
    #[error("API request not found (404): {url}")]
    ApiNotFound { url: String },

    #[error("API server error ({status}): {message} (URL: {url})")]
    ApiServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API client error ({status}): {message} (URL: {url})")]
    ApiClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API rate limit exceeded (429): {message} (URL: {url})")]
    ApiRateLimit { message: String, url: String },

    #[error("API service unavailable ({status}): {message} (URL: {url})")]
    ApiServiceUnavailable {
        status: u16,
        message: String,
        url: String,
    },

    // Network-specific errors
    #[error("Network timeout while fetching data from: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    // Data parsing and validation errors
    #[error("API returned malformed JSON: {message} (URL: {url})")]
    ApiMalformedJson { message: String, url: String },

    #[error("API returned unexpected data structure: {message} (URL: {url})")]
    ApiUnexpectedStructure { message: String, url: String },

    #[error("API returned empty or missing data: {message} (URL: {url})")]
    ApiNoData { message: String, url: String },

    /// A page of a paginated query failed; the whole query is abandoned.
    #[error("Failed to fetch {category}/{subcategory}: {source}")]
    Fetch {
        category: String,
        subcategory: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Geography not found: {kind} {code}")]
    MissingGeography { kind: String, code: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Date/time parsing error: {0}")]
    DateTimeParse(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a date/time parsing error with context
    pub fn datetime_parse_error(msg: impl Into<String>) -> Self {
        Self::DateTimeParse(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create an API not found error
    pub fn api_not_found(url: impl Into<String>) -> Self {
        Self::ApiNotFound { url: url.into() }
    }

    /// Create an API server error (5xx status codes)
    pub fn api_server_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API client error (4xx status codes except 404 and 429)
    pub fn api_client_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API rate limit error
    pub fn api_rate_limit(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiRateLimit {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API service unavailable error
    pub fn api_service_unavailable(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServiceUnavailable {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a malformed JSON error
    pub fn api_malformed_json(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiMalformedJson {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an unexpected data structure error
    pub fn api_unexpected_structure(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiUnexpectedStructure {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a no data error
    pub fn api_no_data(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiNoData {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Wrap a page-level failure with the query it belonged to
    pub fn fetch_failure(
        category: impl Into<String>,
        subcategory: impl Into<String>,
        source: AppError,
    ) -> Self {
        Self::Fetch {
            category: category.into(),
            subcategory: subcategory.into(),
            source: Box::new(source),
        }
    }

    /// Create a missing geography error (e.g. kind = "admin1")
    pub fn missing_geography(kind: impl Into<String>, code: impl Into<String>) -> Self {
        Self::MissingGeography {
            kind: kind.into(),
            code: code.into(),
        }
    }

    /// Check if error is retryable (network issues, server errors, rate limits).
    /// `fetch_page` retries exactly these.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkTimeout { .. }
            | AppError::NetworkConnection { .. }
            | AppError::ApiServerError { .. }
            | AppError::ApiServiceUnavailable { .. }
            | AppError::ApiRateLimit { .. } => true,
            AppError::Fetch { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Check if error indicates data not found (business logic, not technical error)
    pub fn is_not_found(&self) -> bool {
        match self {
            AppError::ApiNotFound { .. }
            | AppError::ApiNoData { .. }
            | AppError::MissingGeography { .. } => true,
            AppError::Fetch { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// True for failures raised while talking to the remote API
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            AppError::Fetch { .. }
                | AppError::ApiFetch(_)
                | AppError::ApiParse(_)
                | AppError::ApiNotFound { .. }
                | AppError::ApiServerError { .. }
                | AppError::ApiClientError { .. }
                | AppError::ApiRateLimit { .. }
                | AppError::ApiServiceUnavailable { .. }
                | AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
                | AppError::ApiMalformedJson { .. }
                | AppError::ApiUnexpectedStructure { .. }
                | AppError::ApiNoData { .. }
        )
    }

    /// The (category, subcategory) of a failed query, if known
    pub fn failed_query(&self) -> Option<(&str, &str)> {
        match self {
            AppError::Fetch {
                category,
                subcategory,
                ..
            } => Some((category.as_str(), subcategory.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_helper() {
        let error = AppError::config_error("Invalid configuration");
        assert!(matches!(error, AppError::Config(_)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration"
        );
    }

    #[test]
    fn test_api_server_error_helper() {
        let error =
            AppError::api_server_error(500, "Internal server error", "https://api.example.com");
        assert!(matches!(error, AppError::ApiServerError { .. }));
        assert_eq!(
            error.to_string(),
            "API server error (500): Internal server error (URL: https://api.example.com)"
        );
    }

    #[test]
    fn test_fetch_failure_names_query() {
        let error = AppError::fetch_failure(
            "food",
            "food-price",
            AppError::network_timeout("https://hapi.example.org/api/v1/food/food-price"),
        );
        assert_eq!(
            error.to_string(),
            "Failed to fetch food/food-price: Network timeout while fetching data from: https://hapi.example.org/api/v1/food/food-price"
        );
        assert_eq!(error.failed_query(), Some(("food", "food-price")));
        assert!(error.is_fetch_failure());
        assert!(error.is_retryable());
    }

    #[test]
    fn test_missing_geography_is_not_found() {
        let error = AppError::missing_geography("admin1", "AF01");
        assert_eq!(error.to_string(), "Geography not found: admin1 AF01");
        assert!(error.is_not_found());
        assert!(!error.is_fetch_failure());
        assert!(!error.is_retryable());
        assert_eq!(error.failed_query(), None);
    }

    #[test]
    fn test_is_retryable() {
        assert!(AppError::network_timeout("url").is_retryable());
        assert!(AppError::network_connection("url", "message").is_retryable());
        assert!(AppError::api_server_error(500, "message", "url").is_retryable());
        assert!(AppError::api_rate_limit("message", "url").is_retryable());
        assert!(AppError::api_service_unavailable(503, "message", "url").is_retryable());

        assert!(!AppError::api_not_found("url").is_retryable());
        assert!(!AppError::api_client_error(400, "message", "url").is_retryable());
        assert!(!AppError::config_error("message").is_retryable());
        assert!(!AppError::api_malformed_json("message", "url").is_retryable());
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_error: AppError = json_error.into();
        assert!(matches!(app_error, AppError::ApiParse(_)));
        assert!(app_error.is_fetch_failure());
    }

    #[test]
    fn test_error_from_toml_deserialize() {
        let toml_error = toml::from_str::<serde_json::Value>("invalid = [toml").unwrap_err();
        let app_error: AppError = toml_error.into();
        assert!(matches!(app_error, AppError::TomlDeserialize(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
    }
}
