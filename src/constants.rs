//! Application-wide constants and configuration values
//!
//! This module centralizes all magic numbers and configuration constants
//! to improve maintainability and make the codebase more configurable.

/// Default HAPI host, without the `/api/v1` prefix
pub const DEFAULT_API_HOST: &str = "https://hapi.humdata.org";

/// Path prefix inserted between the host and `{category}/{subcategory}`
pub const API_PATH_PREFIX: &str = "api/v1";

/// Number of records requested per page
pub const DEFAULT_PAGE_SIZE: usize = 10_000;

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 16;

/// Query parameter names injected by the paginated fetcher
pub mod query_keys {
    pub const APP_IDENTIFIER: &str = "app_identifier";
    pub const LIMIT: &str = "limit";
    pub const OFFSET: &str = "offset";
}

/// Record values with special meaning during aggregation
pub mod records {
    /// Commodity category excluded from market aggregates
    pub const NON_FOOD_CATEGORY: &str = "non-food";

    /// Sector code for the non-sector-specific aggregate; never listed as a sector
    pub const INTERSECTORAL_SECTOR_CODE: &str = "Intersectoral";
}

/// Trailing window for conflict events on admin briefs, in days
pub const CONFLICT_EVENT_WINDOW_DAYS: i64 = 90;

/// Columns hidden from raw data tables
pub const STOP_LIST: &[&str] = &[
    "origin_location_ref",
    "asylum_location_ref",
    "location_ref",
    "location_code",
    "location_name",
    "admin1_ref",
    "admin2_ref",
    "sector_code",
    "org_type_code",
    "resource_hdx_id",
];

/// Environment variable names
pub mod env_vars {
    /// Environment variable for API host override
    pub const API_HOST: &str = "HAPI_API_HOST";

    /// Environment variable for the application identifier
    pub const APP_IDENTIFIER: &str = "HAPI_APP_IDENTIFIER";

    /// Environment variable for page size override
    pub const PAGE_SIZE: &str = "HAPI_PAGE_SIZE";

    /// Environment variable for HTTP timeout in seconds
    pub const HTTP_TIMEOUT: &str = "HAPI_HTTP_TIMEOUT";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "HAPI_LOG_FILE";
}

/// Retry configuration
pub mod retry {
    /// Default number of retries per page for transient failures
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 250;

    /// Upper bound on a server-requested `Retry-After` wait (seconds)
    pub const MAX_RETRY_AFTER_SECONDS: u64 = 30;
}
