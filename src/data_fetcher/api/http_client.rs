//! HTTP client creation and configuration utilities

use reqwest::Client;
use std::time::Duration;

/// Creates an HTTP client with connection pooling and a per-request timeout.
///
/// A request that exceeds the timeout fails with a timeout error, which the
/// fetcher reports as a network timeout for the whole query.
pub fn create_http_client_with_timeout(timeout_seconds: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .user_agent(concat!("hapi_brief/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Creates an HTTP client for testing with default timeout
#[cfg(test)]
pub fn create_test_http_client() -> Client {
    create_http_client_with_timeout(crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS)
        .expect("Failed to create test HTTP client")
}
