//! Single-page HTTP fetching with retry logic and error classification

use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use super::urls::redact_url;
use crate::constants::retry::{BASE_DELAY_MS, MAX_RETRY_AFTER_SECONDS};
use crate::data_fetcher::models::Record;
use crate::error::AppError;

/// Body of every HAPI list endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct ApiPage {
    pub data: Vec<Record>,
}

/// Fetches and parses one page.
///
/// Failures that [`AppError::is_retryable`] accepts (timeouts, connection
/// failures, 429 and 5xx) are retried up to `max_retries` times with
/// exponential backoff. A `Retry-After` header replaces the backoff, capped at
/// `MAX_RETRY_AFTER_SECONDS`. Any other failure, or the last failed attempt,
/// is returned as is.
#[instrument(skip(client, url), fields(url = %redact_url(&url)))]
pub(super) async fn fetch_page(
    client: &Client,
    url: Url,
    max_retries: u32,
) -> Result<ApiPage, AppError> {
    let display_url = redact_url(&url);
    debug!("Fetching page from URL: {display_url}");

    let mut attempt = 0u32;
    let mut backoff = Duration::from_millis(BASE_DELAY_MS);
    let response = loop {
        let (err, retry_after) = match client.get(url.clone()).send().await {
            Ok(resp) if resp.status().is_success() => break resp,
            Ok(resp) => (status_error(resp.status(), &display_url), retry_after_header(&resp)),
            Err(e) => (request_error(e.without_url(), &display_url), None),
        };

        if !err.is_retryable() || attempt >= max_retries {
            error!("Request failed for URL {}: {}", display_url, err);
            return Err(err);
        }

        let wait = retry_wait(retry_after, backoff);
        warn!(
            "Transient failure from {}: {}. Retrying in {:?} (attempt {}/{})",
            display_url,
            err,
            wait,
            attempt + 1,
            max_retries
        );
        tokio::time::sleep(wait).await;
        attempt += 1;
        backoff = backoff.saturating_mul(2);
    };

    debug!("Response status: {}", response.status());

    let response_text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            let e = e.without_url();
            error!("Failed to read response text from URL {}: {}", display_url, e);
            return Err(AppError::ApiFetch(e));
        }
    };

    debug!("Response length: {} bytes", response_text.len());

    parse_page(&response_text, &display_url)
}

/// Maps a non-success status to its error kind.
fn status_error(status: StatusCode, display_url: &str) -> AppError {
    let status_code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown error");
    debug!("HTTP {} - {} (URL: {})", status_code, reason, display_url);

    match status_code {
        404 => AppError::api_not_found(display_url),
        429 => AppError::api_rate_limit(reason, display_url),
        400..=499 => AppError::api_client_error(status_code, reason, display_url),
        502 | 503 => AppError::api_service_unavailable(status_code, reason, display_url),
        _ => AppError::api_server_error(status_code, reason, display_url),
    }
}

/// Maps a transport failure. The error must already have its URL stripped.
fn request_error(e: reqwest::Error, display_url: &str) -> AppError {
    if e.is_timeout() {
        AppError::network_timeout(display_url)
    } else if e.is_connect() {
        AppError::network_connection(display_url, e.to_string())
    } else {
        AppError::ApiFetch(e)
    }
}

/// `Retry-After` in whole seconds, if the server sent one.
fn retry_after_header(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn retry_wait(retry_after: Option<Duration>, backoff: Duration) -> Duration {
    retry_after
        .map(|wait| wait.min(Duration::from_secs(MAX_RETRY_AFTER_SECONDS)))
        .unwrap_or(backoff)
}

/// Parses a page body, telling empty, non-JSON and wrongly shaped bodies apart.
pub(super) fn parse_page(body: &str, display_url: &str) -> Result<ApiPage, AppError> {
    match serde_json::from_str::<ApiPage>(body) {
        Ok(page) => Ok(page),
        Err(e) => {
            error!("Failed to parse API response: {} (URL: {})", e, display_url);
            let preview: String = body.chars().take(200).collect();
            debug!("Response text (first 200 chars): {preview}");

            let trimmed = body.trim_start();
            if trimmed.is_empty() {
                Err(AppError::api_no_data("Response body is empty", display_url))
            } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                Err(AppError::api_malformed_json(
                    "Response is not valid JSON",
                    display_url,
                ))
            } else {
                Err(AppError::api_unexpected_structure(e.to_string(), display_url))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_reads_data_array() {
        let page = parse_page(r#"{"data":[{"code":"AFG"},{"code":"SDN"}]}"#, "url").unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[1].str_field("code"), Some("SDN"));
    }

    #[test]
    fn test_parse_page_error_kinds() {
        assert!(matches!(
            parse_page("", "url"),
            Err(AppError::ApiNoData { .. })
        ));
        assert!(matches!(
            parse_page("<html>Bad gateway</html>", "url"),
            Err(AppError::ApiMalformedJson { .. })
        ));
        assert!(matches!(
            parse_page(r#"{"detail":"Not authenticated"}"#, "url"),
            Err(AppError::ApiUnexpectedStructure { .. })
        ));
        assert!(matches!(
            parse_page(r#"{"data":[1,2]}"#, "url"),
            Err(AppError::ApiUnexpectedStructure { .. })
        ));
    }

    #[test]
    fn test_retry_after_is_capped() {
        let backoff = Duration::from_millis(500);
        assert_eq!(retry_wait(None, backoff), backoff);
        assert_eq!(
            retry_wait(Some(Duration::from_secs(2)), backoff),
            Duration::from_secs(2)
        );
        assert_eq!(
            retry_wait(Some(Duration::from_secs(86_400)), backoff),
            Duration::from_secs(MAX_RETRY_AFTER_SECONDS)
        );
    }

    #[test]
    fn test_status_error_kinds_match_retry_policy() {
        let retried = [429u16, 500, 502, 503, 504];
        let not_retried = [400u16, 401, 403, 404, 422];
        for code in retried {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(status_error(status, "url").is_retryable(), "{code}");
        }
        for code in not_retried {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(!status_error(status, "url").is_retryable(), "{code}");
        }
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "url"),
            AppError::ApiNotFound { .. }
        ));
    }
}
