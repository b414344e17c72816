//! URL building utilities for API endpoints

use reqwest::Url;

use crate::constants::{API_PATH_PREFIX, query_keys};
use crate::data_fetcher::models::QueryParams;
use crate::error::AppError;

/// Builds the endpoint URL for a subcategory, without query parameters.
///
/// # Example
/// ```
/// use hapi_brief::data_fetcher::api::build_endpoint_url;
///
/// let url = build_endpoint_url("https://hapi.humdata.org/", "food", "food-price");
/// assert_eq!(url, "https://hapi.humdata.org/api/v1/food/food-price");
/// ```
pub fn build_endpoint_url(api_host: &str, category: &str, subcategory: &str) -> String {
    format!(
        "{}/{API_PATH_PREFIX}/{category}/{subcategory}",
        api_host.trim_end_matches('/')
    )
}

/// Builds the URL for one page request, URL-encoding every parameter.
pub fn build_page_url(
    api_host: &str,
    category: &str,
    subcategory: &str,
    params: &QueryParams,
) -> Result<Url, AppError> {
    let endpoint = build_endpoint_url(api_host, category, subcategory);
    Url::parse_with_params(&endpoint, params.to_query_pairs())
        .map_err(|e| AppError::InvalidUrl(format!("{endpoint}: {e}")))
}

/// The URL as a string with the application identifier masked, for logs and errors.
pub fn redact_url(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == query_keys::APP_IDENTIFIER {
                "REDACTED".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();

    if pairs.is_empty() {
        redacted.set_query(None);
    } else {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted.to_string()
}
