use reqwest::Client;
use tracing::{debug, info, instrument};

use super::fetch_utils::fetch_page;
use super::http_client::create_http_client_with_timeout;
use super::source::RecordSource;
use super::urls::build_page_url;
use crate::config::Config;
use crate::constants::query_keys;
use crate::data_fetcher::models::{QueryParams, Record};
use crate::error::AppError;

/// Paginated HAPI client.
///
/// Holds an immutable copy of the configuration; the application identifier
/// only ever leaves it as a query parameter (and `Debug` masks it).
#[derive(Debug, Clone)]
pub struct HapiClient {
    client: Client,
    config: Config,
}

impl HapiClient {
    /// Validates the configuration and builds a pooled client with its timeout.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        config.validate()?;
        let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
        Ok(Self::with_client(client, config.clone()))
    }

    pub fn with_client(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Copy of `params` with the identifier and page size added.
    fn page_params(&self, params: &QueryParams) -> QueryParams {
        let mut query = params.clone();
        query.insert(
            query_keys::APP_IDENTIFIER,
            self.config.app_identifier.as_str(),
        );
        query.insert(query_keys::LIMIT, self.config.page_size);
        query
    }

    /// Fetches every page of a query.
    ///
    /// Pages are requested one after another at offsets 0, P, 2P, ... until a
    /// page holds fewer than P records, so a result of exactly k*P records
    /// costs one trailing empty page. Records keep page order and in-page
    /// order. A failure on any page discards everything fetched so far.
    #[instrument(skip(self, params))]
    pub async fn fetch_all(
        &self,
        category: &str,
        subcategory: &str,
        params: &QueryParams,
    ) -> Result<Vec<Record>, AppError> {
        let api_host = self.config.normalized_api_host();
        let page_size = self.config.page_size.max(1);
        let mut query = self.page_params(params);
        let mut results = Vec::new();
        let mut offset = 0usize;
        let mut pages = 0usize;

        info!("Fetching {category}/{subcategory}");

        loop {
            query.insert(query_keys::OFFSET, offset);
            let url = build_page_url(&api_host, category, subcategory, &query)
                .map_err(|e| AppError::fetch_failure(category, subcategory, e))?;
            let page = fetch_page(&self.client, url, self.config.max_retries)
                .await
                .map_err(|e| AppError::fetch_failure(category, subcategory, e))?;

            let returned = page.data.len();
            pages += 1;
            debug!("Page {pages} at offset {offset}: {returned} records");
            results.extend(page.data);

            if returned < page_size {
                break;
            }
            offset += page_size;
        }

        info!(
            "Fetched {} records for {category}/{subcategory} in {pages} page(s)",
            results.len()
        );
        Ok(results)
    }
}

impl RecordSource for HapiClient {
    async fn fetch_data(
        &self,
        category: &str,
        subcategory: &str,
        params: &QueryParams,
    ) -> Result<Vec<Record>, AppError> {
        self.fetch_all(category, subcategory, params).await
    }
}
