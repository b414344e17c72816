//! The seam between record consumers and the HTTP fetcher

use std::future::Future;

use crate::data_fetcher::models::{AvailabilityIndex, QueryParams, Record};
use crate::error::AppError;

/// Anything that can return every record of a `(category, subcategory, params)` query.
///
/// [`super::HapiClient`] is the production implementation; resolvers,
/// fallbacks and briefs are generic over this trait.
pub trait RecordSource: Sync {
    /// All records of the query, in the order the API returned them.
    fn fetch_data(
        &self,
        category: &str,
        subcategory: &str,
        params: &QueryParams,
    ) -> impl Future<Output = Result<Vec<Record>, AppError>> + Send;

    /// First record of the query, `None` when there is none.
    fn fetch_row(
        &self,
        category: &str,
        subcategory: &str,
        params: &QueryParams,
    ) -> impl Future<Output = Result<Option<Record>, AppError>> + Send {
        async move {
            let rows = self.fetch_data(category, subcategory, params).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// `metadata/data-availability` for the geography described by `params`.
    fn fetch_availability(
        &self,
        params: &QueryParams,
    ) -> impl Future<Output = Result<AvailabilityIndex, AppError>> + Send {
        async move {
            let rows = self
                .fetch_data("metadata", "data-availability", params)
                .await?;
            Ok(AvailabilityIndex::new(rows))
        }
    }
}
