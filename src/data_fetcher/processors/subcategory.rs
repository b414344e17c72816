use tracing::{debug, instrument};

use crate::data_fetcher::api::RecordSource;
use crate::data_fetcher::models::{AvailabilityIndex, QueryParams, SubcategoryResult};
use crate::error::AppError;

/// Resolves one subcategory for a geography.
///
/// When `availability` is given and does not list `subcategory`, returns
/// `Ok(None)` without touching the network. Otherwise fetches every record
/// and wraps them with the params and derived metadata. An empty fetch is
/// `Some` with `has_data == false`, not an error.
#[instrument(skip(source, params, availability))]
pub async fn resolve_subcategory<S: RecordSource>(
    source: &S,
    category: &str,
    subcategory: &str,
    params: &QueryParams,
    availability: Option<&AvailabilityIndex>,
) -> Result<Option<SubcategoryResult>, AppError> {
    if let Some(index) = availability
        && !index.contains_subcategory(subcategory)
    {
        debug!("{subcategory} not available for this geography, skipping");
        return Ok(None);
    }

    let data = source.fetch_data(category, subcategory, params).await?;
    Ok(Some(SubcategoryResult::from_records(params.clone(), data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{MockRecordSource, RecordBuilder};

    fn availability(subcategories: &[&str]) -> AvailabilityIndex {
        AvailabilityIndex::new(
            subcategories
                .iter()
                .map(|s| RecordBuilder::new().field("subcategory", *s).build())
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_unavailable_subcategory_skips_fetch() {
        let source = MockRecordSource::new().respond(
            "food",
            "food-price",
            vec![RecordBuilder::price("M1", "C1", "cereals", "2024-01-01", 1.0).build()],
        );
        let index = availability(&["population"]);

        let result = resolve_subcategory(
            &source,
            "food",
            "food-price",
            &QueryParams::new().with("location_code", "AFG"),
            Some(&index),
        )
        .await
        .unwrap();

        assert!(result.is_none());
        assert_eq!(source.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_availability_skips_everything() {
        let source = MockRecordSource::new();
        let index = AvailabilityIndex::default();

        let result = resolve_subcategory(
            &source,
            "population-social",
            "population",
            &QueryParams::new(),
            Some(&index),
        )
        .await
        .unwrap();

        assert!(result.is_none());
        assert_eq!(source.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_no_availability_means_no_filtering() {
        let source = MockRecordSource::new().respond(
            "population-social",
            "population",
            vec![
                RecordBuilder::new()
                    .field("population", 120)
                    .field("dataset_hdx_provider_name", "UNFPA")
                    .period("2023-01-01", "2023-12-31")
                    .build(),
                RecordBuilder::new()
                    .field("population", 80)
                    .field("dataset_hdx_provider_name", "UNFPA")
                    .period("2022-01-01", "2022-12-31")
                    .build(),
            ],
        );
        let params = QueryParams::new().with("admin1_code", "AF01");

        let result = resolve_subcategory(&source, "population-social", "population", &params, None)
            .await
            .unwrap()
            .unwrap();

        assert!(result.has_data);
        assert_eq!(result.params, params);
        assert_eq!(result.start_date.as_deref(), Some("2022-01-01"));
        assert_eq!(result.end_date.as_deref(), Some("2023-12-31"));
        assert_eq!(result.latest_date, result.end_date);
        assert_eq!(result.sources.iter().collect::<Vec<_>>(), vec!["UNFPA"]);

        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].params, params);
    }

    #[tokio::test]
    async fn test_empty_fetch_is_present_without_data() {
        let source = MockRecordSource::new();
        let index = availability(&["idps"]);

        let result = resolve_subcategory(
            &source,
            "affected-people",
            "idps",
            &QueryParams::new(),
            Some(&index),
        )
        .await
        .unwrap()
        .unwrap();

        assert!(!result.has_data);
        assert!(result.start_date.is_none());
        assert!(result.end_date.is_none());
        assert!(result.latest_date.is_none());
        assert!(result.sources.is_empty());
        assert_eq!(source.call_count("affected-people", "idps"), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let source = MockRecordSource::new().fail("funding", "funding");

        let err = resolve_subcategory(&source, "funding", "funding", &QueryParams::new(), None)
            .await
            .unwrap_err();

        assert_eq!(err.failed_query(), Some(("funding", "funding")));
    }
}
