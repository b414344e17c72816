use serde::Serialize;
use tracing::info;

use super::subcategory::resolve_subcategory;
use crate::data_fetcher::api::RecordSource;
use crate::data_fetcher::models::{AdminUnit, AvailabilityIndex, QueryParams, SubcategoryResult};
use crate::error::AppError;

/// Result of a p-code lookup with provider-name fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackOutcome {
    pub result: Option<SubcategoryResult>,
    /// Set whenever the provider-name query ran, even if it found nothing.
    pub used_provider_name: bool,
}

impl FallbackOutcome {
    pub fn has_data(&self) -> bool {
        self.result.as_ref().is_some_and(|r| r.has_data)
    }
}

/// Params of the provider-name query for `unit`.
pub fn provider_name_params(unit: &AdminUnit) -> QueryParams {
    QueryParams::new()
        .with("location_code", unit.location_code.as_str())
        .with(unit.level.provider_name_field(), unit.name.as_str())
}

/// Queries by p-code first, then by provider-supplied name.
///
/// Some providers publish admin-level rows keyed only by their own free-text
/// name. The second query is sent only when the first yields no result or no
/// rows, and it ignores `availability` since the index is keyed by p-code.
pub async fn resolve_with_fallback<S: RecordSource>(
    source: &S,
    category: &str,
    subcategory: &str,
    code_params: &QueryParams,
    unit: &AdminUnit,
    availability: Option<&AvailabilityIndex>,
) -> Result<FallbackOutcome, AppError> {
    let first =
        resolve_subcategory(source, category, subcategory, code_params, availability).await?;
    if first.as_ref().is_some_and(|r| r.has_data) {
        return Ok(FallbackOutcome {
            result: first,
            used_provider_name: false,
        });
    }

    info!(
        "No {subcategory} rows for {} {}, retrying by provider name",
        unit.level.code_field(),
        unit.code
    );
    let result = resolve_subcategory(
        source,
        category,
        subcategory,
        &provider_name_params(unit),
        None,
    )
    .await?;

    Ok(FallbackOutcome {
        result,
        used_provider_name: true,
    })
}
