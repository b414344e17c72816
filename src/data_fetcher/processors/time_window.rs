use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use tracing::debug;

use super::subcategory::resolve_subcategory;
use crate::constants::CONFLICT_EVENT_WINDOW_DAYS;
use crate::data_fetcher::api::RecordSource;
use crate::data_fetcher::models::{AvailabilityIndex, QueryParams, Record, SubcategoryResult};
use crate::error::AppError;

/// Parses a HAPI reference date.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC) or a
/// plain `YYYY-MM-DD` (midnight UTC).
pub fn parse_reference_date(value: &str) -> Result<DateTime<Utc>, AppError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::datetime_parse_error(format!("Unrecognised date '{value}'")))
}

/// A `None` cutoff keeps every record with a parseable start.
fn starts_on_or_after(record: &Record, cutoff: Option<DateTime<Utc>>) -> bool {
    record
        .reference_period_start()
        .and_then(|start| parse_reference_date(start).ok())
        .is_some_and(|start| cutoff.is_none_or(|cutoff| start >= cutoff))
}

/// Keeps the records whose period starts within the last `days` days.
pub fn restrict(result: &SubcategoryResult, days: i64) -> SubcategoryResult {
    restrict_at(result, days, Utc::now())
}

/// Like [`restrict`], measured back from `now`.
///
/// The cutoff is inclusive and there is no upper bound. A window reaching
/// past the representable date range has no lower bound either. Records
/// without a parseable start date are dropped. Metadata is recomputed from the kept rows.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use hapi_brief::data_fetcher::models::{QueryParams, SubcategoryResult};
/// use hapi_brief::data_fetcher::processors::restrict_at;
/// use hapi_brief::testing_utils::RecordBuilder;
///
/// let result = SubcategoryResult::from_records(
///     QueryParams::new(),
///     vec![
///         RecordBuilder::new().period("2024-01-01", "2024-01-31").build(),
///         RecordBuilder::new().period("2024-05-01", "2024-05-31").build(),
///     ],
/// );
/// let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
///
/// let recent = restrict_at(&result, 90, now);
/// assert_eq!(recent.data.len(), 1);
/// assert_eq!(recent.start_date.as_deref(), Some("2024-05-01"));
/// ```
pub fn restrict_at(result: &SubcategoryResult, days: i64, now: DateTime<Utc>) -> SubcategoryResult {
    let cutoff = TimeDelta::try_days(days).and_then(|window| now.checked_sub_signed(window));
    let kept: Vec<Record> = result
        .data
        .iter()
        .filter(|record| starts_on_or_after(record, cutoff))
        .cloned()
        .collect();
    match cutoff {
        Some(cutoff) => debug!(
            "Kept {} of {} records starting on or after {cutoff}",
            kept.len(),
            result.data.len()
        ),
        None => debug!(
            "Window of {days} days is unbounded, kept {} of {} dated records",
            kept.len(),
            result.data.len()
        ),
    }
    result.with_records(kept)
}

/// Conflict events for one geography over the trailing window.
///
/// `property` is the filter field (`location_code`, `admin1_code`, ...).
/// `days` defaults to [`CONFLICT_EVENT_WINDOW_DAYS`].
pub async fn fetch_conflict_events<S: RecordSource>(
    source: &S,
    property: &str,
    value: &str,
    days: Option<i64>,
    availability: Option<&AvailabilityIndex>,
) -> Result<Option<SubcategoryResult>, AppError> {
    let params = QueryParams::new().with(property, value);
    let result = resolve_subcategory(
        source,
        "coordination-context",
        "conflict-event",
        &params,
        availability,
    )
    .await?;
    let days = days.unwrap_or(CONFLICT_EVENT_WINDOW_DAYS);
    Ok(result.map(|r| restrict(&r, days)))
}
