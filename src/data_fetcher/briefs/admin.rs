use futures::try_join;
use serde::Serialize;
use tracing::{instrument, warn};

use super::default_stop_list;
use crate::constants::CONFLICT_EVENT_WINDOW_DAYS;
use crate::data_fetcher::api::RecordSource;
use crate::data_fetcher::models::{
    AdminLevel, AdminUnit, AvailabilityIndex, FeatureCollection, MarketMap, QueryParams, Record,
    Sector, SubcategoryResult,
};
use crate::data_fetcher::processors::{
    aggregate_by_market, aggregate_latest, collect_sectors, fetch_conflict_events,
    provider_name_params, resolve_subcategory, resolve_with_fallback, to_feature_collection,
};
use crate::error::AppError;

/// Sections shared by admin1 and admin2 briefs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminSections {
    pub population: Option<SubcategoryResult>,
    /// Population came from the provider-name query.
    pub pop_use_provider_name: bool,
    pub humanitarian_needs: Option<SubcategoryResult>,
    pub operational_presence: Option<SubcategoryResult>,
    /// Operational presence came from the provider-name query.
    pub op_use_provider_name: bool,
    pub idps: Option<SubcategoryResult>,
    pub food_price: Option<SubcategoryResult>,
    pub markets: MarketMap,
    pub market_features: FeatureCollection,
    /// Latest price per commodity and admin2 unit.
    pub latest_prices: Vec<Record>,
    /// Conflict events over the trailing window only.
    pub conflict_event: Option<SubcategoryResult>,
    pub sectors: Vec<Sector>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Admin1Brief {
    pub admin1: Record,
    pub unit: AdminUnit,
    pub admin_level: u8,
    pub stop_list: Vec<&'static str>,
    pub admin2s: Vec<Record>,
    pub poverty_rate: Option<SubcategoryResult>,
    #[serde(flatten)]
    pub sections: AdminSections,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Admin2Brief {
    pub admin2: Record,
    pub unit: AdminUnit,
    pub admin_level: u8,
    pub stop_list: Vec<&'static str>,
    #[serde(flatten)]
    pub sections: AdminSections,
}

/// Looks up the metadata row of an admin unit.
async fn fetch_unit<S: RecordSource>(
    source: &S,
    level: AdminLevel,
    pcode: &str,
) -> Result<Option<(Record, AdminUnit)>, AppError> {
    let params = QueryParams::new().with("code", pcode);
    let Some(row) = source
        .fetch_row("metadata", level.metadata_subcategory(), &params)
        .await?
    else {
        warn!("No {} with code {pcode}", level.metadata_subcategory());
        return Ok(None);
    };
    match AdminUnit::from_record(level, &row) {
        Some(unit) => Ok(Some((row, unit))),
        None => {
            warn!(
                "{} row for {pcode} lacks code, name or location",
                level.metadata_subcategory()
            );
            Ok(None)
        }
    }
}

async fn fetch_sections<S: RecordSource>(
    source: &S,
    unit: &AdminUnit,
    availability: &AvailabilityIndex,
) -> Result<AdminSections, AppError> {
    let code_field = unit.level.code_field();
    let code = unit.code.as_str();
    let availability = Some(availability);

    let by_level = QueryParams::new()
        .with("admin_level", i64::from(unit.level.level()))
        .with(code_field, code);
    let by_code = QueryParams::new().with(code_field, code);

    let (population, humanitarian_needs, operational_presence, idps, food_price, conflict_event) = try_join!(
        resolve_with_fallback(
            source,
            "population-social",
            "population",
            &by_level,
            unit,
            availability
        ),
        resolve_subcategory(
            source,
            "affected-people",
            "humanitarian-needs",
            &by_level,
            availability
        ),
        resolve_with_fallback(
            source,
            "coordination-context",
            "operational-presence",
            &by_code,
            unit,
            availability
        ),
        resolve_subcategory(source, "affected-people", "idps", &by_level, availability),
        resolve_subcategory(source, "food", "food-price", &by_code, availability),
        fetch_conflict_events(
            source,
            code_field,
            code,
            Some(CONFLICT_EVENT_WINDOW_DAYS),
            availability
        ),
    )?;

    let (markets, latest_prices) = match &food_price {
        Some(result) => (
            aggregate_by_market(&result.data),
            aggregate_latest(&result.data).into_values().collect(),
        ),
        None => (MarketMap::new(), Vec::new()),
    };
    let market_features = to_feature_collection(&markets);
    let sectors = collect_sectors(&[
        operational_presence.result.as_ref(),
        humanitarian_needs.as_ref(),
    ]);

    Ok(AdminSections {
        population: population.result,
        pop_use_provider_name: population.used_provider_name,
        humanitarian_needs,
        operational_presence: operational_presence.result,
        op_use_provider_name: operational_presence.used_provider_name,
        idps,
        food_price,
        markets,
        market_features,
        latest_prices,
        conflict_event,
        sectors,
    })
}

/// Builds the brief for an admin1 unit, or `None` when the p-code is unknown.
///
/// Population and operational presence fall back to the provider-name query
/// when the p-code query finds nothing. Poverty rate is only published by
/// provider name.
#[instrument(skip(source))]
pub async fn fetch_admin1_brief<S: RecordSource>(
    source: &S,
    pcode: &str,
) -> Result<Option<Admin1Brief>, AppError> {
    let Some((admin1, unit)) = fetch_unit(source, AdminLevel::Admin1, pcode).await? else {
        return Ok(None);
    };

    let by_admin1 = QueryParams::new().with("admin1_code", unit.code.as_str());
    let (admin2s, availability) = try_join!(
        source.fetch_data("metadata", "admin2", &by_admin1),
        source.fetch_availability(&by_admin1),
    )?;

    let by_name = provider_name_params(&unit);
    let (poverty_rate, sections) = try_join!(
        resolve_subcategory(
            source,
            "population-social",
            "poverty-rate",
            &by_name,
            Some(&availability)
        ),
        fetch_sections(source, &unit, &availability),
    )?;

    Ok(Some(Admin1Brief {
        admin1,
        unit,
        admin_level: 1,
        stop_list: default_stop_list(),
        admin2s,
        poverty_rate,
        sections,
    }))
}

/// Builds the brief for an admin2 unit, or `None` when the p-code is unknown.
#[instrument(skip(source))]
pub async fn fetch_admin2_brief<S: RecordSource>(
    source: &S,
    pcode: &str,
) -> Result<Option<Admin2Brief>, AppError> {
    let Some((admin2, unit)) = fetch_unit(source, AdminLevel::Admin2, pcode).await? else {
        return Ok(None);
    };

    let availability = source
        .fetch_availability(&QueryParams::new().with("admin2_code", unit.code.as_str()))
        .await?;
    let sections = fetch_sections(source, &unit, &availability).await?;

    Ok(Some(Admin2Brief {
        admin2,
        unit,
        admin_level: 2,
        stop_list: default_stop_list(),
        sections,
    }))
}
