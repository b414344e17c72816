use futures::try_join;
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::{DateRange, default_stop_list};
use crate::data_fetcher::api::RecordSource;
use crate::data_fetcher::models::{
    FeatureCollection, MarketMap, QueryParams, Record, Sector, SubcategoryResult,
};
use crate::data_fetcher::processors::{
    aggregate_by_market, collect_sectors, resolve_subcategory, to_feature_collection,
};
use crate::error::AppError;

/// Which locations the listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationFilter {
    /// Locations with a Humanitarian Response Plan.
    #[default]
    Hrp,
    /// Locations in the Global Humanitarian Overview.
    Gho,
}

impl LocationFilter {
    fn params(self) -> QueryParams {
        match self {
            LocationFilter::Hrp => QueryParams::new().with("has_hrp", true),
            LocationFilter::Gho => QueryParams::new().with("in_gho", true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationsListing {
    pub filter: LocationFilter,
    pub stop_list: Vec<&'static str>,
    pub locations: Vec<Record>,
}

/// Everything shown for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationBrief {
    pub location: Record,
    pub admin_level: u8,
    pub stop_list: Vec<&'static str>,
    pub dates: DateRange,
    pub admin1s: Vec<Record>,
    pub population: Option<SubcategoryResult>,
    pub humanitarian_needs: Option<SubcategoryResult>,
    pub operational_presence: Option<SubcategoryResult>,
    pub funding: Option<SubcategoryResult>,
    pub refugees: Option<SubcategoryResult>,
    pub returnees: Option<SubcategoryResult>,
    pub idps: Option<SubcategoryResult>,
    pub national_risk: Option<SubcategoryResult>,
    pub food_price: Option<SubcategoryResult>,
    pub markets: MarketMap,
    pub market_features: FeatureCollection,
    pub sectors: Vec<Sector>,
}

#[instrument(skip(source))]
pub async fn fetch_locations<S: RecordSource>(
    source: &S,
    filter: LocationFilter,
) -> Result<LocationsListing, AppError> {
    let locations = source
        .fetch_data("metadata", "location", &filter.params())
        .await?;
    info!("Found {} locations", locations.len());
    Ok(LocationsListing {
        filter,
        stop_list: default_stop_list(),
        locations,
    })
}

/// Builds the country brief for `pcode`, or `None` when no such location exists.
///
/// Subcategories missing from the location's availability index are `None`
/// and cost no request. `dates` bounds the food-price query server-side.
#[instrument(skip(source))]
pub async fn fetch_location_brief<S: RecordSource>(
    source: &S,
    pcode: &str,
    dates: &DateRange,
) -> Result<Option<LocationBrief>, AppError> {
    let Some(location) = source
        .fetch_row("metadata", "location", &QueryParams::new().with("code", pcode))
        .await?
    else {
        warn!("No location with code {pcode}");
        return Ok(None);
    };
    let code = location.text("code").unwrap_or_else(|| pcode.to_string());

    let by_location = QueryParams::new().with("location_code", code.as_str());
    let (admin1s, availability) = try_join!(
        source.fetch_data("metadata", "admin1", &by_location),
        source.fetch_availability(&by_location),
    )?;
    let availability = Some(&availability);

    let national = QueryParams::new()
        .with("admin_level", 0)
        .with("location_code", code.as_str());
    let by_asylum = QueryParams::new().with("asylum_location_code", code.as_str());
    let food_params = dates.apply(
        QueryParams::new()
            .with("admin_level", 2)
            .with("location_code", code.as_str()),
    );

    let (
        population,
        humanitarian_needs,
        operational_presence,
        funding,
        refugees,
        returnees,
        idps,
        national_risk,
        food_price,
    ) = try_join!(
        resolve_subcategory(source, "population-social", "population", &national, availability),
        resolve_subcategory(source, "affected-people", "humanitarian-needs", &national, availability),
        resolve_subcategory(
            source,
            "coordination-context",
            "operational-presence",
            &by_location,
            availability
        ),
        resolve_subcategory(source, "coordination-context", "funding", &by_location, availability),
        resolve_subcategory(source, "affected-people", "refugees", &by_asylum, availability),
        resolve_subcategory(source, "affected-people", "returnees", &by_asylum, availability),
        resolve_subcategory(source, "affected-people", "idps", &national, availability),
        resolve_subcategory(
            source,
            "coordination-context",
            "national-risk",
            &by_location,
            availability
        ),
        resolve_subcategory(source, "food", "food-price", &food_params, availability),
    )?;

    let markets = food_price
        .as_ref()
        .map(|result| aggregate_by_market(&result.data))
        .unwrap_or_default();
    let market_features = to_feature_collection(&markets);
    let sectors = collect_sectors(&[operational_presence.as_ref(), humanitarian_needs.as_ref()]);

    Ok(Some(LocationBrief {
        location,
        admin_level: 0,
        stop_list: default_stop_list(),
        dates: dates.clone(),
        admin1s,
        population,
        humanitarian_needs,
        operational_presence,
        funding,
        refugees,
        returnees,
        idps,
        national_risk,
        food_price,
        markets,
        market_features,
        sectors,
    }))
}
