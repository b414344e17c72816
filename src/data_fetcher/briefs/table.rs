use futures::future::try_join_all;
use indexmap::IndexSet;
use serde::Serialize;
use tracing::{info, instrument};

use super::{DateRange, default_stop_list};
use crate::data_fetcher::api::RecordSource;
use crate::data_fetcher::models::{QueryParams, Record};
use crate::error::AppError;

/// Filters for a raw data table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableQuery {
    pub category: String,
    pub subcategory: String,
    pub location_code: Option<String>,
    pub admin1_code: Option<String>,
    pub admin2_code: Option<String>,
    pub provider_admin1_name: Option<String>,
    pub provider_admin2_name: Option<String>,
    pub sector_code: Option<String>,
    pub admin_level: Option<u8>,
    pub dates: DateRange,
}

impl TableQuery {
    pub fn new(category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
            ..Self::default()
        }
    }

    /// API filters. A provider name replaces the p-code of the same level.
    pub fn params(&self) -> QueryParams {
        let mut params = QueryParams::new()
            .with_opt("location_code", self.location_code.as_deref())
            .with_opt("admin1_code", self.admin1_code.as_deref())
            .with_opt("admin2_code", self.admin2_code.as_deref())
            .with_opt("sector_code", self.sector_code.as_deref())
            .with_opt("admin_level", self.admin_level)
            .with_opt("provider_admin1_name", self.provider_admin1_name.as_deref())
            .with_opt("provider_admin2_name", self.provider_admin2_name.as_deref());
        if params.contains_key("provider_admin1_name") {
            params.remove("admin1_code");
        }
        if params.contains_key("provider_admin2_name") {
            params.remove("admin2_code");
        }
        self.dates.apply(params)
    }
}

/// A full subcategory table with its geography, sector and source resources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTable {
    pub title: String,
    pub category: String,
    pub subcategory: String,
    pub params: QueryParams,
    /// Level of the most specific geography given: 0, 1 or 2.
    pub admin_level: u8,
    pub geo: Option<Record>,
    pub sector: Option<Record>,
    pub stop_list: Vec<&'static str>,
    pub data: Vec<Record>,
    pub resources: Vec<Record>,
}

/// Human-readable name of the table's geography, most specific part first,
/// followed by the geography's code.
///
/// # Examples
///
/// ```
/// use hapi_brief::data_fetcher::briefs::make_geo_name;
/// use hapi_brief::testing_utils::RecordBuilder;
///
/// let geo = RecordBuilder::new()
///     .field("code", "AF01")
///     .field("name", "Kabul")
///     .field("location_name", "Afghanistan")
///     .build();
///
/// assert_eq!(make_geo_name(1, Some(&geo), None, None), "Kabul, Afghanistan (AF01)");
/// ```
pub fn make_geo_name(
    admin_level: u8,
    geo: Option<&Record>,
    provider_admin1_name: Option<&str>,
    provider_admin2_name: Option<&str>,
) -> String {
    let field = |name: &str| geo.and_then(|g| g.text(name));
    let mut parts: Vec<String> = Vec::new();

    if admin_level == 2 {
        parts.extend(field("name"));
    } else if let Some(name) = provider_admin2_name {
        parts.push(name.to_string());
    }

    if admin_level == 1 {
        parts.extend(field("name"));
    } else if let Some(name) = field("admin1_name") {
        parts.push(name);
    } else if let Some(name) = provider_admin1_name {
        parts.push(name.to_string());
    }

    if let Some(name) = field("location_name").or_else(|| field("name")) {
        parts.push(name);
    }

    let mut label = if parts.is_empty() {
        "all locations".to_string()
    } else {
        parts.join(", ")
    };
    if let Some(code) = field("code") {
        label.push_str(&format!(" ({code})"));
    }
    label
}

fn subcategory_words(subcategory: &str) -> String {
    let words = subcategory.replace('-', " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Columns to hide for a table at `admin_level`.
pub fn stop_list_for_level(admin_level: u8) -> Vec<&'static str> {
    let mut stop_list = default_stop_list();
    if admin_level > 0 {
        stop_list.extend(["provider_admin1_name", "admin1_name", "admin1_code"]);
    }
    if admin_level > 1 {
        stop_list.extend(["provider_admin2_name", "admin2_name", "admin2_code"]);
    }
    stop_list
}

/// Distinct `metadata/resource` rows referenced by `resource_hdx_id`.
async fn fetch_resources<S: RecordSource>(
    source: &S,
    data: &[Record],
) -> Result<Vec<Record>, AppError> {
    let ids: IndexSet<String> = data
        .iter()
        .filter_map(|row| row.text("resource_hdx_id"))
        .collect();
    let params: Vec<QueryParams> = ids
        .iter()
        .map(|id| QueryParams::new().with("resource_hdx_id", id))
        .collect();
    let rows = try_join_all(
        params
            .iter()
            .map(|p| source.fetch_row("metadata", "resource", p)),
    )
    .await?;
    Ok(rows.into_iter().flatten().collect())
}

/// Fetches a raw table for the query with its title and supporting rows.
///
/// The geography is the most specific p-code given (admin2, then admin1, then
/// location); with none of them the table has no geography row.
#[instrument(skip(source))]
pub async fn fetch_data_table<S: RecordSource>(
    source: &S,
    query: &TableQuery,
) -> Result<DataTable, AppError> {
    let (admin_level, geo_lookup) = if let Some(code) = &query.admin2_code {
        (2, Some(("admin2", code)))
    } else if let Some(code) = &query.admin1_code {
        (1, Some(("admin1", code)))
    } else {
        (0, query.location_code.as_ref().map(|code| ("location", code)))
    };

    let geo = match geo_lookup {
        Some((subcategory, code)) => {
            source
                .fetch_row("metadata", subcategory, &QueryParams::new().with("code", code))
                .await?
        }
        None => None,
    };
    let sector = match &query.sector_code {
        Some(code) => {
            source
                .fetch_row("metadata", "sector", &QueryParams::new().with("code", code))
                .await?
        }
        None => None,
    };

    let mut title = format!(
        "Data: {} for {}",
        subcategory_words(&query.subcategory),
        make_geo_name(
            admin_level,
            geo.as_ref(),
            query.provider_admin1_name.as_deref(),
            query.provider_admin2_name.as_deref(),
        )
    );
    if let Some(name) = sector.as_ref().and_then(|s| s.text("name")) {
        title.push_str(&format!(" / {name}"));
    }

    let params = query.params();
    let data = source
        .fetch_data(&query.category, &query.subcategory, &params)
        .await?;
    let resources = fetch_resources(source, &data).await?;
    info!(
        "Table {}/{}: {} rows from {} resources",
        query.category,
        query.subcategory,
        data.len(),
        resources.len()
    );

    Ok(DataTable {
        title,
        category: query.category.clone(),
        subcategory: query.subcategory.clone(),
        params,
        admin_level,
        geo,
        sector,
        stop_list: stop_list_for_level(admin_level),
        data,
        resources,
    })
}
