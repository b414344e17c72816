//! Per-page data assembly: each brief gathers every dataset one dashboard
//! page shows for a geography, ready to be serialized.

pub mod admin;
pub mod location;
pub mod table;

pub use admin::{Admin1Brief, Admin2Brief, AdminSections, fetch_admin1_brief, fetch_admin2_brief};
pub use location::{
    LocationBrief, LocationFilter, LocationsListing, fetch_location_brief, fetch_locations,
};
pub use table::{DataTable, TableQuery, fetch_data_table, make_geo_name};

use serde::Serialize;

use crate::constants::STOP_LIST;
use crate::data_fetcher::models::QueryParams;

/// Optional `start_date`/`end_date` bounds, sent to the API as filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRange {
    pub fn new(start_date: Option<String>, end_date: Option<String>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }

    /// `params` with the bounds that are set appended.
    pub fn apply(&self, params: QueryParams) -> QueryParams {
        params
            .with_opt("start_date", self.start_date.as_deref())
            .with_opt("end_date", self.end_date.as_deref())
    }
}

/// Columns hidden from tabular output by default.
pub(crate) fn default_stop_list() -> Vec<&'static str> {
    STOP_LIST.to_vec()
}
