use indexmap::IndexSet;
use serde::Serialize;

use super::query::QueryParams;
use super::record::Record;

/// Fetched rows for one subcategory together with the params that produced
/// them and summary metadata.
///
/// `start_date`, `end_date`, `latest_date` are `None` whenever `has_data` is
/// false; read them only after checking `has_data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryResult {
    pub params: QueryParams,
    pub data: Vec<Record>,
    pub has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_date: Option<String>,
    pub sources: IndexSet<String>,
}

impl SubcategoryResult {
    /// Wraps rows and derives the metadata from them.
    ///
    /// Reference periods are ISO-8601 strings from a single API, so string
    /// order is chronological order.
    pub fn from_records(params: QueryParams, data: Vec<Record>) -> Self {
        let has_data = !data.is_empty();

        let start_date = data
            .iter()
            .filter_map(Record::reference_period_start)
            .min()
            .map(str::to_string);
        let end_date = data
            .iter()
            .filter_map(Record::reference_period_end)
            .max()
            .map(str::to_string);
        let sources = data
            .iter()
            .filter_map(|row| row.text("dataset_hdx_provider_name"))
            .collect();

        Self {
            params,
            has_data,
            start_date,
            latest_date: end_date.clone(),
            end_date,
            sources,
            data,
        }
    }

    /// Same params, new rows, metadata recomputed.
    pub fn with_records(&self, data: Vec<Record>) -> Self {
        Self::from_records(self.params.clone(), data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
