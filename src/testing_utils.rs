//! Record builders and an in-memory [`RecordSource`] for tests

use serde_json::{Map, Value};
use std::sync::Mutex;

use crate::data_fetcher::api::RecordSource;
use crate::data_fetcher::models::{QueryParams, Record};
use crate::error::AppError;

/// Builds a [`Record`] field by field.
#[derive(Debug, Default, Clone)]
pub struct RecordBuilder(Map<String, Value>);

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn period(self, start: &str, end: &str) -> Self {
        self.field("reference_period_start", start)
            .field("reference_period_end", end)
    }

    pub fn build(self) -> Record {
        Record::new(self.0)
    }

    /// A food-price row with the fields market aggregation reads.
    pub fn price(
        market_code: &str,
        commodity_code: &str,
        commodity_category: &str,
        start: &str,
        price: f64,
    ) -> Self {
        Self::new()
            .field("market_code", market_code)
            .field("market_name", format!("{market_code} market"))
            .field("admin2_code", format!("{market_code}-A2"))
            .field("admin2_name", format!("{market_code} district"))
            .field("lat", 34.5)
            .field("lon", 69.2)
            .field("commodity_code", commodity_code)
            .field("commodity_name", format!("{commodity_code} name"))
            .field("commodity_category", commodity_category)
            .field("currency_code", "AFN")
            .field("unit", "KG")
            .field("price", price)
            .period(start, start)
    }
}

/// One call received by [`MockRecordSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub category: String,
    pub subcategory: String,
    pub params: QueryParams,
}

#[derive(Debug)]
struct MockRule {
    category: String,
    subcategory: String,
    required: QueryParams,
    outcome: Option<Vec<Record>>,
}

impl MockRule {
    fn matches(&self, category: &str, subcategory: &str, params: &QueryParams) -> bool {
        self.category == category
            && self.subcategory == subcategory
            && self
                .required
                .iter()
                .all(|(key, value)| params.get(key) == Some(value))
    }
}

/// Canned responses keyed by query, with a log of every call.
///
/// The first matching rule answers; unmatched queries return no rows.
#[derive(Debug, Default)]
pub struct MockRecordSource {
    rules: Vec<MockRule>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, category: &str, subcategory: &str, records: Vec<Record>) -> Self {
        self.respond_when(category, subcategory, QueryParams::new(), records)
    }

    /// Answers only when every entry of `required` is present in the call's params.
    pub fn respond_when(
        mut self,
        category: &str,
        subcategory: &str,
        required: QueryParams,
        records: Vec<Record>,
    ) -> Self {
        self.rules.push(MockRule {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            required,
            outcome: Some(records),
        });
        self
    }

    /// Makes the query fail like an exhausted server error.
    pub fn fail(mut self, category: &str, subcategory: &str) -> Self {
        self.rules.push(MockRule {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            required: QueryParams::new(),
            outcome: None,
        });
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, category: &str, subcategory: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.category == category && call.subcategory == subcategory)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls().len()
    }
}

impl RecordSource for MockRecordSource {
    async fn fetch_data(
        &self,
        category: &str,
        subcategory: &str,
        params: &QueryParams,
    ) -> Result<Vec<Record>, AppError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                category: category.to_string(),
                subcategory: subcategory.to_string(),
                params: params.clone(),
            });
        }

        match self
            .rules
            .iter()
            .find(|rule| rule.matches(category, subcategory, params))
        {
            Some(MockRule {
                outcome: Some(records),
                ..
            }) => Ok(records.clone()),
            Some(_) => Err(AppError::fetch_failure(
                category,
                subcategory,
                AppError::api_server_error(500, "Internal Server Error", "mock://hapi"),
            )),
            None => Ok(Vec::new()),
        }
    }
}
