use indexmap::IndexMap;
use serde::Serialize;

use super::record::Record;

/// One price observation of a commodity at a market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceObservation {
    pub currency_code: Option<String>,
    pub price: Option<f64>,
    pub reference_period_start: Option<String>,
    pub reference_period_end: Option<String>,
    pub unit: Option<String>,
}

impl PriceObservation {
    pub fn from_record(record: &Record) -> Self {
        Self {
            currency_code: record.text("currency_code"),
            price: record.number("price"),
            reference_period_start: record.text("reference_period_start"),
            reference_period_end: record.text("reference_period_end"),
            unit: record.text("unit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Commodity {
    pub code: String,
    pub name: Option<String>,
    pub prices: Vec<PriceObservation>,
}

/// A market with its commodities in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Market {
    pub admin2_name: Option<String>,
    pub market_name: Option<String>,
    /// `[lon, lat]` of the first record seen for the market, `None` when
    /// that record had no usable coordinates.
    pub coordinates: Option<[f64; 2]>,
    pub commodities: Vec<Commodity>,
}

/// Markets keyed by `market_code`, in first-seen order.
pub type MarketMap = IndexMap<String, Market>;

/// `(commodity_code, admin2_code)` key of the latest-price reduction.
pub type CommodityAdminKey = (String, String);

/// Latest record per commodity and admin2 unit, in first-seen key order.
pub type LatestPriceMap = IndexMap<CommodityAdminKey, Record>;
