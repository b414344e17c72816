use std::cmp::Ordering;

use indexmap::map::Entry;
use tracing::debug;

use super::time_window::parse_reference_date;
use crate::constants::records::NON_FOOD_CATEGORY;
use crate::data_fetcher::models::{
    Commodity, LatestPriceMap, Market, MarketMap, PriceObservation, Record,
};

fn coordinates(record: &Record) -> Option<[f64; 2]> {
    Some([record.number("lon")?, record.number("lat")?])
}

/// Folds food-price rows into markets, each with its commodities and their
/// price series.
///
/// Rows in the `non-food` category are skipped, as are rows missing a market
/// or commodity code. The first row of a market fixes its names and
/// coordinates; the first row of a commodity fixes its name. Observations keep
/// input order.
pub fn aggregate_by_market(records: &[Record]) -> MarketMap {
    let mut markets = MarketMap::new();

    for record in records {
        if record.str_field("commodity_category") == Some(NON_FOOD_CATEGORY) {
            continue;
        }
        let (Some(market_code), Some(commodity_code)) =
            (record.text("market_code"), record.text("commodity_code"))
        else {
            debug!("Skipping price row without market or commodity code");
            continue;
        };

        let market = markets.entry(market_code).or_insert_with(|| Market {
            admin2_name: record.text("admin2_name"),
            market_name: record.text("market_name"),
            coordinates: coordinates(record),
            commodities: Vec::new(),
        });

        let index = match market
            .commodities
            .iter()
            .position(|commodity| commodity.code == commodity_code)
        {
            Some(index) => index,
            None => {
                market.commodities.push(Commodity {
                    code: commodity_code,
                    name: record.text("commodity_name"),
                    prices: Vec::new(),
                });
                market.commodities.len() - 1
            }
        };
        market.commodities[index]
            .prices
            .push(PriceObservation::from_record(record));
    }

    markets
}

// Chronological when both dates parse, otherwise plain string order.
fn compare_start(current: &Record, candidate: &Record) -> Ordering {
    let current = current.reference_period_start().unwrap_or_default();
    let candidate = candidate.reference_period_start().unwrap_or_default();
    match (parse_reference_date(current), parse_reference_date(candidate)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => current.cmp(candidate),
    }
}

/// Latest row per `(commodity_code, admin2_code)`.
///
/// A row replaces the kept one only when its `reference_period_start` is
/// strictly later, so ties keep the first row seen. Keys stay in first-seen
/// order. Missing codes key as empty strings.
pub fn aggregate_latest(records: &[Record]) -> LatestPriceMap {
    let mut latest = LatestPriceMap::new();

    for record in records {
        let key = (
            record.text("commodity_code").unwrap_or_default(),
            record.text("admin2_code").unwrap_or_default(),
        );
        match latest.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
            }
            Entry::Occupied(mut slot) => {
                if compare_start(slot.get(), record) == Ordering::Less {
                    slot.insert(record.clone());
                }
            }
        }
    }

    latest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::RecordBuilder;

    #[test]
    fn test_non_food_rows_are_excluded() {
        let records = vec![
            RecordBuilder::price("M1", "C1", "cereals", "2024-01-01", 10.0).build(),
            RecordBuilder::price("M1", "C2", "non-food", "2024-01-01", 99.0).build(),
            RecordBuilder::price("M1", "C1", "cereals", "2024-02-01", 12.0).build(),
        ];

        let markets = aggregate_by_market(&records);

        assert_eq!(markets.len(), 1);
        let market = &markets["M1"];
        assert_eq!(market.commodities.len(), 1);
        let commodity = &market.commodities[0];
        assert_eq!(commodity.code, "C1");
        let prices: Vec<Option<f64>> = commodity.prices.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![Some(10.0), Some(12.0)]);
        assert_eq!(
            commodity.prices[1].reference_period_start.as_deref(),
            Some("2024-02-01")
        );
    }

    #[test]
    fn test_market_only_non_food_is_absent() {
        let records = vec![
            RecordBuilder::price("M2", "C9", "non-food", "2024-01-01", 1.0).build(),
        ];
        assert!(aggregate_by_market(&records).is_empty());
    }

    #[test]
    fn test_leading_non_food_row_does_not_fix_market_geography() {
        let records = vec![
            RecordBuilder::price("M1", "C9", "non-food", "2024-01-01", 4.0)
                .field("market_name", "from non-food")
                .field("lon", 1.0)
                .field("lat", 2.0)
                .build(),
            RecordBuilder::price("M1", "C1", "cereals", "2024-01-01", 10.0)
                .field("lon", 62.2)
                .field("lat", 34.3)
                .build(),
        ];

        let markets = aggregate_by_market(&records);

        let m1 = &markets["M1"];
        assert_eq!(m1.coordinates, Some([62.2, 34.3]));
        assert_eq!(m1.market_name.as_deref(), Some("M1 market"));
        assert_eq!(m1.commodities.len(), 1);
        assert_eq!(m1.commodities[0].code, "C1");
    }

    #[test]
    fn test_first_row_fixes_market_geography_and_order() {
        let records = vec![
            RecordBuilder::price("M2", "C1", "cereals", "2024-01-01", 1.0)
                .field("lon", 65.7)
                .field("lat", 31.6)
                .build(),
            RecordBuilder::price("M1", "C1", "cereals", "2024-01-01", 1.0).build(),
            RecordBuilder::price("M2", "C3", "oil", "2024-01-01", 2.0)
                .field("market_name", "renamed")
                .field("lon", 0.0)
                .build(),
            RecordBuilder::price("M2", "C1", "cereals", "2024-02-01", 3.0).build(),
        ];

        let markets = aggregate_by_market(&records);

        let order: Vec<&str> = markets.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["M2", "M1"]);
        let m2 = &markets["M2"];
        assert_eq!(m2.coordinates, Some([65.7, 31.6]));
        assert_eq!(m2.market_name.as_deref(), Some("M2 market"));
        let codes: Vec<&str> = m2.commodities.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["C1", "C3"]);
        assert_eq!(m2.commodities[0].prices.len(), 2);
    }

    #[test]
    fn test_missing_coordinates_and_codes() {
        let records = vec![
            RecordBuilder::new()
                .field("market_code", "M5")
                .field("commodity_code", "C1")
                .field("commodity_category", "cereals")
                .field("lat", 1.0)
                .build(),
            RecordBuilder::new()
                .field("commodity_code", "C1")
                .field("commodity_category", "cereals")
                .build(),
        ];

        let markets = aggregate_by_market(&records);

        assert_eq!(markets.len(), 1);
        assert_eq!(markets["M5"].coordinates, None);
    }

    #[test]
    fn test_latest_keeps_strictly_later_and_first_on_tie() {
        let records = vec![
            RecordBuilder::price("M1", "C1", "cereals", "2024-01-01", 10.0).build(),
            RecordBuilder::price("M1", "C1", "cereals", "2024-03-01", 11.0).build(),
            RecordBuilder::price("M1", "C1", "cereals", "2024-03-01", 12.0).build(),
            RecordBuilder::price("M1", "C1", "cereals", "2024-02-01", 13.0).build(),
            RecordBuilder::price("M1", "C2", "non-food", "2024-01-01", 5.0).build(),
        ];

        let latest = aggregate_latest(&records);

        assert_eq!(latest.len(), 2);
        let key = ("C1".to_string(), "M1-A2".to_string());
        assert_eq!(latest[&key].number("price"), Some(11.0));
        let keys: Vec<&str> = latest.keys().map(|(c, _)| c.as_str()).collect();
        assert_eq!(keys, vec!["C1", "C2"]);
    }

    #[test]
    fn test_latest_is_keyed_per_admin2() {
        let records = vec![
            RecordBuilder::price("M1", "C1", "cereals", "2024-01-01", 10.0).build(),
            RecordBuilder::price("M2", "C1", "cereals", "2023-01-01", 20.0).build(),
        ];

        let latest = aggregate_latest(&records);

        assert_eq!(latest.len(), 2);
        assert_eq!(
            latest[&("C1".to_string(), "M2-A2".to_string())].number("price"),
            Some(20.0)
        );
    }

    #[test]
    fn test_latest_compares_dates_not_text() {
        let records = vec![
            RecordBuilder::price("M1", "C1", "cereals", "2024-03-01T00:00:00", 1.0).build(),
            RecordBuilder::price("M1", "C1", "cereals", "2024-03-01", 2.0).build(),
            RecordBuilder::price("M1", "C1", "cereals", "2024-03-02", 3.0).build(),
        ];

        let latest = aggregate_latest(&records);
        let only = latest.values().next().unwrap();
        assert_eq!(only.number("price"), Some(3.0));
    }
}
