use crate::data_fetcher::models::{
    Feature, FeatureCollection, Geometry, MarketMap, MarketProperties,
};

/// One point feature per market, in map order.
///
/// Coordinates are passed through as `[lon, lat]`; a market without them
/// gets a `null` geometry.
pub fn to_feature_collection(markets: &MarketMap) -> FeatureCollection {
    let features = markets
        .iter()
        .map(|(market_code, market)| {
            Feature::new(
                market
                    .coordinates
                    .map(|coordinates| Geometry::Point { coordinates }),
                MarketProperties {
                    market_code: market_code.clone(),
                    admin2_name: market.admin2_name.clone(),
                    market_name: market.market_name.clone(),
                    commodities: market.commodities.clone(),
                },
            )
        })
        .collect();

    FeatureCollection::new(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::processors::aggregate_by_market;
    use crate::testing_utils::RecordBuilder;
    use serde_json::json;

    #[test]
    fn test_market_example_projects_to_single_feature() {
        let records = vec![
            RecordBuilder::price("M1", "C1", "cereals", "2024-01-01", 10.0)
                .field("lon", 69.1)
                .field("lat", 34.5)
                .build(),
            RecordBuilder::price("M1", "C2", "non-food", "2024-01-01", 3.0).build(),
        ];

        let collection = to_feature_collection(&aggregate_by_market(&records));

        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        assert_eq!(feature.properties.market_code, "M1");
        assert_eq!(
            feature.geometry,
            Some(Geometry::Point {
                coordinates: [69.1, 34.5]
            })
        );
        assert_eq!(feature.properties.commodities.len(), 1);
        assert_eq!(feature.properties.commodities[0].code, "C1");
    }

    #[test]
    fn test_geometry_comes_from_first_food_row() {
        let records = vec![
            RecordBuilder::price("M1", "C9", "non-food", "2024-01-01", 4.0)
                .field("lon", 1.0)
                .field("lat", 2.0)
                .build(),
            RecordBuilder::price("M1", "C1", "cereals", "2024-01-01", 10.0)
                .field("lon", 62.2)
                .field("lat", 34.3)
                .build(),
            RecordBuilder::price("M1", "C1", "cereals", "2024-02-01", 11.0)
                .field("lon", 70.0)
                .field("lat", 30.0)
                .build(),
        ];

        let collection = to_feature_collection(&aggregate_by_market(&records));
        let value = serde_json::to_value(&collection).unwrap();

        assert_eq!(
            value["features"][0]["geometry"],
            json!({ "type": "Point", "coordinates": [62.2, 34.3] })
        );
    }

    #[test]
    fn test_feature_order_and_null_geometry() {
        let records = vec![
            RecordBuilder::price("B", "C1", "cereals", "2024-01-01", 1.0).build(),
            RecordBuilder::new()
                .field("market_code", "A")
                .field("commodity_code", "C1")
                .field("commodity_category", "cereals")
                .build(),
        ];

        let collection = to_feature_collection(&aggregate_by_market(&records));
        let value = serde_json::to_value(&collection).unwrap();

        assert_eq!(value["type"], json!("FeatureCollection"));
        assert_eq!(value["features"][0]["properties"]["market_code"], json!("B"));
        assert_eq!(value["features"][1]["properties"]["market_code"], json!("A"));
        assert_eq!(value["features"][1]["geometry"], json!(null));
    }

    #[test]
    fn test_empty_markets_give_empty_collection() {
        let collection = to_feature_collection(&MarketMap::new());
        assert!(collection.features.is_empty());
    }
}
