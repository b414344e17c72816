use serde::Serialize;

use super::market::Commodity;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketProperties {
    pub market_code: String,
    pub admin2_name: Option<String>,
    pub market_name: Option<String>,
    pub commodities: Vec<Commodity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: Option<Geometry>,
    pub properties: MarketProperties,
}

impl Feature {
    pub fn new(geometry: Option<Geometry>, properties: MarketProperties) -> Self {
        Self {
            kind: "Feature",
            geometry,
            properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection",
            features,
        }
    }
}
