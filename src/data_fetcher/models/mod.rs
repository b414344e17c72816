pub mod availability;
pub mod geography;
pub mod geojson;
pub mod market;
pub mod query;
pub mod record;
pub mod subcategory;

pub use availability::AvailabilityIndex;
pub use geography::{AdminLevel, AdminUnit};
pub use geojson::{Feature, FeatureCollection, Geometry, MarketProperties};
pub use market::{
    Commodity, CommodityAdminKey, LatestPriceMap, Market, MarketMap, PriceObservation,
};
pub use query::{ParamValue, QueryParams};
pub use record::Record;
pub use subcategory::SubcategoryResult;

use serde::Serialize;

/// A sector listed on a geography brief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sector {
    pub code: String,
    pub name: String,
}
