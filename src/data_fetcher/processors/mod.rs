pub mod fallback;
pub mod geojson;
pub mod markets;
pub mod sectors;
pub mod subcategory;
pub mod time_window;

pub use fallback::{FallbackOutcome, provider_name_params, resolve_with_fallback};
pub use geojson::to_feature_collection;
pub use markets::{aggregate_by_market, aggregate_latest};
pub use sectors::collect_sectors;
pub use subcategory::resolve_subcategory;
pub use time_window::{fetch_conflict_events, parse_reference_date, restrict, restrict_at};
