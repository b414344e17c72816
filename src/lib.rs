//! Humanitarian data briefs from the HDX Humanitarian API (HAPI)
//!
//! This library fetches paginated HAPI datasets, skips subcategories a
//! geography has no data for, falls back to provider-supplied admin names
//! when p-coded data is missing, and folds food prices into markets and a
//! GeoJSON feature collection.
//!
//! # Examples
//!
//! ```rust,no_run
//! use hapi_brief::config::Config;
//! use hapi_brief::data_fetcher::HapiClient;
//! use hapi_brief::data_fetcher::briefs::fetch_admin1_brief;
//! use hapi_brief::error::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let client = HapiClient::new(&config)?;
//!
//!     if let Some(brief) = fetch_admin1_brief(&client, "AF01").await? {
//!         println!("{} markets", brief.sections.markets.len());
//!         println!("{}", serde_json::to_string_pretty(&brief.sections.market_features)?);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::api::{HapiClient, RecordSource};
pub use data_fetcher::models::{QueryParams, Record, SubcategoryResult};
pub use error::AppError;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
