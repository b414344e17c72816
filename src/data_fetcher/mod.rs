pub mod api;
pub mod briefs;
pub mod models;
pub mod processors;

pub use api::{HapiClient, RecordSource};
pub use models::{QueryParams, Record, SubcategoryResult};
