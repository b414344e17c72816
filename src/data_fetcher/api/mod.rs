mod core;
mod fetch_utils;
pub mod http_client;
pub mod source;
pub mod urls;

// Re-export URL utilities
pub use urls::*;
pub use http_client::create_http_client_with_timeout;
pub use source::RecordSource;
pub use core::HapiClient;
