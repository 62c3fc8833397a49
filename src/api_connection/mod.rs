pub mod cache;
pub mod connection;
pub mod endpoints;

pub use cache::CachedLookup;
pub use connection::{ApiConnectionError, UsdaClient};
