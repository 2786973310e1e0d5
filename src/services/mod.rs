// Service exports
pub mod cache;
pub mod catalog;
pub mod postgres;

pub use cache::{CacheError, CacheKey, CacheManager, CacheStats};
pub use catalog::{CatalogClient, CatalogError, CatalogTables};
pub use postgres::{InteractionRecord, InteractionStats, PostgresClient, PostgresError};
