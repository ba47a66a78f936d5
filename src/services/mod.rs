// Service exports
pub mod cache;
pub mod charting;
pub mod crime_api;
pub mod users;

pub use cache::{CacheError, CacheKey, CacheManager, CacheStats};
pub use charting::{ChartClient, ChartError};
pub use crime_api::{CrimeApiClient, CrimeApiError};
pub use users::{StoreError, UserStore};
