// Service exports
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{CacheError, CacheKey, CacheManager, CachedUserStore};
pub use memory::MemoryStore;
pub use postgres::{candidate_search_sql, PostgresStore};
pub use store::{HealthCheck, MatchStore, ProfileStore, StoreError, SwipeStore, UserStore};
