pub mod api;
pub mod cache;
pub mod models;
pub mod processors;

pub use api::{EventRetriever, RateLimitedFetcher, TeamResolver};
pub use cache::{CacheStore, FileCacheStore, MemoryCacheStore};
pub use models::{Event, ResolvedTeam, TeamSpec};
