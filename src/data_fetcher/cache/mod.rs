pub mod file_store;
pub mod store;
pub mod types;

// Re-export cache types
pub use types::*;
// Re-export store trait and implementations
pub use file_store::FileCacheStore;
pub use store::{CacheStore, MemoryCacheStore, get_fresh};
