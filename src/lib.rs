//! Sports digest library
//!
//! Turns a roster of favourite teams into short digest text blocks: who played
//! yesterday and how it ended, who plays today or soon, unusually high-scoring
//! finals and the best games of each league. Data comes from TheSportsDB
//! through a rate-limited fetcher and a TTL cache.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sports_digest::config::Config;
//! use sports_digest::data_fetcher::{FileCacheStore, RateLimitedFetcher};
//! use sports_digest::data_fetcher::processors::today_in_zone;
//! use sports_digest::digest::{DigestBuilder, render_digest};
//! use sports_digest::error::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load(None).await?;
//!     let today = today_in_zone(config.time_zone()?);
//!
//!     let store = Arc::new(FileCacheStore::load(config.cache_file()).await);
//!     let fetcher = Arc::new(RateLimitedFetcher::from_config(&config)?);
//!     let builder = DigestBuilder::from_config(&config, fetcher, store)?;
//!
//!     let blocks = builder.build(today).await;
//!     println!("{}", render_digest(&blocks, today));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod digest;
pub mod error;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::models::{Event, ResolvedTeam, TeamSpec};
pub use digest::{DigestBlocks, DigestBuilder, render_digest};
pub use error::AppError;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
