pub mod backoff;
pub mod event_retriever;
pub mod fetcher;
pub mod team_resolver;
pub mod urls;

// Re-export URL utilities
pub use urls::*;
pub use backoff::{BackoffPolicy, Sleeper, TokioSleeper, parse_retry_after};
pub use event_retriever::{EventRetriever, TeamEvents};
pub use fetcher::{RateLimitedFetcher, create_http_client_with_timeout};
pub use team_resolver::TeamResolver;
