//! Application-wide constants and configuration defaults
//!
//! This module centralizes the provider tables and tuning defaults so that the
//! configuration layer and the fetcher agree on them.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 25;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 4;

/// Default sports-data provider domain
pub const DEFAULT_API_DOMAIN: &str = "https://www.thesportsdb.com";

/// The provider's public test key
pub const DEFAULT_API_KEY: &str = "3";

/// Default IANA time zone for "today"
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Only include teams with a fixture within this many days
pub const DEFAULT_INCLUDE_WITHIN_DAYS: i64 = 1;

/// Number of games in the top-games block
pub const DEFAULT_TOP_GAMES_COUNT: usize = 3;

/// Per-team deadline for one digest entry
pub const DEFAULT_TEAM_DEADLINE_SECONDS: u64 = 120;

/// File name of the on-disk provider cache
pub const CACHE_FILE_NAME: &str = "sportsdb_cache.json";

/// Emblem used for leagues missing from [`LEAGUE_EMBLEMS`]
pub const DEFAULT_LEAGUE_EMBLEM: &str = "🏟️";

/// Cache TTL (Time To Live) values in seconds
pub mod cache_ttl {
    /// Team id lookups rarely change (30 days)
    pub const TEAM_ID_SECONDS: u64 = 30 * 24 * 3600;

    /// Event queries (15 minutes)
    pub const EVENTS_SECONDS: u64 = 15 * 60;
}

/// Retry configuration
pub mod retry {
    /// Courtesy delay before every outbound request (milliseconds)
    pub const REQUEST_DELAY_MS: u64 = 350;

    /// Attempts per fetch before giving up
    pub const MAX_RETRIES: u32 = 6;

    /// Backoff cap while the provider answers 429 (seconds)
    pub const RATE_LIMIT_CAP_SECONDS: u64 = 30;

    /// Backoff cap for other transport failures (seconds)
    pub const TRANSPORT_CAP_SECONDS: u64 = 20;

    /// Upper bound of the random jitter added to each backoff step (milliseconds)
    pub const MAX_JITTER_MS: u64 = 1000;
}

/// Environment variable names
pub mod env_vars {
    pub const API_KEY: &str = "SPORTS_DIGEST_API_KEY";
    pub const API_DOMAIN: &str = "SPORTS_DIGEST_API_DOMAIN";
    pub const TIMEZONE: &str = "SPORTS_DIGEST_TIMEZONE";
    pub const LOG_FILE: &str = "SPORTS_DIGEST_LOG_FILE";
}

/// League emblems shown in front of every digest line
pub const LEAGUE_EMBLEMS: &[(&str, &str)] = &[
    ("NBA", "🏀"),
    ("NFL", "🏈"),
    ("MLB", "⚾"),
    ("NHL", "🏒"),
    ("College", "🎓"),
];

/// Search strings for names the provider's team search gets wrong on its own
pub const TEAM_SEARCH_OVERRIDES: &[(&str, &str)] = &[
    ("Knicks", "New York Knicks"),
    ("76ers", "Philadelphia 76ers"),
    ("Nets", "Brooklyn Nets"),
    ("Giants", "New York Giants"),
    ("Jets", "New York Jets"),
    ("Eagles", "Philadelphia Eagles"),
    ("Yankees", "New York Yankees"),
    ("Nationals", "Washington Nationals"),
    ("Rutgers", "Rutgers Scarlet Knights"),
];

/// Provider league identifiers used for league-wide result pulls
pub const PROVIDER_LEAGUE_IDS: &[(&str, &str)] = &[
    ("NBA", "4387"),
    ("NFL", "4391"),
    ("MLB", "4424"),
    ("NHL", "4380"),
    ("College", "4479"),
];

/// Returns the emblem for a league, falling back to a generic stadium.
pub fn league_emblem(league: &str) -> &'static str {
    LEAGUE_EMBLEMS
        .iter()
        .find(|(name, _)| *name == league)
        .map(|(_, emblem)| *emblem)
        .unwrap_or(DEFAULT_LEAGUE_EMBLEM)
}
