use crate::constants::{self, cache_ttl, env_vars, retry};
use crate::error::AppError;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tokio::fs;

pub mod paths;
pub mod validation;

use paths::{get_cache_file_path, get_config_path, get_log_dir_path};
use validation::validate_config;

/// Teams followed in one league, in the order they should appear in the digest.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LeagueRoster {
    pub league: String,
    #[serde(default)]
    pub teams: Vec<String>,
}

/// Cache freshness windows.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CacheSettings {
    #[serde(default = "default_team_id_ttl")]
    pub team_id_ttl_seconds: u64,
    #[serde(default = "default_events_ttl")]
    pub events_ttl_seconds: u64,
}

fn default_team_id_ttl() -> u64 {
    cache_ttl::TEAM_ID_SECONDS
}

fn default_events_ttl() -> u64 {
    cache_ttl::EVENTS_SECONDS
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            team_id_ttl_seconds: default_team_id_ttl(),
            events_ttl_seconds: default_events_ttl(),
        }
    }
}

/// Throttling and retry limits for the sports-data provider.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RetrySettings {
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_rate_limit_cap")]
    pub rate_limit_cap_seconds: u64,
    #[serde(default = "default_transport_cap")]
    pub transport_cap_seconds: u64,
}

fn default_request_delay_ms() -> u64 {
    retry::REQUEST_DELAY_MS
}

fn default_max_retries() -> u32 {
    retry::MAX_RETRIES
}

fn default_rate_limit_cap() -> u64 {
    retry::RATE_LIMIT_CAP_SECONDS
}

fn default_transport_cap() -> u64 {
    retry::TRANSPORT_CAP_SECONDS
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            max_retries: default_max_retries(),
            rate_limit_cap_seconds: default_rate_limit_cap(),
            transport_cap_seconds: default_transport_cap(),
        }
    }
}

/// Configuration structure for the application.
/// Handles loading, saving, and managing digest settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Key for the sports-data provider. The public test key works for light use.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Provider domain. Should include https:// prefix.
    #[serde(default = "default_api_domain")]
    pub api_domain: String,
    /// IANA time zone used to decide what "yesterday" and "today" mean.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Location of the provider cache file. Defaults to the platform cache dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_file_path: Option<String>,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for API requests.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Lookahead in days for the "soon" window.
    #[serde(default = "default_include_within_days")]
    pub include_within_days: i64,
    /// Size of the top-games block.
    #[serde(default = "default_top_games_count")]
    pub top_games_count: usize,
    /// Deadline for a single team's digest entry.
    #[serde(default = "default_team_deadline")]
    pub team_deadline_seconds: u64,
    #[serde(default)]
    pub roster: Vec<LeagueRoster>,
    #[serde(default)]
    pub high_scoring_thresholds: BTreeMap<String, i64>,
    /// Extra search strings, merged over the built-in override table.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Extra provider league ids, merged over the built-in table.
    #[serde(default)]
    pub league_ids: BTreeMap<String, String>,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub retry: RetrySettings,
}

fn default_api_key() -> String {
    constants::DEFAULT_API_KEY.to_string()
}

fn default_api_domain() -> String {
    constants::DEFAULT_API_DOMAIN.to_string()
}

fn default_timezone() -> String {
    constants::DEFAULT_TIMEZONE.to_string()
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_include_within_days() -> i64 {
    constants::DEFAULT_INCLUDE_WITHIN_DAYS
}

fn default_top_games_count() -> usize {
    constants::DEFAULT_TOP_GAMES_COUNT
}

fn default_team_deadline() -> u64 {
    constants::DEFAULT_TEAM_DEADLINE_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: default_api_key(),
            api_domain: default_api_domain(),
            timezone: default_timezone(),
            cache_file_path: None,
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            include_within_days: default_include_within_days(),
            top_games_count: default_top_games_count(),
            team_deadline_seconds: default_team_deadline(),
            roster: Vec::new(),
            high_scoring_thresholds: BTreeMap::new(),
            aliases: BTreeMap::new(),
            league_ids: BTreeMap::new(),
            cache: CacheSettings::default(),
            retry: RetrySettings::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the given path, or the default config file location.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `SPORTS_DIGEST_API_KEY` - Override provider key
    /// - `SPORTS_DIGEST_API_DOMAIN` - Override provider domain
    /// - `SPORTS_DIGEST_TIMEZONE` - Override time zone
    /// - `SPORTS_DIGEST_LOG_FILE` - Override log file path
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded and validated configuration
    /// * `Err(AppError)` - Missing file, parse error or failed validation
    pub async fn load(custom_path: Option<&str>) -> Result<Self, AppError> {
        let config_path = custom_path
            .map(str::to_string)
            .unwrap_or_else(get_config_path);

        if !Path::new(&config_path).exists() {
            return Err(AppError::config_error(format!(
                "No configuration file found at {config_path}"
            )));
        }

        let mut config = Self::load_from_path(&config_path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file path without env overrides or validation.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var(env_vars::API_KEY) {
            self.api_key = api_key;
        }
        if let Ok(api_domain) = std::env::var(env_vars::API_DOMAIN) {
            self.api_domain = api_domain;
        }
        if let Ok(timezone) = std::env::var(env_vars::TIMEZONE) {
            self.timezone = timezone;
        }
        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Parsed time zone. Only fails on configs that skipped validation.
    pub fn time_zone(&self) -> Result<Tz, AppError> {
        self.timezone.parse::<Tz>().map_err(|e| {
            AppError::config_error(format!("Unknown time zone '{}': {e}", self.timezone))
        })
    }

    /// Base URL of the provider's v1 JSON API including the key.
    pub fn api_base_url(&self) -> String {
        format!(
            "{}/api/v1/json/{}",
            self.api_domain.trim_end_matches('/'),
            self.api_key
        )
    }

    /// Built-in search overrides with the configured aliases merged on top.
    pub fn search_aliases(&self) -> BTreeMap<String, String> {
        let mut aliases: BTreeMap<String, String> = constants::TEAM_SEARCH_OVERRIDES
            .iter()
            .map(|(name, search)| ((*name).to_string(), (*search).to_string()))
            .collect();
        aliases.extend(self.aliases.clone());
        aliases
    }

    /// Provider league id for a league name, if known.
    pub fn league_id_for(&self, league: &str) -> Option<String> {
        if let Some(id) = self.league_ids.get(league) {
            return Some(id.clone());
        }
        constants::PROVIDER_LEAGUE_IDS
            .iter()
            .find(|(name, _)| *name == league)
            .map(|(_, id)| (*id).to_string())
    }

    pub fn team_id_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.team_id_ttl_seconds)
    }

    pub fn events_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.events_ttl_seconds)
    }

    /// Effective cache file location.
    pub fn cache_file(&self) -> String {
        self.cache_file_path
            .clone()
            .unwrap_or_else(get_cache_file_path)
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// # Notes
    /// - Shows config file location and current settings
    /// - Handles case when no config file exists
    pub async fn display(custom_path: Option<&str>) -> Result<(), AppError> {
        let config_path = custom_path
            .map(str::to_string)
            .unwrap_or_else(get_config_path);
        let log_dir = get_log_dir_path();

        if !Path::new(&config_path).exists() {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
            return Ok(());
        }

        let config = Config::load(Some(config_path.as_str())).await?;
        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        println!("{config_path}");
        println!("────────────────────────────────────");
        println!("API Domain:");
        println!("{}", config.api_domain);
        println!("────────────────────────────────────");
        println!("Time Zone:");
        println!("{}", config.timezone);
        println!("────────────────────────────────────");
        println!("Teams:");
        for roster in &config.roster {
            println!("{}: {}", roster.league, roster.teams.join(", "));
        }
        println!("────────────────────────────────────");
        println!("Cache File:");
        println!("{}", config.cache_file());
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/sports_digest.log");
            println!("(Default location)");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
api_key = "123"
timezone = "America/Chicago"
include_within_days = 2
top_games_count = 5

[[roster]]
league = "NBA"
teams = ["Knicks", "76ers"]

[[roster]]
league = "NFL"
teams = ["Giants"]

[[roster]]
league = "College"
teams = []

[high_scoring_thresholds]
NBA = 230
NFL = 60

[aliases]
Giants = "New York Giants NFL"

[cache]
events_ttl_seconds = 1800

[retry]
max_retries = 4
"#;

    #[tokio::test]
    async fn test_config_load_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, SAMPLE).await.unwrap();

        let config = Config::load_from_path(&config_path.to_string_lossy())
            .await
            .unwrap();

        assert_eq!(config.api_key, "123");
        assert_eq!(config.api_domain, constants::DEFAULT_API_DOMAIN);
        assert_eq!(config.timezone, "America/Chicago");
        assert_eq!(config.include_within_days, 2);
        assert_eq!(config.top_games_count, 5);
        assert_eq!(config.high_scoring_thresholds.get("NBA"), Some(&230));
        assert_eq!(config.cache.events_ttl_seconds, 1800);
        assert_eq!(config.cache.team_id_ttl_seconds, cache_ttl::TEAM_ID_SECONDS);
        assert_eq!(config.retry.max_retries, 4);
        assert_eq!(config.retry.request_delay_ms, retry::REQUEST_DELAY_MS);
    }

    #[tokio::test]
    async fn test_roster_order_is_preserved() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, SAMPLE).await.unwrap();

        let config = Config::load_from_path(&config_path.to_string_lossy())
            .await
            .unwrap();

        let leagues: Vec<&str> = config.roster.iter().map(|r| r.league.as_str()).collect();
        assert_eq!(leagues, vec!["NBA", "NFL", "College"]);
        assert_eq!(config.roster[0].teams, vec!["Knicks", "76ers"]);
        assert!(config.roster[2].teams.is_empty());
    }

    #[tokio::test]
    async fn test_config_load_missing_file_is_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("missing.toml");

        let result = Config::load(Some(config_path.to_str().unwrap())).await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_search_aliases_prefer_config_alias() {
        let mut config = Config::default();
        let aliases = config.search_aliases();
        assert_eq!(aliases.get("Knicks").map(String::as_str), Some("New York Knicks"));
        assert_eq!(aliases.get("Unknown FC"), None);

        config
            .aliases
            .insert("Knicks".to_string(), "NY Knicks".to_string());
        let aliases = config.search_aliases();
        assert_eq!(aliases.get("Knicks").map(String::as_str), Some("NY Knicks"));
        assert_eq!(aliases.get("76ers").map(String::as_str), Some("Philadelphia 76ers"));
    }

    #[test]
    fn test_league_id_lookup() {
        let mut config = Config::default();
        assert_eq!(config.league_id_for("NBA").as_deref(), Some("4387"));
        assert_eq!(config.league_id_for("Curling"), None);

        config
            .league_ids
            .insert("Curling".to_string(), "9999".to_string());
        assert_eq!(config.league_id_for("Curling").as_deref(), Some("9999"));
    }

    #[test]
    fn test_api_base_url() {
        let config = Config {
            api_domain: "https://www.thesportsdb.com/".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.api_base_url(),
            "https://www.thesportsdb.com/api/v1/json/3"
        );
    }

    #[test]
    fn test_get_config_path() {
        let config_path = Config::get_config_path();
        assert!(config_path.contains("sports_digest"));
        assert!(config_path.ends_with("config.toml"));
    }

    #[tokio::test]
    #[serial]
    async fn test_environment_variable_override() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, SAMPLE).await.unwrap();

        unsafe {
            std::env::set_var(env_vars::API_KEY, "env-key");
            std::env::set_var(env_vars::TIMEZONE, "Europe/Helsinki");
        }

        let config = Config::load(Some(config_path.to_str().unwrap())).await;

        unsafe {
            std::env::remove_var(env_vars::API_KEY);
            std::env::remove_var(env_vars::TIMEZONE);
        }

        let config = config.unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.timezone, "Europe/Helsinki");
        assert_eq!(config.time_zone().unwrap(), chrono_tz::Europe::Helsinki);
    }
}
