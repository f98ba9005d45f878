use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch data from API: {0}")]
    ApiFetch(#[from] reqwest::Error),

    #[error("Failed to parse API response: {0}")]
    ApiParse(#[from] serde_json::Error),

    // Specific HTTP status code errors
    #[error("API request not found (404): {url}")]
    ApiNotFound { url: String },

    #[error("API server error ({status}): {message} (URL: {url})")]
    ApiServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API client error ({status}): {message} (URL: {url})")]
    ApiClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API rate limit exceeded (429) after {attempts} attempts (URL: {url})")]
    ApiRateLimit { attempts: u32, url: String },

    #[error("API service unavailable ({status}): {message} (URL: {url})")]
    ApiServiceUnavailable {
        status: u16,
        message: String,
        url: String,
    },

    // Network-specific errors
    #[error("Network timeout while fetching data from: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    // Data parsing and validation errors
    #[error("API returned malformed JSON: {message} (URL: {url})")]
    ApiMalformedJson { message: String, url: String },

    #[error("API returned unexpected data structure: {message} (URL: {url})")]
    ApiUnexpectedStructure { message: String, url: String },

    #[error("Cache file {path} is unreadable: {message}")]
    CacheCorruption { path: String, message: String },

    #[error("Timed out after {seconds}s while building digest entry for {team}")]
    DigestTimeout { team: String, seconds: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Date/time parsing error: {0}")]
    DateTimeParse(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a date/time parsing error with context
    pub fn datetime_parse_error(msg: impl Into<String>) -> Self {
        Self::DateTimeParse(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create an API not found error
    pub fn api_not_found(url: impl Into<String>) -> Self {
        Self::ApiNotFound { url: url.into() }
    }

    /// Create an API server error (5xx status codes)
    pub fn api_server_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API client error (4xx status codes except 404 and 429)
    pub fn api_client_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create the error raised once the retry budget is spent on 429 responses
    pub fn api_rate_limit(attempts: u32, url: impl Into<String>) -> Self {
        Self::ApiRateLimit {
            attempts,
            url: url.into(),
        }
    }

    /// Create an API service unavailable error
    pub fn api_service_unavailable(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServiceUnavailable {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a malformed JSON error
    pub fn api_malformed_json(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiMalformedJson {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an unexpected data structure error
    pub fn api_unexpected_structure(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiUnexpectedStructure {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a cache corruption error for an unreadable backing file
    pub fn cache_corruption(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CacheCorruption {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a per-team deadline error
    pub fn digest_timeout(team: impl Into<String>, seconds: u64) -> Self {
        Self::DigestTimeout {
            team: team.into(),
            seconds,
        }
    }

    /// True when the provider kept answering 429 until the retry budget ran out
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::ApiRateLimit { .. })
    }

    /// True for network/HTTP failures below the provider's explicit rate-limit signal
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::ApiFetch(_)
                | AppError::ApiNotFound { .. }
                | AppError::ApiServerError { .. }
                | AppError::ApiClientError { .. }
                | AppError::ApiServiceUnavailable { .. }
                | AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
                | AppError::ApiMalformedJson { .. }
                | AppError::ApiUnexpectedStructure { .. }
        )
    }

    /// Check if error is retryable (network issues, server errors, rate limits)
    pub fn is_retryable(&self) -> bool {
        self.is_transport() || self.is_rate_limited()
    }

    /// Short reason used in degraded digest lines
    pub fn short_reason(&self) -> &'static str {
        match self {
            AppError::ApiRateLimit { .. } => "rate limited",
            AppError::DigestTimeout { .. } => "timed out",
            AppError::NetworkTimeout { .. } => "network timeout",
            e if e.is_transport() => "provider error",
            _ => "internal error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_helper() {
        let error = AppError::config_error("Invalid configuration");
        assert!(matches!(error, AppError::Config(_)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration"
        );
    }

    #[test]
    fn test_log_setup_error_helper() {
        let error = AppError::log_setup_error("Failed to initialize logger");
        assert!(matches!(error, AppError::LogSetup(_)));
        assert_eq!(
            error.to_string(),
            "Log setup error: Failed to initialize logger"
        );
    }

    #[test]
    fn test_api_rate_limit_helper() {
        let error = AppError::api_rate_limit(6, "https://api.example.com/searchteams.php");
        assert!(error.is_rate_limited());
        assert!(!error.is_transport());
        assert!(error.is_retryable());
        assert_eq!(
            error.to_string(),
            "API rate limit exceeded (429) after 6 attempts (URL: https://api.example.com/searchteams.php)"
        );
    }

    #[test]
    fn test_transport_classification() {
        let transport = [
            AppError::api_not_found("u"),
            AppError::api_server_error(500, "Internal Server Error", "u"),
            AppError::api_client_error(400, "Bad Request", "u"),
            AppError::api_service_unavailable(503, "Service Unavailable", "u"),
            AppError::network_timeout("u"),
            AppError::network_connection("u", "refused"),
            AppError::api_malformed_json("not json", "u"),
            AppError::api_unexpected_structure("missing field", "u"),
        ];
        for error in transport {
            assert!(error.is_transport(), "{error} should be a transport error");
            assert!(!error.is_rate_limited());
        }

        assert!(!AppError::config_error("x").is_transport());
        assert!(!AppError::cache_corruption("/tmp/c.json", "eof").is_retryable());
    }

    #[test]
    fn test_short_reason() {
        assert_eq!(AppError::api_rate_limit(3, "u").short_reason(), "rate limited");
        assert_eq!(AppError::digest_timeout("Knicks", 5).short_reason(), "timed out");
        assert_eq!(
            AppError::api_server_error(502, "Bad Gateway", "u").short_reason(),
            "provider error"
        );
        assert_eq!(AppError::config_error("x").short_reason(), "internal error");
    }

    #[test]
    fn test_cache_corruption_display() {
        let error = AppError::cache_corruption("/tmp/cache.json", "expected value at line 1");
        assert_eq!(
            error.to_string(),
            "Cache file /tmp/cache.json is unreadable: expected value at line 1"
        );
    }
}
