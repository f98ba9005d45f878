use super::Config;
use crate::error::AppError;
use chrono_tz::Tz;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - API key and domain cannot be empty; the domain must look like a URL or domain name
/// - Time zone must be a known IANA name
/// - Events TTL and retry budget must be positive
/// - At least one league must be listed in the roster (a league may list no teams)
/// - If log file path is provided, it cannot be empty and its parent must be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    if config.api_key.trim().is_empty() {
        return Err(AppError::config_error("API key cannot be empty"));
    }

    let api_domain = config.api_domain.as_str();
    if api_domain.is_empty() {
        return Err(AppError::config_error("API domain cannot be empty"));
    }
    if !api_domain.starts_with("http://")
        && !api_domain.starts_with("https://")
        && !api_domain.contains('.')
        && !api_domain.starts_with("localhost")
    {
        return Err(AppError::config_error(
            "API domain must be a valid URL or domain name",
        ));
    }

    if config.timezone.parse::<Tz>().is_err() {
        return Err(AppError::config_error(format!(
            "Unknown time zone '{}'",
            config.timezone
        )));
    }

    if config.cache.events_ttl_seconds == 0 {
        return Err(AppError::config_error("Events cache TTL must be positive"));
    }

    if config.retry.max_retries == 0 {
        return Err(AppError::config_error("Retry budget must be at least 1"));
    }

    if config.include_within_days < 0 {
        return Err(AppError::config_error(
            "include_within_days cannot be negative",
        ));
    }

    if config.roster.is_empty() {
        return Err(AppError::config_error("Team roster cannot be empty"));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
