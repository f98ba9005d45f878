use std::path::Path;

/// Returns the platform-specific path for the config file.
///
/// # Notes
/// - Uses platform-specific config directory (e.g., ~/.config on Linux)
/// - Falls back to current directory if config directory is unavailable
pub fn get_config_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join("sports_digest")
        .join("config.toml")
        .to_string_lossy()
        .to_string()
}

/// Returns the platform-specific path for the log directory.
pub fn get_log_dir_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join("sports_digest")
        .join("logs")
        .to_string_lossy()
        .to_string()
}

/// Returns the platform-specific path for the provider cache file.
///
/// Uses the platform cache directory (e.g., ~/.cache on Linux) and falls back
/// to the current directory.
pub fn get_cache_file_path() -> String {
    dirs::cache_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join("sports_digest")
        .join(crate::constants::CACHE_FILE_NAME)
        .to_string_lossy()
        .to_string()
}
