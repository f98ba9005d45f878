use crate::cli::Args;
use chrono::NaiveDate;
use sports_digest::config::Config;
use sports_digest::data_fetcher::processors::today_in_zone;
use sports_digest::data_fetcher::{FileCacheStore, RateLimitedFetcher};
use sports_digest::digest::{DigestBuilder, render_digest};
use sports_digest::error::AppError;
use std::sync::Arc;
use tracing::info;

/// Parses the `--date` override.
pub fn parse_date_arg(args: &Args) -> Result<Option<NaiveDate>, AppError> {
    args.date
        .as_deref()
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
                AppError::datetime_parse_error(format!(
                    "Invalid --date '{raw}', expected YYYY-MM-DD: {e}"
                ))
            })
        })
        .transpose()
}

/// Prints the effective configuration.
pub async fn handle_list_config_command(args: &Args) -> Result<(), AppError> {
    Config::display(args.config.as_deref()).await
}

/// Builds one digest and prints it to stdout.
pub async fn handle_digest_command(
    config: &Config,
    today: Option<NaiveDate>,
) -> Result<(), AppError> {
    let tz = config.time_zone()?;
    let today = today.unwrap_or_else(|| today_in_zone(tz));

    let store = Arc::new(FileCacheStore::load(config.cache_file()).await);
    let fetcher = Arc::new(RateLimitedFetcher::from_config(config)?);
    let builder = DigestBuilder::from_config(config, fetcher, store)?;

    info!("Building digest for {today} ({tz})");
    let blocks = builder.build(today).await;
    println!("{}", render_digest(&blocks, today));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_date_arg() {
        let args = Args::parse_from(["sports_digest", "--date", "2026-10-19"]);
        assert_eq!(
            parse_date_arg(&args).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 19)
        );

        let none = Args::parse_from(["sports_digest"]);
        assert_eq!(parse_date_arg(&none).unwrap(), None);
    }

    #[test]
    fn test_parse_date_arg_rejects_garbage() {
        let args = Args::parse_from(["sports_digest", "--date", "19.10.2026"]);
        assert!(matches!(
            parse_date_arg(&args),
            Err(AppError::DateTimeParse(_))
        ));
    }
}
