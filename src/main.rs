// src/main.rs
mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::Args;
use sports_digest::config::Config;
use sports_digest::error::AppError;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    if args.list_config {
        return commands::handle_list_config_command(&args).await;
    }

    let today = commands::parse_date_arg(&args)?;

    // Configuration problems are the only fatal errors
    let config = Config::load(args.config.as_deref()).await?;

    // The guard must be kept alive for the duration of the program
    let (log_file_path, _guard) = logging::setup_logging(&args, Some(&config)).await?;
    info!("Logs are written to {log_file_path}");

    if let Err(e) = commands::handle_digest_command(&config, today).await {
        error!("Digest run failed: {e}");
        return Err(e);
    }

    Ok(())
}
