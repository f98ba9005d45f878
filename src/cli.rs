use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Daily sports digest
///
/// Looks up yesterday's finals and today's fixtures for the teams in your
/// roster, flags high-scoring games and ranks the best games of each league.
/// The digest text is printed to stdout; logs go to a daily rolling file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Path to the TOML configuration file.
    /// Defaults to <config dir>/sports_digest/config.toml.
    #[arg(long = "config", short = 'c', value_name = "PATH", help_heading = "Configuration")]
    pub config: Option<String>,

    /// List current configuration settings and exit
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Build the digest as if today were this date (YYYY-MM-DD, in the configured time zone)
    #[arg(long = "date", short = 'd', value_name = "YYYY-MM-DD")]
    pub date: Option<String>,

    /// Also write logs to stderr. stdout only ever carries the digest.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", value_name = "PATH", help_heading = "Debug")]
    pub log_file: Option<String>,
}
