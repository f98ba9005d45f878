//! Pure text rendering of digest lines and blocks

use chrono::NaiveDate;
use chrono_tz::Tz;

use super::DigestBlocks;
use crate::data_fetcher::models::Event;
use crate::data_fetcher::processors::{DateWindow, RankedGame, format_local_time};

pub const NO_YESTERDAY_LINES: &str = "• (No teams played yesterday, and no games today/tomorrow.)";
pub const NO_TODAY_LINES: &str = "• (No games today, and no games tomorrow.)";
pub const NO_HIGHLIGHTS: &str = "• (No high-scoring games detected from yesterday.)";
pub const NO_TOP_GAMES: &str = "• (No completed games from yesterday.)";
pub const TOP_GAMES_UNAVAILABLE: &str = "• (Top games unavailable.)";

/// `Away 110 @ Home 101 (yesterday)`, degraded when a score is missing.
pub fn format_final(event: &Event) -> String {
    match (event.away_score, event.home_score) {
        (Some(away), Some(home)) => format!(
            "{} {} @ {} {} (yesterday)",
            event.away_team, away, event.home_team, home
        ),
        _ => format!(
            "{} @ {} (yesterday, score unavailable)",
            event.away_team, event.home_team
        ),
    }
}

/// `Away vs Home — 7:30 PM (today)`; the time is left out when unknown.
pub fn format_upcoming(event: &Event, window: &DateWindow, tz: Tz) -> String {
    let label = match event.date {
        Some(date) => window.day_label(date),
        None if event.date_raw.is_empty() => "date unknown".to_string(),
        None => event.date_raw.clone(),
    };
    let local_time = event
        .date
        .and_then(|date| format_local_time(date, event.time_of_day_utc, tz));

    match local_time {
        Some(time) => format!(
            "{} vs {} — {} ({})",
            event.away_team, event.home_team, time, label
        ),
        None => format!("{} vs {} — ({})", event.away_team, event.home_team, label),
    }
}

pub fn format_next(event: &Event, window: &DateWindow, tz: Tz) -> String {
    format!("Next — {}", format_upcoming(event, window, tz))
}

/// `• 🏀 Knicks: detail`
pub fn team_line(emblem: &str, display_name: &str, detail: &str) -> String {
    format!("• {emblem} {display_name}: {detail}")
}

pub fn not_found_line(emblem: &str, display_name: &str) -> String {
    team_line(emblem, display_name, "team not found")
}

pub fn unavailable_line(emblem: &str, display_name: &str, reason: &str) -> String {
    team_line(emblem, display_name, &format!("data unavailable ({reason})"))
}

pub fn highlight_line(emblem: &str, league: &str, event: &Event, total: i64) -> String {
    format!(
        "🔥 {} High scoring ({}): {} (Total {})",
        emblem,
        league,
        format_final(event),
        total
    )
}

/// Top-game line; `game.line` already carries emblem and final score.
pub fn top_game_line(game: &RankedGame) -> String {
    let marker = if game.is_favorite { "⭐" } else { "•" };
    format!("{} {} (Total {})", marker, game.line, game.total_score)
}

/// Joins lines, or returns the placeholder when there are none.
pub fn render_block(lines: &[String], placeholder: &str) -> String {
    if lines.is_empty() {
        placeholder.to_string()
    } else {
        lines.join("\n")
    }
}

/// Full message body handed to the delivery side.
pub fn render_digest(blocks: &DigestBlocks, date: NaiveDate) -> String {
    format!(
        "🏟️ Sports Digest — {}\n\n**Yesterday**\n{}\n\n**Today**\n{}\n\n**Important Events**\n{}\n\n**Top Games**\n{}",
        date.format("%a %b %d"),
        blocks.yesterday,
        blocks.today,
        blocks.highlights,
        blocks.top_games
    )
}
