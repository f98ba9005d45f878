//! High-scoring finals and top-game ranking

use chrono::NaiveDate;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use crate::data_fetcher::models::{Event, ResolvedTeam};

/// A completed game competing for a top-games slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedGame {
    pub is_favorite: bool,
    pub total_score: i64,
    pub line: String,
}

/// Combined score of a final that meets its league's threshold.
///
/// Leagues without a configured threshold never fire, and neither do finals
/// missing a score.
pub fn high_scoring_total(
    event: &Event,
    league: &str,
    thresholds: &BTreeMap<String, i64>,
) -> Option<i64> {
    let threshold = *thresholds.get(league)?;
    let total = event.total_score()?;
    (total >= threshold).then_some(total)
}

/// Lowercased names that mark a game as involving one of the user's teams.
#[derive(Debug, Clone, Default)]
pub struct Favorites {
    names: HashSet<String>,
}

impl Favorites {
    pub fn from_teams<'a>(teams: impl IntoIterator<Item = &'a ResolvedTeam>) -> Self {
        let names = teams
            .into_iter()
            .flat_map(ResolvedTeam::match_names)
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.names.contains(&event.home_team.to_lowercase())
            || self.names.contains(&event.away_team.to_lowercase())
    }
}

/// Finals dated exactly `yesterday` with both scores, rendered through `render`.
pub fn top_game_candidates<F>(
    events: &[Event],
    yesterday: NaiveDate,
    favorites: &Favorites,
    render: F,
) -> Vec<RankedGame>
where
    F: Fn(&Event) -> String,
{
    events
        .iter()
        .filter(|e| e.date == Some(yesterday))
        .filter_map(|e| {
            let total_score = e.total_score()?;
            Some(RankedGame {
                is_favorite: favorites.matches(e),
                total_score,
                line: render(e),
            })
        })
        .collect()
}

/// Favorites first, then by combined score, both descending. Stable for equal keys.
///
/// At least one game is kept when there are candidates, even if `count` is zero.
pub fn rank_top_games(mut candidates: Vec<RankedGame>, count: usize) -> Vec<RankedGame> {
    candidates.sort_by_key(|g| Reverse((g.is_favorite, g.total_score)));
    candidates.truncate(count.max(1));
    candidates
}
