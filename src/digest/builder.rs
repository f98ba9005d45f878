use chrono::NaiveDate;
use chrono_tz::Tz;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::DigestBlocks;
use super::formatter::{
    NO_HIGHLIGHTS, NO_TODAY_LINES, NO_TOP_GAMES, NO_YESTERDAY_LINES, TOP_GAMES_UNAVAILABLE,
    format_final, format_next, format_upcoming, highlight_line, not_found_line, render_block,
    team_line, top_game_line, unavailable_line,
};
use crate::config::Config;
use crate::constants::league_emblem;
use crate::data_fetcher::api::{EventRetriever, RateLimitedFetcher, TeamResolver};
use crate::data_fetcher::cache::CacheStore;
use crate::data_fetcher::models::{ResolvedTeam, TeamSpec};
use crate::data_fetcher::processors::{
    DateWindow, Favorites, RankedGame, high_scoring_total, rank_top_games, top_game_candidates,
};
use crate::error::AppError;

/// Lines one team contributes to the digest.
#[derive(Debug, Default)]
struct TeamReport {
    yesterday: Option<String>,
    today: Option<String>,
    highlight: Option<String>,
}

impl TeamReport {
    fn both(line: String) -> Self {
        Self {
            yesterday: Some(line.clone()),
            today: Some(line),
            highlight: None,
        }
    }
}

/// Runs the per-team pipeline and the league-wide ranking for one day.
pub struct DigestBuilder {
    config: Config,
    tz: Tz,
    resolver: TeamResolver,
    retriever: EventRetriever,
}

impl DigestBuilder {
    pub fn new(
        config: &Config,
        resolver: TeamResolver,
        retriever: EventRetriever,
    ) -> Result<Self, AppError> {
        Ok(Self {
            config: config.clone(),
            tz: config.time_zone()?,
            resolver,
            retriever,
        })
    }

    /// Builder with resolver and retriever sharing one fetcher and one cache.
    pub fn from_config(
        config: &Config,
        fetcher: Arc<RateLimitedFetcher>,
        store: Arc<dyn CacheStore>,
    ) -> Result<Self, AppError> {
        let resolver = TeamResolver::from_config(config, fetcher.clone(), store.clone());
        let retriever = EventRetriever::from_config(config, fetcher, store);
        Self::new(config, resolver, retriever)
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    /// Builds all blocks for `today` (a date in the configured time zone).
    ///
    /// Never fails: a team whose lookups fail gets a degraded line, and the
    /// top-games block falls back to a placeholder.
    #[instrument(skip(self))]
    pub async fn build(&self, today: NaiveDate) -> DigestBlocks {
        let window = DateWindow::new(today, self.config.include_within_days);
        let mut yesterday_lines = Vec::new();
        let mut today_lines = Vec::new();
        let mut highlight_lines = Vec::new();

        for roster in &self.config.roster {
            if roster.teams.is_empty() {
                debug!("League {} has no configured teams", roster.league);
            }
            for name in &roster.teams {
                let spec = TeamSpec::new(name.as_str(), roster.league.as_str());
                let report = self.team_report_with_deadline(&spec, &window).await;
                yesterday_lines.extend(report.yesterday);
                today_lines.extend(report.today);
                highlight_lines.extend(report.highlight);
            }
        }

        let top_games = self.top_games_block(&window).await;
        info!(
            "Digest for {}: {} yesterday lines, {} today lines, {} highlights",
            today,
            yesterday_lines.len(),
            today_lines.len(),
            highlight_lines.len()
        );

        DigestBlocks {
            yesterday: render_block(&yesterday_lines, NO_YESTERDAY_LINES),
            today: render_block(&today_lines, NO_TODAY_LINES),
            highlights: render_block(&highlight_lines, NO_HIGHLIGHTS),
            top_games,
        }
    }

    async fn team_report_with_deadline(
        &self,
        spec: &TeamSpec,
        window: &DateWindow,
    ) -> TeamReport {
        let emblem = league_emblem(&spec.league);
        let deadline = Duration::from_secs(self.config.team_deadline_seconds);

        let outcome = match tokio::time::timeout(deadline, self.team_report(spec, window)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::digest_timeout(
                spec.display_name.as_str(),
                self.config.team_deadline_seconds,
            )),
        };

        outcome.unwrap_or_else(|e| {
            warn!("Degrading digest line for {}: {}", spec.display_name, e);
            TeamReport::both(unavailable_line(
                emblem,
                &spec.display_name,
                e.short_reason(),
            ))
        })
    }

    async fn team_report(
        &self,
        spec: &TeamSpec,
        window: &DateWindow,
    ) -> Result<TeamReport, AppError> {
        let emblem = league_emblem(&spec.league);
        let team = self.resolver.resolve(spec).await?;
        if !team.is_found() {
            return Ok(TeamReport::both(not_found_line(emblem, &spec.display_name)));
        }

        let events = self.retriever.events(&team).await?;
        let classified = window.classify(&events.recent, &events.upcoming);
        if !classified.is_relevant() {
            debug!("{} has no game yesterday or soon, leaving it out", spec.display_name);
            return Ok(TeamReport::default());
        }

        let line = |detail: String| team_line(emblem, &spec.display_name, &detail);
        let yesterday = match (classified.yesterday, classified.soon) {
            (Some(last), _) => Some(line(format_final(last))),
            (None, Some(next)) => Some(line(format_next(next, window, self.tz))),
            (None, None) => None,
        };
        let today = match (classified.today, classified.soon) {
            (Some(game), _) => Some(line(format_upcoming(game, window, self.tz))),
            (None, Some(next)) => Some(line(format_next(next, window, self.tz))),
            (None, None) => None,
        };
        let highlight = classified.yesterday.and_then(|last| {
            high_scoring_total(last, &spec.league, &self.config.high_scoring_thresholds)
                .map(|total| highlight_line(emblem, &spec.league, last, total))
        });

        Ok(TeamReport {
            yesterday,
            today,
            highlight,
        })
    }

    /// Every roster team, matched by display name and search alias.
    fn favorites(&self) -> Favorites {
        let teams: Vec<ResolvedTeam> = self
            .config
            .roster
            .iter()
            .flat_map(|roster| {
                roster.teams.iter().map(|name| ResolvedTeam {
                    display_name: name.clone(),
                    league: roster.league.clone(),
                    search_name: self.resolver.search_name(name),
                    provider_id: None,
                })
            })
            .collect();
        Favorites::from_teams(&teams)
    }

    /// Candidates from every roster league with a provider id, plus the number of failed leagues.
    async fn collect_top_games(&self, window: &DateWindow) -> (Vec<RankedGame>, usize) {
        let favorites = self.favorites();
        let mut candidates: Vec<RankedGame> = Vec::new();
        let mut failures = 0usize;
        let mut seen = BTreeSet::new();

        for roster in &self.config.roster {
            if !seen.insert(roster.league.as_str()) {
                continue;
            }
            let Some(league_id) = self.config.league_id_for(&roster.league) else {
                debug!("No provider league id for {}, skipping top games", roster.league);
                continue;
            };

            match self.retriever.past_league_events(&league_id).await {
                Ok(events) => {
                    let emblem = league_emblem(&roster.league);
                    candidates.extend(top_game_candidates(
                        &events,
                        window.yesterday(),
                        &favorites,
                        |e| format!("{} {}", emblem, format_final(e)),
                    ));
                }
                Err(e) => {
                    warn!("Top games for {} unavailable: {}", roster.league, e);
                    failures += 1;
                }
            }
        }
        (candidates, failures)
    }

    async fn top_games_block(&self, window: &DateWindow) -> String {
        let deadline = Duration::from_secs(self.config.team_deadline_seconds);
        let Ok((candidates, failures)) =
            tokio::time::timeout(deadline, self.collect_top_games(window)).await
        else {
            warn!(
                "Top games not collected within {}s",
                self.config.team_deadline_seconds
            );
            return TOP_GAMES_UNAVAILABLE.to_string();
        };

        if candidates.is_empty() {
            return if failures > 0 {
                TOP_GAMES_UNAVAILABLE.to_string()
            } else {
                NO_TOP_GAMES.to_string()
            };
        }

        let lines: Vec<String> = rank_top_games(candidates, self.config.top_games_count)
            .iter()
            .map(top_game_line)
            .collect();
        render_block(&lines, NO_TOP_GAMES)
    }
}
