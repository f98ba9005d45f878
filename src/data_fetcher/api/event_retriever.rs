use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::fetcher::RateLimitedFetcher;
use super::urls::{
    build_last_events_url, build_next_events_url, build_past_league_events_url, last_events_key,
    next_events_key, past_league_key,
};
use crate::config::Config;
use crate::data_fetcher::cache::{CacheStore, Namespace, get_fresh};
use crate::data_fetcher::models::{Event, EventListResponse, ResolvedTeam};
use crate::error::AppError;

/// A team's recent results and upcoming fixtures, in provider order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamEvents {
    pub recent: Vec<Event>,
    pub upcoming: Vec<Event>,
}

/// Cached access to the provider's event lists.
pub struct EventRetriever {
    fetcher: Arc<RateLimitedFetcher>,
    store: Arc<dyn CacheStore>,
    base_url: String,
    ttl: Duration,
}

impl EventRetriever {
    pub fn new(
        fetcher: Arc<RateLimitedFetcher>,
        store: Arc<dyn CacheStore>,
        base_url: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            fetcher,
            store,
            base_url: base_url.into(),
            ttl,
        }
    }

    pub fn from_config(
        config: &Config,
        fetcher: Arc<RateLimitedFetcher>,
        store: Arc<dyn CacheStore>,
    ) -> Self {
        Self::new(fetcher, store, config.api_base_url(), config.events_ttl())
    }

    /// Recent results and upcoming fixtures, each cached under its own key.
    ///
    /// An unresolved team has no events and causes no requests.
    #[instrument(skip(self, team), fields(team = %team.display_name))]
    pub async fn events(&self, team: &ResolvedTeam) -> Result<TeamEvents, AppError> {
        let Some(team_id) = team.provider_id.as_deref() else {
            debug!("Skipping event lookup for unresolved team");
            return Ok(TeamEvents::default());
        };

        let recent = self.recent_results(team_id).await?;
        let upcoming = self.upcoming(team_id).await?;
        Ok(TeamEvents { recent, upcoming })
    }

    pub async fn recent_results(&self, team_id: &str) -> Result<Vec<Event>, AppError> {
        self.cached_events(
            &last_events_key(team_id),
            &build_last_events_url(&self.base_url),
            team_id,
        )
        .await
    }

    pub async fn upcoming(&self, team_id: &str) -> Result<Vec<Event>, AppError> {
        self.cached_events(
            &next_events_key(team_id),
            &build_next_events_url(&self.base_url),
            team_id,
        )
        .await
    }

    /// Recently completed games of a whole league, used for top-game ranking.
    #[instrument(skip(self))]
    pub async fn past_league_events(&self, league_id: &str) -> Result<Vec<Event>, AppError> {
        self.cached_events(
            &past_league_key(league_id),
            &build_past_league_events_url(&self.base_url),
            league_id,
        )
        .await
    }

    async fn cached_events(&self, key: &str, url: &str, id: &str) -> Result<Vec<Event>, AppError> {
        if let Some(cached) =
            get_fresh(self.store.as_ref(), Namespace::Events, key, self.ttl).await
        {
            match serde_json::from_value::<EventListResponse>(cached) {
                Ok(response) => return Ok(response.into_events()),
                Err(e) => warn!("Cached payload for {} is unreadable, refetching: {}", key, e),
            }
        }

        let body = self.fetcher.fetch(url, &[("id", id)]).await?;
        let response = serde_json::from_value::<EventListResponse>(body.clone())
            .map_err(|e| AppError::api_unexpected_structure(e.to_string(), url))?;
        self.store.put(Namespace::Events, key, body).await;

        let events = response.into_events();
        debug!("Fetched {} events for {}", events.len(), key);
        Ok(events)
    }
}
