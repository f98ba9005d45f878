use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::fetcher::RateLimitedFetcher;
use super::urls::{build_search_teams_url, team_id_key};
use crate::config::Config;
use crate::data_fetcher::cache::{CacheStore, Namespace, get_fresh};
use crate::data_fetcher::models::{ResolvedTeam, TeamSearchResponse, TeamSpec, value_as_string};
use crate::error::AppError;

/// Maps display names to provider team ids through the cache and the team search.
pub struct TeamResolver {
    fetcher: Arc<RateLimitedFetcher>,
    store: Arc<dyn CacheStore>,
    base_url: String,
    ttl: Duration,
    aliases: BTreeMap<String, String>,
}

impl TeamResolver {
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
            aliases: BTreeMap::new(),
        }
    }

    /// Display name -> search string overrides.
    pub fn with_aliases(mut self, aliases: BTreeMap<String, String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn from_config(
        config: &Config,
        fetcher: Arc<RateLimitedFetcher>,
        store: Arc<dyn CacheStore>,
    ) -> Self {
        Self::new(fetcher, store, config.api_base_url(), config.team_id_ttl())
            .with_aliases(config.search_aliases())
    }

    pub fn search_name(&self, display_name: &str) -> String {
        self.aliases
            .get(display_name)
            .cloned()
            .unwrap_or_else(|| display_name.to_string())
    }

    /// Resolves a team. An empty search result is `Ok` with no provider id.
    ///
    /// Only successful lookups are cached, so unresolved teams are searched
    /// again on the next run.
    #[instrument(skip(self, spec), fields(team = %spec.display_name))]
    pub async fn resolve(&self, spec: &TeamSpec) -> Result<ResolvedTeam, AppError> {
        let search_name = self.search_name(&spec.display_name);
        let key = team_id_key(&search_name);
        let resolved = |provider_id: Option<String>| ResolvedTeam {
            display_name: spec.display_name.clone(),
            league: spec.league.clone(),
            search_name: search_name.clone(),
            provider_id,
        };

        if let Some(cached) = get_fresh(self.store.as_ref(), Namespace::TeamIds, &key, self.ttl).await
            && let Some(id) = value_as_string(Some(&cached))
        {
            debug!("Team id for '{}' served from cache: {}", search_name, id);
            return Ok(resolved(Some(id)));
        }

        let url = build_search_teams_url(&self.base_url);
        let body = self
            .fetcher
            .fetch(&url, &[("t", search_name.as_str())])
            .await?;
        let response: TeamSearchResponse = serde_json::from_value(body)
            .map_err(|e| AppError::api_unexpected_structure(e.to_string(), &url))?;

        match response.first_id() {
            Some(id) => {
                info!("Resolved '{}' to provider team {}", search_name, id);
                self.store
                    .put(Namespace::TeamIds, &key, Value::String(id.clone()))
                    .await;
                Ok(resolved(Some(id)))
            }
            None => {
                info!("No provider team matches '{}'", search_name);
                Ok(resolved(None))
            }
        }
    }
}
