//! URL and cache-key building for the provider's v1 endpoints

/// Builds the team search endpoint. The team name goes in the `t` query parameter.
///
/// # Example
/// ```
/// use sports_digest::data_fetcher::api::build_search_teams_url;
///
/// let url = build_search_teams_url("https://www.thesportsdb.com/api/v1/json/3");
/// assert_eq!(url, "https://www.thesportsdb.com/api/v1/json/3/searchteams.php");
/// ```
pub fn build_search_teams_url(base_url: &str) -> String {
    format!("{base_url}/searchteams.php")
}

/// Builds the endpoint for a team's most recent results (`id` query parameter).
///
/// # Example
/// ```
/// use sports_digest::data_fetcher::api::build_last_events_url;
///
/// let url = build_last_events_url("https://www.thesportsdb.com/api/v1/json/3");
/// assert_eq!(url, "https://www.thesportsdb.com/api/v1/json/3/eventslast.php");
/// ```
pub fn build_last_events_url(base_url: &str) -> String {
    format!("{base_url}/eventslast.php")
}

/// Builds the endpoint for a team's next scheduled fixtures (`id` query parameter).
pub fn build_next_events_url(base_url: &str) -> String {
    format!("{base_url}/eventsnext.php")
}

/// Builds the endpoint for a league's recently completed games (`id` query parameter).
pub fn build_past_league_events_url(base_url: &str) -> String {
    format!("{base_url}/eventspastleague.php")
}

/// Cache key of a team's recent results.
pub fn last_events_key(team_id: &str) -> String {
    format!("last:{team_id}")
}

/// Cache key of a team's upcoming fixtures.
pub fn next_events_key(team_id: &str) -> String {
    format!("next:{team_id}")
}

/// Cache key of a league's recent finals.
pub fn past_league_key(league_id: &str) -> String {
    format!("pastleague:{league_id}")
}

/// Cache key of a team search: the search string, trimmed and lowercased.
///
/// # Example
/// ```
/// use sports_digest::data_fetcher::api::team_id_key;
///
/// assert_eq!(team_id_key("  New York Knicks "), "new york knicks");
/// ```
pub fn team_id_key(search_name: &str) -> String {
    search_name.trim().to_lowercase()
}
