use super::value_as_i64;
use crate::data_fetcher::processors::parse_time_of_day;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One event as the provider sends it. Every field is optional on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderEvent {
    #[serde(rename = "strHomeTeam", default)]
    pub home_team: Option<String>,
    #[serde(rename = "strAwayTeam", default)]
    pub away_team: Option<String>,
    #[serde(rename = "dateEvent", default)]
    pub date_event: Option<String>,
    #[serde(rename = "strTime", default)]
    pub time: Option<String>,
    #[serde(rename = "intHomeScore", default)]
    pub home_score: Option<Value>,
    #[serde(rename = "intAwayScore", default)]
    pub away_score: Option<Value>,
}

/// Envelope of the event-list endpoints.
///
/// Recent team results arrive under `results`; upcoming fixtures and
/// league-wide results under `events`. The provider sends `null` for empty lists.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EventListResponse {
    #[serde(default)]
    pub results: Option<Vec<ProviderEvent>>,
    #[serde(default)]
    pub events: Option<Vec<ProviderEvent>>,
}

impl EventListResponse {
    /// All events in provider order, whichever list they came in.
    pub fn into_events(self) -> Vec<Event> {
        self.results
            .into_iter()
            .flatten()
            .chain(self.events.into_iter().flatten())
            .map(Event::from)
            .collect()
    }
}

/// A game between two teams on a calendar date.
///
/// `date` is the provider's calendar date, not an instant; only
/// `time_of_day_utc` is subject to time-zone conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub home_team: String,
    pub away_team: String,
    pub date: Option<NaiveDate>,
    pub date_raw: String,
    pub time_of_day_utc: Option<NaiveTime>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
}

impl Event {
    /// Combined score, only when both sides reported one and the sum fits.
    pub fn total_score(&self) -> Option<i64> {
        self.home_score?.checked_add(self.away_score?)
    }
}

impl From<ProviderEvent> for Event {
    fn from(raw: ProviderEvent) -> Self {
        let date_raw = raw.date_event.unwrap_or_default().trim().to_string();
        let date = NaiveDate::parse_from_str(&date_raw, "%Y-%m-%d").ok();
        Self {
            home_team: raw
                .home_team
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "?".to_string()),
            away_team: raw
                .away_team
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "?".to_string()),
            date,
            date_raw,
            time_of_day_utc: raw.time.as_deref().and_then(parse_time_of_day),
            home_score: value_as_i64(raw.home_score.as_ref()),
            away_score: value_as_i64(raw.away_score.as_ref()),
        }
    }
}
