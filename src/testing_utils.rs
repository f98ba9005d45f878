use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde_json::{Value, json};
use std::sync::Mutex;
use std::time::Duration;

use crate::data_fetcher::api::Sleeper;
use crate::data_fetcher::models::Event;

/// Sleeper that records requested waits instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every requested wait, in order.
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn total(&self) -> Duration {
        self.waits().into_iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut waits) = self.waits.lock() {
            waits.push(duration);
        }
    }
}

/// Test utilities for creating events and provider payloads
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// Completed game with both scores
    pub fn final_event(
        away: &str,
        away_score: i64,
        home: &str,
        home_score: i64,
        date: NaiveDate,
    ) -> Event {
        Event {
            home_team: home.to_string(),
            away_team: away.to_string(),
            date: Some(date),
            date_raw: date.format("%Y-%m-%d").to_string(),
            time_of_day_utc: None,
            home_score: Some(home_score),
            away_score: Some(away_score),
        }
    }

    /// Scheduled game, `time_utc` as `HH:MM:SS` or `None` for an unknown time
    pub fn upcoming_event(
        away: &str,
        home: &str,
        date: NaiveDate,
        time_utc: Option<&str>,
    ) -> Event {
        Event {
            home_team: home.to_string(),
            away_team: away.to_string(),
            date: Some(date),
            date_raw: date.format("%Y-%m-%d").to_string(),
            time_of_day_utc: time_utc.and_then(|t| NaiveTime::parse_from_str(t, "%H:%M:%S").ok()),
            home_score: None,
            away_score: None,
        }
    }

    /// One provider event object with scores as strings, like the live API
    pub fn provider_final(
        away: &str,
        away_score: i64,
        home: &str,
        home_score: i64,
        date: NaiveDate,
    ) -> Value {
        json!({
            "strHomeTeam": home,
            "strAwayTeam": away,
            "dateEvent": date.format("%Y-%m-%d").to_string(),
            "strTime": "00:00:00",
            "intHomeScore": home_score.to_string(),
            "intAwayScore": away_score.to_string(),
        })
    }

    pub fn provider_upcoming(away: &str, home: &str, date: NaiveDate, time_utc: &str) -> Value {
        json!({
            "strHomeTeam": home,
            "strAwayTeam": away,
            "dateEvent": date.format("%Y-%m-%d").to_string(),
            "strTime": time_utc,
            "intHomeScore": null,
            "intAwayScore": null,
        })
    }

    /// `searchteams.php` body; `None` gives the provider's "no match" shape
    pub fn team_search(id: Option<&str>, name: &str) -> Value {
        match id {
            Some(id) => json!({ "teams": [{ "idTeam": id, "strTeam": name }] }),
            None => json!({ "teams": null }),
        }
    }

    /// `eventslast.php` body
    pub fn last_events(events: Vec<Value>) -> Value {
        json!({ "results": events })
    }

    /// `eventsnext.php` and `eventspastleague.php` body
    pub fn event_list(events: Vec<Value>) -> Value {
        json!({ "events": events })
    }
}
