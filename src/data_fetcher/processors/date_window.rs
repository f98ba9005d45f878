//! Yesterday / today / look-ahead classification of a team's games

use chrono::{Duration, NaiveDate};

use crate::data_fetcher::models::Event;

/// Today's date plus an inclusive lookahead, both in the configured time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    today: NaiveDate,
    lookahead_days: i64,
}

/// Which of a team's events matter for the digest.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Classification<'a> {
    /// First recent result dated exactly yesterday
    pub yesterday: Option<&'a Event>,
    /// First upcoming fixture dated today
    pub today: Option<&'a Event>,
    /// First upcoming fixture in `[today, today + N]`
    pub soon: Option<&'a Event>,
}

impl Classification<'_> {
    /// Teams that neither played yesterday nor play soon are left out of the digest.
    pub fn is_relevant(&self) -> bool {
        self.yesterday.is_some() || self.soon.is_some()
    }
}

impl DateWindow {
    /// Negative lookaheads are treated as zero.
    pub fn new(today: NaiveDate, lookahead_days: i64) -> Self {
        Self {
            today,
            lookahead_days: lookahead_days.max(0),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn yesterday(&self) -> NaiveDate {
        self.today - Duration::days(1)
    }

    /// Last date that still counts as "soon".
    pub fn latest_allowed(&self) -> NaiveDate {
        self.today + Duration::days(self.lookahead_days)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.today <= date && date <= self.latest_allowed()
    }

    pub fn played_yesterday<'a>(&self, recent: &'a [Event]) -> Option<&'a Event> {
        let yesterday = self.yesterday();
        recent.iter().find(|e| e.date == Some(yesterday))
    }

    pub fn plays_today<'a>(&self, upcoming: &'a [Event]) -> Option<&'a Event> {
        upcoming.iter().find(|e| e.date == Some(self.today))
    }

    /// First upcoming event inside the window. Provider order is taken as chronological.
    pub fn next_soon<'a>(&self, upcoming: &'a [Event]) -> Option<&'a Event> {
        upcoming
            .iter()
            .find(|e| e.date.is_some_and(|d| self.contains(d)))
    }

    pub fn classify<'a>(&self, recent: &'a [Event], upcoming: &'a [Event]) -> Classification<'a> {
        Classification {
            yesterday: self.played_yesterday(recent),
            today: self.plays_today(upcoming),
            soon: self.next_soon(upcoming),
        }
    }

    /// `today`, `tomorrow`, or the ISO date.
    pub fn day_label(&self, date: NaiveDate) -> String {
        match (date - self.today).num_days() {
            0 => "today".to_string(),
            1 => "tomorrow".to_string(),
            _ => date.format("%Y-%m-%d").to_string(),
        }
    }
}
