use super::value_as_string;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A team as listed in the configured roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeamSpec {
    pub display_name: String,
    pub league: String,
}

impl TeamSpec {
    pub fn new(display_name: impl Into<String>, league: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            league: league.into(),
        }
    }
}

/// Outcome of a team lookup.
///
/// `provider_id` is `None` when the provider's search found nothing; that is a
/// normal outcome and callers render a "team not found" line for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTeam {
    pub display_name: String,
    pub league: String,
    /// The string actually sent to the team search (alias or display name).
    pub search_name: String,
    pub provider_id: Option<String>,
}

impl ResolvedTeam {
    pub fn is_found(&self) -> bool {
        self.provider_id.is_some()
    }

    /// Names an event may use for this team, lowercased.
    pub fn match_names(&self) -> Vec<String> {
        let mut names = vec![self.display_name.trim().to_lowercase()];
        let alias = self.search_name.trim().to_lowercase();
        if !names.contains(&alias) {
            names.push(alias);
        }
        names
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderTeam {
    #[serde(rename = "idTeam", default)]
    pub id: Option<Value>,
    #[serde(rename = "strTeam", default)]
    pub name: Option<String>,
}

impl ProviderTeam {
    pub fn provider_id(&self) -> Option<String> {
        value_as_string(self.id.as_ref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamSearchResponse {
    #[serde(default)]
    pub teams: Option<Vec<ProviderTeam>>,
}

impl TeamSearchResponse {
    /// The provider's first candidate; no further disambiguation is attempted.
    pub fn first_id(&self) -> Option<String> {
        self.teams.as_ref()?.first()?.provider_id()
    }
}
