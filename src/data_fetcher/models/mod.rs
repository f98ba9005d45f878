pub mod event;
pub mod team;

pub use event::{Event, EventListResponse, ProviderEvent};
pub use team::{ProviderTeam, ResolvedTeam, TeamSearchResponse, TeamSpec};

use serde_json::Value;

/// Reads an integer the provider may send as a number, a numeric string, or not at all.
pub(crate) fn value_as_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Reads an identifier the provider may send as a string or a number.
pub(crate) fn value_as_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
