//! Candidate roster, filtering and ordering
//!
//! Candidates are opaque JSON records with an `id` and whatever display
//! fields the roster carries (`fullName`, `email`, ...). The selection
//! pipeline filters on the configured search key, orders by where the
//! token occurs and caps the list at the configured limit.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::config::{FilterPolicy, TriggerConfig};

// =============================================================================
// Types
// =============================================================================

/// A mentionable entry (e.g. a contributor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Identifier, stringified if the roster sends numbers
    #[serde(deserialize_with = "scalar_to_string")]
    pub id: String,
    /// Remaining fields, addressed by templates and the search key
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

fn scalar_to_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "candidate id must be a string or number, got {}",
            other
        ))),
    }
}

impl Candidate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Raw field lookup; `id` resolves to the identifier
    pub fn field(&self, key: &str) -> Option<Value> {
        if key == "id" {
            return Some(Value::String(self.id.clone()));
        }
        self.fields.get(key).cloned()
    }

    /// Field rendered as text, if it is a scalar
    pub fn text(&self, key: &str) -> Option<String> {
        match self.field(key)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Parse a roster from a JSON array
    pub fn list_from_json(json: &str) -> Result<Vec<Candidate>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Position of the token in the key, by the given policy
fn token_position(key: &str, token: &str, policy: FilterPolicy) -> Option<usize> {
    let key = key.to_lowercase();
    let token = token.to_lowercase();
    match policy {
        FilterPolicy::Contains => key.find(&token),
        FilterPolicy::Prefix => key.starts_with(&token).then_some(0),
    }
}

/// Filter, order and cap the roster for a token
///
/// An empty token keeps every candidate in roster order. Otherwise
/// candidates are ordered by where the token first occurs in their search
/// key; ties keep roster order. Candidates without a textual search key
/// are skipped.
pub fn select_candidates<'a>(
    candidates: &'a [Candidate],
    token: &str,
    config: &TriggerConfig,
) -> Vec<&'a Candidate> {
    if token.is_empty() {
        return candidates
            .iter()
            .filter(|c| c.text(&config.search_key).is_some())
            .take(config.limit)
            .collect();
    }

    let mut ranked: Vec<(usize, &Candidate)> = candidates
        .iter()
        .filter_map(|c| {
            let key = c.text(&config.search_key)?;
            token_position(&key, token, config.filter).map(|pos| (pos, c))
        })
        .collect();

    // Stable: equal positions keep roster order
    ranked.sort_by_key(|(pos, _)| *pos);

    ranked
        .into_iter()
        .take(config.limit)
        .map(|(_, c)| c)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Candidate> {
        Candidate::list_from_json(
            r#"[
                {"id": "u1", "fullName": "Jane Doe"},
                {"id": "u2", "fullName": "Doris Janeway"},
                {"id": 3, "fullName": "Adam Smith"},
                {"id": "u4", "fullName": "John Jane"},
                {"id": "u5", "email": "nobody@example.com"}
            ]"#,
        )
        .unwrap()
    }

    fn ids(selected: &[&Candidate]) -> Vec<String> {
        selected.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_numeric_id_stringified() {
        let roster = roster();
        assert_eq!(roster[2].id, "3");
        assert_eq!(roster[2].text("fullName").as_deref(), Some("Adam Smith"));
        assert_eq!(roster[2].text("id").as_deref(), Some("3"));
    }

    #[test]
    fn test_invalid_id_rejected() {
        assert!(Candidate::list_from_json(r#"[{"id": {"nested": 1}}]"#).is_err());
    }

    #[test]
    fn test_contains_ordered_by_position() {
        let roster = roster();
        let selected = select_candidates(&roster, "jane", &TriggerConfig::at());
        // "Jane Doe" (0), "Doris Janeway" (6), "John Jane" (5)
        assert_eq!(ids(&selected), vec!["u1", "u4", "u2"]);
    }

    #[test]
    fn test_prefix_policy() {
        let roster = roster();
        let config = TriggerConfig {
            filter: FilterPolicy::Prefix,
            ..TriggerConfig::at()
        };
        let selected = select_candidates(&roster, "JO", &config);
        assert_eq!(ids(&selected), vec!["u4"]);
    }

    #[test]
    fn test_empty_token_keeps_roster_order() {
        let roster = roster();
        let selected = select_candidates(&roster, "", &TriggerConfig::at());
        // u5 has no fullName
        assert_eq!(ids(&selected), vec!["u1", "u2", "3", "u4"]);
    }

    #[test]
    fn test_limit() {
        let roster = roster();
        let config = TriggerConfig {
            limit: 2,
            ..TriggerConfig::at()
        };
        assert_eq!(select_candidates(&roster, "", &config).len(), 2);
        // "Adam Smith" (0) before "Jane Doe" (1)
        assert_eq!(ids(&select_candidates(&roster, "a", &config)), vec!["3", "u1"]);
    }

    #[test]
    fn test_no_hits() {
        let roster = roster();
        assert!(select_candidates(&roster, "zzz", &TriggerConfig::at()).is_empty());
    }
}
