//! Repository records wrapping a dataset payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Table row holding a dataset and its ownership metadata.
///
/// The payload is stored either under `json_ordered` or `json`, as an object or
/// as a JSON-encoded string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub id: String,
    pub user_id: Option<String>,
    pub team_id: Option<String>,
    /// `0` marks a private, writable record.
    pub state_code: Option<i64>,
    pub version: Option<String>,
    pub json: Option<Value>,
    pub json_ordered: Option<Value>,
}

impl Record {
    /// Decoded dataset payload, `None` when absent or unparseable.
    pub fn document(&self) -> Option<Value> {
        [&self.json_ordered, &self.json]
            .into_iter()
            .flatten()
            .find_map(decode_payload)
    }

    pub fn is_writable(&self) -> bool {
        self.state_code == Some(0)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id
            .as_deref()
            .is_some_and(|owner| owner.trim() == user_id.trim())
    }

    pub fn has_team(&self) -> bool {
        self.team_id
            .as_deref()
            .is_some_and(|team| !team.trim().is_empty())
    }

    pub fn trimmed_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .map(str::trim)
            .filter(|version| !version.is_empty())
    }
}

fn decode_payload(value: &Value) -> Option<Value> {
    match value {
        Value::Object(_) => Some(value.clone()),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed @ Value::Object(_)) => Some(parsed),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ordered_payload_wins_and_strings_are_decoded() {
        let record: Record = serde_json::from_value(json!({
            "id": "p1",
            "user_id": "u1",
            "state_code": 0,
            "json": {"processDataSet": {"a": 1}},
            "json_ordered": "{\"processDataSet\": {\"b\": 2}}"
        }))
        .unwrap();
        assert_eq!(record.document(), Some(json!({"processDataSet": {"b": 2}})));
        assert!(record.is_writable());
        assert!(record.is_owned_by(" u1"));
        assert!(!record.has_team());
    }

    #[test]
    fn broken_payload_falls_back_then_gives_up() {
        let record = Record {
            json_ordered: Some(json!("not json")),
            json: Some(json!({"processDataSet": {}})),
            ..Record::default()
        };
        assert_eq!(record.document(), Some(json!({"processDataSet": {}})));

        let record = Record {
            json: Some(json!([1, 2])),
            state_code: Some(100),
            ..Record::default()
        };
        assert_eq!(record.document(), None);
        assert!(!record.is_writable());
    }
}
