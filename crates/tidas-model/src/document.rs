//! Path walking and shape checks over generic JSON documents.
//!
//! ILCD datasets are handled as [`serde_json::Value`] trees. Helpers here keep
//! the path-based access used by the updater explicit about which node kinds
//! they accept at every hop.

use serde_json::{Map, Value};

pub const LANG_KEY: &str = "@xml:lang";
pub const TEXT_KEY: &str = "#text";

/// Reads the value at `path`, returning `None` when any hop is not an object.
pub fn get_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(root, |cursor, segment| cursor.as_object()?.get(*segment))
}

/// Returns the object stored under `key`, replacing any non-object value with `{}`.
pub fn ensure_object<'a>(parent: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    object_in(
        parent
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new())),
    )
}

/// Object view of `slot`; a non-object is replaced first, so this recurses at most once.
fn object_in(slot: &mut Value) -> &mut Map<String, Value> {
    match slot {
        Value::Object(map) => map,
        other => {
            *other = Value::Object(Map::new());
            object_in(other)
        }
    }
}

/// Writes `value` at `path`, creating intermediate objects, and returns the prior leaf.
///
/// An empty path leaves the document untouched and hands the value back.
pub fn assign_path(root: &mut Map<String, Value>, path: &[&str], value: Value) -> Option<Value> {
    let Some((leaf, parents)) = path.split_last() else {
        return Some(value);
    };
    let cursor = parents
        .iter()
        .fold(root, |cursor, segment| ensure_object(cursor, segment));
    cursor.insert((*leaf).to_string(), value)
}

/// Builds a `{@xml:lang, #text}` object.
pub fn multilang_entry(language: &str, text: &str) -> Value {
    let mut entry = Map::new();
    entry.insert(LANG_KEY.to_string(), Value::from(language));
    entry.insert(TEXT_KEY.to_string(), Value::from(text));
    Value::Object(entry)
}

/// Non-empty string view of a value.
pub fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// True when the value carries no usable reference.
///
/// Objects need a non-empty `@refObjectId` or `@uri`; lists are empty when every
/// entry is.
pub fn is_empty_reference(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.iter().all(is_empty_reference),
        Value::Object(map) => {
            non_empty_str(map.get("@refObjectId")).is_none() && non_empty_str(map.get("@uri")).is_none()
        }
        _ => false,
    }
}

/// True when the value carries no multilingual text.
pub fn is_empty_multilang(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.iter().all(is_empty_multilang),
        Value::Object(map) => non_empty_str(map.get(TEXT_KEY)).is_none(),
        _ => false,
    }
}

/// First non-empty text found depth-first (bare strings or `#text` entries).
pub fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Array(items) => items.iter().find_map(first_text),
        Value::Object(map) => non_empty_str(map.get(TEXT_KEY)).map(str::to_string),
        _ => None,
    }
}

/// Every non-empty text found depth-first, in document order.
pub fn all_texts(value: &Value) -> Vec<String> {
    let mut texts = Vec::new();
    collect_texts(value, &mut texts);
    texts
}

fn collect_texts(value: &Value, texts: &mut Vec<String>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_texts(item, texts)),
        other => texts.extend(first_text(other)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn get_path_stops_at_non_objects() {
        let document = json!({"a": {"b": [1, 2]}});
        assert_eq!(get_path(&document, &["a", "b"]), Some(&json!([1, 2])));
        assert_eq!(get_path(&document, &["a", "b", "c"]), None);
        assert_eq!(get_path(&document, &["missing"]), None);
        assert_eq!(get_path(&document, &[]), Some(&document));
    }

    #[test]
    fn assign_path_creates_and_replaces_intermediates() {
        let mut document = json!({"a": "scalar"});
        let root = document.as_object_mut().unwrap();
        let previous = assign_path(root, &["a", "b", "c"], json!("x"));
        assert!(previous.is_none());
        assert_eq!(document, json!({"a": {"b": {"c": "x"}}}));

        let root = document.as_object_mut().unwrap();
        let previous = assign_path(root, &["a", "b", "c"], json!("y"));
        assert_eq!(previous, Some(json!("x")));
    }

    #[test]
    fn empty_reference_shapes() {
        assert!(is_empty_reference(&Value::Null));
        assert!(is_empty_reference(&json!("")));
        assert!(is_empty_reference(&json!([])));
        assert!(is_empty_reference(&json!({"@type": "Source data set"})));
        assert!(is_empty_reference(&json!([{"@refObjectId": " "}, {}])));
        assert!(!is_empty_reference(&json!({"@uri": "https://x"})));
        assert!(!is_empty_reference(&json!([{}, {"@refObjectId": "abc"}])));
    }

    #[test]
    fn empty_multilang_shapes() {
        assert!(is_empty_multilang(&Value::Null));
        assert!(is_empty_multilang(&json!([])));
        assert!(is_empty_multilang(&json!({"@xml:lang": "en", "#text": ""})));
        assert!(!is_empty_multilang(&json!("plain text")));
        assert!(!is_empty_multilang(&json!([{"@xml:lang": "en", "#text": "x"}])));
    }

    #[test]
    fn texts_are_collected_depth_first() {
        let value = json!([
            {"@xml:lang": "zh", "#text": "风电"},
            {"@xml:lang": "en", "#text": " "},
            {"@xml:lang": "en", "#text": "Wind power"}
        ]);
        assert_eq!(first_text(&value).as_deref(), Some("风电"));
        assert_eq!(all_texts(&value), vec!["风电", "Wind power"]);
        assert_eq!(first_text(&json!(42)), None);
    }
}
