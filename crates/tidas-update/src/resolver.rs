//! Reference metadata lookup.

use serde_json::{Map, Value};
use tidas_model::document::{LANG_KEY, TEXT_KEY, get_path};
use tidas_model::{LanguageValue, PLACEHOLDER_VERSION, ReferenceMetadata, dataset_uri};
use tracing::{debug, warn};

use crate::repository::Repository;

/// Looks up descriptive metadata for a referenced dataset.
///
/// A miss is an expected outcome: callers fall back to a placeholder reference.
pub trait ReferenceResolver {
    fn resolve(&self, ref_id: &str, ref_type: Option<&str>) -> Option<ReferenceMetadata>;
}

/// Resolver backed by the dataset repository.
pub struct RepositoryResolver<'a, R: ?Sized> {
    repository: &'a R,
}

impl<'a, R: Repository + ?Sized> RepositoryResolver<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }
}

/// Repository table holding datasets of a reference type.
pub fn table_for_type(ref_type: &str) -> Option<&'static str> {
    match ref_type.trim().to_ascii_lowercase().as_str() {
        "contact data set" => Some("contacts"),
        "source data set" => Some("sources"),
        "flow data set" => Some("flows"),
        "process data set" => Some("processes"),
        _ => None,
    }
}

impl<R: Repository + ?Sized> ReferenceResolver for RepositoryResolver<'_, R> {
    fn resolve(&self, ref_id: &str, ref_type: Option<&str>) -> Option<ReferenceMetadata> {
        let Some(table) = ref_type.and_then(table_for_type) else {
            debug!(ref_id, ref_type = ref_type.unwrap_or("unknown"), "reference table unknown");
            return None;
        };
        let record = match self.repository.fetch_record(table, ref_id) {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(ref_id, table, "reference record missing");
                return None;
            }
            Err(error) => {
                warn!(ref_id, table, %error, "reference lookup failed");
                return None;
            }
        };

        let payload = record.document().unwrap_or_else(|| Value::Object(Map::new()));
        let mut descriptions = extract_descriptions(&payload);
        if descriptions.is_empty() {
            descriptions.push(LanguageValue::new("en", ref_id));
        }
        let ref_type = ref_type
            .map(str::to_string)
            .or_else(|| type_from_payload(&payload))
            .unwrap_or_else(|| "Source data set".to_string());

        Some(ReferenceMetadata {
            ref_type,
            ref_id: ref_id.to_string(),
            version: record
                .trimmed_version()
                .unwrap_or(PLACEHOLDER_VERSION)
                .to_string(),
            uri: dataset_uri(ref_id),
            descriptions,
        })
    }
}

/// `"<Kind> data set"` derived from the payload's `*DataSet` key.
fn type_from_payload(payload: &Value) -> Option<String> {
    payload.as_object()?.keys().find_map(|key| {
        let base = key.strip_suffix("DataSet")?;
        let mut chars = base.chars();
        let first = chars.next()?;
        Some(format!(
            "{}{} data set",
            first.to_uppercase(),
            chars.as_str().to_lowercase()
        ))
    })
}

// Per-kind description sources, tried in order.
const DESCRIPTION_SOURCES: &[(&str, &[&str], &[&[&str]])] = &[
    (
        "sourceDataSet",
        &["sourceInformation", "dataSetInformation"],
        &[&["common:shortName"], &["sourceCitation"]],
    ),
    (
        "contactDataSet",
        &["contactInformation", "dataSetInformation"],
        &[&["common:shortName"], &["common:name"]],
    ),
    (
        "processDataSet",
        &["processInformation", "dataSetInformation"],
        &[&["name", "baseName"], &["common:shortName"]],
    ),
    (
        "flowDataSet",
        &["flowInformation", "dataSetInformation"],
        &[&["name"], &["common:shortName"]],
    ),
];

fn extract_descriptions(payload: &Value) -> Vec<LanguageValue> {
    for (section, info_path, candidates) in DESCRIPTION_SOURCES {
        let Some(info) = payload
            .get(*section)
            .filter(|section| section.is_object())
            .and_then(|section| get_path(section, info_path))
        else {
            continue;
        };
        let found = candidates
            .iter()
            .filter_map(|path| get_path(info, path))
            .map(multilang_entries)
            .find(|entries| !entries.is_empty());
        if let Some(entries) = found {
            return entries;
        }
    }
    short_description_entries(payload)
}

/// Language/text pairs found anywhere in a value, de-duplicated in order.
fn multilang_entries(value: &Value) -> Vec<LanguageValue> {
    fn collect(item: &Value, out: &mut Vec<LanguageValue>) {
        match item {
            Value::Array(items) => items.iter().for_each(|sub| collect(sub, out)),
            Value::Object(map) => match (map.get(LANG_KEY), map.get(TEXT_KEY)) {
                (Some(lang), Some(Value::String(text))) => {
                    let lang = lang.as_str().filter(|lang| !lang.is_empty()).unwrap_or("en");
                    out.push(LanguageValue::new(lang, text.as_str()));
                }
                _ => map.values().for_each(|sub| collect(sub, out)),
            },
            Value::String(text) if !text.trim().is_empty() => {
                out.push(LanguageValue::new("en", text.trim()));
            }
            _ => {}
        }
    }

    let mut entries = Vec::new();
    collect(value, &mut entries);
    let mut unique: Vec<LanguageValue> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !unique.contains(&entry) {
            unique.push(entry);
        }
    }
    unique
}

/// First `common:shortDescription` found depth-first.
fn short_description_entries(value: &Value) -> Vec<LanguageValue> {
    let Some(map) = value.as_object() else {
        return Vec::new();
    };
    if let Some(direct) = map.get("common:shortDescription") {
        let entries = multilang_entries(direct);
        if !entries.is_empty() {
            return entries;
        }
    }
    map.values()
        .flat_map(|child| match child {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![other],
        })
        .map(short_description_entries)
        .find(|entries| !entries.is_empty())
        .unwrap_or_default()
}
