//! Read-only comparison of a dataset against its requirements.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};
use tidas_model::document::{LANG_KEY, TEXT_KEY, get_path};
use tidas_model::{
    ExchangeUpdate, FieldMapping, FieldRequirement, RequirementAnalysis, RequirementBundle,
    RequirementError, Result, ValueRule,
};
use tidas_standards::{TranslationLookup, exchange_field_key, lookup};

use crate::convert::{ValueConverter, boolean, reference_id};
use crate::matcher::select_process;

/// Process dataset root of a document without modifying it.
///
/// Prefers a `processDataSet` object, then a document that already carries
/// `processInformation` at its top level.
pub fn dataset_root(document: &Value) -> Option<&Map<String, Value>> {
    let map = document.as_object()?;
    match map.get("processDataSet") {
        Some(Value::Object(root)) => Some(root),
        _ if map.contains_key("processInformation") => Some(map),
        _ => None,
    }
}

/// Computes requirement gaps without mutating the dataset.
#[derive(Clone, Copy)]
pub struct RequirementAnalyzer<'a> {
    converter: ValueConverter<'a>,
}

impl<'a> RequirementAnalyzer<'a> {
    pub fn new(translations: &'a TranslationLookup) -> Self {
        Self {
            converter: ValueConverter::new(translations),
        }
    }

    /// Reports which global, process and exchange requirements are unmet.
    ///
    /// # Errors
    ///
    /// Requirement values that cannot be interpreted (bad UUIDs, unknown enum
    /// text, unconvertible booleans) are configuration errors.
    pub fn analyse(&self, document: &Value, bundle: &RequirementBundle) -> Result<RequirementAnalysis> {
        let empty = Map::new();
        let root = dataset_root(document).unwrap_or(&empty);
        let mut analysis = RequirementAnalysis {
            has_global_requirements: !bundle.global_updates.is_empty(),
            available_process_names: bundle.process_names(),
            ..RequirementAnalysis::default()
        };

        analysis.missing_global_fields =
            self.missing_fields(root, &bundle.global_updates, &mut analysis.unsupported_labels)?;

        match select_process(root, bundle) {
            Some(selected) => {
                let requirement = selected.requirement;
                analysis.matched_process_name = Some(requirement.process_name.trim().to_string());
                analysis.matched_process_index = selected.index;
                analysis.matched_binding = selected.binding.map(str::to_string);
                analysis.process_fields_defined = !requirement.fields.is_empty();
                analysis.process_exchanges_defined = !requirement.exchange_updates.is_empty();
                analysis.missing_process_fields = self.missing_fields(
                    root,
                    &requirement.fields,
                    &mut analysis.unsupported_labels,
                )?;
                for update in &requirement.exchange_updates {
                    match exchange_field_key(&update.label) {
                        None => analysis.unsupported_labels.push(update.label.clone()),
                        Some(key) if exchange_differs(root, key, update) => {
                            analysis.missing_process_exchanges.push(update.label.clone());
                        }
                        Some(_) => {}
                    }
                }
            }
            None => {
                analysis.process_fields_defined = bundle
                    .process_updates
                    .iter()
                    .any(|requirement| !requirement.fields.is_empty());
                analysis.process_exchanges_defined = bundle
                    .process_updates
                    .iter()
                    .any(|requirement| !requirement.exchange_updates.is_empty());
            }
        }
        Ok(analysis)
    }

    fn missing_fields(
        &self,
        root: &Map<String, Value>,
        requirements: &[FieldRequirement],
        unsupported: &mut Vec<String>,
    ) -> Result<Vec<String>> {
        let mut missing = Vec::new();
        for requirement in requirements {
            let Some(mapping) = lookup(&requirement.label) else {
                unsupported.push(requirement.label.clone());
                continue;
            };
            if self.field_differs(root, mapping, requirement)? {
                missing.push(requirement.label.clone());
            }
        }
        Ok(missing)
    }

    fn field_differs(
        &self,
        root: &Map<String, Value>,
        mapping: &FieldMapping,
        requirement: &FieldRequirement,
    ) -> Result<bool> {
        let existing = mapping
            .schema_path
            .split_first()
            .and_then(|(first, rest)| get_path(root.get(*first)?, rest));
        let differs = match mapping.rule {
            ValueRule::Multilang => {
                let expected = expected_multilang(requirement)?;
                let actual = existing.map(actual_multilang).unwrap_or_default();
                expected
                    .iter()
                    .any(|(language, text)| actual.get(language) != Some(text))
            }
            ValueRule::Reference { .. } => {
                let expected = reference_id(requirement)?;
                let actual = existing.map(reference_ids).unwrap_or_default();
                !actual.contains(&expected)
            }
            ValueRule::Enum => {
                let expected = self.converter.enumeration(mapping, requirement)?;
                existing.and_then(enum_text).as_deref() != Some(expected.as_str())
            }
            ValueRule::Bool => {
                let expected = boolean(requirement)?;
                existing.and_then(bool_text) != Some(expected)
            }
        };
        Ok(differs)
    }
}

/// Language → text pairs a multilingual requirement writes; first entry per language wins.
fn expected_multilang(requirement: &FieldRequirement) -> Result<BTreeMap<String, String>> {
    let mut pairs = BTreeMap::new();
    for entry in requirement.language_values()? {
        if !entry.text.is_empty() {
            pairs
                .entry(entry.language.clone())
                .or_insert_with(|| entry.text.clone());
        }
    }
    if pairs.is_empty() {
        return Err(RequirementError::EmptyMultilang {
            label: requirement.label.clone(),
        });
    }
    Ok(pairs)
}

/// Language → text pairs stored in a document value; untagged text is keyed by `""`.
fn actual_multilang(value: &Value) -> BTreeMap<String, String> {
    let mut pairs = BTreeMap::new();
    collect_multilang(value, &mut pairs);
    pairs
}

fn collect_multilang(value: &Value, pairs: &mut BTreeMap<String, String>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_multilang(item, pairs)),
        Value::Object(map) => {
            let text = map
                .get(TEXT_KEY)
                .filter(|text| !text.is_null())
                .or_else(|| map.get("text"))
                .and_then(Value::as_str);
            if let Some(text) = text {
                let language = map.get(LANG_KEY).and_then(Value::as_str).unwrap_or("");
                pairs
                    .entry(language.to_string())
                    .or_insert_with(|| text.to_string());
            }
        }
        Value::String(text) => {
            pairs.entry(String::new()).or_insert_with(|| text.clone());
        }
        _ => {}
    }
}

fn reference_ids(value: &Value) -> BTreeSet<String> {
    match value {
        Value::Array(items) => items.iter().flat_map(reference_ids).collect(),
        Value::Object(map) => map
            .get("@refObjectId")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .into_iter()
            .collect(),
        Value::String(text) if !text.trim().is_empty() => BTreeSet::from([text.trim().to_string()]),
        _ => BTreeSet::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.trim().to_string()),
        other => Some(other.to_string().trim().to_string()),
    }
}

fn enum_text(value: &Value) -> Option<String> {
    scalar_text(value)
}

fn bool_text(value: &Value) -> Option<&'static str> {
    match scalar_text(value)?.to_lowercase().as_str() {
        "true" => Some("true"),
        "false" => Some("false"),
        _ => None,
    }
}

/// Text currently stored on an exchange for comparison.
fn exchange_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// True when any exchange lacks the value an exchange update writes.
///
/// Datasets without exchanges have nothing to update. Match rules other than
/// `all` are compared as `all`, mirroring how they are applied.
fn exchange_differs(root: &Map<String, Value>, key: &str, update: &ExchangeUpdate) -> bool {
    let expected = update.value.normalized();
    let exchanges = match root.get("exchanges").and_then(|section| section.get("exchange")) {
        Some(Value::Array(items)) => items.iter().collect::<Vec<_>>(),
        Some(single @ Value::Object(_)) => vec![single],
        _ => return false,
    };
    exchanges
        .into_iter()
        .filter_map(Value::as_object)
        .any(|exchange| exchange_text(exchange.get(key)) != expected)
}
