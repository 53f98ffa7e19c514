//! Requirement specification loader.
//!
//! Requirement files are YAML documents with four optional top-level keys:
//!
//! ```yaml
//! global_updates:
//!   - ui_label: "管理信息——数据集委托方"
//!     value: "f4b4c314-8c4c-4c83-968f-5b3c7724f6a8"
//! process_updates:
//!   - process_name: "风力发电机组制造; *; 生产组合"
//!     fields: [{ ui_label: "...", value: { zh: "...", en: "..." } }]
//!     exchange_updates: [{ match: all, ui_label: "数据推导类型/状态", value: "Measured" }]
//! templates:
//!   process_1_updates: { fields: [...], exchange_updates: [...] }
//! process_bindings:
//!   "<dataset uuid>": process_1_updates
//! ```
//!
//! A mapping `value` is a multilingual value keyed by language; any other scalar
//! is kept as text.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use tidas_model::{
    ExchangeMatch, ExchangeUpdate, ExchangeValue, FieldRequirement, LanguageValue,
    ProcessRequirement, RequirementBundle,
};
use tracing::{debug, info};

use crate::error::{Result, StandardsError};

// =============================================================================
// Public loading functions
// =============================================================================

/// Loads a requirement bundle from a `.yaml`/`.yml` file.
///
/// # Errors
///
/// Fails on a missing file, a non-YAML extension, unreadable content or any
/// invalid entry. Bindings to unknown templates are rejected here rather than
/// when datasets are processed.
pub fn load_requirements(path: &Path) -> Result<RequirementBundle> {
    if !path.exists() {
        return Err(StandardsError::FileNotFound {
            kind: "requirement",
            path: path.to_path_buf(),
        });
    }
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if !is_yaml {
        return Err(StandardsError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }
    let source = fs::read_to_string(path).map_err(|source| StandardsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bundle = parse_requirements(&source)?;
    info!(
        path = %path.display(),
        global = bundle.global_updates.len(),
        processes = bundle.process_updates.len(),
        bindings = bundle.uuid_bindings.len(),
        "loaded requirements"
    );
    Ok(bundle)
}

/// Parses a requirement bundle from YAML text.
pub fn parse_requirements(source: &str) -> Result<RequirementBundle> {
    let document: Value =
        serde_yaml::from_str(source).map_err(|source| StandardsError::Yaml { source })?;
    let root = match document {
        Value::Null => return Ok(RequirementBundle::default()),
        Value::Mapping(root) => root,
        _ => {
            return Err(StandardsError::invalid(
                "requirement file must deserialize to a mapping",
            ));
        }
    };

    let global_updates = parse_fields(root.get("global_updates"), "global_updates")?;
    let process_updates = sequence(root.get("process_updates"), "process_updates")?
        .iter()
        .map(parse_process_update)
        .collect::<Result<Vec<_>>>()?;
    let templates = parse_templates(root.get("templates"))?;
    let uuid_bindings = resolve_bindings(root.get("process_bindings"), &templates)?;

    Ok(RequirementBundle {
        global_updates,
        process_updates,
        uuid_bindings,
    })
}

// =============================================================================
// Entry parsing
// =============================================================================

fn sequence<'a>(value: Option<&'a Value>, context: &str) -> Result<&'a [Value]> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Sequence(items)) => Ok(items),
        Some(_) => Err(StandardsError::invalid(format!(
            "'{context}' must be a list"
        ))),
    }
}

fn mapping<'a>(value: &'a Value, context: &str) -> Result<&'a Mapping> {
    value
        .as_mapping()
        .ok_or_else(|| StandardsError::invalid(format!("each {context} must be a mapping")))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn label_of(entry: &Mapping) -> Result<String> {
    entry
        .get("ui_label")
        .and_then(scalar_text)
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .ok_or_else(|| StandardsError::invalid("field update requires a string 'ui_label'"))
}

/// Non-null `(language, text)` pairs of a mapping value, in file order.
fn language_pairs(values: &Mapping, label: &str) -> Result<Vec<LanguageValue>> {
    values
        .iter()
        .filter(|(_, text)| !text.is_null())
        .map(|(language, text)| match (scalar_text(language), scalar_text(text)) {
            (Some(language), Some(text)) => Ok(LanguageValue::new(language, text)),
            _ => Err(StandardsError::invalid(format!(
                "field '{label}' has a non-text language entry"
            ))),
        })
        .collect()
}

fn parse_fields(value: Option<&Value>, context: &str) -> Result<Vec<FieldRequirement>> {
    sequence(value, context)?
        .iter()
        .map(|entry| parse_field(mapping(entry, "field update")?))
        .collect()
}

fn parse_field(entry: &Mapping) -> Result<FieldRequirement> {
    let label = label_of(entry)?;
    match entry.get("value") {
        None | Some(Value::Null) => Err(StandardsError::invalid(format!(
            "field '{label}' is missing a 'value'"
        ))),
        Some(Value::Mapping(values)) => {
            let values = language_pairs(values, &label)?;
            if values.is_empty() {
                return Err(StandardsError::invalid(format!(
                    "field '{label}' requires at least one language entry"
                )));
            }
            Ok(FieldRequirement::multilang(label, values))
        }
        Some(other) => match scalar_text(other) {
            Some(text) => Ok(FieldRequirement::text(label, text)),
            None => Err(StandardsError::invalid(format!(
                "field '{label}' value must be a string or mapping of languages"
            ))),
        },
    }
}

fn parse_exchange_update(entry: &Value) -> Result<ExchangeUpdate> {
    let entry = mapping(entry, "exchange update")?;
    let matcher = entry
        .get("match")
        .and_then(scalar_text)
        .map_or(ExchangeMatch::All, |rule| ExchangeMatch::parse(&rule));
    let label = label_of(entry)?;
    let value = match entry.get("value") {
        None | Some(Value::Null) => None,
        Some(Value::Mapping(values)) => Some(ExchangeValue::PerLanguage(language_pairs(
            values, &label,
        )?)),
        Some(other) => scalar_text(other).map(ExchangeValue::Text),
    }
    .ok_or_else(|| {
        StandardsError::invalid(format!("exchange update '{label}' requires a 'value'"))
    })?;
    Ok(ExchangeUpdate {
        matcher,
        label,
        value,
    })
}

/// Parses a process block; `default_name` is used when `process_name` is absent.
fn parse_process_block(entry: &Mapping, default_name: Option<&str>) -> Result<ProcessRequirement> {
    let process_name = entry
        .get("process_name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .or(default_name)
        .ok_or_else(|| StandardsError::invalid("process update is missing a valid 'process_name'"))?;

    let mut requirement = ProcessRequirement::new(process_name);
    requirement.fields = parse_fields(entry.get("fields"), "fields")?;
    requirement.exchange_updates = sequence(entry.get("exchange_updates"), "exchange_updates")?
        .iter()
        .map(parse_exchange_update)
        .collect::<Result<Vec<_>>>()?;
    Ok(requirement)
}

fn parse_process_update(entry: &Value) -> Result<ProcessRequirement> {
    parse_process_block(mapping(entry, "process update")?, None)
}

// =============================================================================
// Templates and bindings
// =============================================================================

fn parse_templates(value: Option<&Value>) -> Result<BTreeMap<String, ProcessRequirement>> {
    let templates = match value {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Mapping(templates)) => templates,
        Some(_) => return Err(StandardsError::invalid("'templates' must be a mapping")),
    };
    templates
        .iter()
        .map(|(name, body)| {
            let name = scalar_text(name)
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .ok_or_else(|| StandardsError::invalid("template names must be strings"))?;
            let requirement = parse_process_block(mapping(body, "template")?, Some(&name))?;
            Ok((name, requirement))
        })
        .collect()
}

fn resolve_bindings(
    value: Option<&Value>,
    templates: &BTreeMap<String, ProcessRequirement>,
) -> Result<BTreeMap<String, ProcessRequirement>> {
    let bindings = match value {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Mapping(bindings)) => bindings,
        Some(_) => return Err(StandardsError::invalid("'process_bindings' must be a mapping")),
    };

    let mut resolved = BTreeMap::new();
    for (dataset_id, template) in bindings {
        let (Some(dataset_id), Some(template)) = (scalar_text(dataset_id), scalar_text(template))
        else {
            return Err(StandardsError::invalid(
                "process bindings must map dataset ids to template names",
            ));
        };
        let dataset_id = dataset_id.trim().to_string();
        let template = template.trim().to_string();
        let Some(body) = templates.get(&template) else {
            return Err(StandardsError::UnresolvedBinding {
                dataset_id,
                template,
            });
        };
        let mut requirement = body.clone();
        requirement.template_name = Some(template);
        debug!(dataset_id = %dataset_id, template = ?requirement.template_name, "bound template");
        resolved.insert(dataset_id, requirement);
    }
    Ok(resolved)
}
