//! Mandatory normalisation applied after requirements are written.
//!
//! Runs on every updated dataset regardless of which requirements applied:
//!
//! - **time**: numeric `common:referenceYear` strings become integers
//! - **administrative**: entry timestamp, stale empty references and empty
//!   intended applications
//! - **modelling**: review and compliance structures required for publishing
//! - **exchanges**: direction casing, amount strings, empty data source
//!   references and allocation fractions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tidas_model::document::{
    ensure_object, is_empty_multilang, is_empty_reference, multilang_entry, non_empty_str,
};

use crate::audit::{AuditSink, note};

const NOT_REVIEWED: &str = "Not reviewed";
const DOCUMENTATION: &str = "Documentation";

// =============================================================================
// Compliance defaults
// =============================================================================

/// Compliance-system reference and ratings inserted where a declaration is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceDefaults {
    pub system_id: String,
    pub system_version: String,
    pub system_description: String,
    pub approval_of_overall_compliance: String,
    pub nomenclature_compliance: String,
    pub methodological_compliance: String,
    pub review_compliance: String,
    pub documentation_compliance: String,
    pub quality_compliance: String,
}

/// Named compliance presets selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompliancePreset {
    /// Environmental Footprint 3.1 with approval and nomenclature fully compliant.
    #[default]
    Ef31,
    /// Every rating "Not defined".
    NotDefined,
}

impl CompliancePreset {
    pub fn defaults(self) -> ComplianceDefaults {
        match self {
            Self::Ef31 => ComplianceDefaults::ef31(),
            Self::NotDefined => ComplianceDefaults::not_defined(),
        }
    }
}

impl ComplianceDefaults {
    pub fn ef31() -> Self {
        Self {
            system_id: "c84c4185-d1b0-44fc-823e-d2ec630c7906".to_string(),
            system_version: "01.00.000".to_string(),
            system_description: "Environmental Footprint (EF) 3.1".to_string(),
            approval_of_overall_compliance: "Fully compliant".to_string(),
            nomenclature_compliance: "Fully compliant".to_string(),
            methodological_compliance: "Not defined".to_string(),
            review_compliance: "Not defined".to_string(),
            documentation_compliance: "Not defined".to_string(),
            quality_compliance: "Not defined".to_string(),
        }
    }

    pub fn not_defined() -> Self {
        Self {
            approval_of_overall_compliance: "Not defined".to_string(),
            nomenclature_compliance: "Not defined".to_string(),
            ..Self::ef31()
        }
    }

    pub fn reference(&self) -> Value {
        json!({
            "@type": "Compliance system",
            "@refObjectId": self.system_id,
            "@version": self.system_version,
            "@uri": tidas_model::dataset_uri(&self.system_id),
            "common:shortDescription": multilang_entry("en", &self.system_description),
        })
    }

    fn ratings(&self) -> [(&'static str, &str); 6] {
        [
            (
                "common:approvalOfOverallCompliance",
                self.approval_of_overall_compliance.as_str(),
            ),
            (
                "common:nomenclatureCompliance",
                self.nomenclature_compliance.as_str(),
            ),
            (
                "common:methodologicalCompliance",
                self.methodological_compliance.as_str(),
            ),
            ("common:reviewCompliance", self.review_compliance.as_str()),
            (
                "common:documentationCompliance",
                self.documentation_compliance.as_str(),
            ),
            ("common:qualityCompliance", self.quality_compliance.as_str()),
        ]
    }

    fn declaration(&self) -> Value {
        let mut declaration = Map::new();
        declaration.insert(
            "common:referenceToComplianceSystem".to_string(),
            self.reference(),
        );
        for (key, rating) in self.ratings() {
            declaration.insert(key.to_string(), Value::from(rating));
        }
        Value::Object(declaration)
    }
}

impl Default for ComplianceDefaults {
    fn default() -> Self {
        Self::ef31()
    }
}

// =============================================================================
// Entry point
// =============================================================================

/// Normalises a process dataset root in place.
pub fn normalize_dataset(
    root: &mut Map<String, Value>,
    compliance: &ComplianceDefaults,
    timestamp: &str,
    sink: &mut dyn AuditSink,
) {
    normalize_time(root);
    normalize_administrative(root, timestamp);
    normalize_modelling(root, compliance, sink);
    normalize_exchanges(root, sink);
}

fn object_mut<'a>(map: &'a mut Map<String, Value>, key: &str) -> Option<&'a mut Map<String, Value>> {
    map.get_mut(key).and_then(Value::as_object_mut)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Number(_) => true,
    }
}

fn normalize_time(root: &mut Map<String, Value>) {
    let Some(time) = object_mut(root, "processInformation").and_then(|info| object_mut(info, "time"))
    else {
        return;
    };
    let year = time
        .get("common:referenceYear")
        .and_then(Value::as_str)
        .filter(|year| !year.is_empty() && year.bytes().all(|byte| byte.is_ascii_digit()))
        .and_then(|year| year.parse::<u64>().ok());
    if let Some(year) = year {
        time.insert("common:referenceYear".to_string(), Value::from(year));
    }
}

fn normalize_administrative(root: &mut Map<String, Value>, timestamp: &str) {
    let Some(admin) = object_mut(root, "administrativeInformation") else {
        return;
    };
    if let Some(entry) = object_mut(admin, "dataEntryBy") {
        entry.insert("common:timeStamp".to_string(), Value::from(timestamp));
        for stale in [
            "common:referenceToConvertedOriginalDataSetFrom",
            "common:referenceToDataSetUseApproval",
        ] {
            if entry.get(stale).is_none_or(is_empty_reference) {
                entry.shift_remove(stale);
            }
        }
    }
    if let Some(goal) = object_mut(admin, "common:commissionerAndGoal")
        && goal
            .get("common:intendedApplications")
            .is_none_or(is_empty_multilang)
    {
        goal.shift_remove("common:intendedApplications");
    }
}

// =============================================================================
// Modelling and validation
// =============================================================================

fn normalize_modelling(
    root: &mut Map<String, Value>,
    compliance: &ComplianceDefaults,
    sink: &mut dyn AuditSink,
) {
    let modelling = ensure_object(root, "modellingAndValidation");

    if !modelling.get("validation").is_some_and(Value::is_object) {
        note(sink, "Validation block missing; inserted placeholder structure.".to_string());
    }
    ensure_validation(ensure_object(modelling, "validation"), sink);

    if !modelling
        .get("complianceDeclarations")
        .is_some_and(Value::is_object)
    {
        note(
            sink,
            "Compliance declarations missing; inserted placeholder structure.".to_string(),
        );
    }
    ensure_compliance(ensure_object(modelling, "complianceDeclarations"), compliance, sink);

    if let Some(sources) = object_mut(modelling, "dataSourcesTreatmentAndRepresentativeness")
        && sources
            .get("referenceToDataSource")
            .is_none_or(is_empty_reference)
    {
        sources.shift_remove("referenceToDataSource");
    }
}

fn ensure_validation(validation: &mut Map<String, Value>, sink: &mut dyn AuditSink) {
    match validation.get_mut("review") {
        Some(Value::Object(review)) => ensure_review(review, sink),
        Some(Value::Array(reviews)) if reviews.iter().any(Value::is_object) => {
            for review in reviews.iter_mut().filter_map(Value::as_object_mut) {
                ensure_review(review, sink);
            }
        }
        _ => {
            note(sink, "Validation review missing; inserted placeholder entry.".to_string());
            let mut review = Map::new();
            ensure_review(&mut review, sink);
            validation.insert("review".to_string(), Value::Object(review));
        }
    }
}

fn ensure_review(review: &mut Map<String, Value>, sink: &mut dyn AuditSink) {
    let review_type = non_empty_str(review.get("@type"))
        .unwrap_or(NOT_REVIEWED)
        .to_string();
    review.insert("@type".to_string(), Value::from(review_type.as_str()));
    // Unreviewed datasets get no fabricated reviewer metadata.
    if review_type == NOT_REVIEWED {
        return;
    }

    let scope_value = review
        .get("common:scope")
        .filter(|scope| is_truthy(scope))
        .or_else(|| review.get("scope"));
    let scope = scope_value.and_then(normalize_scope).unwrap_or_else(|| {
        note(sink, "Validation review scope missing; inserted default scope.".to_string());
        scope_entry(DOCUMENTATION, DOCUMENTATION)
    });
    review.shift_remove("scope");
    review.insert("common:scope".to_string(), scope);

    if review
        .get("common:reviewDetails")
        .is_none_or(is_empty_multilang)
    {
        review.insert(
            "common:reviewDetails".to_string(),
            multilang_entry("en", "Review summary pending confirmation."),
        );
        note(sink, "Review details missing; inserted placeholder text.".to_string());
    }

    if review
        .get("common:referenceToNameOfReviewerAndInstitution")
        .is_none_or(is_empty_reference)
    {
        review.insert(
            "common:referenceToNameOfReviewerAndInstitution".to_string(),
            placeholder_reference(
                "Contact data set",
                "00000000-0000-0000-0000-000000000002",
                "https://placeholder.example/reviewer",
                "Review contact pending confirmation.",
            ),
        );
        note(
            sink,
            "Review contact reference missing; inserted placeholder reference.".to_string(),
        );
    }

    if review
        .get("common:referenceToCompleteReviewReport")
        .is_none_or(is_empty_reference)
    {
        review.insert(
            "common:referenceToCompleteReviewReport".to_string(),
            placeholder_reference(
                "Source data set",
                "00000000-0000-0000-0000-000000000003",
                "https://placeholder.example/review-report",
                "Review report reference pending confirmation.",
            ),
        );
        note(
            sink,
            "Review report reference missing; inserted placeholder reference.".to_string(),
        );
    }
}

fn placeholder_reference(ref_type: &str, ref_id: &str, uri: &str, description: &str) -> Value {
    json!({
        "@type": ref_type,
        "@refObjectId": ref_id,
        "@version": "1.0",
        "@uri": uri,
        "common:shortDescription": multilang_entry("en", description),
    })
}

fn scope_entry(name: &str, method: &str) -> Value {
    json!({"@name": name, "common:method": {"@name": method}})
}

fn normalize_scope(scope: &Value) -> Option<Value> {
    match scope {
        Value::Array(entries) => {
            let entries: Vec<Value> = entries.iter().filter_map(normalize_scope_entry).collect();
            (!entries.is_empty()).then_some(Value::Array(entries))
        }
        other => normalize_scope_entry(other),
    }
}

fn normalize_scope_entry(entry: &Value) -> Option<Value> {
    let entry = entry.as_object()?;
    let name = non_empty_str(entry.get("@name")).unwrap_or(DOCUMENTATION);
    let method = entry
        .get("common:method")
        .filter(|method| is_truthy(method))
        .or_else(|| entry.get("method"))
        .and_then(|method| non_empty_str(method.get("@name")))
        .unwrap_or(DOCUMENTATION);
    Some(scope_entry(name, method))
}

fn ensure_compliance(
    section: &mut Map<String, Value>,
    defaults: &ComplianceDefaults,
    sink: &mut dyn AuditSink,
) {
    if let Some(Value::Array(entries)) = section.get("compliance") {
        let first = entries.first().cloned();
        match first {
            Some(first) => {
                section.insert("compliance".to_string(), first);
                note(
                    sink,
                    "Compliance declarations provided as list; kept the first entry for update."
                        .to_string(),
                );
            }
            None => {
                section.shift_remove("compliance");
            }
        }
    }

    let Some(Value::Object(declaration)) = section.get_mut("compliance") else {
        section.insert("compliance".to_string(), defaults.declaration());
        note(
            sink,
            "Compliance declaration missing; inserted default Environmental Footprint entry."
                .to_string(),
        );
        return;
    };

    if declaration
        .get("common:referenceToComplianceSystem")
        .is_none_or(is_empty_reference)
    {
        declaration.insert(
            "common:referenceToComplianceSystem".to_string(),
            defaults.reference(),
        );
        note(
            sink,
            "Compliance reference missing; inserted default EF 3.1 reference.".to_string(),
        );
    }
    for (key, rating) in defaults.ratings() {
        if non_empty_str(declaration.get(key)).is_none() {
            declaration.insert(key.to_string(), Value::from(rating));
        }
    }
}

// =============================================================================
// Exchanges
// =============================================================================

/// Wraps a single exchange object into a list; `None` when there is no list.
pub(crate) fn exchange_list(root: &mut Map<String, Value>) -> Option<&mut Vec<Value>> {
    let exchanges = object_mut(root, "exchanges")?;
    let slot = exchanges.get_mut("exchange")?;
    if slot.is_object() {
        let single = slot.take();
        *slot = Value::Array(vec![single]);
    }
    slot.as_array_mut()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

fn normalize_exchanges(root: &mut Map<String, Value>, sink: &mut dyn AuditSink) {
    let Some(exchanges) = exchange_list(root) else {
        return;
    };
    for exchange in exchanges.iter_mut().filter_map(Value::as_object_mut) {
        if let Some(Value::String(direction)) = exchange.get_mut("exchangeDirection") {
            *direction = capitalize(direction);
        }
        for key in ["meanAmount", "resultingAmount"] {
            let Some(amount) = exchange.get_mut(key) else {
                continue;
            };
            match amount {
                Value::String(text) => *text = text.trim().to_string(),
                Value::Number(number) => *amount = Value::from(number.to_string()),
                Value::Bool(flag) => *amount = Value::from(flag.to_string()),
                _ => {}
            }
        }
        let empty_sources = exchange
            .get("referencesToDataSource")
            .and_then(Value::as_object)
            .is_some_and(|refs| refs.get("referenceToDataSource").is_none_or(is_empty_reference));
        if empty_sources {
            exchange.shift_remove("referencesToDataSource");
        }
        normalize_allocations(exchange, sink);
    }
}

fn normalize_allocations(exchange: &mut Map<String, Value>, sink: &mut dyn AuditSink) {
    let exchange_id = match exchange.get("@dataSetInternalID") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => "unknown".to_string(),
    };
    let Some(allocations) = object_mut(exchange, "allocations") else {
        return;
    };
    let targets: Vec<&mut Map<String, Value>> = match allocations.get_mut("allocation") {
        Some(Value::Object(single)) => vec![single],
        Some(Value::Array(entries)) => entries.iter_mut().filter_map(Value::as_object_mut).collect(),
        _ => Vec::new(),
    };
    for allocation in targets {
        let raw = match allocation.get("@allocatedFraction") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            _ => continue,
        };
        match normalize_allocation_fraction(&raw) {
            None => {
                allocation.shift_remove("@allocatedFraction");
                note(
                    sink,
                    format!("Removed invalid allocation fraction '{raw}' (exchange {exchange_id})."),
                );
            }
            Some(fraction) => {
                let unchanged = allocation
                    .get("@allocatedFraction")
                    .and_then(Value::as_str)
                    .is_some_and(|current| current == fraction);
                if !unchanged {
                    note(
                        sink,
                        format!("Normalised fraction for exchange {exchange_id} to '{fraction}'."),
                    );
                    allocation.insert("@allocatedFraction".to_string(), Value::from(fraction));
                }
            }
        }
    }
}

// =============================================================================
// Allocation fractions
// =============================================================================

/// Canonical fraction string in `[0, 1)`, or `None` when the value is invalid.
///
/// Accepts decimals (`"0.450"` → `"0.45"`) and percentages (`"45%"` → `"0.45"`).
/// Plain decimals are handled exactly; other numeric spellings go through `f64`.
pub fn normalize_allocation_fraction(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let (number, shift) = match trimmed.strip_suffix('%') {
        Some(number) => (number.trim(), 2),
        None => (trimmed, 0),
    };
    if number.is_empty() {
        return None;
    }
    match exact_fraction(number, shift) {
        Some(result) => result,
        None => float_fraction(number, shift),
    }
}

/// `Some(result)` when `number` is a plain decimal, `None` to fall back to floats.
fn exact_fraction(number: &str, shift: usize) -> Option<Option<String>> {
    let (negative, unsigned) = match number.as_bytes().first()? {
        b'-' => (true, &number[1..]),
        b'+' => (false, &number[1..]),
        _ => (false, number),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let is_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !is_digits(integer) || !is_digits(fraction) {
        return None;
    }

    // Shift the decimal point left by `shift` places.
    let digits = format!("{}{integer}{fraction}", "0".repeat(shift));
    let point = integer.len();
    let (whole, decimals) = digits.split_at(point);
    let decimals = decimals.trim_end_matches('0');
    let is_zero = whole.bytes().all(|byte| byte == b'0') && decimals.is_empty();

    if is_zero {
        return Some(Some("0".to_string()));
    }
    if negative || !whole.bytes().all(|byte| byte == b'0') {
        return Some(None);
    }
    Some(Some(format!("0.{decimals}")))
}

fn float_fraction(number: &str, shift: usize) -> Option<String> {
    let value = number.parse::<f64>().ok().filter(|value| value.is_finite())?;
    let value = value / 10f64.powi(i32::try_from(shift).ok()?);
    if !(0.0..1.0).contains(&value) {
        return None;
    }
    if value == 0.0 {
        return Some("0".to_string());
    }
    Some(format!("{value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2026-01-02T03:04:05Z";

    fn normalized(mut document: Value) -> (Value, Vec<String>) {
        let mut notes = Vec::new();
        normalize_dataset(
            document.as_object_mut().unwrap(),
            &ComplianceDefaults::ef31(),
            NOW,
            &mut notes,
        );
        (document, notes)
    }

    #[test]
    fn allocation_fractions() {
        assert_eq!(normalize_allocation_fraction("45%").as_deref(), Some("0.45"));
        assert_eq!(normalize_allocation_fraction(" 12.5 % ").as_deref(), Some("0.125"));
        assert_eq!(normalize_allocation_fraction("0.4500").as_deref(), Some("0.45"));
        assert_eq!(normalize_allocation_fraction(".5").as_deref(), Some("0.5"));
        assert_eq!(normalize_allocation_fraction("0").as_deref(), Some("0"));
        assert_eq!(normalize_allocation_fraction("0%").as_deref(), Some("0"));
        assert_eq!(normalize_allocation_fraction("4.5e-1").as_deref(), Some("0.45"));
        assert_eq!(normalize_allocation_fraction("100%"), None);
        assert_eq!(normalize_allocation_fraction("1"), None);
        assert_eq!(normalize_allocation_fraction("-0.2"), None);
        assert_eq!(normalize_allocation_fraction("abc"), None);
        assert_eq!(normalize_allocation_fraction("%"), None);
        assert_eq!(normalize_allocation_fraction(""), None);
    }

    #[test]
    fn capitalizes_directions() {
        assert_eq!(capitalize("iNPUT"), "Input");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn time_and_administrative_blocks() {
        let (document, _) = normalized(json!({
            "processInformation": {"time": {"common:referenceYear": "2021"}},
            "administrativeInformation": {
                "dataEntryBy": {
                    "common:referenceToConvertedOriginalDataSetFrom": {"@type": "Source data set"},
                    "common:referenceToDataSetUseApproval": [{"@refObjectId": "x"}]
                },
                "common:commissionerAndGoal": {
                    "common:intendedApplications": [{"@xml:lang": "en", "#text": ""}]
                }
            }
        }));
        assert_eq!(
            document["processInformation"]["time"]["common:referenceYear"],
            json!(2021)
        );
        let entry = &document["administrativeInformation"]["dataEntryBy"];
        assert_eq!(entry["common:timeStamp"], NOW);
        assert!(entry.get("common:referenceToConvertedOriginalDataSetFrom").is_none());
        assert!(entry.get("common:referenceToDataSetUseApproval").is_some());
        assert_eq!(
            document["administrativeInformation"]["common:commissionerAndGoal"],
            json!({})
        );
    }

    #[test]
    fn missing_validation_gets_unreviewed_placeholder() {
        let (document, notes) = normalized(json!({}));
        let modelling = &document["modellingAndValidation"];
        assert_eq!(modelling["validation"], json!({"review": {"@type": "Not reviewed"}}));
        let compliance = &modelling["complianceDeclarations"]["compliance"];
        assert_eq!(compliance["common:approvalOfOverallCompliance"], "Fully compliant");
        assert_eq!(compliance["common:qualityCompliance"], "Not defined");
        assert_eq!(
            compliance["common:referenceToComplianceSystem"]["@uri"],
            "https://tiangong.earth/datasets/c84c4185-d1b0-44fc-823e-d2ec630c7906"
        );
        assert_eq!(
            notes,
            vec![
                "Validation block missing; inserted placeholder structure.",
                "Validation review missing; inserted placeholder entry.",
                "Compliance declarations missing; inserted placeholder structure.",
                "Compliance declaration missing; inserted default Environmental Footprint entry.",
            ]
        );
    }

    #[test]
    fn reviewed_dataset_gets_scope_and_placeholders() {
        let (document, notes) = normalized(json!({"modellingAndValidation": {
            "validation": {"review": {
                "@type": "Independent external review",
                "scope": {"@name": " Raw data ", "method": {"@name": ""}}
            }},
            "complianceDeclarations": {"compliance": {}}
        }}));
        let review = &document["modellingAndValidation"]["validation"]["review"];
        assert!(review.get("scope").is_none());
        assert_eq!(
            review["common:scope"],
            json!({"@name": "Raw data", "common:method": {"@name": "Documentation"}})
        );
        assert_eq!(
            review["common:reviewDetails"]["#text"],
            "Review summary pending confirmation."
        );
        assert_eq!(
            review["common:referenceToNameOfReviewerAndInstitution"]["@type"],
            "Contact data set"
        );
        assert_eq!(
            review["common:referenceToCompleteReviewReport"]["@type"],
            "Source data set"
        );
        assert!(notes.iter().any(|note| note.starts_with("Compliance reference missing")));
    }

    #[test]
    fn compliance_list_keeps_first_and_fills_gaps() {
        let (document, notes) = normalized(json!({"modellingAndValidation": {
            "validation": {"review": {"@type": "Not reviewed"}},
            "complianceDeclarations": {"compliance": [
                {"common:approvalOfOverallCompliance": "Not compliant"},
                {"common:approvalOfOverallCompliance": "Not defined"}
            ]}
        }}));
        let compliance = &document["modellingAndValidation"]["complianceDeclarations"]["compliance"];
        assert!(compliance.is_object());
        assert_eq!(compliance["common:approvalOfOverallCompliance"], "Not compliant");
        assert_eq!(compliance["common:nomenclatureCompliance"], "Fully compliant");
        assert!(notes.iter().any(|note| note.contains("provided as list")));
    }

    #[test]
    fn not_defined_preset_only_changes_ratings() {
        let preset = CompliancePreset::NotDefined.defaults();
        assert_eq!(preset.approval_of_overall_compliance, "Not defined");
        assert_eq!(preset.system_id, ComplianceDefaults::ef31().system_id);
        assert_eq!(CompliancePreset::default().defaults(), ComplianceDefaults::default());
    }

    #[test]
    fn exchanges_are_cleaned() {
        let (document, notes) = normalized(json!({"exchanges": {"exchange": {
            "@dataSetInternalID": "1",
            "exchangeDirection": "input",
            "meanAmount": 1,
            "resultingAmount": " 2.5 ",
            "referencesToDataSource": {"referenceToDataSource": {}},
            "allocations": {"allocation": [
                {"@allocatedFraction": "100%"},
                {"@allocatedFraction": "45%"}
            ]}
        }}}));
        let exchange = &document["exchanges"]["exchange"][0];
        assert_eq!(exchange["exchangeDirection"], "Input");
        assert_eq!(exchange["meanAmount"], "1");
        assert_eq!(exchange["resultingAmount"], "2.5");
        assert!(exchange.get("referencesToDataSource").is_none());
        assert_eq!(
            exchange["allocations"]["allocation"],
            json!([{}, {"@allocatedFraction": "0.45"}])
        );
        assert!(notes.contains(&"Removed invalid allocation fraction '100%' (exchange 1).".to_string()));
        assert!(notes.contains(&"Normalised fraction for exchange 1 to '0.45'.".to_string()));
    }
}
