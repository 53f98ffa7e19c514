//! Writes requirements into a dataset and normalises the result.

use chrono::Utc;
use serde_json::{Map, Value};
use tidas_model::document::{assign_path, ensure_object};
use tidas_model::{
    ExchangeMatch, ExchangeUpdate, FieldRequirement, RequirementAnalysis, RequirementBundle, Result,
};
use tidas_standards::{TranslationLookup, exchange_field_key, lookup};
use tracing::debug;

use crate::analyzer::RequirementAnalyzer;
use crate::audit::{AuditSink, note};
use crate::convert::ValueConverter;
use crate::matcher::select_process;
use crate::normalize::{ComplianceDefaults, exchange_list, normalize_dataset};
use crate::resolver::ReferenceResolver;

/// Timestamp format written to `common:timeStamp`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Applies a [`RequirementBundle`] to process datasets.
///
/// The updater holds no per-dataset state; one instance serves a whole run.
#[derive(Clone)]
pub struct DatasetUpdater<'a> {
    converter: ValueConverter<'a>,
    analyzer: RequirementAnalyzer<'a>,
    compliance: ComplianceDefaults,
    timestamp: Option<String>,
}

impl<'a> DatasetUpdater<'a> {
    pub fn new(translations: &'a TranslationLookup) -> Self {
        Self {
            converter: ValueConverter::new(translations),
            analyzer: RequirementAnalyzer::new(translations),
            compliance: ComplianceDefaults::default(),
            timestamp: None,
        }
    }

    /// Resolves reference metadata through `resolver` instead of placeholders.
    #[must_use]
    pub fn with_resolver(mut self, resolver: &'a dyn ReferenceResolver) -> Self {
        self.converter = self.converter.with_resolver(resolver);
        self
    }

    #[must_use]
    pub fn with_compliance(mut self, compliance: ComplianceDefaults) -> Self {
        self.compliance = compliance;
        self
    }

    /// Fixes the entry timestamp instead of using the current UTC time.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Gap report for `document`; never modifies it.
    pub fn analyse(&self, document: &Value, bundle: &RequirementBundle) -> Result<RequirementAnalysis> {
        self.analyzer.analyse(document, bundle)
    }

    /// Applies global, process and exchange requirements, then normalises.
    ///
    /// Every assumption made along the way is recorded in `sink`.
    ///
    /// # Errors
    ///
    /// Requirement values that cannot be converted abort the update; the
    /// dataset should be skipped.
    pub fn apply(
        &self,
        document: Value,
        bundle: &RequirementBundle,
        sink: &mut dyn AuditSink,
    ) -> Result<Value> {
        let mut document = match document {
            Value::Object(map) => map,
            _ => {
                note(
                    sink,
                    "Input document is not a JSON object; started from an empty document.".to_string(),
                );
                Map::new()
            }
        };

        let root = resolve_root_mut(&mut document, sink);
        self.apply_fields(root, &bundle.global_updates, sink)?;

        if let Some(selected) = select_process(root, bundle) {
            debug!(
                process = %selected.requirement.process_name,
                index = ?selected.index,
                binding = ?selected.binding,
                "process requirement selected"
            );
            self.apply_fields(root, &selected.requirement.fields, sink)?;
            apply_exchange_updates(root, &selected.requirement.exchange_updates, sink);
        }

        let timestamp = self
            .timestamp
            .clone()
            .unwrap_or_else(|| Utc::now().format(TIMESTAMP_FORMAT).to_string());
        normalize_dataset(root, &self.compliance, &timestamp, sink);
        Ok(Value::Object(document))
    }

    fn apply_fields(
        &self,
        root: &mut Map<String, Value>,
        requirements: &[FieldRequirement],
        sink: &mut dyn AuditSink,
    ) -> Result<()> {
        for requirement in requirements {
            let Some(mapping) = lookup(&requirement.label) else {
                note(
                    sink,
                    format!(
                        "Skipped requirement '{}': no mapping available.",
                        requirement.label
                    ),
                );
                continue;
            };
            let value = self.converter.convert(mapping, requirement, sink)?;
            let previous = assign_path(root, mapping.schema_path, value.clone());
            if let Some(previous) = previous
                && !previous.is_null()
                && previous != value
            {
                debug!(label = %requirement.label, %previous, "existing value replaced");
                note(
                    sink,
                    format!(
                        "Field '{}' replaced existing value during update; original preserved in log.",
                        requirement.label
                    ),
                );
            }
        }
        Ok(())
    }
}

/// Process dataset root to update, created when the document has none.
fn resolve_root_mut<'d>(
    document: &'d mut Map<String, Value>,
    sink: &mut dyn AuditSink,
) -> &'d mut Map<String, Value> {
    let has_root = matches!(document.get("processDataSet"), Some(Value::Object(_)));
    if !has_root && document.contains_key("processInformation") {
        return document;
    }
    if !has_root {
        note(
            sink,
            "Input document missing 'processDataSet'; created an empty placeholder.".to_string(),
        );
    }
    ensure_object(document, "processDataSet")
}

fn apply_exchange_updates(
    root: &mut Map<String, Value>,
    updates: &[ExchangeUpdate],
    sink: &mut dyn AuditSink,
) {
    if updates.is_empty() {
        return;
    }
    let present = root
        .get("exchanges")
        .and_then(|section| section.get("exchange"))
        .is_some();
    if !present {
        note(
            sink,
            "Process dataset missing 'exchanges' section; skipping exchange updates.".to_string(),
        );
        return;
    }
    let Some(exchanges) = exchange_list(root) else {
        note(
            sink,
            "Process dataset 'exchange' field is not a list; skipping exchange updates.".to_string(),
        );
        return;
    };

    for update in updates {
        let Some(key) = exchange_field_key(&update.label) else {
            note(
                sink,
                format!("Exchange update label '{}' is not supported; skipped.", update.label),
            );
            continue;
        };
        if let ExchangeMatch::Unimplemented(rule) = &update.matcher {
            note(
                sink,
                format!("Exchange match rule '{rule}' is not implemented; defaulting to all exchanges."),
            );
        }
        let value = update.value.normalized();
        for exchange in exchanges.iter_mut().filter_map(Value::as_object_mut) {
            exchange.insert(key.to_string(), Value::from(value.as_str()));
        }
    }
}
