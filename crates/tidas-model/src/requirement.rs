//! Declarative requirements applied to process datasets.
//!
//! A [`RequirementBundle`] is built once per run from the requirement YAML and
//! is read-only afterwards. It carries three kinds of requirements:
//!
//! - **global updates**: fields written into every dataset
//! - **process updates**: fields and exchange updates selected by process name
//! - **bindings**: template copies selected by dataset identifier

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RequirementError, Result};

/// Single language/text fragment of a multilingual value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageValue {
    pub language: String,
    pub text: String,
}

impl LanguageValue {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

/// Value carried by a [`FieldRequirement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequirementValue {
    /// Single text value (UUIDs, enumeration labels, booleans).
    Text(String),
    /// Ordered per-language values.
    Multilang(Vec<LanguageValue>),
}

/// A field update keyed by its domain label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRequirement {
    pub label: String,
    pub value: RequirementValue,
}

impl FieldRequirement {
    pub fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: RequirementValue::Text(value.into()),
        }
    }

    pub fn multilang(label: impl Into<String>, values: Vec<LanguageValue>) -> Self {
        Self {
            label: label.into(),
            value: RequirementValue::Multilang(values),
        }
    }

    pub fn is_multilang(&self) -> bool {
        matches!(self.value, RequirementValue::Multilang(_))
    }

    /// Returns the single text value.
    ///
    /// # Errors
    ///
    /// Fails when the requirement carries per-language values instead.
    pub fn text_value(&self) -> Result<&str> {
        match &self.value {
            RequirementValue::Text(text) => Ok(text),
            RequirementValue::Multilang(_) => Err(RequirementError::ExpectedText {
                label: self.label.clone(),
            }),
        }
    }

    /// Returns the per-language values.
    ///
    /// # Errors
    ///
    /// Fails when the requirement carries a single text value instead.
    pub fn language_values(&self) -> Result<&[LanguageValue]> {
        match &self.value {
            RequirementValue::Multilang(values) => Ok(values),
            RequirementValue::Text(_) => Err(RequirementError::ExpectedMultilang {
                label: self.label.clone(),
            }),
        }
    }
}

/// Selector deciding which exchanges an [`ExchangeUpdate`] targets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExchangeMatch {
    /// Every exchange of the dataset.
    #[default]
    All,
    /// A rule accepted by the loader but not implemented yet.
    Unimplemented(String),
}

impl ExchangeMatch {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Unimplemented(trimmed.to_string())
        }
    }
}

impl fmt::Display for ExchangeMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Unimplemented(rule) => f.write_str(rule),
        }
    }
}

/// Value written into matched exchanges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExchangeValue {
    Text(String),
    PerLanguage(Vec<LanguageValue>),
}

impl ExchangeValue {
    /// Collapses the value into the single string stored on an exchange.
    ///
    /// Per-language values prefer `zh`, then `en`, then the first entry.
    pub fn normalized(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::PerLanguage(values) => ["zh", "en"]
                .iter()
                .find_map(|lang| {
                    values
                        .iter()
                        .find(|entry| entry.language == *lang && !entry.text.is_empty())
                })
                .or_else(|| values.first())
                .map(|entry| entry.text.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeUpdate {
    pub matcher: ExchangeMatch,
    pub label: String,
    pub value: ExchangeValue,
}

/// A named block of requirements applied to matching processes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequirement {
    /// `;`-joined name components, optionally containing `*` globs.
    pub process_name: String,
    pub fields: Vec<FieldRequirement>,
    pub exchange_updates: Vec<ExchangeUpdate>,
    /// Template this requirement was copied from, when bound by identifier.
    pub template_name: Option<String>,
}

impl ProcessRequirement {
    pub fn new(process_name: impl Into<String>) -> Self {
        Self {
            process_name: process_name.into(),
            fields: Vec::new(),
            exchange_updates: Vec::new(),
            template_name: None,
        }
    }

    pub fn has_updates(&self) -> bool {
        !self.fields.is_empty() || !self.exchange_updates.is_empty()
    }
}

/// Complete set of requirements for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementBundle {
    pub global_updates: Vec<FieldRequirement>,
    pub process_updates: Vec<ProcessRequirement>,
    /// Dataset identifier → materialised template copy.
    pub uuid_bindings: BTreeMap<String, ProcessRequirement>,
}

impl RequirementBundle {
    /// Requirement bound to a dataset identifier, if any.
    pub fn binding_for(&self, dataset_id: &str) -> Option<&ProcessRequirement> {
        self.uuid_bindings.get(dataset_id.trim())
    }

    /// Trimmed process names in declaration order.
    pub fn process_names(&self) -> Vec<String> {
        self.process_updates
            .iter()
            .map(|requirement| requirement.process_name.trim().to_string())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.global_updates.is_empty()
            && self.process_updates.is_empty()
            && self.uuid_bindings.is_empty()
    }
}
