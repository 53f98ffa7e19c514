//! Shape of the static label → document target table.

use std::fmt;

/// How a requirement value is converted before it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueRule {
    /// `{@xml:lang, #text}` object or list of objects.
    Multilang,
    /// ILCD global reference, resolved through the reference resolver.
    Reference {
        /// Declared `@type` of the target dataset.
        reference_type: Option<&'static str>,
    },
    /// Enumeration label resolved through the translation lookup.
    Enum,
    /// `"true"` / `"false"` string.
    Bool,
}

impl ValueRule {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Multilang => "multilang",
            Self::Reference { .. } => "reference",
            Self::Enum => "enum",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for ValueRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static mapping between a requirement label and its dataset target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// Lookup key (label without its `category——` prefix).
    pub key: &'static str,
    /// Full label as shown to operators.
    pub label: &'static str,
    /// Keys from the process dataset root to the target field.
    pub schema_path: &'static [&'static str],
    pub rule: ValueRule,
    /// Translation key prefix of the field in the editor UI.
    pub ui_key: &'static str,
}

impl FieldMapping {
    /// Final dotted segment of the UI key (`referenceToCommissioner`).
    pub fn ui_key_suffix(&self) -> &'static str {
        self.ui_key.rsplit('.').next().unwrap_or(self.ui_key)
    }

    pub fn reference_type(&self) -> Option<&'static str> {
        match self.rule {
            ValueRule::Reference { reference_type } => reference_type,
            _ => None,
        }
    }
}
