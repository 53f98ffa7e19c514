//! Lookup from displayed enumeration text to its locale key.
//!
//! The editor ships its labels as a TypeScript locale module:
//!
//! ```text
//! export default {
//!   'pages.process.view.administrativeInformation.licenseType.freeOfChargeForAllUsersAndUses': '所有用户和用途均免费',
//! };
//! ```
//!
//! Enumeration requirements are written with the displayed text; the key's last
//! segment carries the canonical enumeration value.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{Result, StandardsError};

static ENTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'(?P<key>[^']+?)'\s*:\s*'(?P<value>[^']*?)'")
        .expect("Invalid translation entry regex")
});

/// Value → key table, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationLookup {
    value_to_key: HashMap<String, String>,
}

impl TranslationLookup {
    /// Builds a lookup from `(key, value)` pairs; the first key seen for a value wins.
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut value_to_key = HashMap::new();
        for (key, value) in entries {
            let key: String = key.into();
            let value: String = value.into();
            value_to_key
                .entry(value.trim().to_string())
                .or_insert_with(|| key.trim().to_string());
        }
        Self { value_to_key }
    }

    /// Parses the `'key': 'value'` pairs of a locale module.
    ///
    /// # Errors
    ///
    /// Returns [`StandardsError::EmptyTranslations`] when no pair is found.
    pub fn parse(source: &str, source_name: &str) -> Result<Self> {
        let lookup = Self::from_entries(ENTRY_PATTERN.captures_iter(source).map(|captures| {
            (
                captures["key"].to_string(),
                captures["value"].to_string(),
            )
        }));
        if lookup.is_empty() {
            return Err(StandardsError::EmptyTranslations {
                source_name: source_name.to_string(),
            });
        }
        debug!(source = source_name, entries = lookup.len(), "parsed translation table");
        Ok(lookup)
    }

    /// Reads and parses a locale module from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StandardsError::FileNotFound {
                kind: "translation",
                path: path.to_path_buf(),
            });
        }
        let source = fs::read_to_string(path).map_err(|source| StandardsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source, &path.display().to_string())
    }

    pub fn key_for_value(&self, value: &str) -> Option<&str> {
        self.value_to_key.get(value.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.value_to_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value_to_key.is_empty()
    }
}
