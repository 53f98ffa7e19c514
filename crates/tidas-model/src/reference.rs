//! Metadata for ILCD global references.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::{LANG_KEY, TEXT_KEY};
use crate::requirement::LanguageValue;

/// Version stamped on references whose target metadata is unknown.
pub const PLACEHOLDER_VERSION: &str = "00.00.000";

/// Base URI of published datasets.
pub const DATASET_URI_BASE: &str = "https://tiangong.earth/datasets/";

/// Canonical dataset URI for a reference id.
pub fn dataset_uri(ref_id: &str) -> String {
    format!("{DATASET_URI_BASE}{ref_id}")
}

/// Descriptive metadata of a reference target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceMetadata {
    pub ref_type: String,
    pub ref_id: String,
    pub version: String,
    pub uri: String,
    pub descriptions: Vec<LanguageValue>,
}

impl ReferenceMetadata {
    /// Builds the `{@type, @refObjectId, @version, @uri, common:shortDescription}` object.
    ///
    /// Empty descriptions are dropped, untagged ones default to `en`. A single
    /// description is written as an object, several as a list.
    pub fn to_global_reference(&self) -> Value {
        let mut descriptions: Vec<Value> = self
            .descriptions
            .iter()
            .filter(|entry| !entry.text.is_empty())
            .map(|entry| {
                let language = if entry.language.is_empty() {
                    "en"
                } else {
                    entry.language.as_str()
                };
                let mut node = Map::new();
                node.insert(LANG_KEY.to_string(), Value::from(language));
                node.insert(TEXT_KEY.to_string(), Value::from(entry.text.as_str()));
                Value::Object(node)
            })
            .collect();

        let version = if self.version.trim().is_empty() {
            PLACEHOLDER_VERSION
        } else {
            self.version.as_str()
        };
        let mut reference = Map::new();
        reference.insert("@type".to_string(), Value::from(self.ref_type.as_str()));
        reference.insert("@refObjectId".to_string(), Value::from(self.ref_id.as_str()));
        reference.insert("@version".to_string(), Value::from(version));
        reference.insert("@uri".to_string(), Value::from(self.uri.as_str()));
        match descriptions.len() {
            0 => {}
            1 => {
                reference.insert("common:shortDescription".to_string(), descriptions.remove(0));
            }
            _ => {
                reference.insert(
                    "common:shortDescription".to_string(),
                    Value::Array(descriptions),
                );
            }
        }
        Value::Object(reference)
    }
}
