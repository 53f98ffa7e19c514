//! Conversion of requirement values into typed document values.

use serde_json::Value;
use tidas_model::document::multilang_entry;
use tidas_model::{
    FieldMapping, FieldRequirement, PLACEHOLDER_VERSION, RequirementError, Result, ValueRule,
    dataset_uri,
};
use tidas_standards::TranslationLookup;
use uuid::Uuid;

use crate::audit::{AuditSink, note};
use crate::resolver::ReferenceResolver;

const DEFAULT_REFERENCE_TYPE: &str = "Contact data set";

const TRUE_WORDS: &[&str] = &["true", "yes", "y", "1", "是"];
const FALSE_WORDS: &[&str] = &["false", "no", "n", "0", "否"];

/// Splits a camelCase identifier into a sentence: `licenseFee` → `License fee`.
pub fn camel_to_sentence(value: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for (position, ch) in value.chars().enumerate() {
        if position > 0 && ch.is_uppercase() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(ch.to_lowercase());
    }
    words.push(current);
    let words: Vec<String> = words.into_iter().filter(|word| !word.is_empty()).collect();

    let mut sentence = words.join(" ");
    if let Some(first) = sentence.chars().next() {
        let upper: String = first.to_uppercase().collect();
        sentence.replace_range(..first.len_utf8(), &upper);
    }
    sentence
}

/// Canonical hyphenated form of a reference requirement's UUID.
pub fn reference_id(requirement: &FieldRequirement) -> Result<String> {
    let raw = requirement.text_value()?.trim();
    Uuid::parse_str(raw)
        .map(|id| id.hyphenated().to_string())
        .map_err(|_| RequirementError::InvalidUuid {
            label: requirement.label.clone(),
            value: raw.to_string(),
        })
}

/// `"true"`/`"false"` for a boolean requirement.
pub fn boolean(requirement: &FieldRequirement) -> Result<&'static str> {
    let raw = requirement.text_value()?.trim().to_lowercase();
    if TRUE_WORDS.contains(&raw.as_str()) {
        Ok("true")
    } else if FALSE_WORDS.contains(&raw.as_str()) {
        Ok("false")
    } else {
        Err(RequirementError::InvalidBool {
            label: requirement.label.clone(),
            value: raw,
        })
    }
}

/// Single `{@xml:lang, #text}` object, or a list for several languages.
pub fn multilang(requirement: &FieldRequirement) -> Result<Value> {
    let mut entries: Vec<Value> = requirement
        .language_values()?
        .iter()
        .filter(|entry| !entry.text.is_empty())
        .map(|entry| multilang_entry(&entry.language, &entry.text))
        .collect();
    match entries.len() {
        0 => Err(RequirementError::EmptyMultilang {
            label: requirement.label.clone(),
        }),
        1 => Ok(entries.remove(0)),
        _ => Ok(Value::Array(entries)),
    }
}

/// Converts requirements using the translation table and an optional resolver.
#[derive(Clone, Copy)]
pub struct ValueConverter<'a> {
    translations: &'a TranslationLookup,
    resolver: Option<&'a dyn ReferenceResolver>,
}

impl<'a> ValueConverter<'a> {
    pub fn new(translations: &'a TranslationLookup) -> Self {
        Self {
            translations,
            resolver: None,
        }
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: &'a dyn ReferenceResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Document value written for `requirement` at `mapping`'s path.
    ///
    /// # Errors
    ///
    /// Malformed UUIDs, unresolvable enumeration text, unconvertible booleans
    /// and empty multilingual values are configuration errors.
    pub fn convert(
        &self,
        mapping: &FieldMapping,
        requirement: &FieldRequirement,
        sink: &mut dyn AuditSink,
    ) -> Result<Value> {
        match mapping.rule {
            ValueRule::Multilang => multilang(requirement),
            ValueRule::Reference { reference_type } => {
                self.reference(mapping, reference_type, requirement, sink)
            }
            ValueRule::Enum => self.enumeration(mapping, requirement).map(Value::from),
            ValueRule::Bool => boolean(requirement).map(Value::from),
        }
    }

    /// Canonical enumeration label, e.g. `Free of charge for all users and uses`.
    pub fn enumeration(&self, mapping: &FieldMapping, requirement: &FieldRequirement) -> Result<String> {
        let raw = requirement.text_value()?.trim();
        let key = self
            .translations
            .key_for_value(raw)
            .filter(|key| key.starts_with(mapping.ui_key))
            .ok_or_else(|| RequirementError::UnresolvedEnum {
                label: requirement.label.clone(),
                value: raw.to_string(),
            })?;
        let suffix = key.rsplit('.').next().unwrap_or(key);
        let label = camel_to_sentence(suffix);
        if label.is_empty() {
            return Err(RequirementError::EmptyEnumLabel {
                key: key.to_string(),
            });
        }
        Ok(label)
    }

    fn reference(
        &self,
        mapping: &FieldMapping,
        reference_type: Option<&str>,
        requirement: &FieldRequirement,
        sink: &mut dyn AuditSink,
    ) -> Result<Value> {
        let ref_id = reference_id(requirement)?;
        if let Some(resolver) = self.resolver {
            if let Some(metadata) = resolver.resolve(&ref_id, reference_type) {
                return Ok(metadata.to_global_reference());
            }
            note(
                sink,
                format!(
                    "Reference '{ref_id}' ({}) missing metadata; placeholder shortDescription used.",
                    reference_type.unwrap_or("unknown type")
                ),
            );
        }

        let description = format!(
            "Auto-filled {} (review required).",
            camel_to_sentence(mapping.ui_key_suffix()).to_lowercase()
        );
        note(
            sink,
            format!(
                "Field '{}' populated with placeholder metadata; confirm short description, URI, and version before publishing.",
                requirement.label
            ),
        );
        Ok(serde_json::json!({
            "@type": reference_type.unwrap_or(DEFAULT_REFERENCE_TYPE),
            "@refObjectId": ref_id,
            "@version": PLACEHOLDER_VERSION,
            "@uri": dataset_uri(&ref_id),
            "common:shortDescription": multilang_entry("en", &description),
        }))
    }
}

#[cfg(test)]
mod tests {
    use tidas_model::{LanguageValue, ReferenceMetadata};
    use tidas_standards::lookup;

    use super::*;

    struct NoMetadata;

    impl ReferenceResolver for NoMetadata {
        fn resolve(&self, _ref_id: &str, _ref_type: Option<&str>) -> Option<ReferenceMetadata> {
            None
        }
    }

    fn translations() -> TranslationLookup {
        TranslationLookup::from_entries([
            (
                "pages.process.view.administrativeInformation.licenseType.freeOfChargeForAllUsersAndUses",
                "对所有用户和用途免费",
            ),
            ("pages.process.view.processInformation.other", "其他"),
        ])
    }

    #[test]
    fn camel_case_becomes_sentence() {
        assert_eq!(
            camel_to_sentence("freeOfChargeForAllUsersAndUses"),
            "Free of charge for all users and uses"
        );
        assert_eq!(camel_to_sentence("licenseFee"), "License fee");
        assert_eq!(camel_to_sentence("Other"), "Other");
        assert_eq!(camel_to_sentence(""), "");
    }

    #[test]
    fn booleans_accept_common_spellings() {
        for (raw, expected) in [("是", "true"), (" YES ", "true"), ("否", "false"), ("0", "false")] {
            assert_eq!(boolean(&FieldRequirement::text("版权？", raw)).unwrap(), expected);
        }
        assert!(matches!(
            boolean(&FieldRequirement::text("版权？", "maybe")),
            Err(RequirementError::InvalidBool { .. })
        ));
    }

    #[test]
    fn enumeration_requires_matching_key_prefix() {
        let translations = translations();
        let converter = ValueConverter::new(&translations);
        let mapping = lookup("许可类型").unwrap();
        assert_eq!(
            converter
                .enumeration(mapping, &FieldRequirement::text("许可类型", "对所有用户和用途免费"))
                .unwrap(),
            "Free of charge for all users and uses"
        );
        for raw in ["其他", "未知"] {
            assert!(matches!(
                converter.enumeration(mapping, &FieldRequirement::text("许可类型", raw)),
                Err(RequirementError::UnresolvedEnum { .. })
            ));
        }
    }

    #[test]
    fn reference_requires_uuid() {
        let requirement = FieldRequirement::text("数据集委托方", "not-a-uuid");
        assert!(matches!(
            reference_id(&requirement),
            Err(RequirementError::InvalidUuid { .. })
        ));
        let requirement = FieldRequirement::text("数据集委托方", " F4B4C3148C4C4C83968F5B3C7724F6A8 ");
        assert_eq!(
            reference_id(&requirement).unwrap(),
            "f4b4c314-8c4c-4c83-968f-5b3c7724f6a8"
        );
    }

    #[test]
    fn resolver_miss_builds_placeholder_reference() {
        let translations = translations();
        let resolver = NoMetadata;
        let converter = ValueConverter::new(&translations).with_resolver(&resolver);
        let mapping = lookup("使用的数据来源").unwrap();
        let mut notes: Vec<String> = Vec::new();
        let value = converter
            .convert(
                mapping,
                &FieldRequirement::text("建模信息——使用的数据来源", "f4b4c314-8c4c-4c83-968f-5b3c7724f6a8"),
                &mut notes,
            )
            .unwrap();
        assert_eq!(value["@type"], "Source data set");
        assert_eq!(value["@version"], "00.00.000");
        assert_eq!(
            value["common:shortDescription"]["#text"],
            "Auto-filled reference to data source (review required)."
        );
        assert_eq!(notes.len(), 2);
        assert!(notes[0].starts_with("Reference 'f4b4c314-8c4c-4c83-968f-5b3c7724f6a8' (Source data set)"));
    }

    #[test]
    fn multilang_drops_empty_texts() {
        let requirement = FieldRequirement::multilang(
            "预期应用",
            vec![LanguageValue::new("zh", ""), LanguageValue::new("en", "LCA")],
        );
        assert_eq!(
            multilang(&requirement).unwrap(),
            serde_json::json!({"@xml:lang": "en", "#text": "LCA"})
        );
        let empty = FieldRequirement::multilang("预期应用", vec![LanguageValue::new("zh", "")]);
        assert!(matches!(
            multilang(&empty),
            Err(RequirementError::EmptyMultilang { .. })
        ));
    }
}
