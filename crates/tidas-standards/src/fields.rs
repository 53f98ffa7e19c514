//! Static table translating requirement labels into document targets.
//!
//! Labels arrive as `category——field` (e.g. `管理信息——许可类型`); lookups use
//! the part after the `——` separator.

use tidas_model::{FieldMapping, ValueRule};

/// Separator between a label's category and its field name.
pub const LABEL_SEPARATOR: &str = "——";

const CONTACT: ValueRule = ValueRule::Reference {
    reference_type: Some("Contact data set"),
};
const SOURCE: ValueRule = ValueRule::Reference {
    reference_type: Some("Source data set"),
};

// =============================================================================
// Field mappings
// =============================================================================

pub static FIELD_MAPPINGS: &[FieldMapping] = &[
    FieldMapping {
        key: "数据切断和完整性原则",
        label: "建模信息——数据切断和完整性原则",
        schema_path: &[
            "modellingAndValidation",
            "dataSourcesTreatmentAndRepresentativeness",
            "dataCutOffAndCompletenessPrinciples",
        ],
        rule: ValueRule::Multilang,
        ui_key: "pages.process.view.modellingAndValidation.dataCutOffAndCompletenessPrinciples",
    },
    FieldMapping {
        key: "数据集委托方",
        label: "管理信息——数据集委托方",
        schema_path: &[
            "administrativeInformation",
            "common:commissionerAndGoal",
            "common:referenceToCommissioner",
        ],
        rule: CONTACT,
        ui_key: "pages.process.view.administrativeInformation.referenceToCommissioner",
    },
    FieldMapping {
        key: "数据集生成者/建模者",
        label: "管理信息——数据集生成者/建模者",
        schema_path: &[
            "administrativeInformation",
            "dataGenerator",
            "common:referenceToPersonOrEntityGeneratingTheDataSet",
        ],
        rule: CONTACT,
        // Key spelling matches the editor's locale file.
        ui_key: "pages.process.view.administrativeInformation.RreferenceToPersonOrEntityGeneratingTheDataSet",
    },
    FieldMapping {
        key: "数据录入人",
        label: "管理信息——数据录入人",
        schema_path: &[
            "administrativeInformation",
            "dataEntryBy",
            "common:referenceToPersonOrEntityEnteringTheData",
        ],
        rule: CONTACT,
        ui_key: "pages.process.view.administrativeInformation.referenceToPersonOrEntityEnteringTheData",
    },
    FieldMapping {
        key: "数据集拥有者",
        label: "管理信息——数据集拥有者",
        schema_path: &[
            "administrativeInformation",
            "publicationAndOwnership",
            "common:referenceToOwnershipOfDataSet",
        ],
        rule: CONTACT,
        ui_key: "pages.process.view.administrativeInformation.referenceToOwnershipOfDataSet",
    },
    FieldMapping {
        key: "版权？",
        label: "管理信息——版权？",
        schema_path: &[
            "administrativeInformation",
            "publicationAndOwnership",
            "common:copyright",
        ],
        rule: ValueRule::Bool,
        ui_key: "pages.process.view.administrativeInformation.copyright",
    },
    FieldMapping {
        key: "许可类型",
        label: "管理信息——许可类型",
        schema_path: &[
            "administrativeInformation",
            "publicationAndOwnership",
            "common:licenseType",
        ],
        rule: ValueRule::Enum,
        ui_key: "pages.process.view.administrativeInformation.licenseType",
    },
    FieldMapping {
        key: "混合和位置类型",
        label: "过程信息——混合和位置类型",
        schema_path: &[
            "processInformation",
            "dataSetInformation",
            "name",
            "mixAndLocationTypes",
        ],
        rule: ValueRule::Multilang,
        ui_key: "pages.process.view.processInformation.mixAndLocationTypes",
    },
    FieldMapping {
        key: "定量产品或过程属性",
        label: "过程信息——定量产品或过程属性",
        schema_path: &[
            "processInformation",
            "dataSetInformation",
            "name",
            "functionalUnitFlowProperties",
        ],
        rule: ValueRule::Multilang,
        ui_key: "pages.process.view.processInformation.functionalUnitFlowProperties",
    },
    FieldMapping {
        key: "使用的数据来源",
        label: "建模信息——使用的数据来源",
        schema_path: &[
            "modellingAndValidation",
            "dataSourcesTreatmentAndRepresentativeness",
            "referenceToDataSource",
        ],
        rule: SOURCE,
        ui_key: "pages.process.view.modellingAndValidation.referenceToDataSource",
    },
    FieldMapping {
        key: "技术描述及背景系统",
        label: "过程信息——技术描述及背景系统",
        schema_path: &[
            "processInformation",
            "technology",
            "technologyDescriptionAndIncludedProcesses",
        ],
        rule: ValueRule::Multilang,
        ui_key: "pages.process.view.processInformation.technologyDescriptionAndIncludedProcesses",
    },
    FieldMapping {
        key: "数据集格式",
        label: "管理信息——数据集格式",
        schema_path: &[
            "administrativeInformation",
            "dataEntryBy",
            "common:referenceToDataSetFormat",
        ],
        rule: SOURCE,
        ui_key: "pages.process.view.administrativeInformation.referenceToDataSetFormat",
    },
    FieldMapping {
        key: "预期应用",
        label: "管理信息——预期应用",
        schema_path: &[
            "administrativeInformation",
            "common:commissionerAndGoal",
            "common:intendedApplications",
        ],
        rule: ValueRule::Multilang,
        ui_key: "pages.process.view.administrativeInformation.intendedApplications",
    },
];

// =============================================================================
// Exchange fields
// =============================================================================

/// Exchange-level labels and the exchange key they write.
pub static EXCHANGE_FIELDS: &[(&str, &str)] = &[("数据推导类型/状态", "dataDerivationTypeStatus")];

/// Strips a `category——` prefix from a label.
pub fn normalize_label(label: &str) -> &str {
    label
        .split_once(LABEL_SEPARATOR)
        .map_or(label, |(_, field)| field)
        .trim()
}

/// Finds the mapping for a label, with or without its category prefix.
pub fn lookup(label: &str) -> Option<&'static FieldMapping> {
    let key = normalize_label(label);
    FIELD_MAPPINGS.iter().find(|mapping| mapping.key == key)
}

/// Exchange key written for an exchange-update label.
pub fn exchange_field_key(label: &str) -> Option<&'static str> {
    let label = label.trim();
    EXCHANGE_FIELDS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, key)| *key)
}

/// Every label accepted in requirement files, field labels first.
pub fn supported_labels() -> impl Iterator<Item = (&'static str, &'static str)> {
    FIELD_MAPPINGS
        .iter()
        .map(|mapping| (mapping.label, mapping.rule.name()))
        .chain(EXCHANGE_FIELDS.iter().map(|(label, _)| (*label, "exchange")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn labels_resolve_with_or_without_category() {
        let full = lookup("管理信息——许可类型").unwrap();
        let bare = lookup(" 许可类型 ").unwrap();
        assert_eq!(full, bare);
        assert_eq!(full.rule, ValueRule::Enum);
        assert!(lookup("未知——字段").is_none());
    }

    #[test]
    fn table_keys_are_unique_and_labels_consistent() {
        let keys: HashSet<_> = FIELD_MAPPINGS.iter().map(|mapping| mapping.key).collect();
        assert_eq!(keys.len(), FIELD_MAPPINGS.len());
        for mapping in FIELD_MAPPINGS {
            assert_eq!(normalize_label(mapping.label), mapping.key);
            assert!(mapping.ui_key.starts_with("pages.process.view."));
            assert!(!mapping.schema_path.is_empty());
        }
    }

    #[test]
    fn reference_mappings_declare_their_type() {
        assert_eq!(
            lookup("使用的数据来源").unwrap().reference_type(),
            Some("Source data set")
        );
        assert_eq!(
            lookup("数据录入人").unwrap().reference_type(),
            Some("Contact data set")
        );
        assert_eq!(lookup("预期应用").unwrap().reference_type(), None);
    }

    #[test]
    fn exchange_labels() {
        assert_eq!(
            exchange_field_key("数据推导类型/状态"),
            Some("dataDerivationTypeStatus")
        );
        assert_eq!(exchange_field_key("其他"), None);
        assert_eq!(supported_labels().count(), FIELD_MAPPINGS.len() + 1);
    }
}
