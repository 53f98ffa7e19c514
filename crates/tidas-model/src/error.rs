use thiserror::Error;

/// Configuration errors raised while interpreting a requirement.
///
/// These indicate an authoring mistake in the requirement specification and
/// are never downgraded to warnings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RequirementError {
    #[error("requirement '{label}' expects a single text value")]
    ExpectedText { label: String },

    #[error("requirement '{label}' does not contain multi-language values")]
    ExpectedMultilang { label: String },

    #[error("no multi-language values provided for '{label}'")]
    EmptyMultilang { label: String },

    #[error("requirement '{label}' expected a UUID, received '{value}'")]
    InvalidUuid { label: String, value: String },

    #[error("unable to resolve enumeration value for '{label}' ({value})")]
    UnresolvedEnum { label: String, value: String },

    #[error("failed to derive enumeration label from '{key}'")]
    EmptyEnumLabel { key: String },

    #[error("unable to convert '{label}' value '{value}' to bool")]
    InvalidBool { label: String, value: String },
}

pub type Result<T> = std::result::Result<T, RequirementError>;
