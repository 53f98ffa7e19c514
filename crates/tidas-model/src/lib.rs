//! Data model for requirement-driven curation of TIDAS/ILCD process datasets.
//!
//! This crate holds the types shared by the loaders in `tidas-standards` and
//! the analysis/update engine in `tidas-update`:
//!
//! - [`requirement`]: declarative field and exchange requirements
//! - [`mapping`]: the shape of a label → document target rule
//! - [`reference`]: metadata used to build ILCD global references
//! - [`analysis`]: read-only gap report produced per dataset
//! - [`record`]: repository records wrapping a dataset payload
//! - [`document`]: path walking helpers over `serde_json::Value`

#![deny(unsafe_code)]

pub mod analysis;
pub mod document;
pub mod error;
pub mod mapping;
pub mod record;
pub mod reference;
pub mod requirement;

pub use analysis::RequirementAnalysis;
pub use error::{RequirementError, Result};
pub use mapping::{FieldMapping, ValueRule};
pub use record::Record;
pub use reference::{DATASET_URI_BASE, PLACEHOLDER_VERSION, ReferenceMetadata, dataset_uri};
pub use requirement::{
    ExchangeMatch, ExchangeUpdate, ExchangeValue, FieldRequirement, LanguageValue,
    ProcessRequirement, RequirementBundle, RequirementValue,
};
