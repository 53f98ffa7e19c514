//! Static tables and loaders for requirement-driven process curation.
//!
//! - [`fields`]: the label → document target table and exchange field table
//! - [`translation`]: displayed enumeration text → locale key lookup
//! - [`requirements`]: YAML requirement loader, including templates and bindings

pub mod error;
pub mod fields;
pub mod requirements;
pub mod translation;

pub use error::{Result, StandardsError};
pub use fields::{
    EXCHANGE_FIELDS, FIELD_MAPPINGS, exchange_field_key, lookup, normalize_label,
    supported_labels,
};
pub use requirements::{load_requirements, parse_requirements};
pub use translation::TranslationLookup;
