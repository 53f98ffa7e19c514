//! Requirement analysis and update engine for TIDAS process datasets.
//!
//! A run loads a [`RequirementBundle`](tidas_model::RequirementBundle) once and
//! then, per dataset:
//!
//! 1. [`DatasetUpdater::analyse`] reports which requirements are unmet
//! 2. [`DatasetUpdater::apply`] writes global, process and exchange requirements
//! 3. [`normalize_dataset`] enforces the mandatory structural fixes
//!
//! Assumptions made during an update (placeholders, replaced values, removed
//! invalid data) are collected through an [`AuditSink`].

pub mod analyzer;
pub mod audit;
pub mod convert;
pub mod matcher;
pub mod normalize;
pub mod repository;
pub mod resolver;
pub mod updater;

pub use analyzer::{RequirementAnalyzer, dataset_root};
pub use audit::AuditSink;
pub use convert::ValueConverter;
pub use matcher::{ProcessMatch, match_process, names_match, select_process};
pub use normalize::{
    ComplianceDefaults, CompliancePreset, normalize_allocation_fraction, normalize_dataset,
};
pub use repository::{PROCESS_TABLE, Repository, RepositoryError};
pub use resolver::{ReferenceResolver, RepositoryResolver};
pub use updater::{DatasetUpdater, TIMESTAMP_FORMAT};
