//! Repository collaborator contract.

use serde_json::Value;
use thiserror::Error;
use tidas_model::Record;

/// Table holding process datasets.
pub const PROCESS_TABLE: &str = "processes";

/// Failures of a repository backend.
///
/// A record that simply does not exist is `Ok(None)`, not an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RepositoryError {
    #[error("repository I/O failed for {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record {location}: {source}")]
    Malformed {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Source of dataset records.
pub trait Repository {
    /// Identifiers of the process datasets owned by `user_id`.
    fn list_json_ids(&self, user_id: &str) -> Result<Vec<String>, RepositoryError>;

    fn fetch_record(&self, table: &str, id: &str) -> Result<Option<Record>, RepositoryError>;

    /// Owner of the private records visible to the current session, if any.
    fn detect_current_user_id(&self) -> Result<Option<String>, RepositoryError>;

    /// Decoded process dataset, `None` when missing or unparseable.
    fn fetch_process_json(&self, id: &str) -> Result<Option<Value>, RepositoryError> {
        Ok(self
            .fetch_record(PROCESS_TABLE, id)?
            .and_then(|record| record.document()))
    }
}
