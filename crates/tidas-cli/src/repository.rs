//! Filesystem mirror of the dataset repository.
//!
//! Layout: `<root>/<table>/<id>.json`, one [`Record`] per file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tidas_model::Record;
use tidas_update::{PROCESS_TABLE, Repository, RepositoryError};
use tracing::{debug, warn};

pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, table: &str, id: &str) -> PathBuf {
        self.root.join(table).join(format!("{id}.json"))
    }

    /// Record ids of a table in file-name order.
    fn table_ids(&self, table: &str) -> Result<Vec<String>, RepositoryError> {
        let dir = self.root.join(table);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(RepositoryError::Io {
                    location: dir.display().to_string(),
                    source,
                });
            }
        };
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| RepositoryError::Io {
                    location: dir.display().to_string(),
                    source,
                })?
                .path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|stem| stem.to_str())
            {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl Repository for LocalRepository {
    fn list_json_ids(&self, user_id: &str) -> Result<Vec<String>, RepositoryError> {
        let mut owned = Vec::new();
        for id in self.table_ids(PROCESS_TABLE)? {
            match self.fetch_record(PROCESS_TABLE, &id) {
                Ok(Some(record)) if record.is_owned_by(user_id) => owned.push(id),
                Ok(_) => {}
                Err(error) => warn!(%id, %error, "unreadable record skipped while listing"),
            }
        }
        debug!(user_id, count = owned.len(), "listed process datasets");
        Ok(owned)
    }

    fn fetch_record(&self, table: &str, id: &str) -> Result<Option<Record>, RepositoryError> {
        let path = self.record_path(table, id);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(RepositoryError::Io {
                    location: path.display().to_string(),
                    source,
                });
            }
        };
        let mut record: Record =
            serde_json::from_str(&text).map_err(|source| RepositoryError::Malformed {
                location: path.display().to_string(),
                source,
            })?;
        if record.id.trim().is_empty() {
            record.id = id.to_string();
        }
        Ok(Some(record))
    }

    /// Owner of the first private, team-less process record.
    fn detect_current_user_id(&self) -> Result<Option<String>, RepositoryError> {
        for id in self.table_ids(PROCESS_TABLE)? {
            let Ok(Some(record)) = self.fetch_record(PROCESS_TABLE, &id) else {
                continue;
            };
            if !record.is_writable() || record.has_team() {
                continue;
            }
            if let Some(user) = record
                .user_id
                .as_deref()
                .map(str::trim)
                .filter(|user| !user.is_empty())
            {
                return Ok(Some(user.to_string()));
            }
        }
        Ok(None)
    }
}
