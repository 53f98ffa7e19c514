//! Write-process workflow with explicit stages.
//!
//! The workflow follows these stages in order:
//! 1. **Select**: resolve the user, list their datasets, apply the limit
//! 2. **Fetch**: load each record and check ownership, state and payload
//! 3. **Analyse**: compare the dataset against the requirement bundle
//! 4. **Apply**: update, normalise and write datasets that need it
//! 5. **Audit**: flush the collected notes to the audit log
//!
//! Per-dataset repository problems skip that dataset only. Requirement
//! configuration errors abort the run.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tidas_model::RequirementBundle;
use tidas_standards::TranslationLookup;
use tidas_update::{
    AuditSink, ComplianceDefaults, DatasetUpdater, PROCESS_TABLE, Repository, RepositoryResolver,
};
use tracing::{debug, info, info_span, warn};

use crate::types::{DatasetOutcome, DatasetReport, WorkflowResult};

/// Audit log file name inside the output directory.
pub const AUDIT_LOG_FILE: &str = "write_process_workflow.log";

/// Settings for one workflow run.
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    /// Owner of the datasets; detected from the repository when `None`.
    pub user_id: Option<String>,
    /// Maximum datasets to process; zero or negative processes all.
    pub limit: i64,
    pub output_dir: PathBuf,
    /// Defaults to [`AUDIT_LOG_FILE`] inside `output_dir`.
    pub audit_log: Option<PathBuf>,
    /// Analyse only; nothing is written.
    pub dry_run: bool,
    pub compliance: ComplianceDefaults,
}

impl WorkflowOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            user_id: None,
            limit: 1,
            output_dir: output_dir.into(),
            audit_log: None,
            dry_run: false,
            compliance: ComplianceDefaults::default(),
        }
    }

    pub fn audit_log_path(&self) -> PathBuf {
        self.audit_log
            .clone()
            .unwrap_or_else(|| self.output_dir.join(AUDIT_LOG_FILE))
    }
}

// ============================================================================
// Audit log
// ============================================================================

/// Audit sink that prefixes each note with the dataset being processed.
#[derive(Debug, Default)]
pub struct AuditLog {
    current: Option<String>,
    entries: Vec<String>,
}

impl AuditLog {
    /// Notes recorded from now on belong to `dataset_id`.
    pub fn begin(&mut self, dataset_id: &str) {
        self.current = Some(dataset_id.to_string());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Writes one note per line; an empty log removes a stale file instead.
    ///
    /// Returns the path when a file was written.
    pub fn flush(&self, path: &Path) -> Result<Option<PathBuf>> {
        if self.entries.is_empty() {
            if path.exists() {
                fs::remove_file(path)
                    .with_context(|| format!("remove stale audit log {}", path.display()))?;
            }
            return Ok(None);
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create audit log directory {}", parent.display()))?;
        }
        let mut content = self.entries.join("\n");
        content.push('\n');
        fs::write(path, content).with_context(|| format!("write audit log {}", path.display()))?;
        Ok(Some(path.to_path_buf()))
    }
}

impl AuditSink for AuditLog {
    fn record(&mut self, message: String) {
        let line = match &self.current {
            Some(dataset_id) => format!("[{dataset_id}] {message}"),
            None => message,
        };
        self.entries.push(line);
    }
}

// ============================================================================
// Stage 1: Select
// ============================================================================

/// Explicit user id, or the one detected from the repository.
pub fn resolve_user_id<R: Repository + ?Sized>(
    repository: &R,
    explicit: Option<&str>,
) -> Result<String> {
    if let Some(user_id) = explicit.map(str::trim).filter(|user_id| !user_id.is_empty()) {
        return Ok(user_id.to_string());
    }
    let detected = repository
        .detect_current_user_id()
        .context("detect current user")?;
    match detected {
        Some(user_id) => {
            info!(%user_id, "detected current user from repository");
            Ok(user_id)
        }
        None => bail!("unable to determine user id; pass --user-id or set user_id in the configuration"),
    }
}

/// First `limit` ids in listing order; `limit <= 0` keeps all.
pub fn select_ids(ids: Vec<String>, limit: i64) -> Vec<String> {
    match usize::try_from(limit) {
        Ok(limit) if limit > 0 => ids.into_iter().take(limit).collect(),
        _ => ids,
    }
}

// ============================================================================
// Stages 2-5: Fetch, analyse, apply, audit
// ============================================================================

/// Runs the workflow over the user's datasets.
pub fn run_workflow<R: Repository>(
    repository: &R,
    bundle: &RequirementBundle,
    translations: &TranslationLookup,
    options: &WorkflowOptions,
) -> Result<WorkflowResult> {
    let start = Instant::now();
    let user_id = resolve_user_id(repository, options.user_id.as_deref())?;
    let ids = repository
        .list_json_ids(&user_id)
        .with_context(|| format!("list datasets for user '{user_id}'"))?;
    let selected = select_ids(ids, options.limit);
    if selected.is_empty() {
        bail!("no process datasets available for user '{user_id}'");
    }
    info!(%user_id, datasets = selected.len(), dry_run = options.dry_run, "workflow started");

    let resolver = RepositoryResolver::new(repository);
    let updater = DatasetUpdater::new(translations)
        .with_resolver(&resolver)
        .with_compliance(options.compliance.clone());
    if !options.dry_run {
        fs::create_dir_all(&options.output_dir).with_context(|| {
            format!("create output directory {}", options.output_dir.display())
        })?;
    }

    let mut audit = AuditLog::default();
    let mut datasets = Vec::with_capacity(selected.len());
    for dataset_id in &selected {
        let span = info_span!("dataset", dataset_id = %dataset_id);
        let _guard = span.enter();
        audit.begin(dataset_id);
        let report = process_dataset(
            repository, &updater, bundle, dataset_id, &user_id, options, &mut audit,
        )?;
        datasets.push(report);
    }

    let audit_log = if options.dry_run {
        None
    } else {
        audit.flush(&options.audit_log_path())?
    };

    let result = WorkflowResult {
        user_id,
        output_dir: options.output_dir.clone(),
        datasets,
        audit_log,
        dry_run: options.dry_run,
    };
    info!(
        written = result.written(),
        pending = result.pending(),
        unchanged = result.unchanged(),
        skipped = result.skipped(),
        elapsed = ?start.elapsed(),
        "workflow finished"
    );
    Ok(result)
}

fn process_dataset<R: Repository>(
    repository: &R,
    updater: &DatasetUpdater<'_>,
    bundle: &RequirementBundle,
    dataset_id: &str,
    user_id: &str,
    options: &WorkflowOptions,
    audit: &mut AuditLog,
) -> Result<DatasetReport> {
    let record = match repository.fetch_record(PROCESS_TABLE, dataset_id) {
        Ok(Some(record)) => record,
        Ok(None) => return Ok(skip(audit, dataset_id, "record not found".to_string())),
        Err(error) => {
            return Ok(skip(audit, dataset_id, format!("repository error: {error}")));
        }
    };
    if !record.is_owned_by(user_id) {
        return Ok(skip(
            audit,
            dataset_id,
            format!("record is owned by another user, not '{user_id}'"),
        ));
    }
    if !record.is_writable() {
        let state = record
            .state_code
            .map_or_else(|| "missing".to_string(), |code| code.to_string());
        return Ok(skip(
            audit,
            dataset_id,
            format!("record is read-only (state_code {state})"),
        ));
    }
    let Some(document) = record.document() else {
        return Ok(skip(
            audit,
            dataset_id,
            "process payload missing or unparseable".to_string(),
        ));
    };

    let analysis = updater
        .analyse(&document, bundle)
        .with_context(|| format!("analyse dataset {dataset_id}"))?;
    let scope = analysis.describe_scope();
    let missing = analysis.describe_missing();
    for label in &analysis.unsupported_labels {
        debug!(%label, "requirement label has no mapping");
    }
    if !analysis.needs_update() {
        info!(%scope, "dataset already satisfies requirements");
        return Ok(DatasetReport {
            dataset_id: dataset_id.to_string(),
            scope,
            missing,
            outcome: DatasetOutcome::Unchanged,
        });
    }
    if options.dry_run {
        info!(%scope, %missing, "dataset needs update (dry run)");
        return Ok(DatasetReport {
            dataset_id: dataset_id.to_string(),
            scope,
            missing,
            outcome: DatasetOutcome::Pending,
        });
    }

    let updated = updater
        .apply(document, bundle, audit)
        .with_context(|| format!("update dataset {dataset_id}"))?;
    let path = options.output_dir.join(format!("{dataset_id}.json"));
    write_dataset(&path, &updated)?;
    info!(path = %path.display(), %scope, "dataset written");
    Ok(DatasetReport {
        dataset_id: dataset_id.to_string(),
        scope,
        missing,
        outcome: DatasetOutcome::Written(path),
    })
}

fn skip(audit: &mut AuditLog, dataset_id: &str, reason: String) -> DatasetReport {
    warn!(%reason, "dataset skipped");
    audit.record(format!("Skipped dataset: {reason}."));
    DatasetReport::skipped(dataset_id, reason)
}

/// Pretty-printed UTF-8 JSON with two-space indentation.
pub fn write_dataset(path: &Path, document: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(document).context("serialize dataset")?;
    fs::write(path, text).with_context(|| format!("write dataset {}", path.display()))
}
