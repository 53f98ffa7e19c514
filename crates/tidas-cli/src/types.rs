use std::path::PathBuf;

/// What happened to one dataset during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetOutcome {
    /// Updated dataset written to this path.
    Written(PathBuf),
    /// Needs an update, but the run was analysis-only.
    Pending,
    /// Already satisfies every requirement.
    Unchanged,
    /// Not processed, with the reason.
    Skipped(String),
}

#[derive(Debug, Clone)]
pub struct DatasetReport {
    pub dataset_id: String,
    /// Requirement scopes that applied, e.g. `global + process[1] 风电场运维`.
    pub scope: String,
    pub missing: String,
    pub outcome: DatasetOutcome,
}

impl DatasetReport {
    pub fn skipped(dataset_id: &str, reason: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.to_string(),
            scope: "-".to_string(),
            missing: "-".to_string(),
            outcome: DatasetOutcome::Skipped(reason.into()),
        }
    }
}

#[derive(Debug)]
pub struct WorkflowResult {
    pub user_id: String,
    pub output_dir: PathBuf,
    pub datasets: Vec<DatasetReport>,
    /// Audit log written for this run, if any notes were recorded.
    pub audit_log: Option<PathBuf>,
    pub dry_run: bool,
}

impl WorkflowResult {
    fn count(&self, predicate: impl Fn(&DatasetOutcome) -> bool) -> usize {
        self.datasets
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }

    pub fn written(&self) -> usize {
        self.count(|outcome| matches!(outcome, DatasetOutcome::Written(_)))
    }

    pub fn pending(&self) -> usize {
        self.count(|outcome| matches!(outcome, DatasetOutcome::Pending))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|outcome| matches!(outcome, DatasetOutcome::Unchanged))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, DatasetOutcome::Skipped(_)))
    }
}
