//! Integration tests for the write workflow over a local repository.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tidas_cli::pipeline::{AUDIT_LOG_FILE, WorkflowOptions, run_workflow};
use tidas_cli::repository::LocalRepository;
use tidas_cli::types::DatasetOutcome;
use tidas_model::{Record, RequirementBundle};
use tidas_standards::{TranslationLookup, load_requirements};
use tidas_update::{Repository, RepositoryError};

const USER: &str = "user-1";
const TURBINE: &str = "0f5e2a1c-7d3b-4c6e-9a8f-1b2c3d4e5f60";
const CONSTRUCTION: &str = "6a1b8f0e-2c4d-4e5f-8a9b-0c1d2e3f4a51";

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

fn requirements() -> RequirementBundle {
    load_requirements(&fixtures().join("requirement/write_data.yaml")).expect("load requirements")
}

fn translations() -> TranslationLookup {
    TranslationLookup::load(&fixtures().join("requirement/pages_process.ts")).expect("load translations")
}

fn dataset(name: &str) -> Value {
    let text = fs::read_to_string(fixtures().join("datasets").join(name)).expect("read dataset");
    serde_json::from_str(&text).expect("parse dataset")
}

fn write_record(root: &Path, table: &str, id: &str, record: &Value) {
    let dir = root.join(table);
    fs::create_dir_all(&dir).expect("create table dir");
    fs::write(dir.join(format!("{id}.json")), record.to_string()).expect("write record");
}

fn process_record(owner: &str, state_code: i64, payload: Value) -> Value {
    json!({"user_id": owner, "state_code": state_code, "json_ordered": payload})
}

/// Lists every stored id regardless of owner, like a shared listing endpoint.
struct SharedListing {
    inner: LocalRepository,
    ids: Vec<String>,
}

impl Repository for SharedListing {
    fn list_json_ids(&self, _user_id: &str) -> Result<Vec<String>, RepositoryError> {
        Ok(self.ids.clone())
    }

    fn fetch_record(&self, table: &str, id: &str) -> Result<Option<Record>, RepositoryError> {
        self.inner.fetch_record(table, id)
    }

    fn detect_current_user_id(&self) -> Result<Option<String>, RepositoryError> {
        self.inner.detect_current_user_id()
    }
}

fn options(output_dir: &Path) -> WorkflowOptions {
    let mut options = WorkflowOptions::new(output_dir);
    options.user_id = Some(USER.to_string());
    options.limit = 0;
    options
}

#[test]
fn writes_updated_datasets_and_audit_log() {
    let repo = tempfile::tempdir().expect("repo dir");
    let out = tempfile::tempdir().expect("output dir");
    // Payload stored as a JSON string, as some exports do.
    let payload = dataset("wind_turbine_manufacturing.json").to_string();
    write_record(repo.path(), "processes", TURBINE, &process_record(USER, 0, Value::from(payload)));
    write_record(
        repo.path(),
        "contacts",
        "f4b4c314-8c4c-4c83-968f-5b3c7724f6a8",
        &json!({"json": {"contactDataSet": {"contactInformation": {"dataSetInformation": {
            "common:shortName": {"@xml:lang": "en", "#text": "Tiangong LCA"}
        }}}}, "version": "01.00.001"}),
    );

    let result = run_workflow(
        &LocalRepository::new(repo.path()),
        &requirements(),
        &translations(),
        &options(out.path()),
    )
    .expect("run workflow");

    let target = out.path().join(format!("{TURBINE}.json"));
    assert_eq!(result.written(), 1);
    assert_eq!(result.datasets[0].outcome, DatasetOutcome::Written(target.clone()));
    assert_eq!(result.datasets[0].scope, "global + process[1] 风力发电机组制造; *; 生产组合");

    let text = fs::read_to_string(&target).expect("read output");
    assert!(text.contains("风力发电机组制造"), "non-ASCII text is kept");
    assert!(text.starts_with("{\n  \"processDataSet\""));
    let written: Value = serde_json::from_str(&text).expect("parse output");
    let commissioner = &written["processDataSet"]["administrativeInformation"]
        ["common:commissionerAndGoal"]["common:referenceToCommissioner"];
    assert_eq!(commissioner["@version"], "01.00.001");
    assert_eq!(commissioner["common:shortDescription"]["#text"], "Tiangong LCA");

    let log_path = out.path().join(AUDIT_LOG_FILE);
    assert_eq!(result.audit_log.as_deref(), Some(log_path.as_path()));
    let log = fs::read_to_string(&log_path).expect("read audit log");
    assert!(log.lines().all(|line| line.starts_with(&format!("[{TURBINE}] "))));
    assert!(log.contains("Removed invalid allocation fraction '100%' (exchange 0)."));
}

#[test]
fn read_only_foreign_and_unreadable_records_are_skipped() {
    let repo = tempfile::tempdir().expect("repo dir");
    let out = tempfile::tempdir().expect("output dir");
    let turbine = dataset("wind_turbine_manufacturing.json");
    write_record(repo.path(), "processes", "published", &process_record(USER, 100, turbine.clone()));
    write_record(repo.path(), "processes", "foreign", &process_record("user-2", 0, turbine));
    write_record(
        repo.path(),
        "processes",
        "broken",
        &json!({"user_id": USER, "state_code": 0, "json": "{not json"}),
    );
    let repository = SharedListing {
        inner: LocalRepository::new(repo.path()),
        ids: ["published", "foreign", "broken", "absent"]
            .map(String::from)
            .to_vec(),
    };

    let result = run_workflow(&repository, &requirements(), &translations(), &options(out.path()))
        .expect("run workflow");
    assert_eq!(result.skipped(), 4);
    for id in ["published", "foreign", "broken", "absent"] {
        assert!(!out.path().join(format!("{id}.json")).exists());
    }

    let log = fs::read_to_string(out.path().join(AUDIT_LOG_FILE)).expect("read audit log");
    assert!(log.contains("[published] Skipped dataset: record is read-only (state_code 100)."));
    assert!(log.contains("[foreign] Skipped dataset: record is owned by another user, not 'user-1'."));
    assert!(log.contains("[broken] Skipped dataset: process payload missing or unparseable."));
    assert!(log.contains("[absent] Skipped dataset: record not found."));
}

#[test]
fn run_fails_when_user_has_no_datasets() {
    let repo = tempfile::tempdir().expect("repo dir");
    let out = tempfile::tempdir().expect("output dir");
    write_record(
        repo.path(),
        "processes",
        TURBINE,
        &process_record(USER, 0, dataset("wind_turbine_manufacturing.json")),
    );
    let mut opts = options(out.path());
    opts.user_id = Some("someone-else".to_string());

    let err = run_workflow(
        &LocalRepository::new(repo.path()),
        &requirements(),
        &translations(),
        &opts,
    )
    .expect_err("no datasets for another user");
    assert!(err.to_string().contains("someone-else"));
}

#[test]
fn dry_run_reports_without_writing() {
    let repo = tempfile::tempdir().expect("repo dir");
    let out = tempfile::tempdir().expect("output dir");
    let output_dir = out.path().join("nested");
    write_record(
        repo.path(),
        "processes",
        CONSTRUCTION,
        &process_record(USER, 0, dataset("wind_farm_construction.json")),
    );

    let mut opts = options(&output_dir);
    opts.dry_run = true;
    let result = run_workflow(
        &LocalRepository::new(repo.path()),
        &requirements(),
        &translations(),
        &opts,
    )
    .expect("run workflow");

    assert_eq!(result.pending(), 1);
    assert_eq!(result.datasets[0].scope, "global + binding process_1_updates");
    assert!(result.audit_log.is_none());
    assert!(!output_dir.exists());
}

#[test]
fn updated_output_is_reported_unchanged_on_rerun() {
    let repo = tempfile::tempdir().expect("repo dir");
    let out = tempfile::tempdir().expect("output dir");
    write_record(
        repo.path(),
        "processes",
        CONSTRUCTION,
        &process_record(USER, 0, dataset("wind_farm_construction.json")),
    );
    let repository = LocalRepository::new(repo.path());
    run_workflow(&repository, &requirements(), &translations(), &options(out.path()))
        .expect("first run");

    let updated: Value = serde_json::from_str(
        &fs::read_to_string(out.path().join(format!("{CONSTRUCTION}.json"))).expect("read output"),
    )
    .expect("parse output");
    write_record(repo.path(), "processes", CONSTRUCTION, &process_record(USER, 0, updated));
    fs::write(out.path().join(AUDIT_LOG_FILE), "stale\n").expect("write stale log");

    let result = run_workflow(&repository, &requirements(), &translations(), &options(out.path()))
        .expect("second run");
    assert_eq!(result.unchanged(), 1);
    assert!(result.audit_log.is_none());
    assert!(!out.path().join(AUDIT_LOG_FILE).exists());
}

#[test]
fn user_is_detected_when_not_given() {
    let repo = tempfile::tempdir().expect("repo dir");
    let out = tempfile::tempdir().expect("output dir");
    write_record(
        repo.path(),
        "processes",
        CONSTRUCTION,
        &process_record(USER, 0, dataset("wind_farm_construction.json")),
    );
    let mut opts = options(out.path());
    opts.user_id = None;
    opts.dry_run = true;

    let result = run_workflow(
        &LocalRepository::new(repo.path()),
        &requirements(),
        &translations(),
        &opts,
    )
    .expect("run workflow");
    assert_eq!(result.user_id, USER);
}
