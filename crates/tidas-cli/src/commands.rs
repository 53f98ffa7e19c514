use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use comfy_table::Table;
use tidas_standards::{TranslationLookup, load_requirements, supported_labels};
use tracing::info;

use tidas_cli::config::WorkflowConfig;
use tidas_cli::pipeline::{WorkflowOptions, run_workflow};
use tidas_cli::repository::LocalRepository;
use tidas_cli::types::WorkflowResult;

use crate::cli::{WorkflowArgs, WriteArgs};
use crate::summary::apply_table_style;

const DEFAULT_REPOSITORY: &str = "repository";
const DEFAULT_OUTPUT_DIR: &str = "artifacts/write_process";
const DEFAULT_LIMIT: i64 = 1;

pub fn run_labels() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Label", "Kind"]);
    apply_table_style(&mut table);
    for (label, kind) in supported_labels() {
        table.add_row(vec![label, kind]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_write(args: &WriteArgs, config: &WorkflowConfig) -> Result<WorkflowResult> {
    let mut options = workflow_options(&args.workflow, config);
    if let Some(output_dir) = args.output_dir.clone().or_else(|| config.output_dir.clone()) {
        options.output_dir = output_dir;
    }
    options.audit_log = args.audit_log.clone().or_else(|| config.audit_log.clone());
    options.dry_run = args.dry_run;
    execute(&args.workflow, config, &options)
}

pub fn run_check(args: &WorkflowArgs, config: &WorkflowConfig) -> Result<WorkflowResult> {
    let mut options = workflow_options(args, config);
    options.dry_run = true;
    execute(args, config, &options)
}

fn execute(
    args: &WorkflowArgs,
    config: &WorkflowConfig,
    options: &WorkflowOptions,
) -> Result<WorkflowResult> {
    let requirement = required_path(
        args.requirement.as_ref(),
        config.requirement.as_ref(),
        "requirement",
    )?;
    let translation = required_path(
        args.translation.as_ref(),
        config.translation.as_ref(),
        "translation",
    )?;
    let repository_root = args
        .repository
        .clone()
        .or_else(|| config.repository.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPOSITORY));

    let bundle = load_requirements(&requirement)
        .with_context(|| format!("load requirements {}", requirement.display()))?;
    let translations = TranslationLookup::load(&translation)
        .with_context(|| format!("load translations {}", translation.display()))?;
    info!(
        global = bundle.global_updates.len(),
        processes = bundle.process_updates.len(),
        bindings = bundle.uuid_bindings.len(),
        translations = translations.len(),
        "requirements loaded"
    );

    let repository = LocalRepository::new(repository_root);
    run_workflow(&repository, &bundle, &translations, options)
}

/// Options shared by `write` and `check`; flags win over the configuration file.
fn workflow_options(args: &WorkflowArgs, config: &WorkflowConfig) -> WorkflowOptions {
    let mut options = WorkflowOptions::new(DEFAULT_OUTPUT_DIR);
    options.user_id = args.user_id.clone().or_else(|| config.user_id.clone());
    options.limit = args.limit.or(config.limit).unwrap_or(DEFAULT_LIMIT);
    options.compliance = config.compliance.defaults();
    options
}

fn required_path(flag: Option<&PathBuf>, configured: Option<&PathBuf>, name: &str) -> Result<PathBuf> {
    flag.or(configured).cloned().ok_or_else(|| {
        anyhow!("no {name} file given; pass --{name} or set `{name}` in the configuration")
    })
}
