//! Optional YAML workflow configuration.
//!
//! Values here are defaults only; explicit command-line flags always win.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tidas_update::CompliancePreset;
use tracing::{debug, info};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tidas.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// User whose datasets are listed when `--user-id` is omitted.
    pub user_id: Option<String>,
    /// Maximum datasets per run; zero or negative processes everything.
    pub limit: Option<i64>,
    pub repository: Option<PathBuf>,
    pub requirement: Option<PathBuf>,
    pub translation: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub audit_log: Option<PathBuf>,
    pub compliance: CompliancePreset,
}

impl WorkflowConfig {
    /// Parses a configuration document; an empty document yields defaults.
    pub fn parse(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source).context("parse workflow configuration")
    }

    /// Loads `explicit`, or `tidas.yaml` from the working directory when present.
    ///
    /// An explicit path that does not exist is an error; a missing default file
    /// is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    debug!("no {DEFAULT_CONFIG_FILE} found, using built-in defaults");
                    return Ok(Self::default());
                }
                default
            }
        };
        let source = fs::read_to_string(&path)
            .with_context(|| format!("read configuration {}", path.display()))?;
        let config = Self::parse(&source)
            .with_context(|| format!("load configuration {}", path.display()))?;
        info!(path = %path.display(), "loaded workflow configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_partial_configuration() {
        let config = WorkflowConfig::parse(
            "user_id: user-1\nlimit: 0\ncompliance: not_defined\noutput_dir: out\n",
        )
        .unwrap();
        assert_eq!(config.user_id.as_deref(), Some("user-1"));
        assert_eq!(config.limit, Some(0));
        assert_eq!(config.compliance, CompliancePreset::NotDefined);
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.repository, None);
    }

    #[test]
    fn empty_configuration_uses_defaults() {
        assert_eq!(WorkflowConfig::parse("  \n").unwrap(), WorkflowConfig::default());
        assert_eq!(WorkflowConfig::default().compliance, CompliancePreset::Ef31);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        assert!(WorkflowConfig::parse("compliance: iso\n").is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(WorkflowConfig::load(Some(&dir.path().join("missing.yaml"))).is_err());

        let path = dir.path().join("tidas.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "limit: 3").unwrap();
        assert_eq!(WorkflowConfig::load(Some(&path)).unwrap().limit, Some(3));
    }
}
