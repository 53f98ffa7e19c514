//! Read-only gap report produced before a dataset is updated.

use std::collections::BTreeSet;

use serde::Serialize;

/// Which requirements a dataset already satisfies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequirementAnalysis {
    pub has_global_requirements: bool,
    pub missing_global_fields: Vec<String>,
    pub matched_process_name: Option<String>,
    /// 1-based position of the matched process requirement.
    pub matched_process_index: Option<usize>,
    /// Template name when the process requirement came from an identifier binding.
    pub matched_binding: Option<String>,
    pub process_fields_defined: bool,
    pub process_exchanges_defined: bool,
    pub missing_process_fields: Vec<String>,
    pub missing_process_exchanges: Vec<String>,
    pub available_process_names: Vec<String>,
    pub unsupported_labels: Vec<String>,
}

impl RequirementAnalysis {
    pub fn needs_update(&self) -> bool {
        !self.missing_global_fields.is_empty()
            || !self.missing_process_fields.is_empty()
            || !self.missing_process_exchanges.is_empty()
    }

    /// Short description of which requirement scopes applied.
    pub fn describe_scope(&self) -> String {
        let mut parts = Vec::new();
        if self.has_global_requirements {
            parts.push("global".to_string());
        }
        match (&self.matched_binding, &self.matched_process_name) {
            (Some(template), _) => parts.push(format!("binding {template}")),
            (None, Some(name)) => match self.matched_process_index {
                Some(index) => parts.push(format!("process[{index}] {name}")),
                None => parts.push(format!("process {name}")),
            },
            (None, None) if !self.available_process_names.is_empty() => {
                parts.push("process (no match)".to_string());
            }
            (None, None) => {}
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(" + ")
        }
    }

    /// Sorted, de-duplicated list of what is still missing.
    pub fn describe_missing(&self) -> String {
        let process = self.matched_process_name.as_deref().unwrap_or("process");
        let mut segments = Vec::new();
        if !self.missing_global_fields.is_empty() {
            segments.push(format!("global fields: {}", sorted_unique(&self.missing_global_fields)));
        }
        if !self.missing_process_fields.is_empty() {
            segments.push(format!(
                "{process} fields: {}",
                sorted_unique(&self.missing_process_fields)
            ));
        }
        if !self.missing_process_exchanges.is_empty() {
            segments.push(format!(
                "{process} exchanges: {}",
                sorted_unique(&self.missing_process_exchanges)
            ));
        }
        if segments.is_empty() {
            segments.push("no missing fields".to_string());
        }
        if !self.unsupported_labels.is_empty() {
            segments.push(format!(
                "unsupported labels: {}",
                sorted_unique(&self.unsupported_labels)
            ));
        }
        segments.join("; ")
    }
}

fn sorted_unique(items: &[String]) -> String {
    items
        .iter()
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn empty_analysis_needs_nothing() {
        let analysis = RequirementAnalysis::default();
        assert!(!analysis.needs_update());
        assert_snapshot!(analysis.describe_scope(), @"none");
        assert_snapshot!(analysis.describe_missing(), @"no missing fields");
    }

    #[test]
    fn matched_process_is_described_with_its_position() {
        let analysis = RequirementAnalysis {
            has_global_requirements: true,
            missing_global_fields: vec!["b".to_string(), "a".to_string(), "b".to_string()],
            matched_process_name: Some("风电场运维; 陆/海上风电".to_string()),
            matched_process_index: Some(2),
            missing_process_exchanges: vec!["数据推导类型/状态".to_string()],
            unsupported_labels: vec!["未知字段".to_string()],
            ..RequirementAnalysis::default()
        };
        assert!(analysis.needs_update());
        assert_snapshot!(analysis.describe_scope(), @"global + process[2] 风电场运维; 陆/海上风电");
        assert_snapshot!(
            analysis.describe_missing(),
            @"global fields: a, b; 风电场运维; 陆/海上风电 exchanges: 数据推导类型/状态; unsupported labels: 未知字段"
        );
    }

    #[test]
    fn unmatched_and_bound_scopes() {
        let unmatched = RequirementAnalysis {
            available_process_names: vec!["风力发电机组制造".to_string()],
            missing_process_fields: vec!["x".to_string()],
            ..RequirementAnalysis::default()
        };
        assert_snapshot!(unmatched.describe_scope(), @"process (no match)");
        assert_snapshot!(unmatched.describe_missing(), @"process fields: x");

        let bound = RequirementAnalysis {
            matched_process_name: Some("process_1_updates".to_string()),
            matched_binding: Some("process_1_updates".to_string()),
            ..RequirementAnalysis::default()
        };
        assert_snapshot!(bound.describe_scope(), @"binding process_1_updates");
    }
}
